//! Handlers for `/recommendations` endpoints.
//!
//! Unlike activities these are a task list: status changes in place and
//! rows may be removed outright.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  recommendation::{
    NewRecommendation, Recommendation, RecommendationStatus,
  },
  store::RegistryStore,
};
use serde::Deserialize;

use crate::{actor::Actor, error::ApiError};

/// `GET /recommendations`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
  let recs = store
    .list_recommendations()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(recs))
}

/// `POST /recommendations` — 201; new entries start open.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewRecommendation>,
) -> Result<impl IntoResponse, ApiError> {
  let rec = store
    .create_recommendation(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(rec)))
}

/// `GET /recommendations/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Recommendation>, ApiError> {
  let rec = store
    .get_recommendation(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("recommendation {id} not found"))
    })?;
  Ok(Json(rec))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: RecommendationStatus,
}

/// `PATCH /recommendations/{id}` — body: `{"status":"completed"}`.
pub async fn set_status<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Recommendation>, ApiError> {
  let rec = store
    .set_recommendation_status(id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rec))
}

/// `DELETE /recommendations/{id}`
pub async fn delete_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let removed = store
    .delete_recommendation(id)
    .await
    .map_err(ApiError::from_store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("recommendation {id} not found")))
  }
}
