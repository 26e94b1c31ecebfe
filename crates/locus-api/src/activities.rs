//! Handlers for `/activities` endpoints.
//!
//! The activity log is append-only: there is no PATCH and no DELETE here,
//! and never will be. Clients use POST for the entries the store does not
//! emit itself (photo uploads, data verification).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  activity::{Activity, NewActivity},
  store::RegistryStore,
};

use crate::{actor::Actor, error::ApiError};

/// `GET /activities`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Activity>>, ApiError> {
  let activities = store
    .list_activities()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(activities))
}

/// `POST /activities` — 201; `recorded_at` and `performed_by` are
/// server-assigned.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewActivity>,
) -> Result<impl IntoResponse, ApiError> {
  let activity = store
    .record_activity(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(activity)))
}

/// `GET /activities/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Activity>, ApiError> {
  let activity = store
    .get_activity(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("activity {id} not found")))?;
  Ok(Json(activity))
}
