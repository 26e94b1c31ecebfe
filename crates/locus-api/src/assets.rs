//! Handlers for `/assets` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  asset::{Asset, AssetUpdate, NewAsset},
  store::RegistryStore,
};

use crate::{actor::Actor, error::ApiError};

/// `GET /assets`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Asset>>, ApiError> {
  let assets = store.list_assets().await.map_err(ApiError::from_store)?;
  Ok(Json(assets))
}

/// `POST /assets` — 201, 409 on a taken asset code.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewAsset>,
) -> Result<impl IntoResponse, ApiError> {
  let asset = store
    .create_asset(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(asset)))
}

/// `GET /assets/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Asset>, ApiError> {
  let asset = store
    .get_asset(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("asset {id} not found")))?;
  Ok(Json(asset))
}

/// `PATCH /assets/{id}`
pub async fn update_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<AssetUpdate>,
) -> Result<Json<Asset>, ApiError> {
  let asset = store
    .update_asset(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(asset))
}

/// `DELETE /assets/{id}`
pub async fn delete_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let removed = store.delete_asset(id).await.map_err(ApiError::from_store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("asset {id} not found")))
  }
}
