//! Handlers for `/staff` endpoints — the usual CRUD surface.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  staff::{NewStaff, Staff, StaffUpdate},
  store::RegistryStore,
};

use crate::{actor::Actor, error::ApiError};

/// `GET /staff`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Staff>>, ApiError> {
  let staff = store.list_staff().await.map_err(ApiError::from_store)?;
  Ok(Json(staff))
}

/// `POST /staff` — 201, 409 on a taken staff code.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewStaff>,
) -> Result<impl IntoResponse, ApiError> {
  let staff = store
    .create_staff(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(staff)))
}

/// `GET /staff/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Staff>, ApiError> {
  let staff = store
    .get_staff_member(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("staff member {id} not found"))
    })?;
  Ok(Json(staff))
}

/// `PATCH /staff/{id}` — `"site_id": null` clears the assignment.
pub async fn update_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<StaffUpdate>,
) -> Result<Json<Staff>, ApiError> {
  let staff = store
    .update_staff(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(staff))
}

/// `DELETE /staff/{id}`
pub async fn delete_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let removed = store.delete_staff(id).await.map_err(ApiError::from_store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("staff member {id} not found")))
  }
}
