//! Handlers for `/programs` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  program::{NewProgram, Program, ProgramUpdate},
  store::RegistryStore,
};

use crate::{actor::Actor, error::ApiError};

/// `GET /programs`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Program>>, ApiError> {
  let programs = store.list_programs().await.map_err(ApiError::from_store)?;
  Ok(Json(programs))
}

/// `POST /programs` — 201, 409 on a taken program code.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewProgram>,
) -> Result<impl IntoResponse, ApiError> {
  let program = store
    .create_program(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(program)))
}

/// `GET /programs/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Program>, ApiError> {
  let program = store
    .get_program(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("program {id} not found")))?;
  Ok(Json(program))
}

/// `PATCH /programs/{id}`
pub async fn update_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<ProgramUpdate>,
) -> Result<Json<Program>, ApiError> {
  let program = store
    .update_program(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(program))
}

/// `DELETE /programs/{id}`
pub async fn delete_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let removed = store
    .delete_program(id)
    .await
    .map_err(ApiError::from_store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("program {id} not found")))
  }
}
