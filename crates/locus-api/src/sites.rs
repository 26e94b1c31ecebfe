//! Handlers for `/sites` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/sites` | All sites, insertion order |
//! | `POST`   | `/sites` | Body: [`NewSite`]; 201, 409 on a taken code |
//! | `GET`    | `/sites/{id}` | 404 if not found |
//! | `PATCH`  | `/sites/{id}` | Partial merge; 404 on unknown id |
//! | `DELETE` | `/sites/{id}` | 204, 404 when nothing was removed |
//! | `POST`   | `/sites/{id}/visit` | Stamp visit audit fields |
//! | `GET`    | `/sites/{id}/staff` etc. | Site-scoped relationship reads |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  activity::Activity,
  asset::Asset,
  program::Program,
  site::{NewSite, Site, SiteUpdate},
  staff::Staff,
  store::RegistryStore,
};

use crate::{actor::Actor, error::ApiError};

/// `GET /sites`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Site>>, ApiError> {
  let sites = store.list_sites().await.map_err(ApiError::from_store)?;
  Ok(Json(sites))
}

/// `POST /sites` — 201 + the stored site, audit fields included.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  actor: Actor,
  Json(body): Json<NewSite>,
) -> Result<impl IntoResponse, ApiError> {
  let site = store
    .create_site(body, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(site)))
}

/// `GET /sites/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Site>, ApiError> {
  let site = store
    .get_site(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("site {id} not found")))?;
  Ok(Json(site))
}

/// `PATCH /sites/{id}`
pub async fn update_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<SiteUpdate>,
) -> Result<Json<Site>, ApiError> {
  let site = store
    .update_site(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(site))
}

/// `DELETE /sites/{id}`
pub async fn delete_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let removed = store.delete_site(id).await.map_err(ApiError::from_store)?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("site {id} not found")))
  }
}

/// `POST /sites/{id}/visit`
pub async fn visit<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  actor: Actor,
) -> Result<Json<Site>, ApiError> {
  let site = store
    .record_site_visit(id, actor.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(site))
}

/// `GET /sites/{id}/staff`
pub async fn staff_for<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Staff>>, ApiError> {
  let staff = store
    .staff_for_site(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(staff))
}

/// `GET /sites/{id}/assets`
pub async fn assets_for<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Asset>>, ApiError> {
  let assets = store
    .assets_for_site(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(assets))
}

/// `GET /sites/{id}/programs`
pub async fn programs_for<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Program>>, ApiError> {
  let programs = store
    .programs_for_site(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(programs))
}

/// `GET /sites/{id}/activities`
pub async fn activities_for<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Activity>>, ApiError> {
  let activities = store
    .activities_for_site(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(activities))
}
