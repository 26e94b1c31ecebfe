//! Handlers for `/users` endpoints.
//!
//! Plaintext passwords exist only here, for the duration of the request:
//! they are argon2-hashed before the store sees them, and the stored hash
//! is skipped during serialisation, so no credential material leaves the
//! process. There is no DELETE — users are disabled with
//! `{"active": false}`.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use locus_core::{
  patch,
  store::RegistryStore,
  user::{NewUser, Role, User, UserUpdate},
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::ApiError;

fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users`. The only place a plaintext
/// password crosses the API.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
  pub username: String,
  pub password: String,
  pub name:     String,
  pub role:     Role,
  pub email:    Option<String>,
  pub phone:    Option<String>,
}

/// `POST /users` — 201, 409 on a taken username.
pub async fn create<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError> {
  let user = store
    .create_user(NewUser {
      username:      body.username,
      password_hash: hash_password(&body.password)?,
      name:          body.name,
      role:          body.role,
      email:         body.email,
      phone:         body.phone,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: RegistryStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<User>>, ApiError> {
  let users = store.list_users().await.map_err(ApiError::from_store)?;
  Ok(Json(users))
}

/// `GET /users/{id}`
pub async fn get_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /users/{id}`. A supplied password is
/// re-hashed; the hash itself is never accepted over the wire.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserBody {
  pub username: Option<String>,
  pub password: Option<String>,
  pub name:     Option<String>,
  pub role:     Option<Role>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub email:    Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub phone:    Option<Option<String>>,
  pub active:   Option<bool>,
}

/// `PATCH /users/{id}` — `{"active": false}` soft-disables the account.
pub async fn update_one<S: RegistryStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateUserBody>,
) -> Result<Json<User>, ApiError> {
  let password_hash = match &body.password {
    Some(p) => Some(hash_password(p)?),
    None => None,
  };

  let user = store
    .update_user(id, UserUpdate {
      username: body.username,
      password_hash,
      name: body.name,
      role: body.role,
      email: body.email,
      phone: body.phone,
      active: body.active,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user))
}
