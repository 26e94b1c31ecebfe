//! HTTP Basic authentication against the user table.
//!
//! Every request is verified before it reaches a handler: the username is
//! resolved through the store, the password checked against the stored
//! argon2 hash, and disabled accounts are refused. On success the
//! middleware installs the [`Actor`] extension the API's write handlers
//! require — there is no fallback identity.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use locus_api::{Actor, ApiError};
use locus_core::store::RegistryStore;

/// axum middleware: authenticate or answer 401.
pub async fn require_basic_auth<S>(
  State(store): State<Arc<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: RegistryStore + Send + Sync + 'static,
{
  match authenticate(store.as_ref(), req.headers()).await {
    Ok(actor) => {
      req.extensions_mut().insert(actor);
      next.run(req).await
    }
    Err(e) => e.into_response(),
  }
}

async fn authenticate<S>(
  store: &S,
  headers: &HeaderMap,
) -> Result<Actor, ApiError>
where
  S: RegistryStore,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = store
    .get_user_by_username(username)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)?;

  if !user.active {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(Actor { user_id: user.id, role: user.role })
}
