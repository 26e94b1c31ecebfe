//! The authenticated actor behind a request.
//!
//! Write operations require an acting user — there is no fallback
//! identity. The server's authentication middleware resolves credentials
//! against the user table and installs an [`Actor`] extension; handlers
//! extract it and fail with 401 when it is missing.

use axum::{extract::FromRequestParts, http::request::Parts};
use locus_core::user::Role;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct Actor {
  pub user_id: i64,
  pub role:    Role,
}

impl<S> FromRequestParts<S> for Actor
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Actor>()
      .copied()
      .ok_or(ApiError::Unauthorized)
  }
}
