//! Error type for `locus-store-sqlite`.

use locus_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Contract violations — missing rows, duplicate identifiers.
  #[error(transparent)]
  Core(#[from] locus_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored column value could not be mapped back to its domain type.
  #[error("column decode error: {0}")]
  Decode(String),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool {
    matches!(self, Self::Core(locus_core::Error::NotFound(..)))
  }

  fn is_duplicate(&self) -> bool {
    matches!(self, Self::Core(locus_core::Error::Duplicate(..)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
