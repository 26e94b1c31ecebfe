//! Error types for `locus-core`.

use thiserror::Error;

/// Names an entity table in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  User,
  Site,
  Staff,
  Asset,
  Program,
  Activity,
  Recommendation,
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Self::User => "user",
      Self::Site => "site",
      Self::Staff => "staff member",
      Self::Asset => "asset",
      Self::Program => "program",
      Self::Activity => "activity",
      Self::Recommendation => "recommendation",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// Raised by update/delete-style operations on an id that was never
  /// assigned (or was deleted). Point lookups return `None` instead.
  #[error("{0} {1} not found")]
  NotFound(EntityKind, i64),

  /// A caller-supplied business identifier (site code, username, …) is
  /// already taken by another row.
  #[error("{0} with identifier {1:?} already exists")]
  Duplicate(EntityKind, String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
