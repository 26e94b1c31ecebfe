//! Activity — the append-only audit log.
//!
//! Rows are written once and never updated or deleted. Most entries are
//! emitted by the store itself as a side effect of entity creation; clients
//! may also record entries directly (photo uploads, data verification).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened. The variant name doubles as the discriminant stored in
/// the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  SiteVisit,
  DataVerification,
  PhotoUpload,
  SiteCreation,
  SiteUpdate,
  StaffCreation,
  StaffUpdate,
  AssetCreation,
  AssetUpdate,
  ProgramCreation,
  ProgramUpdate,
}

/// Typed reference to the entity an activity is about. Replaces the
/// untyped "entity type string + raw id" pair so that invalid combinations
/// are unrepresentable. Still a weak reference: the target may since have
/// been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", content = "id", rename_all = "snake_case")]
pub enum RelatedEntity {
  Site(i64),
  Staff(i64),
  Asset(i64),
  Program(i64),
}

impl RelatedEntity {
  pub fn id(&self) -> i64 {
    match *self {
      Self::Site(id) | Self::Staff(id) | Self::Asset(id) | Self::Program(id) => {
        id
      }
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
  pub id:           i64,
  pub kind:         ActivityKind,
  pub description:  String,
  pub related:      Option<RelatedEntity>,
  /// The acting user. Required — there is no fallback identity.
  pub performed_by: i64,
  /// Server-assigned; never changes after creation.
  pub recorded_at:  DateTime<Utc>,
}

/// Input to [`crate::store::RegistryStore::record_activity`].
/// `performed_by` and `recorded_at` are supplied by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
  pub kind:        ActivityKind,
  pub description: String,
  #[serde(default)]
  pub related:     Option<RelatedEntity>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn related_entity_serialises_tagged() {
    let json = serde_json::to_value(RelatedEntity::Site(7)).unwrap();
    assert_eq!(json, serde_json::json!({ "entity": "site", "id": 7 }));
  }

  #[test]
  fn invalid_entity_tag_is_rejected() {
    let res: Result<RelatedEntity, _> =
      serde_json::from_value(serde_json::json!({ "entity": "user", "id": 1 }));
    assert!(res.is_err());
  }
}
