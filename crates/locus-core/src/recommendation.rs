//! Recommendation — a follow-up task raised during assessment.
//!
//! The original system stored these inside the activity log with an ad-hoc
//! mutable status, the only rows there that could change. They are a task
//! list, not an audit trail, so they live in their own table with a normal
//! update/delete lifecycle; the activity log stays strictly append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
  Open,
  Completed,
  Discarded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
  pub id:          i64,
  pub description: String,
  pub site_id:     Option<i64>,
  pub status:      RecommendationStatus,
  pub recorded_by: i64,
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::RegistryStore::create_recommendation`].
/// New recommendations always start [`RecommendationStatus::Open`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecommendation {
  pub description: String,
  #[serde(default)]
  pub site_id:     Option<i64>,
}
