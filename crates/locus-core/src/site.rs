//! Site — a physical college location (community learning centre,
//! satellite, or operational site).
//!
//! The caller-supplied `site_code` (e.g. "CLC-001") is the business
//! identifier shown to humans; the integer `id` is the internal key every
//! weak reference points at. Status fields are labels on a workflow, not a
//! governed state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
  Clc,
  Satellite,
  Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalStatus {
  Active,
  Inactive,
  Planned,
}

/// Field-assessment workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
  ToVisit,
  Visited,
  DataVerified,
}

/// Condition rating applied to each assessed aspect of a building.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConditionRating {
  #[default]
  NotAssessed,
  Excellent,
  Good,
  Fair,
  Poor,
  Critical,
}

/// Per-aspect condition ratings recorded during a site assessment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConditionRatings {
  pub building:   ConditionRating,
  pub electrical: ConditionRating,
  pub plumbing:   ConditionRating,
  pub interior:   ConditionRating,
  pub exterior:   ConditionRating,
}

/// Classroom/office/lab/workshop counts for a site.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Infrastructure {
  pub classrooms: u32,
  pub offices:    u32,
  pub labs:       u32,
  pub workshops:  u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
  pub id:                 i64,
  pub site_code:          String,
  pub name:               String,
  pub site_type:          SiteType,
  pub district:           String,
  pub address:            Option<String>,
  pub latitude:           Option<f64>,
  pub longitude:          Option<f64>,
  pub operational_status: OperationalStatus,
  pub assessment_status:  AssessmentStatus,
  pub infrastructure:     Infrastructure,
  pub conditions:         ConditionRatings,
  pub notes:              Option<String>,
  /// Image/document URLs in upload order.
  pub images:             Vec<String>,
  /// Server-assigned from the acting user at creation.
  pub created_by:         i64,
  pub last_visited_by:    Option<i64>,
  pub last_visit_date:    Option<DateTime<Utc>>,
}

/// Input to [`crate::store::RegistryStore::create_site`]. Audit fields
/// (`created_by`, `last_visited_by`, `last_visit_date`) are server-assigned
/// and not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSite {
  pub site_code:          String,
  pub name:               String,
  pub site_type:          SiteType,
  pub district:           String,
  #[serde(default)]
  pub address:            Option<String>,
  #[serde(default)]
  pub latitude:           Option<f64>,
  #[serde(default)]
  pub longitude:          Option<f64>,
  pub operational_status: OperationalStatus,
  pub assessment_status:  AssessmentStatus,
  #[serde(default)]
  pub infrastructure:     Infrastructure,
  #[serde(default)]
  pub conditions:         ConditionRatings,
  #[serde(default)]
  pub notes:              Option<String>,
  #[serde(default)]
  pub images:             Vec<String>,
}

/// Partial update for a site. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteUpdate {
  pub site_code:          Option<String>,
  pub name:               Option<String>,
  pub site_type:          Option<SiteType>,
  pub district:           Option<String>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub address:            Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub latitude:           Option<Option<f64>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub longitude:          Option<Option<f64>>,
  pub operational_status: Option<OperationalStatus>,
  pub assessment_status:  Option<AssessmentStatus>,
  pub infrastructure:     Option<Infrastructure>,
  pub conditions:         Option<ConditionRatings>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub notes:              Option<Option<String>>,
  pub images:             Option<Vec<String>>,
}

impl SiteUpdate {
  /// Merge this patch onto `site`, preserving every untouched field.
  /// The id and audit fields are never patched.
  pub fn apply(self, site: &mut Site) {
    if let Some(v) = self.site_code {
      site.site_code = v;
    }
    if let Some(v) = self.name {
      site.name = v;
    }
    if let Some(v) = self.site_type {
      site.site_type = v;
    }
    if let Some(v) = self.district {
      site.district = v;
    }
    if let Some(v) = self.address {
      site.address = v;
    }
    if let Some(v) = self.latitude {
      site.latitude = v;
    }
    if let Some(v) = self.longitude {
      site.longitude = v;
    }
    if let Some(v) = self.operational_status {
      site.operational_status = v;
    }
    if let Some(v) = self.assessment_status {
      site.assessment_status = v;
    }
    if let Some(v) = self.infrastructure {
      site.infrastructure = v;
    }
    if let Some(v) = self.conditions {
      site.conditions = v;
    }
    if let Some(v) = self.notes {
      site.notes = v;
    }
    if let Some(v) = self.images {
      site.images = v;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn site() -> Site {
    Site {
      id:                 7,
      site_code:          "CLC-001".into(),
      name:               "Mogwase CLC".into(),
      site_type:          SiteType::Clc,
      district:           "Bojanala".into(),
      address:            Some("14 Station Rd".into()),
      latitude:           Some(-25.28),
      longitude:          Some(27.23),
      operational_status: OperationalStatus::Active,
      assessment_status:  AssessmentStatus::ToVisit,
      infrastructure:     Infrastructure { classrooms: 6, ..Default::default() },
      conditions:         ConditionRatings::default(),
      notes:              None,
      images:             vec![],
      created_by:         1,
      last_visited_by:    None,
      last_visit_date:    None,
    }
  }

  #[test]
  fn apply_merges_without_touching_other_fields() {
    let mut s = site();
    SiteUpdate {
      operational_status: Some(OperationalStatus::Inactive),
      ..Default::default()
    }
    .apply(&mut s);

    assert_eq!(s.operational_status, OperationalStatus::Inactive);
    assert_eq!(s.assessment_status, AssessmentStatus::ToVisit);
    assert_eq!(s.site_code, "CLC-001");
    assert_eq!(s.infrastructure.classrooms, 6);
  }

  #[test]
  fn apply_never_touches_audit_fields() {
    let mut s = site();
    let patch: SiteUpdate =
      serde_json::from_str(r#"{"name":"Renamed","notes":null}"#).unwrap();
    patch.apply(&mut s);

    assert_eq!(s.name, "Renamed");
    assert_eq!(s.created_by, 1);
    assert!(s.last_visit_date.is_none());
  }

  #[test]
  fn condition_ratings_default_to_not_assessed() {
    let c = ConditionRatings::default();
    assert_eq!(c.building, ConditionRating::NotAssessed);
    assert_eq!(c.exterior, ConditionRating::NotAssessed);
  }
}
