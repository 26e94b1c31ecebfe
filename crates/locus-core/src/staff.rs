//! Staff — a person assigned to at most one site.
//!
//! `site_id` is a weak reference: the pointed-at site may be deleted without
//! cascading here, and an orphaned assignment is a tolerated state.

use serde::{Deserialize, Serialize};

use crate::patch;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
  pub id:             i64,
  pub staff_code:     String,
  pub first_name:     String,
  pub last_name:      String,
  pub position:       String,
  pub department:     Option<String>,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub verified:       bool,
  pub qualifications: Vec<String>,
  pub skills:         Vec<String>,
  /// Weekly workload in hours.
  pub workload:       Option<u32>,
  pub site_id:        Option<i64>,
}

/// Input to [`crate::store::RegistryStore::create_staff`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStaff {
  pub staff_code:     String,
  pub first_name:     String,
  pub last_name:      String,
  pub position:       String,
  #[serde(default)]
  pub department:     Option<String>,
  #[serde(default)]
  pub email:          Option<String>,
  #[serde(default)]
  pub phone:          Option<String>,
  #[serde(default)]
  pub verified:       bool,
  #[serde(default)]
  pub qualifications: Vec<String>,
  #[serde(default)]
  pub skills:         Vec<String>,
  #[serde(default)]
  pub workload:       Option<u32>,
  #[serde(default)]
  pub site_id:        Option<i64>,
}

/// Partial update for a staff member. Absent fields are left untouched;
/// `"site_id": null` clears the site assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffUpdate {
  pub staff_code:     Option<String>,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub position:       Option<String>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub department:     Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub email:          Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub phone:          Option<Option<String>>,
  pub verified:       Option<bool>,
  pub qualifications: Option<Vec<String>>,
  pub skills:         Option<Vec<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub workload:       Option<Option<u32>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub site_id:        Option<Option<i64>>,
}

impl StaffUpdate {
  pub fn apply(self, staff: &mut Staff) {
    if let Some(v) = self.staff_code {
      staff.staff_code = v;
    }
    if let Some(v) = self.first_name {
      staff.first_name = v;
    }
    if let Some(v) = self.last_name {
      staff.last_name = v;
    }
    if let Some(v) = self.position {
      staff.position = v;
    }
    if let Some(v) = self.department {
      staff.department = v;
    }
    if let Some(v) = self.email {
      staff.email = v;
    }
    if let Some(v) = self.phone {
      staff.phone = v;
    }
    if let Some(v) = self.verified {
      staff.verified = v;
    }
    if let Some(v) = self.qualifications {
      staff.qualifications = v;
    }
    if let Some(v) = self.skills {
      staff.skills = v;
    }
    if let Some(v) = self.workload {
      staff.workload = v;
    }
    if let Some(v) = self.site_id {
      staff.site_id = v;
    }
  }
}
