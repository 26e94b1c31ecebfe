//! Program — an educational offering hosted at a site.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
  Active,
  Inactive,
  Planned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
  pub id:          i64,
  pub program_code: String,
  pub name:        String,
  pub category:    Option<String>,
  pub description: Option<String>,
  pub enrollment:  u32,
  pub start_date:  Option<NaiveDate>,
  pub end_date:    Option<NaiveDate>,
  pub status:      ProgramStatus,
  pub notes:       Option<String>,
  pub site_id:     Option<i64>,
}

/// Input to [`crate::store::RegistryStore::create_program`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
  pub program_code: String,
  pub name:         String,
  #[serde(default)]
  pub category:     Option<String>,
  #[serde(default)]
  pub description:  Option<String>,
  #[serde(default)]
  pub enrollment:   u32,
  #[serde(default)]
  pub start_date:   Option<NaiveDate>,
  #[serde(default)]
  pub end_date:     Option<NaiveDate>,
  pub status:       ProgramStatus,
  #[serde(default)]
  pub notes:        Option<String>,
  #[serde(default)]
  pub site_id:      Option<i64>,
}

/// Partial update for a program. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramUpdate {
  pub program_code: Option<String>,
  pub name:         Option<String>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub category:     Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub description:  Option<Option<String>>,
  pub enrollment:   Option<u32>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub start_date:   Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub end_date:     Option<Option<NaiveDate>>,
  pub status:       Option<ProgramStatus>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub notes:        Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub site_id:      Option<Option<i64>>,
}

impl ProgramUpdate {
  pub fn apply(self, program: &mut Program) {
    if let Some(v) = self.program_code {
      program.program_code = v;
    }
    if let Some(v) = self.name {
      program.name = v;
    }
    if let Some(v) = self.category {
      program.category = v;
    }
    if let Some(v) = self.description {
      program.description = v;
    }
    if let Some(v) = self.enrollment {
      program.enrollment = v;
    }
    if let Some(v) = self.start_date {
      program.start_date = v;
    }
    if let Some(v) = self.end_date {
      program.end_date = v;
    }
    if let Some(v) = self.status {
      program.status = v;
    }
    if let Some(v) = self.notes {
      program.notes = v;
    }
    if let Some(v) = self.site_id {
      program.site_id = v;
    }
  }
}
