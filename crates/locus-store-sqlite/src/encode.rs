//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! dates, string lists as compact JSON, and every enum as its snake_case
//! discriminant. The related-entity reference on activities is stored as a
//! (type, id) column pair and re-tagged on read.

use chrono::{DateTime, NaiveDate, Utc};
use locus_core::{
  activity::{Activity, ActivityKind, RelatedEntity},
  asset::{Asset, AssetCategory, AssetCondition},
  program::{Program, ProgramStatus},
  recommendation::{Recommendation, RecommendationStatus},
  site::{
    AssessmentStatus, ConditionRating, ConditionRatings, Infrastructure,
    OperationalStatus, Site, SiteType,
  },
  staff::Staff,
  user::{Role, User},
};

use crate::{Error, Result};

// ─── Timestamps and dates ────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── String lists ────────────────────────────────────────────────────────────

pub fn encode_string_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_string_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Enum discriminants ──────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::ProjectManager => "project_manager",
    Role::DataAnalyst => "data_analyst",
    Role::FieldAssessor => "field_assessor",
    Role::Viewer => "viewer",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "project_manager" => Ok(Role::ProjectManager),
    "data_analyst" => Ok(Role::DataAnalyst),
    "field_assessor" => Ok(Role::FieldAssessor),
    "viewer" => Ok(Role::Viewer),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

pub fn encode_site_type(t: SiteType) -> &'static str {
  match t {
    SiteType::Clc => "clc",
    SiteType::Satellite => "satellite",
    SiteType::Operational => "operational",
  }
}

pub fn decode_site_type(s: &str) -> Result<SiteType> {
  match s {
    "clc" => Ok(SiteType::Clc),
    "satellite" => Ok(SiteType::Satellite),
    "operational" => Ok(SiteType::Operational),
    other => Err(Error::Decode(format!("unknown site type: {other:?}"))),
  }
}

pub fn encode_operational_status(s: OperationalStatus) -> &'static str {
  match s {
    OperationalStatus::Active => "active",
    OperationalStatus::Inactive => "inactive",
    OperationalStatus::Planned => "planned",
  }
}

pub fn decode_operational_status(s: &str) -> Result<OperationalStatus> {
  match s {
    "active" => Ok(OperationalStatus::Active),
    "inactive" => Ok(OperationalStatus::Inactive),
    "planned" => Ok(OperationalStatus::Planned),
    other => {
      Err(Error::Decode(format!("unknown operational status: {other:?}")))
    }
  }
}

pub fn encode_assessment_status(s: AssessmentStatus) -> &'static str {
  match s {
    AssessmentStatus::ToVisit => "to_visit",
    AssessmentStatus::Visited => "visited",
    AssessmentStatus::DataVerified => "data_verified",
  }
}

pub fn decode_assessment_status(s: &str) -> Result<AssessmentStatus> {
  match s {
    "to_visit" => Ok(AssessmentStatus::ToVisit),
    "visited" => Ok(AssessmentStatus::Visited),
    "data_verified" => Ok(AssessmentStatus::DataVerified),
    other => {
      Err(Error::Decode(format!("unknown assessment status: {other:?}")))
    }
  }
}

pub fn encode_condition(c: ConditionRating) -> &'static str {
  match c {
    ConditionRating::NotAssessed => "not_assessed",
    ConditionRating::Excellent => "excellent",
    ConditionRating::Good => "good",
    ConditionRating::Fair => "fair",
    ConditionRating::Poor => "poor",
    ConditionRating::Critical => "critical",
  }
}

pub fn decode_condition(s: &str) -> Result<ConditionRating> {
  match s {
    "not_assessed" => Ok(ConditionRating::NotAssessed),
    "excellent" => Ok(ConditionRating::Excellent),
    "good" => Ok(ConditionRating::Good),
    "fair" => Ok(ConditionRating::Fair),
    "poor" => Ok(ConditionRating::Poor),
    "critical" => Ok(ConditionRating::Critical),
    other => Err(Error::Decode(format!("unknown condition: {other:?}"))),
  }
}

pub fn encode_asset_category(c: AssetCategory) -> &'static str {
  match c {
    AssetCategory::Equipment => "equipment",
    AssetCategory::Furniture => "furniture",
    AssetCategory::It => "it",
    AssetCategory::Teaching => "teaching",
    AssetCategory::Office => "office",
    AssetCategory::Other => "other",
  }
}

pub fn decode_asset_category(s: &str) -> Result<AssetCategory> {
  match s {
    "equipment" => Ok(AssetCategory::Equipment),
    "furniture" => Ok(AssetCategory::Furniture),
    "it" => Ok(AssetCategory::It),
    "teaching" => Ok(AssetCategory::Teaching),
    "office" => Ok(AssetCategory::Office),
    "other" => Ok(AssetCategory::Other),
    other => Err(Error::Decode(format!("unknown asset category: {other:?}"))),
  }
}

pub fn encode_asset_condition(c: AssetCondition) -> &'static str {
  match c {
    AssetCondition::Excellent => "excellent",
    AssetCondition::Good => "good",
    AssetCondition::Fair => "fair",
    AssetCondition::Poor => "poor",
    AssetCondition::NonFunctional => "non_functional",
    AssetCondition::Critical => "critical",
  }
}

pub fn decode_asset_condition(s: &str) -> Result<AssetCondition> {
  match s {
    "excellent" => Ok(AssetCondition::Excellent),
    "good" => Ok(AssetCondition::Good),
    "fair" => Ok(AssetCondition::Fair),
    "poor" => Ok(AssetCondition::Poor),
    "non_functional" => Ok(AssetCondition::NonFunctional),
    "critical" => Ok(AssetCondition::Critical),
    other => Err(Error::Decode(format!("unknown asset condition: {other:?}"))),
  }
}

pub fn encode_program_status(s: ProgramStatus) -> &'static str {
  match s {
    ProgramStatus::Active => "active",
    ProgramStatus::Inactive => "inactive",
    ProgramStatus::Planned => "planned",
  }
}

pub fn decode_program_status(s: &str) -> Result<ProgramStatus> {
  match s {
    "active" => Ok(ProgramStatus::Active),
    "inactive" => Ok(ProgramStatus::Inactive),
    "planned" => Ok(ProgramStatus::Planned),
    other => Err(Error::Decode(format!("unknown program status: {other:?}"))),
  }
}

pub fn encode_activity_kind(k: ActivityKind) -> &'static str {
  match k {
    ActivityKind::SiteVisit => "site_visit",
    ActivityKind::DataVerification => "data_verification",
    ActivityKind::PhotoUpload => "photo_upload",
    ActivityKind::SiteCreation => "site_creation",
    ActivityKind::SiteUpdate => "site_update",
    ActivityKind::StaffCreation => "staff_creation",
    ActivityKind::StaffUpdate => "staff_update",
    ActivityKind::AssetCreation => "asset_creation",
    ActivityKind::AssetUpdate => "asset_update",
    ActivityKind::ProgramCreation => "program_creation",
    ActivityKind::ProgramUpdate => "program_update",
  }
}

pub fn decode_activity_kind(s: &str) -> Result<ActivityKind> {
  match s {
    "site_visit" => Ok(ActivityKind::SiteVisit),
    "data_verification" => Ok(ActivityKind::DataVerification),
    "photo_upload" => Ok(ActivityKind::PhotoUpload),
    "site_creation" => Ok(ActivityKind::SiteCreation),
    "site_update" => Ok(ActivityKind::SiteUpdate),
    "staff_creation" => Ok(ActivityKind::StaffCreation),
    "staff_update" => Ok(ActivityKind::StaffUpdate),
    "asset_creation" => Ok(ActivityKind::AssetCreation),
    "asset_update" => Ok(ActivityKind::AssetUpdate),
    "program_creation" => Ok(ActivityKind::ProgramCreation),
    "program_update" => Ok(ActivityKind::ProgramUpdate),
    other => Err(Error::Decode(format!("unknown activity kind: {other:?}"))),
  }
}

pub fn encode_recommendation_status(s: RecommendationStatus) -> &'static str {
  match s {
    RecommendationStatus::Open => "open",
    RecommendationStatus::Completed => "completed",
    RecommendationStatus::Discarded => "discarded",
  }
}

pub fn decode_recommendation_status(s: &str) -> Result<RecommendationStatus> {
  match s {
    "open" => Ok(RecommendationStatus::Open),
    "completed" => Ok(RecommendationStatus::Completed),
    "discarded" => Ok(RecommendationStatus::Discarded),
    other => {
      Err(Error::Decode(format!("unknown recommendation status: {other:?}")))
    }
  }
}

// ─── Related entity ──────────────────────────────────────────────────────────

/// Split a tagged reference into the (type, id) column pair.
pub fn encode_related(r: RelatedEntity) -> (&'static str, i64) {
  match r {
    RelatedEntity::Site(id) => ("site", id),
    RelatedEntity::Staff(id) => ("staff", id),
    RelatedEntity::Asset(id) => ("asset", id),
    RelatedEntity::Program(id) => ("program", id),
  }
}

/// Re-tag a (type, id) column pair. Both columns must be set or both NULL.
pub fn decode_related(
  kind: Option<String>,
  id: Option<i64>,
) -> Result<Option<RelatedEntity>> {
  match (kind, id) {
    (None, None) => Ok(None),
    (Some(k), Some(id)) => match k.as_str() {
      "site" => Ok(Some(RelatedEntity::Site(id))),
      "staff" => Ok(Some(RelatedEntity::Staff(id))),
      "asset" => Ok(Some(RelatedEntity::Asset(id))),
      "program" => Ok(Some(RelatedEntity::Program(id))),
      other => Err(Error::Decode(format!("unknown related type: {other:?}"))),
    },
    (k, id) => Err(Error::Decode(format!(
      "half-set related reference: type {k:?}, id {id:?}"
    ))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            i64,
  pub username:      String,
  pub password_hash: String,
  pub name:          String,
  pub role:          String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub active:        bool,
}

pub const USER_COLS: &str =
  "id, username, password_hash, name, role, email, phone, active";

pub fn read_user(row: &rusqlite::Row) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:            row.get(0)?,
    username:      row.get(1)?,
    password_hash: row.get(2)?,
    name:          row.get(3)?,
    role:          row.get(4)?,
    email:         row.get(5)?,
    phone:         row.get(6)?,
    active:        row.get(7)?,
  })
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      username:      self.username,
      password_hash: self.password_hash,
      name:          self.name,
      role:          decode_role(&self.role)?,
      email:         self.email,
      phone:         self.phone,
      active:        self.active,
    })
  }
}

/// Raw values read directly from a `sites` row.
pub struct RawSite {
  pub id:                 i64,
  pub site_code:          String,
  pub name:               String,
  pub site_type:          String,
  pub district:           String,
  pub address:            Option<String>,
  pub latitude:           Option<f64>,
  pub longitude:          Option<f64>,
  pub operational_status: String,
  pub assessment_status:  String,
  pub classrooms:         u32,
  pub offices:            u32,
  pub labs:               u32,
  pub workshops:          u32,
  pub cond_building:      String,
  pub cond_electrical:    String,
  pub cond_plumbing:      String,
  pub cond_interior:      String,
  pub cond_exterior:      String,
  pub notes:              Option<String>,
  pub images:             String,
  pub created_by:         i64,
  pub last_visited_by:    Option<i64>,
  pub last_visit_date:    Option<String>,
}

pub const SITE_COLS: &str = "id, site_code, name, site_type, district, \
   address, latitude, longitude, operational_status, assessment_status, \
   classrooms, offices, labs, workshops, cond_building, cond_electrical, \
   cond_plumbing, cond_interior, cond_exterior, notes, images, created_by, \
   last_visited_by, last_visit_date";

pub fn read_site(row: &rusqlite::Row) -> rusqlite::Result<RawSite> {
  Ok(RawSite {
    id:                 row.get(0)?,
    site_code:          row.get(1)?,
    name:               row.get(2)?,
    site_type:          row.get(3)?,
    district:           row.get(4)?,
    address:            row.get(5)?,
    latitude:           row.get(6)?,
    longitude:          row.get(7)?,
    operational_status: row.get(8)?,
    assessment_status:  row.get(9)?,
    classrooms:         row.get(10)?,
    offices:            row.get(11)?,
    labs:               row.get(12)?,
    workshops:          row.get(13)?,
    cond_building:      row.get(14)?,
    cond_electrical:    row.get(15)?,
    cond_plumbing:      row.get(16)?,
    cond_interior:      row.get(17)?,
    cond_exterior:      row.get(18)?,
    notes:              row.get(19)?,
    images:             row.get(20)?,
    created_by:         row.get(21)?,
    last_visited_by:    row.get(22)?,
    last_visit_date:    row.get(23)?,
  })
}

impl RawSite {
  pub fn into_site(self) -> Result<Site> {
    Ok(Site {
      id:                 self.id,
      site_code:          self.site_code,
      name:               self.name,
      site_type:          decode_site_type(&self.site_type)?,
      district:           self.district,
      address:            self.address,
      latitude:           self.latitude,
      longitude:          self.longitude,
      operational_status: decode_operational_status(
        &self.operational_status,
      )?,
      assessment_status:  decode_assessment_status(&self.assessment_status)?,
      infrastructure:     Infrastructure {
        classrooms: self.classrooms,
        offices:    self.offices,
        labs:       self.labs,
        workshops:  self.workshops,
      },
      conditions:         ConditionRatings {
        building:   decode_condition(&self.cond_building)?,
        electrical: decode_condition(&self.cond_electrical)?,
        plumbing:   decode_condition(&self.cond_plumbing)?,
        interior:   decode_condition(&self.cond_interior)?,
        exterior:   decode_condition(&self.cond_exterior)?,
      },
      notes:              self.notes,
      images:             decode_string_list(&self.images)?,
      created_by:         self.created_by,
      last_visited_by:    self.last_visited_by,
      last_visit_date:    self
        .last_visit_date
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

/// Raw values read directly from a `staff` row.
pub struct RawStaff {
  pub id:             i64,
  pub staff_code:     String,
  pub first_name:     String,
  pub last_name:      String,
  pub position:       String,
  pub department:     Option<String>,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub verified:       bool,
  pub qualifications: String,
  pub skills:         String,
  pub workload:       Option<u32>,
  pub site_id:        Option<i64>,
}

pub const STAFF_COLS: &str = "id, staff_code, first_name, last_name, \
   position, department, email, phone, verified, qualifications, skills, \
   workload, site_id";

pub fn read_staff(row: &rusqlite::Row) -> rusqlite::Result<RawStaff> {
  Ok(RawStaff {
    id:             row.get(0)?,
    staff_code:     row.get(1)?,
    first_name:     row.get(2)?,
    last_name:      row.get(3)?,
    position:       row.get(4)?,
    department:     row.get(5)?,
    email:          row.get(6)?,
    phone:          row.get(7)?,
    verified:       row.get(8)?,
    qualifications: row.get(9)?,
    skills:         row.get(10)?,
    workload:       row.get(11)?,
    site_id:        row.get(12)?,
  })
}

impl RawStaff {
  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      id:             self.id,
      staff_code:     self.staff_code,
      first_name:     self.first_name,
      last_name:      self.last_name,
      position:       self.position,
      department:     self.department,
      email:          self.email,
      phone:          self.phone,
      verified:       self.verified,
      qualifications: decode_string_list(&self.qualifications)?,
      skills:         decode_string_list(&self.skills)?,
      workload:       self.workload,
      site_id:        self.site_id,
    })
  }
}

/// Raw values read directly from an `assets` row.
pub struct RawAsset {
  pub id:               i64,
  pub asset_code:       String,
  pub name:             String,
  pub category:         String,
  pub kind:             Option<String>,
  pub manufacturer:     Option<String>,
  pub model:            Option<String>,
  pub serial_numbers:   String,
  pub purchase_date:    Option<String>,
  pub purchase_price:   Option<f64>,
  pub condition:        String,
  pub location:         Option<String>,
  pub assigned_to:      Option<String>,
  pub last_maintenance: Option<String>,
  pub next_maintenance: Option<String>,
  pub notes:            Option<String>,
  pub images:           String,
  pub site_id:          Option<i64>,
}

pub const ASSET_COLS: &str = "id, asset_code, name, category, kind, \
   manufacturer, model, serial_numbers, purchase_date, purchase_price, \
   condition, location, assigned_to, last_maintenance, next_maintenance, \
   notes, images, site_id";

pub fn read_asset(row: &rusqlite::Row) -> rusqlite::Result<RawAsset> {
  Ok(RawAsset {
    id:               row.get(0)?,
    asset_code:       row.get(1)?,
    name:             row.get(2)?,
    category:         row.get(3)?,
    kind:             row.get(4)?,
    manufacturer:     row.get(5)?,
    model:            row.get(6)?,
    serial_numbers:   row.get(7)?,
    purchase_date:    row.get(8)?,
    purchase_price:   row.get(9)?,
    condition:        row.get(10)?,
    location:         row.get(11)?,
    assigned_to:      row.get(12)?,
    last_maintenance: row.get(13)?,
    next_maintenance: row.get(14)?,
    notes:            row.get(15)?,
    images:           row.get(16)?,
    site_id:          row.get(17)?,
  })
}

impl RawAsset {
  pub fn into_asset(self) -> Result<Asset> {
    Ok(Asset {
      id:               self.id,
      asset_code:       self.asset_code,
      name:             self.name,
      category:         decode_asset_category(&self.category)?,
      kind:             self.kind,
      manufacturer:     self.manufacturer,
      model:            self.model,
      serial_numbers:   decode_string_list(&self.serial_numbers)?,
      purchase_date:    self
        .purchase_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      purchase_price:   self.purchase_price,
      condition:        decode_asset_condition(&self.condition)?,
      location:         self.location,
      assigned_to:      self.assigned_to,
      last_maintenance: self
        .last_maintenance
        .as_deref()
        .map(decode_date)
        .transpose()?,
      next_maintenance: self
        .next_maintenance
        .as_deref()
        .map(decode_date)
        .transpose()?,
      notes:            self.notes,
      images:           decode_string_list(&self.images)?,
      site_id:          self.site_id,
    })
  }
}

/// Raw values read directly from a `programs` row.
pub struct RawProgram {
  pub id:           i64,
  pub program_code: String,
  pub name:         String,
  pub category:     Option<String>,
  pub description:  Option<String>,
  pub enrollment:   u32,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub status:       String,
  pub notes:        Option<String>,
  pub site_id:      Option<i64>,
}

pub const PROGRAM_COLS: &str = "id, program_code, name, category, \
   description, enrollment, start_date, end_date, status, notes, site_id";

pub fn read_program(row: &rusqlite::Row) -> rusqlite::Result<RawProgram> {
  Ok(RawProgram {
    id:           row.get(0)?,
    program_code: row.get(1)?,
    name:         row.get(2)?,
    category:     row.get(3)?,
    description:  row.get(4)?,
    enrollment:   row.get(5)?,
    start_date:   row.get(6)?,
    end_date:     row.get(7)?,
    status:       row.get(8)?,
    notes:        row.get(9)?,
    site_id:      row.get(10)?,
  })
}

impl RawProgram {
  pub fn into_program(self) -> Result<Program> {
    Ok(Program {
      id:           self.id,
      program_code: self.program_code,
      name:         self.name,
      category:     self.category,
      description:  self.description,
      enrollment:   self.enrollment,
      start_date:   self.start_date.as_deref().map(decode_date).transpose()?,
      end_date:     self.end_date.as_deref().map(decode_date).transpose()?,
      status:       decode_program_status(&self.status)?,
      notes:        self.notes,
      site_id:      self.site_id,
    })
  }
}

/// Raw values read directly from an `activities` row.
pub struct RawActivity {
  pub id:           i64,
  pub kind:         String,
  pub description:  String,
  pub related_type: Option<String>,
  pub related_id:   Option<i64>,
  pub performed_by: i64,
  pub recorded_at:  String,
}

pub const ACTIVITY_COLS: &str =
  "id, kind, description, related_type, related_id, performed_by, \
   recorded_at";

pub fn read_activity(row: &rusqlite::Row) -> rusqlite::Result<RawActivity> {
  Ok(RawActivity {
    id:           row.get(0)?,
    kind:         row.get(1)?,
    description:  row.get(2)?,
    related_type: row.get(3)?,
    related_id:   row.get(4)?,
    performed_by: row.get(5)?,
    recorded_at:  row.get(6)?,
  })
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      id:           self.id,
      kind:         decode_activity_kind(&self.kind)?,
      description:  self.description,
      related:      decode_related(self.related_type, self.related_id)?,
      performed_by: self.performed_by,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from a `recommendations` row.
pub struct RawRecommendation {
  pub id:          i64,
  pub description: String,
  pub site_id:     Option<i64>,
  pub status:      String,
  pub recorded_by: i64,
  pub recorded_at: String,
}

pub const RECOMMENDATION_COLS: &str =
  "id, description, site_id, status, recorded_by, recorded_at";

pub fn read_recommendation(
  row: &rusqlite::Row,
) -> rusqlite::Result<RawRecommendation> {
  Ok(RawRecommendation {
    id:          row.get(0)?,
    description: row.get(1)?,
    site_id:     row.get(2)?,
    status:      row.get(3)?,
    recorded_by: row.get(4)?,
    recorded_at: row.get(5)?,
  })
}

impl RawRecommendation {
  pub fn into_recommendation(self) -> Result<Recommendation> {
    Ok(Recommendation {
      id:          self.id,
      description: self.description,
      site_id:     self.site_id,
      status:      decode_recommendation_status(&self.status)?,
      recorded_by: self.recorded_by,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
