//! The `RegistryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `locus-store-sqlite`).
//! Higher layers (`locus-api`, `locus-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Contract notes shared by every entity:
//!
//! - list operations return rows in stable insertion (id) order; no other
//!   ordering is guaranteed;
//! - point lookups return `Ok(None)` for an unknown id — absence is a valid
//!   outcome, not an error;
//! - update and delete on an unknown id are hard errors, which the boundary
//!   layer translates into a missing-resource response;
//! - internal ids are assigned by a per-table monotonically increasing
//!   counter and are never reused, even after deletion;
//! - business identifiers (site/staff/asset/program codes, usernames) are
//!   caller-supplied and unique; the store rejects duplicates;
//! - every Site/Staff/Asset/Program creation appends one activity row
//!   attributed to `actor`. The audit write follows the primary write as a
//!   separate statement — the two are not atomic.

use std::future::Future;

use crate::{
  activity::{Activity, NewActivity},
  asset::{Asset, AssetUpdate, NewAsset},
  program::{NewProgram, Program, ProgramUpdate},
  recommendation::{NewRecommendation, Recommendation, RecommendationStatus},
  site::{NewSite, Site, SiteUpdate},
  staff::{NewStaff, Staff, StaffUpdate},
  user::{NewUser, User, UserUpdate},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Implemented by backend error types so that generic callers can translate
/// failures without naming the backend. Anything that is neither a missing
/// row nor a duplicate identifier is an internal backend failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
  fn is_duplicate(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Locus registry backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. The password arrives pre-hashed. Rejects a taken
  /// username. There is no delete — disable via [`UserUpdate::active`].
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Username lookup, used by authentication.
  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: i64,
    patch: UserUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Sites ─────────────────────────────────────────────────────────────

  /// Create a site. `created_by` is stamped from `actor`; a SiteCreation
  /// activity is appended.
  fn create_site(
    &self,
    input: NewSite,
    actor: i64,
  ) -> impl Future<Output = Result<Site, Self::Error>> + Send + '_;

  fn get_site(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Site>, Self::Error>> + Send + '_;

  /// Lookup by the human-assigned site code (e.g. "CLC-001").
  fn get_site_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Site>, Self::Error>> + Send + 'a;

  fn list_sites(
    &self,
  ) -> impl Future<Output = Result<Vec<Site>, Self::Error>> + Send + '_;

  fn update_site(
    &self,
    id: i64,
    patch: SiteUpdate,
  ) -> impl Future<Output = Result<Site, Self::Error>> + Send + '_;

  /// Remove a site. Returns whether a row was actually removed; staff,
  /// assets, and programs referencing it are left in place, orphaned.
  fn delete_site(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Stamp `last_visited_by`/`last_visit_date` and append a SiteVisit
  /// activity. Errors on an unknown site id.
  fn record_site_visit(
    &self,
    site_id: i64,
    actor: i64,
  ) -> impl Future<Output = Result<Site, Self::Error>> + Send + '_;

  // ── Staff ─────────────────────────────────────────────────────────────

  fn create_staff(
    &self,
    input: NewStaff,
    actor: i64,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + '_;

  fn get_staff_member(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  fn list_staff(
    &self,
  ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>> + Send + '_;

  /// Linear filter of all staff assigned to `site_id`. An unknown site id
  /// yields an empty list, not an error.
  fn staff_for_site(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>> + Send + '_;

  fn update_staff(
    &self,
    id: i64,
    patch: StaffUpdate,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + '_;

  fn delete_staff(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Assets ────────────────────────────────────────────────────────────

  fn create_asset(
    &self,
    input: NewAsset,
    actor: i64,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + '_;

  fn get_asset(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Asset>, Self::Error>> + Send + '_;

  fn list_assets(
    &self,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + '_;

  fn assets_for_site(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + '_;

  fn update_asset(
    &self,
    id: i64,
    patch: AssetUpdate,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + '_;

  fn delete_asset(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Programs ──────────────────────────────────────────────────────────

  fn create_program(
    &self,
    input: NewProgram,
    actor: i64,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  fn get_program(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Program>, Self::Error>> + Send + '_;

  fn list_programs(
    &self,
  ) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  fn programs_for_site(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  fn update_program(
    &self,
    id: i64,
    patch: ProgramUpdate,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  fn delete_program(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Activities — append-only ──────────────────────────────────────────

  /// Record an activity attributed to `actor`. The `recorded_at` timestamp
  /// is set by the store. No update or delete exists.
  fn record_activity(
    &self,
    input: NewActivity,
    actor: i64,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  fn get_activity(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  fn list_activities(
    &self,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  /// All activities whose related reference names `site_id`.
  fn activities_for_site(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  // ── Recommendations ───────────────────────────────────────────────────

  fn create_recommendation(
    &self,
    input: NewRecommendation,
    actor: i64,
  ) -> impl Future<Output = Result<Recommendation, Self::Error>> + Send + '_;

  fn get_recommendation(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Recommendation>, Self::Error>> + Send + '_;

  fn list_recommendations(
    &self,
  ) -> impl Future<Output = Result<Vec<Recommendation>, Self::Error>> + Send + '_;

  fn set_recommendation_status(
    &self,
    id: i64,
    status: RecommendationStatus,
  ) -> impl Future<Output = Result<Recommendation, Self::Error>> + Send + '_;

  fn delete_recommendation(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
