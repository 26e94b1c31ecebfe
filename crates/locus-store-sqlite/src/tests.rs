//! Integration tests for `SqliteStore` against an in-memory database.

use locus_core::{
  activity::{ActivityKind, NewActivity, RelatedEntity},
  asset::{AssetCategory, AssetCondition, NewAsset},
  program::{NewProgram, ProgramStatus},
  recommendation::{NewRecommendation, RecommendationStatus},
  site::{
    AssessmentStatus, NewSite, OperationalStatus, SiteType, SiteUpdate,
  },
  staff::{NewStaff, StaffUpdate},
  store::{RegistryStore, StoreError as _},
  user::{NewUser, Role, UserUpdate},
};

use crate::SqliteStore;

/// The acting user id threaded through write operations. The tests never
/// authenticate, so any id will do — actor references are weak.
const ACTOR: i64 = 1;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_site(code: &str) -> NewSite {
  NewSite {
    site_code:          code.into(),
    name:               "Test CLC".into(),
    site_type:          SiteType::Clc,
    district:           "Bojanala".into(),
    address:            None,
    latitude:           None,
    longitude:          None,
    operational_status: OperationalStatus::Active,
    assessment_status:  AssessmentStatus::ToVisit,
    infrastructure:     Default::default(),
    conditions:         Default::default(),
    notes:              None,
    images:             vec![],
  }
}

fn new_staff(code: &str, site_id: Option<i64>) -> NewStaff {
  NewStaff {
    staff_code:     code.into(),
    first_name:     "Lerato".into(),
    last_name:      "Kgosi".into(),
    position:       "Facilitator".into(),
    department:     None,
    email:          None,
    phone:          None,
    verified:       false,
    qualifications: vec!["N4 Educare".into()],
    skills:         vec![],
    workload:       Some(30),
    site_id,
  }
}

fn new_asset(code: &str, site_id: Option<i64>) -> NewAsset {
  NewAsset {
    asset_code:       code.into(),
    name:             "Projector".into(),
    category:         AssetCategory::Teaching,
    kind:             Some("Projector".into()),
    manufacturer:     None,
    model:            None,
    serial_numbers:   vec!["SN-1".into()],
    purchase_date:    None,
    purchase_price:   None,
    condition:        AssetCondition::Good,
    location:         None,
    assigned_to:      None,
    last_maintenance: None,
    next_maintenance: None,
    notes:            None,
    images:           vec![],
    site_id,
  }
}

fn new_program(code: &str, site_id: Option<i64>) -> NewProgram {
  NewProgram {
    program_code: code.into(),
    name:         "Adult literacy".into(),
    category:     Some("AET".into()),
    description:  None,
    enrollment:   18,
    start_date:   None,
    end_date:     None,
    status:       ProgramStatus::Active,
    notes:        None,
    site_id,
  }
}

fn new_user(username: &str) -> NewUser {
  NewUser {
    username:      username.into(),
    password_hash: "$argon2id$stub".into(),
    name:          "Test User".into(),
    role:          Role::FieldAssessor,
    email:         None,
    phone:         None,
  }
}

// ─── Id assignment ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_strictly_increasing_ids() {
  let s = store().await;
  let a = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let b = s.create_site(new_site("CLC-002"), ACTOR).await.unwrap();
  let c = s.create_site(new_site("CLC-003"), ACTOR).await.unwrap();
  assert!(a.id < b.id);
  assert!(b.id < c.id);
}

#[tokio::test]
async fn ids_are_never_reused_after_delete() {
  let s = store().await;
  let a = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  assert!(s.delete_site(a.id).await.unwrap());

  let b = s.create_site(new_site("CLC-002"), ACTOR).await.unwrap();
  assert!(b.id > a.id, "id {} reused after delete of {}", b.id, a.id);
}

// ─── Sites ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn site_roundtrip_includes_server_assigned_fields() {
  let s = store().await;
  let created = s.create_site(new_site("CLC-099"), ACTOR).await.unwrap();
  assert_eq!(created.created_by, ACTOR);
  assert!(created.last_visit_date.is_none());

  let fetched = s.get_site(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.site_code, "CLC-099");
  assert_eq!(fetched.name, "Test CLC");
  assert_eq!(fetched.district, "Bojanala");
  assert_eq!(fetched.created_by, ACTOR);
  assert_eq!(fetched.operational_status, OperationalStatus::Active);
  assert_eq!(fetched.assessment_status, AssessmentStatus::ToVisit);
}

#[tokio::test]
async fn get_site_missing_returns_none() {
  let s = store().await;
  assert!(s.get_site(999_999).await.unwrap().is_none());
}

#[tokio::test]
async fn get_site_by_code_finds_the_row() {
  let s = store().await;
  let created = s.create_site(new_site("CLC-007"), ACTOR).await.unwrap();
  let fetched = s.get_site_by_code("CLC-007").await.unwrap().unwrap();
  assert_eq!(fetched.id, created.id);
  assert!(s.get_site_by_code("CLC-700").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_site_code_is_rejected() {
  let s = store().await;
  s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let err = s
    .create_site(new_site("CLC-001"), ACTOR)
    .await
    .unwrap_err();
  assert!(err.is_duplicate());
}

#[tokio::test]
async fn update_site_merges_rather_than_replaces() {
  let s = store().await;
  let created = s.create_site(new_site("CLC-099"), ACTOR).await.unwrap();

  let updated = s
    .update_site(created.id, SiteUpdate {
      operational_status: Some(OperationalStatus::Inactive),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.operational_status, OperationalStatus::Inactive);
  assert_eq!(updated.assessment_status, AssessmentStatus::ToVisit);
  assert_eq!(updated.id, created.id);

  // The merge is persisted, not just returned.
  let fetched = s.get_site(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.operational_status, OperationalStatus::Inactive);
  assert_eq!(fetched.assessment_status, AssessmentStatus::ToVisit);
}

#[tokio::test]
async fn update_site_on_absent_id_fails() {
  let s = store().await;
  let err = s
    .update_site(999_999, SiteUpdate::default())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn update_site_to_taken_code_is_rejected() {
  let s = store().await;
  s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let b = s.create_site(new_site("CLC-002"), ACTOR).await.unwrap();

  let err = s
    .update_site(b.id, SiteUpdate {
      site_code: Some("CLC-001".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(err.is_duplicate());

  // Rewriting a row's own code is not a conflict.
  s.update_site(b.id, SiteUpdate {
    site_code: Some("CLC-002".into()),
    ..Default::default()
  })
  .await
  .unwrap();
}

#[tokio::test]
async fn delete_site_returns_true_then_false() {
  let s = store().await;
  let created = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();

  assert!(s.delete_site(created.id).await.unwrap());
  assert!(s.get_site(created.id).await.unwrap().is_none());
  assert!(!s.delete_site(created.id).await.unwrap());
}

#[tokio::test]
async fn record_site_visit_stamps_audit_fields_and_logs() {
  let s = store().await;
  let created = s.create_site(new_site("CLC-010"), ACTOR).await.unwrap();

  let visited = s.record_site_visit(created.id, 4).await.unwrap();
  assert_eq!(visited.last_visited_by, Some(4));
  assert!(visited.last_visit_date.is_some());
  // Visiting does not advance the workflow label by itself.
  assert_eq!(visited.assessment_status, AssessmentStatus::ToVisit);

  let visits: Vec<_> = s
    .activities_for_site(created.id)
    .await
    .unwrap()
    .into_iter()
    .filter(|a| a.kind == ActivityKind::SiteVisit)
    .collect();
  assert_eq!(visits.len(), 1);
  assert_eq!(visits[0].performed_by, 4);
}

#[tokio::test]
async fn visit_on_absent_site_fails() {
  let s = store().await;
  let err = s.record_site_visit(999_999, ACTOR).await.unwrap_err();
  assert!(err.is_not_found());
}

// ─── Creation side effect ────────────────────────────────────────────────────

#[tokio::test]
async fn creating_a_site_appends_exactly_one_activity() {
  let s = store().await;
  let before = s.list_activities().await.unwrap().len();

  let site = s.create_site(new_site("CLC-099"), ACTOR).await.unwrap();

  let after = s.list_activities().await.unwrap();
  assert_eq!(after.len(), before + 1);

  let entry = after.last().unwrap();
  assert_eq!(entry.kind, ActivityKind::SiteCreation);
  assert_eq!(entry.related, Some(RelatedEntity::Site(site.id)));
  assert_eq!(entry.performed_by, ACTOR);
}

#[tokio::test]
async fn creating_staff_assets_programs_logs_their_kind() {
  let s = store().await;

  let staff = s.create_staff(new_staff("STF-001", None), 2).await.unwrap();
  let asset = s.create_asset(new_asset("AST-001", None), 2).await.unwrap();
  let program = s
    .create_program(new_program("PRG-001", None), 2)
    .await
    .unwrap();

  let log = s.list_activities().await.unwrap();
  assert_eq!(log.len(), 3);
  assert_eq!(log[0].kind, ActivityKind::StaffCreation);
  assert_eq!(log[0].related, Some(RelatedEntity::Staff(staff.id)));
  assert_eq!(log[1].kind, ActivityKind::AssetCreation);
  assert_eq!(log[1].related, Some(RelatedEntity::Asset(asset.id)));
  assert_eq!(log[2].kind, ActivityKind::ProgramCreation);
  assert_eq!(log[2].related, Some(RelatedEntity::Program(program.id)));
  assert!(log.iter().all(|a| a.performed_by == 2));
}

// ─── Relationship reads ──────────────────────────────────────────────────────

#[tokio::test]
async fn staff_for_site_is_exactly_the_matching_subset() {
  let s = store().await;
  let site_a = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let site_b = s.create_site(new_site("CLC-002"), ACTOR).await.unwrap();

  s.create_staff(new_staff("STF-001", Some(site_a.id)), ACTOR)
    .await
    .unwrap();
  s.create_staff(new_staff("STF-002", Some(site_b.id)), ACTOR)
    .await
    .unwrap();
  s.create_staff(new_staff("STF-003", Some(site_a.id)), ACTOR)
    .await
    .unwrap();
  s.create_staff(new_staff("STF-004", None), ACTOR)
    .await
    .unwrap();

  let at_a = s.staff_for_site(site_a.id).await.unwrap();
  assert_eq!(at_a.len(), 2);
  assert!(at_a.iter().all(|m| m.site_id == Some(site_a.id)));

  let all = s.list_staff().await.unwrap();
  let expected: Vec<_> = all
    .iter()
    .filter(|m| m.site_id == Some(site_a.id))
    .map(|m| m.id)
    .collect();
  assert_eq!(at_a.iter().map(|m| m.id).collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn site_scoped_reads_on_unknown_site_are_empty_not_errors() {
  let s = store().await;
  assert!(s.staff_for_site(999_999).await.unwrap().is_empty());
  assert!(s.assets_for_site(999_999).await.unwrap().is_empty());
  assert!(s.programs_for_site(999_999).await.unwrap().is_empty());
  assert!(s.activities_for_site(999_999).await.unwrap().is_empty());
}

#[tokio::test]
async fn assets_and_programs_filter_by_site() {
  let s = store().await;
  let site = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();

  s.create_asset(new_asset("AST-001", Some(site.id)), ACTOR)
    .await
    .unwrap();
  s.create_asset(new_asset("AST-002", None), ACTOR)
    .await
    .unwrap();
  s.create_program(new_program("PRG-001", Some(site.id)), ACTOR)
    .await
    .unwrap();

  assert_eq!(s.assets_for_site(site.id).await.unwrap().len(), 1);
  assert_eq!(s.programs_for_site(site.id).await.unwrap().len(), 1);
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn staff_update_can_clear_site_assignment() {
  let s = store().await;
  let site = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let staff = s
    .create_staff(new_staff("STF-001", Some(site.id)), ACTOR)
    .await
    .unwrap();

  // A JSON patch with an explicit null clears the weak reference.
  let patch: StaffUpdate = serde_json::from_str(r#"{"site_id":null}"#).unwrap();
  let updated = s.update_staff(staff.id, patch).await.unwrap();
  assert!(updated.site_id.is_none());
  assert_eq!(updated.staff_code, "STF-001");

  // A patch that omits site_id leaves it alone.
  let patch: StaffUpdate =
    serde_json::from_str(r#"{"verified":true}"#).unwrap();
  let updated = s.update_staff(staff.id, patch).await.unwrap();
  assert!(updated.verified);
  assert!(updated.site_id.is_none());
}

#[tokio::test]
async fn deleting_a_site_orphans_its_staff() {
  let s = store().await;
  let site = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  let staff = s
    .create_staff(new_staff("STF-001", Some(site.id)), ACTOR)
    .await
    .unwrap();

  assert!(s.delete_site(site.id).await.unwrap());

  // The weak reference survives; nothing cascades or blocks.
  let fetched = s.get_staff_member(staff.id).await.unwrap().unwrap();
  assert_eq!(fetched.site_id, Some(site.id));
}

#[tokio::test]
async fn staff_qualifications_roundtrip_in_order() {
  let s = store().await;
  let mut input = new_staff("STF-001", None);
  input.qualifications =
    vec!["N4 Educare".into(), "Assessor cert".into(), "First aid".into()];

  let created = s.create_staff(input, ACTOR).await.unwrap();
  let fetched = s.get_staff_member(created.id).await.unwrap().unwrap();
  assert_eq!(
    fetched.qualifications,
    vec!["N4 Educare", "Assessor cert", "First aid"]
  );
}

// ─── Assets ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn asset_roundtrip_and_merge_update() {
  let s = store().await;
  let mut input = new_asset("AST-010", None);
  input.purchase_price = Some(5400.0);

  let created = s.create_asset(input, ACTOR).await.unwrap();

  let patch: locus_core::asset::AssetUpdate =
    serde_json::from_str(r#"{"condition":"poor"}"#).unwrap();
  let updated = s.update_asset(created.id, patch).await.unwrap();

  assert_eq!(updated.condition, AssetCondition::Poor);
  assert_eq!(updated.purchase_price, Some(5400.0));
  assert_eq!(updated.serial_numbers, vec!["SN-1"]);
}

#[tokio::test]
async fn asset_delete_is_idempotent_in_effect() {
  let s = store().await;
  let created = s.create_asset(new_asset("AST-001", None), ACTOR)
    .await
    .unwrap();
  assert!(s.delete_asset(created.id).await.unwrap());
  assert!(!s.delete_asset(created.id).await.unwrap());
  assert!(s.get_asset(created.id).await.unwrap().is_none());
}

// ─── Programs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn program_update_on_absent_id_fails() {
  let s = store().await;
  let err = s
    .update_program(999_999, Default::default())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn duplicate_program_code_is_rejected() {
  let s = store().await;
  s.create_program(new_program("PRG-001", None), ACTOR)
    .await
    .unwrap();
  let err = s
    .create_program(new_program("PRG-001", None), ACTOR)
    .await
    .unwrap_err();
  assert!(err.is_duplicate());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_roundtrip_and_username_lookup() {
  let s = store().await;
  let created = s.create_user(new_user("thandi")).await.unwrap();
  assert!(created.active);

  let by_name = s.get_user_by_username("thandi").await.unwrap().unwrap();
  assert_eq!(by_name.id, created.id);
  assert_eq!(by_name.password_hash, "$argon2id$stub");

  assert!(s.get_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.create_user(new_user("thandi")).await.unwrap();
  let err = s.create_user(new_user("thandi")).await.unwrap_err();
  assert!(err.is_duplicate());
}

#[tokio::test]
async fn user_soft_disable_via_update() {
  let s = store().await;
  let created = s.create_user(new_user("thandi")).await.unwrap();

  let updated = s
    .update_user(created.id, UserUpdate {
      active: Some(false),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!updated.active);
  assert_eq!(updated.username, "thandi");
  assert_eq!(updated.role, Role::FieldAssessor);
}

// ─── Activities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_activity_stamps_the_timestamp() {
  let s = store().await;
  let before = chrono::Utc::now();

  let activity = s
    .record_activity(
      NewActivity {
        kind:        ActivityKind::PhotoUpload,
        description: "uploaded 3 photos".into(),
        related:     None,
      },
      5,
    )
    .await
    .unwrap();

  assert!(activity.recorded_at >= before);
  assert_eq!(activity.performed_by, 5);

  let fetched = s.get_activity(activity.id).await.unwrap().unwrap();
  assert_eq!(fetched.kind, ActivityKind::PhotoUpload);
  assert_eq!(fetched.recorded_at, activity.recorded_at);
}

#[tokio::test]
async fn activities_for_site_excludes_other_entities() {
  let s = store().await;
  let site = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();
  // Staff creation logs against the staff row, not the site.
  s.create_staff(new_staff("STF-001", Some(site.id)), ACTOR)
    .await
    .unwrap();

  let for_site = s.activities_for_site(site.id).await.unwrap();
  assert_eq!(for_site.len(), 1);
  assert_eq!(for_site[0].kind, ActivityKind::SiteCreation);
}

// ─── Recommendations ─────────────────────────────────────────────────────────

#[tokio::test]
async fn recommendation_lifecycle() {
  let s = store().await;
  let site = s.create_site(new_site("CLC-001"), ACTOR).await.unwrap();

  let rec = s
    .create_recommendation(
      NewRecommendation {
        description: "replace electrical board".into(),
        site_id:     Some(site.id),
      },
      ACTOR,
    )
    .await
    .unwrap();
  assert_eq!(rec.status, RecommendationStatus::Open);
  assert_eq!(rec.recorded_by, ACTOR);

  let done = s
    .set_recommendation_status(rec.id, RecommendationStatus::Completed)
    .await
    .unwrap();
  assert_eq!(done.status, RecommendationStatus::Completed);
  assert_eq!(done.description, "replace electrical board");

  assert!(s.delete_recommendation(rec.id).await.unwrap());
  assert!(!s.delete_recommendation(rec.id).await.unwrap());
  assert!(s.get_recommendation(rec.id).await.unwrap().is_none());
}

#[tokio::test]
async fn recommendation_status_on_absent_id_fails() {
  let s = store().await;
  let err = s
    .set_recommendation_status(999_999, RecommendationStatus::Discarded)
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn recommendations_do_not_touch_the_activity_log() {
  let s = store().await;
  s.create_recommendation(
    NewRecommendation { description: "fix roof".into(), site_id: None },
    ACTOR,
  )
  .await
  .unwrap();

  assert!(s.list_activities().await.unwrap().is_empty());
}
