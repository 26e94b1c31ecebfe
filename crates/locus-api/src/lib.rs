//! JSON REST API for the Locus registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`locus_core::store::RegistryStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility; handlers that write expect an
//! [`actor::Actor`] extension installed by the surrounding middleware.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", locus_api::api_router(store.clone()))
//! ```

pub mod activities;
pub mod actor;
pub mod assets;
pub mod error;
pub mod programs;
pub mod recommendations;
pub mod sites;
pub mod staff;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use locus_core::store::RegistryStore;

pub use actor::Actor;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RegistryStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Users — no DELETE; accounts are disabled, not removed.
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>).patch(users::update_one::<S>),
    )
    // Sites
    .route("/sites", get(sites::list::<S>).post(sites::create::<S>))
    .route(
      "/sites/{id}",
      get(sites::get_one::<S>)
        .patch(sites::update_one::<S>)
        .delete(sites::delete_one::<S>),
    )
    .route("/sites/{id}/visit", axum::routing::post(sites::visit::<S>))
    .route("/sites/{id}/staff", get(sites::staff_for::<S>))
    .route("/sites/{id}/assets", get(sites::assets_for::<S>))
    .route("/sites/{id}/programs", get(sites::programs_for::<S>))
    .route("/sites/{id}/activities", get(sites::activities_for::<S>))
    // Staff
    .route("/staff", get(staff::list::<S>).post(staff::create::<S>))
    .route(
      "/staff/{id}",
      get(staff::get_one::<S>)
        .patch(staff::update_one::<S>)
        .delete(staff::delete_one::<S>),
    )
    // Assets
    .route("/assets", get(assets::list::<S>).post(assets::create::<S>))
    .route(
      "/assets/{id}",
      get(assets::get_one::<S>)
        .patch(assets::update_one::<S>)
        .delete(assets::delete_one::<S>),
    )
    // Programs
    .route(
      "/programs",
      get(programs::list::<S>).post(programs::create::<S>),
    )
    .route(
      "/programs/{id}",
      get(programs::get_one::<S>)
        .patch(programs::update_one::<S>)
        .delete(programs::delete_one::<S>),
    )
    // Activities — append-only, so no PATCH or DELETE routes exist.
    .route(
      "/activities",
      get(activities::list::<S>).post(activities::create::<S>),
    )
    .route("/activities/{id}", get(activities::get_one::<S>))
    // Recommendations
    .route(
      "/recommendations",
      get(recommendations::list::<S>).post(recommendations::create::<S>),
    )
    .route(
      "/recommendations/{id}",
      patch(recommendations::set_status::<S>)
        .get(recommendations::get_one::<S>)
        .delete(recommendations::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use locus_core::{store::RegistryStore as _, user::Role};
  use locus_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  /// Router plus a direct store handle, with an admin actor pre-installed
  /// the way the server's auth middleware would.
  async fn service() -> (Arc<SqliteStore>, Router) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let app = api_router(store.clone()).layer(axum::Extension(Actor {
      user_id: 1,
      role:    Role::Admin,
    }));
    (store, app)
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let json = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
  }

  fn site_body(code: &str) -> serde_json::Value {
    serde_json::json!({
      "site_code": code,
      "name": "Test CLC",
      "site_type": "clc",
      "district": "Bojanala",
      "address": null,
      "latitude": null,
      "longitude": null,
      "operational_status": "active",
      "assessment_status": "to_visit",
      "notes": null
    })
  }

  // ── Sites ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_site_returns_201_and_logs_creation() {
    let (_store, app) = service().await;

    let (status, body) =
      send(&app, "POST", "/sites", Some(site_body("CLC-099"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["site_code"], "CLC-099");
    assert_eq!(body["created_by"], 1);

    let (status, log) = send(&app, "GET", "/activities", None).await;
    assert_eq!(status, StatusCode::OK);
    let log = log.as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["kind"], "site_creation");
    assert_eq!(log[0]["related"]["id"], body["id"]);
  }

  #[tokio::test]
  async fn get_missing_site_returns_404() {
    let (_store, app) = service().await;
    let (status, _) = send(&app, "GET", "/sites/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn patch_site_merges_fields() {
    let (_store, app) = service().await;
    let (_, created) =
      send(&app, "POST", "/sites", Some(site_body("CLC-099"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
      &app,
      "PATCH",
      &format!("/sites/{id}"),
      Some(serde_json::json!({ "operational_status": "inactive" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["operational_status"], "inactive");
    assert_eq!(updated["assessment_status"], "to_visit");
  }

  #[tokio::test]
  async fn patch_missing_site_returns_404() {
    let (_store, app) = service().await;
    let (status, _) = send(
      &app,
      "PATCH",
      "/sites/999999",
      Some(serde_json::json!({ "name": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn duplicate_site_code_returns_409() {
    let (_store, app) = service().await;
    send(&app, "POST", "/sites", Some(site_body("CLC-001"))).await;
    let (status, _) =
      send(&app, "POST", "/sites", Some(site_body("CLC-001"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn delete_site_returns_204_then_404() {
    let (_store, app) = service().await;
    let (_, created) =
      send(&app, "POST", "/sites", Some(site_body("CLC-001"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) =
      send(&app, "DELETE", &format!("/sites/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&app, "DELETE", &format!("/sites/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn visit_stamps_audit_fields() {
    let (_store, app) = service().await;
    let (_, created) =
      send(&app, "POST", "/sites", Some(site_body("CLC-010"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, visited) =
      send(&app, "POST", &format!("/sites/{id}/visit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(visited["last_visited_by"], 1);
    assert!(visited["last_visit_date"].is_string());
  }

  #[tokio::test]
  async fn site_scoped_staff_read() {
    let (_store, app) = service().await;
    let (_, site) =
      send(&app, "POST", "/sites", Some(site_body("CLC-001"))).await;
    let site_id = site["id"].as_i64().unwrap();

    send(
      &app,
      "POST",
      "/staff",
      Some(serde_json::json!({
        "staff_code": "STF-001",
        "first_name": "Lerato",
        "last_name": "Kgosi",
        "position": "Facilitator",
        "site_id": site_id
      })),
    )
    .await;
    send(
      &app,
      "POST",
      "/staff",
      Some(serde_json::json!({
        "staff_code": "STF-002",
        "first_name": "Sipho",
        "last_name": "Mokoena",
        "position": "Clerk",
        "site_id": null
      })),
    )
    .await;

    let (status, staff) =
      send(&app, "GET", &format!("/sites/{site_id}/staff"), None).await;
    assert_eq!(status, StatusCode::OK);
    let staff = staff.as_array().unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0]["staff_code"], "STF-001");

    // Unknown site id: empty list, not an error.
    let (status, staff) =
      send(&app, "GET", "/sites/999999/staff", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(staff.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn malformed_site_payload_is_rejected_before_the_store() {
    let (_store, app) = service().await;
    let (status, _) = send(
      &app,
      "POST",
      "/sites",
      Some(serde_json::json!({ "name": "no code" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Auth boundary ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn writes_without_an_actor_return_401() {
    // No extension layer: the extractor must refuse the write.
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let app = api_router(store);

    let (status, _) =
      send(&app, "POST", "/sites", Some(site_body("CLC-001"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Users ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn created_user_never_exposes_credentials() {
    let (store, app) = service().await;

    let (status, user) = send(
      &app,
      "POST",
      "/users",
      Some(serde_json::json!({
        "username": "thandi",
        "password": "hunter2",
        "name": "Thandi M.",
        "role": "field_assessor"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    // The stored hash is argon2, not the plaintext.
    let stored = store
      .get_user_by_username("thandi")
      .await
      .unwrap()
      .unwrap();
    assert_ne!(stored.password_hash, "hunter2");
    assert!(stored.password_hash.starts_with("$argon2"));
  }

  #[tokio::test]
  async fn user_soft_disable_via_patch() {
    let (_store, app) = service().await;
    let (_, user) = send(
      &app,
      "POST",
      "/users",
      Some(serde_json::json!({
        "username": "thandi",
        "password": "hunter2",
        "name": "Thandi M.",
        "role": "viewer"
      })),
    )
    .await;
    let id = user["id"].as_i64().unwrap();

    let (status, updated) = send(
      &app,
      "PATCH",
      &format!("/users/{id}"),
      Some(serde_json::json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["active"], false);
    assert_eq!(updated["username"], "thandi");
  }

  // ── Recommendations ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn recommendation_status_patch_and_delete() {
    let (_store, app) = service().await;

    let (status, rec) = send(
      &app,
      "POST",
      "/recommendations",
      Some(serde_json::json!({
        "description": "replace electrical board",
        "site_id": null
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rec["status"], "open");
    let id = rec["id"].as_i64().unwrap();

    let (status, rec) = send(
      &app,
      "PATCH",
      &format!("/recommendations/{id}"),
      Some(serde_json::json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rec["status"], "completed");

    let (status, _) =
      send(&app, "DELETE", &format!("/recommendations/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
      send(&app, "GET", &format!("/recommendations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
