//! [`SqliteStore`] — the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use locus_core::{
  EntityKind,
  activity::{Activity, ActivityKind, NewActivity, RelatedEntity},
  asset::{Asset, AssetUpdate, NewAsset},
  program::{NewProgram, Program, ProgramUpdate},
  recommendation::{NewRecommendation, Recommendation, RecommendationStatus},
  site::{NewSite, Site, SiteUpdate},
  staff::{NewStaff, Staff, StaffUpdate},
  store::RegistryStore,
  user::{NewUser, User, UserUpdate},
};

use crate::{
  Error, Result,
  encode::{
    ACTIVITY_COLS, ASSET_COLS, PROGRAM_COLS, RECOMMENDATION_COLS, SITE_COLS,
    STAFF_COLS, USER_COLS, RawActivity, RawAsset, RawProgram,
    RawRecommendation, RawSite, RawStaff, RawUser, encode_activity_kind,
    encode_asset_category, encode_asset_condition, encode_assessment_status,
    encode_condition, encode_date, encode_dt, encode_operational_status,
    encode_program_status, encode_recommendation_status, encode_related,
    encode_role, encode_site_type, encode_string_list, read_activity,
    read_asset, read_program, read_recommendation, read_site, read_staff,
    read_user,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Locus registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// method is one database call on the connection's dedicated thread; the
/// creation side effect (audit append) is a second, separate call with no
/// rollback coupling to the primary write.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — the test double for the whole workspace.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Business-identifier uniqueness pre-check. `exclude` skips the row
  /// being updated so a no-op rewrite of its own code passes.
  async fn identifier_taken(
    &self,
    table: &'static str,
    column: &'static str,
    value: String,
    exclude: Option<i64>,
  ) -> Result<bool> {
    let taken: bool = self
      .conn
      .call(move |conn| {
        let found = match exclude {
          Some(id) => conn
            .query_row(
              &format!(
                "SELECT 1 FROM {table} WHERE {column} = ?1 AND id != ?2"
              ),
              rusqlite::params![value, id],
              |_| Ok(true),
            )
            .optional()?,
          None => conn
            .query_row(
              &format!("SELECT 1 FROM {table} WHERE {column} = ?1"),
              rusqlite::params![value],
              |_| Ok(true),
            )
            .optional()?,
        };
        Ok(found.unwrap_or(false))
      })
      .await?;
    Ok(taken)
  }

  /// Append one audit row and return it. Callers invoke this after their
  /// primary write; the two statements are deliberately not one
  /// transaction.
  async fn log_activity(
    &self,
    kind: ActivityKind,
    description: String,
    related: Option<RelatedEntity>,
    actor: i64,
  ) -> Result<Activity> {
    let recorded_at = Utc::now();
    let kind_str    = encode_activity_kind(kind).to_owned();
    let at_str      = encode_dt(recorded_at);
    let desc        = description.clone();
    let (rel_type, rel_id) = match related {
      Some(r) => {
        let (t, id) = encode_related(r);
        (Some(t.to_owned()), Some(id))
      }
      None => (None, None),
    };

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (
             kind, description, related_type, related_id, performed_by,
             recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![kind_str, desc, rel_type, rel_id, actor, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Activity {
      id,
      kind,
      description,
      related,
      performed_by: actor,
      recorded_at,
    })
  }

  /// Write every mutable column of `site` back to its row.
  async fn write_site(&self, site: &Site) -> Result<()> {
    let s          = site.clone();
    let site_type  = encode_site_type(s.site_type).to_owned();
    let op_status  = encode_operational_status(s.operational_status).to_owned();
    let as_status  = encode_assessment_status(s.assessment_status).to_owned();
    let building   = encode_condition(s.conditions.building).to_owned();
    let electrical = encode_condition(s.conditions.electrical).to_owned();
    let plumbing   = encode_condition(s.conditions.plumbing).to_owned();
    let interior   = encode_condition(s.conditions.interior).to_owned();
    let exterior   = encode_condition(s.conditions.exterior).to_owned();
    let images     = encode_string_list(&s.images)?;
    let visit_date = s.last_visit_date.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sites SET
             site_code = ?1, name = ?2, site_type = ?3, district = ?4,
             address = ?5, latitude = ?6, longitude = ?7,
             operational_status = ?8, assessment_status = ?9,
             classrooms = ?10, offices = ?11, labs = ?12, workshops = ?13,
             cond_building = ?14, cond_electrical = ?15,
             cond_plumbing = ?16, cond_interior = ?17, cond_exterior = ?18,
             notes = ?19, images = ?20, last_visited_by = ?21,
             last_visit_date = ?22
           WHERE id = ?23",
          rusqlite::params![
            s.site_code,
            s.name,
            site_type,
            s.district,
            s.address,
            s.latitude,
            s.longitude,
            op_status,
            as_status,
            s.infrastructure.classrooms,
            s.infrastructure.offices,
            s.infrastructure.labs,
            s.infrastructure.workshops,
            building,
            electrical,
            plumbing,
            interior,
            exterior,
            s.notes,
            images,
            s.last_visited_by,
            visit_date,
            s.id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn write_staff(&self, staff: &Staff) -> Result<()> {
    let s              = staff.clone();
    let qualifications = encode_string_list(&s.qualifications)?;
    let skills         = encode_string_list(&s.skills)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE staff SET
             staff_code = ?1, first_name = ?2, last_name = ?3,
             position = ?4, department = ?5, email = ?6, phone = ?7,
             verified = ?8, qualifications = ?9, skills = ?10,
             workload = ?11, site_id = ?12
           WHERE id = ?13",
          rusqlite::params![
            s.staff_code,
            s.first_name,
            s.last_name,
            s.position,
            s.department,
            s.email,
            s.phone,
            s.verified,
            qualifications,
            skills,
            s.workload,
            s.site_id,
            s.id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn write_asset(&self, asset: &Asset) -> Result<()> {
    let a         = asset.clone();
    let category  = encode_asset_category(a.category).to_owned();
    let condition = encode_asset_condition(a.condition).to_owned();
    let serials   = encode_string_list(&a.serial_numbers)?;
    let images    = encode_string_list(&a.images)?;
    let purchased = a.purchase_date.map(encode_date);
    let last_mnt  = a.last_maintenance.map(encode_date);
    let next_mnt  = a.next_maintenance.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE assets SET
             asset_code = ?1, name = ?2, category = ?3, kind = ?4,
             manufacturer = ?5, model = ?6, serial_numbers = ?7,
             purchase_date = ?8, purchase_price = ?9, condition = ?10,
             location = ?11, assigned_to = ?12, last_maintenance = ?13,
             next_maintenance = ?14, notes = ?15, images = ?16,
             site_id = ?17
           WHERE id = ?18",
          rusqlite::params![
            a.asset_code,
            a.name,
            category,
            a.kind,
            a.manufacturer,
            a.model,
            serials,
            purchased,
            a.purchase_price,
            condition,
            a.location,
            a.assigned_to,
            last_mnt,
            next_mnt,
            a.notes,
            images,
            a.site_id,
            a.id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn write_program(&self, program: &Program) -> Result<()> {
    let p      = program.clone();
    let status = encode_program_status(p.status).to_owned();
    let start  = p.start_date.map(encode_date);
    let end    = p.end_date.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE programs SET
             program_code = ?1, name = ?2, category = ?3, description = ?4,
             enrollment = ?5, start_date = ?6, end_date = ?7, status = ?8,
             notes = ?9, site_id = ?10
           WHERE id = ?11",
          rusqlite::params![
            p.program_code,
            p.name,
            p.category,
            p.description,
            p.enrollment,
            start,
            end,
            status,
            p.notes,
            p.site_id,
            p.id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn write_user(&self, user: &User) -> Result<()> {
    let u    = user.clone();
    let role = encode_role(u.role).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET
             username = ?1, password_hash = ?2, name = ?3, role = ?4,
             email = ?5, phone = ?6, active = ?7
           WHERE id = ?8",
          rusqlite::params![
            u.username,
            u.password_hash,
            u.name,
            role,
            u.email,
            u.phone,
            u.active,
            u.id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_row(&self, table: &'static str, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    if self
      .identifier_taken("users", "username", input.username.clone(), None)
      .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::User, input.username).into(),
      );
    }

    let u    = input.clone();
    let role = encode_role(u.role).to_owned();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             username, password_hash, name, role, email, phone, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            u.username,
            u.password_hash,
            u.name,
            role,
            u.email,
            u.phone,
            true,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      id,
      username:      input.username,
      password_hash: input.password_hash,
      name:          input.name,
      role:          input.role,
      email:         input.email,
      phone:         input.phone,
      active:        true,
    })
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
              rusqlite::params![id],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE username = ?1"),
              rusqlite::params![username],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USER_COLS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: i64, patch: UserUpdate) -> Result<User> {
    let mut user = self
      .get_user(id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::User, id))?;

    if let Some(username) = &patch.username
      && username != &user.username
      && self
        .identifier_taken("users", "username", username.clone(), Some(id))
        .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::User, username.clone())
          .into(),
      );
    }

    patch.apply(&mut user);
    self.write_user(&user).await?;
    Ok(user)
  }

  // ── Sites ─────────────────────────────────────────────────────────────────

  async fn create_site(&self, input: NewSite, actor: i64) -> Result<Site> {
    if self
      .identifier_taken("sites", "site_code", input.site_code.clone(), None)
      .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Site, input.site_code)
          .into(),
      );
    }

    let s          = input.clone();
    let site_type  = encode_site_type(s.site_type).to_owned();
    let op_status  = encode_operational_status(s.operational_status).to_owned();
    let as_status  = encode_assessment_status(s.assessment_status).to_owned();
    let building   = encode_condition(s.conditions.building).to_owned();
    let electrical = encode_condition(s.conditions.electrical).to_owned();
    let plumbing   = encode_condition(s.conditions.plumbing).to_owned();
    let interior   = encode_condition(s.conditions.interior).to_owned();
    let exterior   = encode_condition(s.conditions.exterior).to_owned();
    let images     = encode_string_list(&s.images)?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sites (
             site_code, name, site_type, district, address, latitude,
             longitude, operational_status, assessment_status, classrooms,
             offices, labs, workshops, cond_building, cond_electrical,
             cond_plumbing, cond_interior, cond_exterior, notes, images,
             created_by
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
          rusqlite::params![
            s.site_code,
            s.name,
            site_type,
            s.district,
            s.address,
            s.latitude,
            s.longitude,
            op_status,
            as_status,
            s.infrastructure.classrooms,
            s.infrastructure.offices,
            s.infrastructure.labs,
            s.infrastructure.workshops,
            building,
            electrical,
            plumbing,
            interior,
            exterior,
            s.notes,
            images,
            actor,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let site = Site {
      id,
      site_code:          input.site_code,
      name:               input.name,
      site_type:          input.site_type,
      district:           input.district,
      address:            input.address,
      latitude:           input.latitude,
      longitude:          input.longitude,
      operational_status: input.operational_status,
      assessment_status:  input.assessment_status,
      infrastructure:     input.infrastructure,
      conditions:         input.conditions,
      notes:              input.notes,
      images:             input.images,
      created_by:         actor,
      last_visited_by:    None,
      last_visit_date:    None,
    };

    self
      .log_activity(
        ActivityKind::SiteCreation,
        format!("site {} registered", site.site_code),
        Some(RelatedEntity::Site(site.id)),
        actor,
      )
      .await?;

    Ok(site)
  }

  async fn get_site(&self, id: i64) -> Result<Option<Site>> {
    let raw: Option<RawSite> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SITE_COLS} FROM sites WHERE id = ?1"),
              rusqlite::params![id],
              read_site,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSite::into_site).transpose()
  }

  async fn get_site_by_code(&self, code: &str) -> Result<Option<Site>> {
    let code = code.to_owned();
    let raw: Option<RawSite> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SITE_COLS} FROM sites WHERE site_code = ?1"),
              rusqlite::params![code],
              read_site,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSite::into_site).transpose()
  }

  async fn list_sites(&self) -> Result<Vec<Site>> {
    let raws: Vec<RawSite> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {SITE_COLS} FROM sites ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_site)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawSite::into_site).collect()
  }

  async fn update_site(&self, id: i64, patch: SiteUpdate) -> Result<Site> {
    let mut site = self
      .get_site(id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::Site, id))?;

    if let Some(code) = &patch.site_code
      && code != &site.site_code
      && self
        .identifier_taken("sites", "site_code", code.clone(), Some(id))
        .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Site, code.clone()).into(),
      );
    }

    patch.apply(&mut site);
    self.write_site(&site).await?;
    Ok(site)
  }

  async fn delete_site(&self, id: i64) -> Result<bool> {
    self.delete_row("sites", id).await
  }

  async fn record_site_visit(&self, site_id: i64, actor: i64) -> Result<Site> {
    let mut site = self
      .get_site(site_id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::Site, site_id))?;

    site.last_visited_by = Some(actor);
    site.last_visit_date = Some(Utc::now());
    self.write_site(&site).await?;

    self
      .log_activity(
        ActivityKind::SiteVisit,
        format!("site {} visited", site.site_code),
        Some(RelatedEntity::Site(site.id)),
        actor,
      )
      .await?;

    Ok(site)
  }

  // ── Staff ─────────────────────────────────────────────────────────────────

  async fn create_staff(&self, input: NewStaff, actor: i64) -> Result<Staff> {
    if self
      .identifier_taken("staff", "staff_code", input.staff_code.clone(), None)
      .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Staff, input.staff_code)
          .into(),
      );
    }

    let s              = input.clone();
    let qualifications = encode_string_list(&s.qualifications)?;
    let skills         = encode_string_list(&s.skills)?;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO staff (
             staff_code, first_name, last_name, position, department,
             email, phone, verified, qualifications, skills, workload,
             site_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            s.staff_code,
            s.first_name,
            s.last_name,
            s.position,
            s.department,
            s.email,
            s.phone,
            s.verified,
            qualifications,
            skills,
            s.workload,
            s.site_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let staff = Staff {
      id,
      staff_code:     input.staff_code,
      first_name:     input.first_name,
      last_name:      input.last_name,
      position:       input.position,
      department:     input.department,
      email:          input.email,
      phone:          input.phone,
      verified:       input.verified,
      qualifications: input.qualifications,
      skills:         input.skills,
      workload:       input.workload,
      site_id:        input.site_id,
    };

    self
      .log_activity(
        ActivityKind::StaffCreation,
        format!("staff member {} registered", staff.staff_code),
        Some(RelatedEntity::Staff(staff.id)),
        actor,
      )
      .await?;

    Ok(staff)
  }

  async fn get_staff_member(&self, id: i64) -> Result<Option<Staff>> {
    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STAFF_COLS} FROM staff WHERE id = ?1"),
              rusqlite::params![id],
              read_staff,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawStaff::into_staff).transpose()
  }

  async fn list_staff(&self) -> Result<Vec<Staff>> {
    let raws: Vec<RawStaff> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {STAFF_COLS} FROM staff ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_staff)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawStaff::into_staff).collect()
  }

  async fn staff_for_site(&self, site_id: i64) -> Result<Vec<Staff>> {
    let raws: Vec<RawStaff> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STAFF_COLS} FROM staff WHERE site_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![site_id], read_staff)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawStaff::into_staff).collect()
  }

  async fn update_staff(&self, id: i64, patch: StaffUpdate) -> Result<Staff> {
    let mut staff = self
      .get_staff_member(id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::Staff, id))?;

    if let Some(code) = &patch.staff_code
      && code != &staff.staff_code
      && self
        .identifier_taken("staff", "staff_code", code.clone(), Some(id))
        .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Staff, code.clone()).into(),
      );
    }

    patch.apply(&mut staff);
    self.write_staff(&staff).await?;
    Ok(staff)
  }

  async fn delete_staff(&self, id: i64) -> Result<bool> {
    self.delete_row("staff", id).await
  }

  // ── Assets ────────────────────────────────────────────────────────────────

  async fn create_asset(&self, input: NewAsset, actor: i64) -> Result<Asset> {
    if self
      .identifier_taken("assets", "asset_code", input.asset_code.clone(), None)
      .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Asset, input.asset_code)
          .into(),
      );
    }

    let a         = input.clone();
    let category  = encode_asset_category(a.category).to_owned();
    let condition = encode_asset_condition(a.condition).to_owned();
    let serials   = encode_string_list(&a.serial_numbers)?;
    let images    = encode_string_list(&a.images)?;
    let purchased = a.purchase_date.map(encode_date);
    let last_mnt  = a.last_maintenance.map(encode_date);
    let next_mnt  = a.next_maintenance.map(encode_date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assets (
             asset_code, name, category, kind, manufacturer, model,
             serial_numbers, purchase_date, purchase_price, condition,
             location, assigned_to, last_maintenance, next_maintenance,
             notes, images, site_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?14, ?15, ?16, ?17)",
          rusqlite::params![
            a.asset_code,
            a.name,
            category,
            a.kind,
            a.manufacturer,
            a.model,
            serials,
            purchased,
            a.purchase_price,
            condition,
            a.location,
            a.assigned_to,
            last_mnt,
            next_mnt,
            a.notes,
            images,
            a.site_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let asset = Asset {
      id,
      asset_code:       input.asset_code,
      name:             input.name,
      category:         input.category,
      kind:             input.kind,
      manufacturer:     input.manufacturer,
      model:            input.model,
      serial_numbers:   input.serial_numbers,
      purchase_date:    input.purchase_date,
      purchase_price:   input.purchase_price,
      condition:        input.condition,
      location:         input.location,
      assigned_to:      input.assigned_to,
      last_maintenance: input.last_maintenance,
      next_maintenance: input.next_maintenance,
      notes:            input.notes,
      images:           input.images,
      site_id:          input.site_id,
    };

    self
      .log_activity(
        ActivityKind::AssetCreation,
        format!("asset {} registered", asset.asset_code),
        Some(RelatedEntity::Asset(asset.id)),
        actor,
      )
      .await?;

    Ok(asset)
  }

  async fn get_asset(&self, id: i64) -> Result<Option<Asset>> {
    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSET_COLS} FROM assets WHERE id = ?1"),
              rusqlite::params![id],
              read_asset,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAsset::into_asset).transpose()
  }

  async fn list_assets(&self) -> Result<Vec<Asset>> {
    let raws: Vec<RawAsset> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {ASSET_COLS} FROM assets ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_asset)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn assets_for_site(&self, site_id: i64) -> Result<Vec<Asset>> {
    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSET_COLS} FROM assets WHERE site_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![site_id], read_asset)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn update_asset(&self, id: i64, patch: AssetUpdate) -> Result<Asset> {
    let mut asset = self
      .get_asset(id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::Asset, id))?;

    if let Some(code) = &patch.asset_code
      && code != &asset.asset_code
      && self
        .identifier_taken("assets", "asset_code", code.clone(), Some(id))
        .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Asset, code.clone()).into(),
      );
    }

    patch.apply(&mut asset);
    self.write_asset(&asset).await?;
    Ok(asset)
  }

  async fn delete_asset(&self, id: i64) -> Result<bool> {
    self.delete_row("assets", id).await
  }

  // ── Programs ──────────────────────────────────────────────────────────────

  async fn create_program(
    &self,
    input: NewProgram,
    actor: i64,
  ) -> Result<Program> {
    if self
      .identifier_taken(
        "programs",
        "program_code",
        input.program_code.clone(),
        None,
      )
      .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Program, input.program_code)
          .into(),
      );
    }

    let p      = input.clone();
    let status = encode_program_status(p.status).to_owned();
    let start  = p.start_date.map(encode_date);
    let end    = p.end_date.map(encode_date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programs (
             program_code, name, category, description, enrollment,
             start_date, end_date, status, notes, site_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            p.program_code,
            p.name,
            p.category,
            p.description,
            p.enrollment,
            start,
            end,
            status,
            p.notes,
            p.site_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let program = Program {
      id,
      program_code: input.program_code,
      name:         input.name,
      category:     input.category,
      description:  input.description,
      enrollment:   input.enrollment,
      start_date:   input.start_date,
      end_date:     input.end_date,
      status:       input.status,
      notes:        input.notes,
      site_id:      input.site_id,
    };

    self
      .log_activity(
        ActivityKind::ProgramCreation,
        format!("program {} registered", program.program_code),
        Some(RelatedEntity::Program(program.id)),
        actor,
      )
      .await?;

    Ok(program)
  }

  async fn get_program(&self, id: i64) -> Result<Option<Program>> {
    let raw: Option<RawProgram> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROGRAM_COLS} FROM programs WHERE id = ?1"),
              rusqlite::params![id],
              read_program,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawProgram::into_program).transpose()
  }

  async fn list_programs(&self) -> Result<Vec<Program>> {
    let raws: Vec<RawProgram> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROGRAM_COLS} FROM programs ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], read_program)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawProgram::into_program).collect()
  }

  async fn programs_for_site(&self, site_id: i64) -> Result<Vec<Program>> {
    let raws: Vec<RawProgram> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROGRAM_COLS} FROM programs WHERE site_id = ?1 \
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![site_id], read_program)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawProgram::into_program).collect()
  }

  async fn update_program(
    &self,
    id: i64,
    patch: ProgramUpdate,
  ) -> Result<Program> {
    let mut program = self
      .get_program(id)
      .await?
      .ok_or(locus_core::Error::NotFound(EntityKind::Program, id))?;

    if let Some(code) = &patch.program_code
      && code != &program.program_code
      && self
        .identifier_taken("programs", "program_code", code.clone(), Some(id))
        .await?
    {
      return Err(
        locus_core::Error::Duplicate(EntityKind::Program, code.clone())
          .into(),
      );
    }

    patch.apply(&mut program);
    self.write_program(&program).await?;
    Ok(program)
  }

  async fn delete_program(&self, id: i64) -> Result<bool> {
    self.delete_row("programs", id).await
  }

  // ── Activities — append-only ──────────────────────────────────────────────

  async fn record_activity(
    &self,
    input: NewActivity,
    actor: i64,
  ) -> Result<Activity> {
    self
      .log_activity(input.kind, input.description, input.related, actor)
      .await
  }

  async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLS} FROM activities WHERE id = ?1"
              ),
              rusqlite::params![id],
              read_activity,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawActivity::into_activity).transpose()
  }

  async fn list_activities(&self) -> Result<Vec<Activity>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLS} FROM activities ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], read_activity)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn activities_for_site(&self, site_id: i64) -> Result<Vec<Activity>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLS} FROM activities \
           WHERE related_type = 'site' AND related_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![site_id], read_activity)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  // ── Recommendations ───────────────────────────────────────────────────────

  async fn create_recommendation(
    &self,
    input: NewRecommendation,
    actor: i64,
  ) -> Result<Recommendation> {
    let recorded_at = Utc::now();
    let at_str      = encode_dt(recorded_at);
    let status      =
      encode_recommendation_status(RecommendationStatus::Open).to_owned();
    let r           = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO recommendations (
             description, site_id, status, recorded_by, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![r.description, r.site_id, status, actor, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Recommendation {
      id,
      description: input.description,
      site_id:     input.site_id,
      status:      RecommendationStatus::Open,
      recorded_by: actor,
      recorded_at,
    })
  }

  async fn get_recommendation(
    &self,
    id: i64,
  ) -> Result<Option<Recommendation>> {
    let raw: Option<RawRecommendation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RECOMMENDATION_COLS} FROM recommendations \
                 WHERE id = ?1"
              ),
              rusqlite::params![id],
              read_recommendation,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawRecommendation::into_recommendation).transpose()
  }

  async fn list_recommendations(&self) -> Result<Vec<Recommendation>> {
    let raws: Vec<RawRecommendation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECOMMENDATION_COLS} FROM recommendations ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], read_recommendation)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(RawRecommendation::into_recommendation)
      .collect()
  }

  async fn set_recommendation_status(
    &self,
    id: i64,
    status: RecommendationStatus,
  ) -> Result<Recommendation> {
    let mut rec = self.get_recommendation(id).await?.ok_or(
      locus_core::Error::NotFound(EntityKind::Recommendation, id),
    )?;

    let status_str = encode_recommendation_status(status).to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE recommendations SET status = ?1 WHERE id = ?2",
          rusqlite::params![status_str, id],
        )?;
        Ok(())
      })
      .await?;

    rec.status = status;
    Ok(rec)
  }

  async fn delete_recommendation(&self, id: i64) -> Result<bool> {
    self.delete_row("recommendations", id).await
  }
}
