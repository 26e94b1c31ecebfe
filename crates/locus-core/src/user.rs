//! User — the identity record every write is attributed to.
//!
//! Passwords are stored as argon2 PHC strings, hashed at the boundary that
//! accepts the plaintext (the API layer or the server bootstrap). The hash
//! never appears in serialised output. Users are never hard-deleted; the
//! `active` flag provides a soft disable.

use serde::{Deserialize, Serialize};

use crate::patch;

/// Access role, assigned at provisioning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Admin,
  ProjectManager,
  DataAnalyst,
  FieldAssessor,
  Viewer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:       i64,
  pub username: String,
  /// Argon2 PHC string. Never serialised outward.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub name:     String,
  pub role:     Role,
  pub email:    Option<String>,
  pub phone:    Option<String>,
  pub active:   bool,
}

/// Input to [`crate::store::RegistryStore::create_user`]. The caller hashes
/// the password before building this; the store never sees plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub name:          String,
  pub role:          Role,
  #[serde(default)]
  pub email:         Option<String>,
  #[serde(default)]
  pub phone:         Option<String>,
}

/// Partial update for a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
  pub username:      Option<String>,
  pub password_hash: Option<String>,
  pub name:          Option<String>,
  pub role:          Option<Role>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub email:         Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub phone:         Option<Option<String>>,
  pub active:        Option<bool>,
}

impl UserUpdate {
  /// Merge this patch onto `user`, preserving every untouched field.
  pub fn apply(self, user: &mut User) {
    if let Some(v) = self.username {
      user.username = v;
    }
    if let Some(v) = self.password_hash {
      user.password_hash = v;
    }
    if let Some(v) = self.name {
      user.name = v;
    }
    if let Some(v) = self.role {
      user.role = v;
    }
    if let Some(v) = self.email {
      user.email = v;
    }
    if let Some(v) = self.phone {
      user.phone = v;
    }
    if let Some(v) = self.active {
      user.active = v;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user() -> User {
    User {
      id:            1,
      username:      "thandi".into(),
      password_hash: "$argon2id$stub".into(),
      name:          "Thandi M.".into(),
      role:          Role::FieldAssessor,
      email:         Some("thandi@example.org".into()),
      phone:         None,
      active:        true,
    }
  }

  #[test]
  fn apply_merges_only_supplied_fields() {
    let mut u = user();
    UserUpdate {
      role: Some(Role::ProjectManager),
      active: Some(false),
      ..Default::default()
    }
    .apply(&mut u);

    assert_eq!(u.role, Role::ProjectManager);
    assert!(!u.active);
    assert_eq!(u.username, "thandi");
    assert_eq!(u.email.as_deref(), Some("thandi@example.org"));
  }

  #[test]
  fn apply_can_clear_nullable_fields() {
    let mut u = user();
    UserUpdate {
      email: Some(None),
      ..Default::default()
    }
    .apply(&mut u);
    assert!(u.email.is_none());
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let json = serde_json::to_value(user()).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], "thandi");
  }
}
