//! Support for partial-update ("patch") shapes.
//!
//! Update operations merge the supplied fields onto the stored row; fields
//! absent from the payload are left untouched. For nullable columns the
//! payload must distinguish "absent" from "explicitly null", which plain
//! `Option<Option<T>>` cannot do on its own — serde collapses JSON `null`
//! into the outer `None`. Patch shapes therefore annotate nullable fields
//! with `#[serde(default, deserialize_with = "patch::double_option")]`:
//! a missing key stays `None`, `null` becomes `Some(None)`, and a value
//! becomes `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  #[derive(Deserialize)]
  struct Patch {
    #[serde(default, deserialize_with = "super::double_option")]
    notes: Option<Option<String>>,
  }

  #[test]
  fn absent_key_is_outer_none() {
    let p: Patch = serde_json::from_str("{}").unwrap();
    assert!(p.notes.is_none());
  }

  #[test]
  fn null_clears_the_field() {
    let p: Patch = serde_json::from_str(r#"{"notes":null}"#).unwrap();
    assert_eq!(p.notes, Some(None));
  }

  #[test]
  fn value_sets_the_field() {
    let p: Patch = serde_json::from_str(r#"{"notes":"repainted"}"#).unwrap();
    assert_eq!(p.notes, Some(Some("repainted".to_string())));
  }
}
