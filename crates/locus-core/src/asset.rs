//! Asset — a physical inventory item, optionally assigned to a site.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
  Equipment,
  Furniture,
  It,
  Teaching,
  Office,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCondition {
  Excellent,
  Good,
  Fair,
  Poor,
  NonFunctional,
  Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
  pub id:               i64,
  pub asset_code:       String,
  pub name:             String,
  pub category:         AssetCategory,
  /// Free-text subtype within the category, e.g. "Laptop".
  #[serde(rename = "type")]
  pub kind:             Option<String>,
  pub manufacturer:     Option<String>,
  pub model:            Option<String>,
  pub serial_numbers:   Vec<String>,
  pub purchase_date:    Option<NaiveDate>,
  pub purchase_price:   Option<f64>,
  pub condition:        AssetCondition,
  /// Room or area within the site, free text.
  pub location:         Option<String>,
  pub assigned_to:      Option<String>,
  pub last_maintenance: Option<NaiveDate>,
  pub next_maintenance: Option<NaiveDate>,
  pub notes:            Option<String>,
  pub images:           Vec<String>,
  pub site_id:          Option<i64>,
}

/// Input to [`crate::store::RegistryStore::create_asset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
  pub asset_code:       String,
  pub name:             String,
  pub category:         AssetCategory,
  #[serde(rename = "type", default)]
  pub kind:             Option<String>,
  #[serde(default)]
  pub manufacturer:     Option<String>,
  #[serde(default)]
  pub model:            Option<String>,
  #[serde(default)]
  pub serial_numbers:   Vec<String>,
  #[serde(default)]
  pub purchase_date:    Option<NaiveDate>,
  #[serde(default)]
  pub purchase_price:   Option<f64>,
  pub condition:        AssetCondition,
  #[serde(default)]
  pub location:         Option<String>,
  #[serde(default)]
  pub assigned_to:      Option<String>,
  #[serde(default)]
  pub last_maintenance: Option<NaiveDate>,
  #[serde(default)]
  pub next_maintenance: Option<NaiveDate>,
  #[serde(default)]
  pub notes:            Option<String>,
  #[serde(default)]
  pub images:           Vec<String>,
  #[serde(default)]
  pub site_id:          Option<i64>,
}

/// Partial update for an asset. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetUpdate {
  pub asset_code:       Option<String>,
  pub name:             Option<String>,
  pub category:         Option<AssetCategory>,
  #[serde(
    rename = "type",
    default,
    deserialize_with = "patch::double_option"
  )]
  pub kind:             Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub manufacturer:     Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub model:            Option<Option<String>>,
  pub serial_numbers:   Option<Vec<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub purchase_date:    Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub purchase_price:   Option<Option<f64>>,
  pub condition:        Option<AssetCondition>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub location:         Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub assigned_to:      Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub last_maintenance: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub next_maintenance: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub notes:            Option<Option<String>>,
  pub images:           Option<Vec<String>>,
  #[serde(default, deserialize_with = "patch::double_option")]
  pub site_id:          Option<Option<i64>>,
}

impl AssetUpdate {
  pub fn apply(self, asset: &mut Asset) {
    if let Some(v) = self.asset_code {
      asset.asset_code = v;
    }
    if let Some(v) = self.name {
      asset.name = v;
    }
    if let Some(v) = self.category {
      asset.category = v;
    }
    if let Some(v) = self.kind {
      asset.kind = v;
    }
    if let Some(v) = self.manufacturer {
      asset.manufacturer = v;
    }
    if let Some(v) = self.model {
      asset.model = v;
    }
    if let Some(v) = self.serial_numbers {
      asset.serial_numbers = v;
    }
    if let Some(v) = self.purchase_date {
      asset.purchase_date = v;
    }
    if let Some(v) = self.purchase_price {
      asset.purchase_price = v;
    }
    if let Some(v) = self.condition {
      asset.condition = v;
    }
    if let Some(v) = self.location {
      asset.location = v;
    }
    if let Some(v) = self.assigned_to {
      asset.assigned_to = v;
    }
    if let Some(v) = self.last_maintenance {
      asset.last_maintenance = v;
    }
    if let Some(v) = self.next_maintenance {
      asset.next_maintenance = v;
    }
    if let Some(v) = self.notes {
      asset.notes = v;
    }
    if let Some(v) = self.images {
      asset.images = v;
    }
    if let Some(v) = self.site_id {
      asset.site_id = v;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_field_serialises_as_type() {
    let asset = Asset {
      id:               1,
      asset_code:       "AST-020".into(),
      name:             "Projector".into(),
      category:         AssetCategory::Teaching,
      kind:             Some("Projector".into()),
      manufacturer:     None,
      model:            None,
      serial_numbers:   vec![],
      purchase_date:    None,
      purchase_price:   None,
      condition:        AssetCondition::Good,
      location:         None,
      assigned_to:      None,
      last_maintenance: None,
      next_maintenance: None,
      notes:            None,
      images:           vec![],
      site_id:          None,
    };
    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["type"], "Projector");
    assert!(json.get("kind").is_none());
  }

  #[test]
  fn condition_patch_leaves_pricing_alone() {
    let mut asset: Asset = serde_json::from_value(serde_json::json!({
      "id": 2,
      "asset_code": "AST-021",
      "name": "Bench drill",
      "category": "equipment",
      "type": null,
      "manufacturer": null,
      "model": null,
      "serial_numbers": [],
      "purchase_date": "2023-02-01",
      "purchase_price": 5400.0,
      "condition": "good",
      "location": null,
      "assigned_to": null,
      "last_maintenance": null,
      "next_maintenance": null,
      "notes": null,
      "images": [],
      "site_id": 7
    }))
    .unwrap();

    let patch: AssetUpdate =
      serde_json::from_str(r#"{"condition":"poor"}"#).unwrap();
    patch.apply(&mut asset);

    assert_eq!(asset.condition, AssetCondition::Poor);
    assert_eq!(asset.purchase_price, Some(5400.0));
    assert_eq!(asset.site_id, Some(7));
  }
}
