use serde::{Deserialize, Serialize};

use super::empty_if_null;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Food {
    pub food_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub description: String,
    pub price: f64,
    pub restaurant_id: i64,
    /// `AVAILABLE` or `UNAVAILABLE`.
    #[serde(default, deserialize_with = "empty_if_null")]
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Food {
    pub fn is_available(&self) -> bool {
        self.status.eq_ignore_ascii_case("AVAILABLE")
    }

    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Metadata part of a food create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub restaurant_id: i64,
    pub status: String,
}

/// Query parameters for dish search. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer: Option<String>,
}
