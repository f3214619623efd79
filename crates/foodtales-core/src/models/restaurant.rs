use std::fmt;

use serde::{Deserialize, Serialize};

use super::empty_if_null;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum RestaurantStatus {
    Open,
    Closed,
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestaurantStatus::Open => f.pad("OPEN"),
            RestaurantStatus::Closed => f.pad("CLOSED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    /// URL of the restaurant image.
    #[serde(default)]
    pub image: Option<String>,
    pub status: RestaurantStatus,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub created_date: String,
}

impl Restaurant {
    pub fn is_open(&self) -> bool {
        self.status == RestaurantStatus::Open
    }

    /// Coordinates formatted for display, e.g. `19.43260, -99.13320`.
    pub fn coordinates(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Metadata part of a restaurant create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RestaurantRequest {
    pub name: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: RestaurantStatus,
}

/// Query parameters for restaurant search. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RestaurantFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_respects_width() {
        assert_eq!(format!("[{:<6}]", RestaurantStatus::Open), "[OPEN  ]");
        assert_eq!(format!("[{:>8}]", RestaurantStatus::Closed), "[  CLOSED]");
    }

    #[test]
    fn test_parse_restaurant() {
        let json = r#"{"restaurantId":3,"name":"La Casa","email":"hola@casa.mx","latitude":19.4326,"longitude":-99.1332,"image":null,"status":"OPEN","createdDate":"2024-10-01"}"#;
        let restaurant: Restaurant = serde_json::from_str(json).expect("valid restaurant json");
        assert!(restaurant.is_open());
        assert_eq!(restaurant.coordinates(), "19.43260, -99.13320");
        assert!(restaurant.image.is_none());
    }

    #[test]
    fn test_empty_filter_serializes_to_no_params() {
        let value = serde_json::to_value(RestaurantFilter::default()).expect("serializable");
        assert_eq!(value, serde_json::json!({}));
    }
}
