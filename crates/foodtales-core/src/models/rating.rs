//! Ratings and review comments for dishes and restaurants.

use serde::{Deserialize, Serialize};

use super::{empty_if_null, lenient_rating};

// ===== Food ratings =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodRating {
    pub food_rating_id: i64,
    /// Legacy alias of `food_rating_id` still sent by some endpoints.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
    pub food_id: i64,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodRatingRequest {
    pub food_id: i64,
    pub user_id: i64,
    pub rating: u8,
    pub comment: String,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodRatingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FoodRatingPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodRatingUpdate {
    pub rating: u8,
    pub comment: String,
}

/// A review comment left on a dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FoodComment {
    pub user_id: i64,
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
    pub food_id: i64,
}

// ===== Restaurant ratings =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RestaurantRating {
    pub rating_id: i64,
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
    pub user_id: i64,
    pub restaurant_id: i64,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub created_at: String,
}

/// New restaurant rating. Author and restaurant are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RestaurantRatingRequest {
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// A review comment left on a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RestaurantComment {
    pub user_id: i64,
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment: String,
    pub restaurant_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = FoodRatingPatch {
            rating: Some(4),
            comment: None,
        };
        assert!(!patch.is_empty());
        let value = serde_json::to_value(&patch).expect("serializable");
        assert_eq!(value, serde_json::json!({"rating": 4}));
        assert!(FoodRatingPatch::default().is_empty());
    }

    #[test]
    fn test_parse_food_rating_with_legacy_id() {
        let json = r#"{"foodRatingId":5,"id":5,"rating":4,"comment":"Rico","foodId":12,"createdAt":"2024-11-02"}"#;
        let rating: FoodRating = serde_json::from_str(json).expect("valid rating json");
        assert_eq!(rating.food_rating_id, 5);
        assert_eq!(rating.id, Some(5));
    }

    #[test]
    fn test_rating_accepts_whole_floats() {
        let json = r#"{"ratingId":1,"rating":4.0,"comment":null,"userId":34,"restaurantId":3}"#;
        let rating: RestaurantRating = serde_json::from_str(json).expect("valid rating json");
        assert_eq!(rating.rating, 4);
        assert_eq!(rating.comment, "");

        let json = r#"{"userId":34,"rating":5,"comment":"Rico","foodId":12}"#;
        let comment: FoodComment = serde_json::from_str(json).expect("valid comment json");
        assert_eq!(comment.rating, 5);
    }

    #[test]
    fn test_rating_rejects_fractions_and_negatives() {
        let half = r#"{"userId":34,"rating":4.5,"comment":"","restaurantId":3}"#;
        assert!(serde_json::from_str::<RestaurantComment>(half).is_err());
        let negative = r#"{"userId":34,"rating":-1,"comment":"","restaurantId":3}"#;
        assert!(serde_json::from_str::<RestaurantComment>(negative).is_err());
    }

    #[test]
    fn test_food_rating_request_wire_names() {
        let req = FoodRatingRequest {
            food_id: 12,
            user_id: 34,
            rating: 5,
            comment: "Excelente".to_string(),
        };
        let value = serde_json::to_value(&req).expect("serializable");
        assert_eq!(value["foodId"], 12);
        assert_eq!(value["userId"], 34);
    }
}
