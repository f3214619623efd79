//! Data models for FoodTales entities.
//!
//! This module contains the request and response DTOs exchanged with the
//! FoodTales backend:
//!
//! - `UserProfile`, `JwtAuthResponse`: the authenticated principal
//! - `Post`, `CommentResponse`: the social feed
//! - `Restaurant`, `Food`: places and dishes
//! - Rating types for restaurants and dishes
//!
//! All payloads use camelCase field names on the wire.

pub mod comment;
pub mod food;
pub mod post;
pub mod rating;
pub mod restaurant;
pub mod user;

pub use comment::{CommentRequest, CommentResponse};
pub use food::{Food, FoodFilter, FoodRequest};
pub use post::{Post, PostRequest};
pub use rating::{
    FoodComment, FoodRating, FoodRatingPatch, FoodRatingRequest, FoodRatingUpdate,
    RestaurantComment, RestaurantRating, RestaurantRatingRequest,
};
pub use restaurant::{Restaurant, RestaurantFilter, RestaurantRequest, RestaurantStatus};
pub use user::{JwtAuthResponse, LoginRequest, RegisterRequest, UserProfile, UserType};

/// Serde helpers for identifiers the backend sends either as JSON numbers
/// or as strings.
pub(crate) mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match RawId::deserialize(deserializer) {
            Ok(RawId::Text(s)) => Ok(s),
            Ok(RawId::Int(n)) => Ok(n.to_string()),
            Ok(RawId::Unsigned(n)) => Ok(n.to_string()),
            Err(_) => Err(de::Error::custom("expected a string or integer identifier")),
        }
    }
}

/// Deserializes a star rating sent as a JSON integer or a whole-valued
/// float (`4` or `4.0`).
pub(crate) fn lenient_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{de, Deserialize};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Int(u64),
        Float(f64),
    }

    let value = match RawRating::deserialize(deserializer) {
        Ok(RawRating::Int(n)) => n as f64,
        Ok(RawRating::Float(n)) => n,
        Err(_) => return Err(de::Error::custom("expected a numeric rating")),
    };
    if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(de::Error::custom(format!("rating out of range: {}", value)));
    }
    Ok(value as u8)
}

/// Deserializes `null` (or a missing field, with `#[serde(default)]`) as an
/// empty string.
pub(crate) fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
