use std::fmt;

use serde::{Deserialize, Serialize};

use super::{empty_if_null, id_string};

/// Kind of account a user registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum UserType {
    Consumer,
    Influencer,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Consumer => "CONSUMER",
            UserType::Influencer => "INFLUENCER",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Cached profile of the authenticated principal.
///
/// This is also the shape persisted under the `authUser` credential key, so
/// field names must stay stable across releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    #[serde(with = "id_string")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub bio: String,
    pub user_type: UserType,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub profile_picture: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub created_at: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub updated_at: String,
}

impl UserProfile {
    /// Numeric form of the user ID, as expected by comment and rating payloads.
    pub fn numeric_id(&self) -> Option<i64> {
        self.user_id.trim().parse().ok()
    }

    pub fn has_profile_picture(&self) -> bool {
        !self.profile_picture.trim().is_empty()
    }
}

/// Response to a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct JwtAuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form. The profile picture travels as a separate multipart
/// file part.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub bio: String,
    pub user_type: UserType,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("bio", &self.bio)
            .field("user_type", &self.user_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORED_USER: &str = r#"{"userId":"1","email":"a@b.com","name":"A","bio":"","userType":"CONSUMER","profilePicture":"","createdAt":"","updatedAt":""}"#;

    #[test]
    fn test_parse_stored_user_snapshot() {
        let user: UserProfile = serde_json::from_str(STORED_USER).expect("valid user json");
        assert_eq!(user.user_id, "1");
        assert_eq!(user.name, "A");
        assert_eq!(user.user_type, UserType::Consumer);
        assert!(!user.has_profile_picture());
    }

    #[test]
    fn test_user_snapshot_keeps_wire_field_names() {
        let user: UserProfile = serde_json::from_str(STORED_USER).expect("valid user json");
        let value = serde_json::to_value(&user).expect("serializable");
        assert_eq!(value["userId"], "1");
        assert_eq!(value["userType"], "CONSUMER");
        assert_eq!(value["profilePicture"], "");
    }

    #[test]
    fn test_numeric_user_id_and_null_fields() {
        let json = r#"{"userId":34,"email":"x@y.com","name":"X","bio":null,"userType":"INFLUENCER","profilePicture":null,"createdAt":"2024-11-20T10:00:00"}"#;
        let user: UserProfile = serde_json::from_str(json).expect("valid user json");
        assert_eq!(user.user_id, "34");
        assert_eq!(user.numeric_id(), Some(34));
        assert_eq!(user.bio, "");
        assert_eq!(user.updated_at, "");
        assert_eq!(user.user_type, UserType::Influencer);
    }

    #[test]
    fn test_unknown_user_type_is_rejected() {
        let json = STORED_USER.replace("CONSUMER", "ADMIN");
        assert!(serde_json::from_str::<UserProfile>(&json).is_err());
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let req = LoginRequest::new("a@b.com", "hunter2");
        let debug = format!("{:?}", req);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }
}
