use serde::{Deserialize, Serialize};

use super::{empty_if_null, id_string};

/// Status assigned to freshly created posts.
pub const DEFAULT_POST_STATUS: &str = "ACTIVE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub content: String,
    /// URL of the attached image, if any.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, with = "id_string")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub user_id: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub user_name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub created_date: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub status: String,
}

impl Post {
    pub fn has_image(&self) -> bool {
        self.image.as_deref().map(|s| !s.is_empty()).unwrap_or(false)
    }
}

/// Metadata part of a post create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub status: String,
}

impl PostRequest {
    /// An active post authored by `user_id`.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user_id: user_id.into(),
            status: DEFAULT_POST_STATUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post() {
        let json = r#"{"postId":7,"title":"Tacos","content":"Best in town","image":"https://cdn/x.jpg","userId":34,"userName":"Ana","createdDate":"2024-11-20","status":"ACTIVE"}"#;
        let post: Post = serde_json::from_str(json).expect("valid post json");
        assert_eq!(post.post_id, 7);
        assert_eq!(post.user_id, "34");
        assert!(post.has_image());
    }

    #[test]
    fn test_parse_post_without_image() {
        let json = r#"{"postId":8,"title":"Soup","content":null,"image":null,"userId":"3"}"#;
        let post: Post = serde_json::from_str(json).expect("valid post json");
        assert!(!post.has_image());
        assert_eq!(post.content, "");
        assert_eq!(post.status, "");
    }

    #[test]
    fn test_post_request_defaults_to_active() {
        let req = PostRequest::new("34", "Title", "Body");
        let value = serde_json::to_value(&req).expect("serializable");
        assert_eq!(value["status"], "ACTIVE");
        assert_eq!(value["userId"], "34");
    }
}
