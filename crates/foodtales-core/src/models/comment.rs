use serde::{Deserialize, Serialize};

use super::empty_if_null;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommentRequest {
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommentResponse {
    pub comment_id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub content: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub comment_date: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub user_name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub user_photo: String,
}
