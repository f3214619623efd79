use reqwest::Method;

use crate::models::{CommentRequest, CommentResponse};

use super::error::ApiResult;
use super::ApiClient;

impl ApiClient {
    pub async fn get_comments_by_post_id(&self, post_id: i64) -> ApiResult<Vec<CommentResponse>> {
        self.get(&format!("/comments/post/{}", post_id)).await
    }

    pub async fn create_comment(&self, comment: &CommentRequest) -> ApiResult<CommentResponse> {
        self.send_with_body(Method::POST, "/comments", comment).await
    }

    pub async fn update_comment(&self, comment_id: i64, comment: &CommentRequest) -> ApiResult<CommentResponse> {
        self.send_with_body(Method::PUT, &format!("/comments/{}", comment_id), comment)
            .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        self.delete(&format!("/comments/{}", comment_id)).await
    }
}
