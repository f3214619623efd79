use reqwest::Method;

use crate::models::{Post, PostRequest};

use super::error::ApiResult;
use super::upload::{resource_form, ImageUpload};
use super::ApiClient;

/// Multipart field carrying the post metadata
const POST_FIELD: &str = "post";

impl ApiClient {
    pub async fn get_all_posts(&self) -> ApiResult<Vec<Post>> {
        self.get("/posts").await
    }

    pub async fn create_post(&self, post: &PostRequest, image: Option<ImageUpload>) -> ApiResult<Post> {
        let form = resource_form(POST_FIELD, post, image)?;
        let request = self.authed(Method::POST, "/posts")?.multipart(form);
        self.send_json(request).await
    }

    pub async fn update_post(&self, post_id: i64, post: &PostRequest, image: Option<ImageUpload>) -> ApiResult<Post> {
        let form = resource_form(POST_FIELD, post, image)?;
        let request = self
            .authed(Method::PUT, &format!("/posts/{}", post_id))?
            .multipart(form);
        self.send_json(request).await
    }

    pub async fn delete_post(&self, post_id: i64) -> ApiResult<()> {
        self.delete(&format!("/posts/{}", post_id)).await
    }
}
