//! Account endpoints: registration, login and profile lookups.

use reqwest::multipart::Form;
use reqwest::Method;
use tracing::info;

use crate::auth::SessionStore;
use crate::models::{JwtAuthResponse, LoginRequest, RegisterRequest, UserProfile};

use super::error::ApiResult;
use super::upload::ImageUpload;
use super::ApiClient;

/// Form field name of the profile picture file part
const PROFILE_PICTURE_FIELD: &str = "profilePicture";

impl ApiClient {
    /// Register a new account. Sent as multipart form data with plain text
    /// fields and an optional profile picture.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        profile_picture: Option<ImageUpload>,
    ) -> ApiResult<JwtAuthResponse> {
        let mut form = Form::new()
            .text("email", request.email.clone())
            .text("password", request.password.clone())
            .text("name", request.name.clone())
            .text("bio", request.bio.clone())
            .text("userType", request.user_type.as_str());
        if let Some(picture) = profile_picture {
            form = form.part(PROFILE_PICTURE_FIELD, picture.into_part()?);
        }

        let request = self.anonymous(Method::POST, "/auth/register").multipart(form);
        self.send_json(request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<JwtAuthResponse> {
        let request = self.anonymous(Method::POST, "/auth/login").json(request);
        self.send_json(request).await
    }

    /// Log in and store the resulting session.
    pub async fn login_into(&self, session: &SessionStore, request: &LoginRequest) -> ApiResult<UserProfile> {
        let auth = self.login(request).await?;
        info!(user_id = %auth.user.user_id, "Logged in");
        session.sign_in(auth.token, auth.user.clone());
        Ok(auth.user)
    }

    /// Register and store the resulting session.
    pub async fn register_into(
        &self,
        session: &SessionStore,
        request: &RegisterRequest,
        profile_picture: Option<ImageUpload>,
    ) -> ApiResult<UserProfile> {
        let auth = self.register(request, profile_picture).await?;
        info!(user_id = %auth.user.user_id, "Registered new account");
        session.sign_in(auth.token, auth.user.clone());
        Ok(auth.user)
    }

    /// Public profile of any user; no token required.
    pub async fn get_user_details(&self, user_id: &str) -> ApiResult<UserProfile> {
        let request = self.anonymous(Method::GET, &format!("/users/{}", user_id));
        self.send_json(request).await
    }

    /// Replace the signed-in user's profile picture.
    ///
    /// When this client is backed by a session holding the same user, the
    /// cached profile is refreshed with the server's response.
    pub async fn update_profile_picture(&self, user_id: &str, picture: ImageUpload) -> ApiResult<UserProfile> {
        let form = Form::new().part(PROFILE_PICTURE_FIELD, picture.into_part()?);
        let request = self
            .authed(Method::PUT, &format!("/users/{}/profile-picture", user_id))?
            .multipart(form);
        let updated: UserProfile = self.send_json(request).await?;

        if let Some(session) = self.session() {
            if session.user().map(|u| u.user_id == updated.user_id).unwrap_or(false) {
                session.set_user(Some(updated.clone()));
            }
        }
        Ok(updated)
    }
}
