//! REST API client module for the FoodTales backend.
//!
//! This module provides the `ApiClient` for creating, reading, updating and
//! deleting posts, comments, restaurants, dishes and ratings, plus the
//! account endpoints used to obtain a session.
//!
//! The API uses JWT bearer token authentication obtained from
//! `/auth/login` or `/auth/register`.

mod auth;
pub mod client;
mod comments;
pub mod error;
mod foods;
mod posts;
mod ratings;
mod restaurants;
pub mod upload;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use upload::ImageUpload;
