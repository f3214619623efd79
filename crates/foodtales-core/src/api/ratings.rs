//! Dish and restaurant ratings.

use reqwest::Method;

use crate::models::{
    FoodComment, FoodRating, FoodRatingPatch, FoodRatingRequest, FoodRatingUpdate, RestaurantComment,
    RestaurantRating, RestaurantRatingRequest,
};

use super::error::{ApiError, ApiResult};
use super::ApiClient;

impl ApiClient {
    // ===== Food ratings =====

    pub async fn get_food_ratings_by_food_id(&self, food_id: i64) -> ApiResult<Vec<FoodRating>> {
        self.get(&format!("/foodratings/food/{}", food_id)).await
    }

    pub async fn get_food_rating_by_id(&self, rating_id: i64) -> ApiResult<FoodRating> {
        self.get(&format!("/foodratings/{}", rating_id)).await
    }

    pub async fn create_food_rating(&self, rating: &FoodRatingRequest) -> ApiResult<FoodRating> {
        self.send_with_body(Method::POST, "/foodratings", rating).await
    }

    /// Change only the fields set in `patch`.
    pub async fn patch_food_rating(&self, rating_id: i64, patch: &FoodRatingPatch) -> ApiResult<FoodRating> {
        if patch.is_empty() {
            return Err(ApiError::BadRequest("Nothing to update".to_string()));
        }
        self.send_with_body(Method::PATCH, &format!("/foodratings/{}", rating_id), patch)
            .await
    }

    pub async fn update_food_rating(&self, rating_id: i64, rating: &FoodRatingUpdate) -> ApiResult<FoodRating> {
        self.send_with_body(Method::PUT, &format!("/foodratings/{}", rating_id), rating)
            .await
    }

    pub async fn delete_food_rating(&self, rating_id: i64) -> ApiResult<()> {
        self.delete(&format!("/foodratings/{}", rating_id)).await
    }

    pub async fn get_food_ratings_by_user_id(&self, user_id: i64) -> ApiResult<Vec<FoodRating>> {
        self.get(&format!("/foodratings/users/{}", user_id)).await
    }

    pub async fn get_comments_by_food_id(&self, food_id: i64) -> ApiResult<Vec<FoodComment>> {
        self.get(&format!("/foodratings/foods/{}/comments", food_id)).await
    }

    // ===== Restaurant ratings =====

    pub async fn create_restaurant_rating(&self, rating: &RestaurantRatingRequest) -> ApiResult<RestaurantRating> {
        self.send_with_body(Method::POST, "/restaurantratings", rating).await
    }

    pub async fn get_comments_by_restaurant_id(&self, restaurant_id: i64) -> ApiResult<Vec<RestaurantComment>> {
        self.get(&format!("/restaurantratings/restaurants/{}/comments", restaurant_id))
            .await
    }
}
