use reqwest::Method;

use crate::models::{Food, FoodFilter, FoodRequest};

use super::error::ApiResult;
use super::upload::{resource_form, ImageUpload};
use super::ApiClient;

/// Multipart field carrying the dish metadata
const FOOD_FIELD: &str = "food";

impl ApiClient {
    /// Search dishes; unset filter fields are not sent.
    pub async fn get_foods(&self, filter: &FoodFilter) -> ApiResult<Vec<Food>> {
        self.get_with_query("/api/foods", filter).await
    }

    pub async fn get_foods_by_restaurant_id(&self, restaurant_id: i64) -> ApiResult<Vec<Food>> {
        self.get(&format!("/foods/restaurants/{}/foods", restaurant_id)).await
    }

    pub async fn create_food(&self, food: &FoodRequest, image: Option<ImageUpload>) -> ApiResult<Food> {
        let form = resource_form(FOOD_FIELD, food, image)?;
        let request = self.authed(Method::POST, "/foods")?.multipart(form);
        self.send_json(request).await
    }

    pub async fn update_food(&self, food_id: i64, food: &FoodRequest, image: Option<ImageUpload>) -> ApiResult<Food> {
        let form = resource_form(FOOD_FIELD, food, image)?;
        let request = self
            .authed(Method::PUT, &format!("/foods/{}", food_id))?
            .multipart(form);
        self.send_json(request).await
    }

    pub async fn delete_food(&self, food_id: i64) -> ApiResult<()> {
        self.delete(&format!("/foods/{}", food_id)).await
    }
}
