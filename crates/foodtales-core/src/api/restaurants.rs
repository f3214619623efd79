use reqwest::Method;

use crate::models::{Restaurant, RestaurantFilter, RestaurantRequest};

use super::error::ApiResult;
use super::upload::{resource_form, ImageUpload};
use super::ApiClient;

/// Multipart field carrying the restaurant metadata
const RESTAURANT_FIELD: &str = "restaurant";

impl ApiClient {
    pub async fn get_all_restaurants(&self) -> ApiResult<Vec<Restaurant>> {
        self.get("/restaurants").await
    }

    /// Search restaurants; unset filter fields are not sent.
    pub async fn get_restaurants(&self, filter: &RestaurantFilter) -> ApiResult<Vec<Restaurant>> {
        self.get_with_query("/api/restaurants", filter).await
    }

    pub async fn get_restaurant_by_id(&self, restaurant_id: i64) -> ApiResult<Restaurant> {
        self.get(&format!("/restaurants/{}", restaurant_id)).await
    }

    pub async fn create_restaurant(
        &self,
        restaurant: &RestaurantRequest,
        image: Option<ImageUpload>,
    ) -> ApiResult<Restaurant> {
        let form = resource_form(RESTAURANT_FIELD, restaurant, image)?;
        let request = self.authed(Method::POST, "/restaurants")?.multipart(form);
        self.send_json(request).await
    }

    pub async fn update_restaurant(
        &self,
        restaurant_id: i64,
        restaurant: &RestaurantRequest,
        image: Option<ImageUpload>,
    ) -> ApiResult<Restaurant> {
        let form = resource_form(RESTAURANT_FIELD, restaurant, image)?;
        let request = self
            .authed(Method::PUT, &format!("/restaurants/{}", restaurant_id))?
            .multipart(form);
        self.send_json(request).await
    }

    pub async fn delete_restaurant(&self, restaurant_id: i64) -> ApiResult<()> {
        self.delete(&format!("/restaurants/{}", restaurant_id)).await
    }
}
