use foods_core::model::{Contributor, Details, FoodUpdate, NewFood, NewPurchase};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// A new listing. Fields other than the ones named here (image, category, origin,
/// description...) are stored with the listing as given.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub number_of_purchases: i64,
    pub added_by: Contributor,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: Details,
}

impl From<CreateFoodRequest> for NewFood {
    fn from(value: CreateFoodRequest) -> Self {
        Self {
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            number_of_purchases: value.number_of_purchases,
            added_by: value.added_by,
            details: value.details,
        }
    }
}

/// Replacement values for a listing. The purchase counter can't be set this way.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoodRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub added_by: Option<Contributor>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: Details,
}

impl From<UpdateFoodRequest> for FoodUpdate {
    fn from(value: UpdateFoodRequest) -> Self {
        Self {
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            added_by: value.added_by,
            details: value.details,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseRequest<I> {
    #[serde(rename = "foodId")]
    pub food_id: I,
    /// Units bought, at least 1
    pub quantity: u32,
    pub buyer_email: String,
    #[serde(default)]
    pub buyer_name: Option<String>,
    /// Order details kept with the purchase record (food name, price, date...)
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub order: Details,
}

impl<I> From<PurchaseRequest<I>> for NewPurchase<I> {
    fn from(value: PurchaseRequest<I>) -> Self {
        Self {
            food_id: value.food_id,
            quantity: value.quantity,
            buyer_email: value.buyer_email,
            buyer_name: value.buyer_name,
            order: value.order,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FoodSearch {
    /// Exact name of the listing
    #[serde(rename = "foodName")]
    pub food_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentIntentRequest {
    /// Amount to charge in dollars
    pub price: f64,
}

/// Feedback is stored exactly as sent, any JSON object is accepted.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct FeedbackRequest(pub Details);
