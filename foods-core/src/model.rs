use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Free-form fields that ride along with a document without being interpreted,
/// e.g. a listing's image and description or an order's delivery date.
pub type Details = Map<String, Value>;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Contributor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food<T> {
    pub id: T,
    pub name: String,
    pub price: f64,
    /// Remaining stock. Purchases are not checked against it, so this can drop below zero.
    pub quantity: i64,
    #[serde(default)]
    pub number_of_purchases: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<Contributor>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: Details,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub number_of_purchases: i64,
    pub added_by: Contributor,
    pub details: Details,
}

/// First field that makes a listing unstorable. Stock and counters start out
/// non-negative, only purchases may take stock below zero.
fn invalid_listing_field(price: f64, quantity: i64, number_of_purchases: i64) -> Option<&'static str> {
    if !price.is_finite() || price < 0.0 {
        Some("price")
    } else if quantity < 0 {
        Some("quantity")
    } else if number_of_purchases < 0 {
        Some("numberOfPurchases")
    } else {
        None
    }
}

impl NewFood {
    pub fn invalid_field(&self) -> Option<&'static str> {
        invalid_listing_field(self.price, self.quantity, self.number_of_purchases)
    }

    pub fn into_food<T>(self, id: T) -> Food<T> {
        Food {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            number_of_purchases: self.number_of_purchases,
            added_by: Some(self.added_by),
            details: self.details,
        }
    }
}

/// Replacement values for a listing. Applied as a field-wise overwrite, creating
/// the listing when the id does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodUpdate {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub added_by: Option<Contributor>,
    pub details: Details,
}

impl FoodUpdate {
    pub fn invalid_field(&self) -> Option<&'static str> {
        invalid_listing_field(self.price, self.quantity, 0)
    }

    /// Overwrite the fields of `food` with this update. Counters not named in the update are left alone.
    pub fn apply_to<T>(self, food: &mut Food<T>) {
        food.name = self.name;
        food.price = self.price;
        food.quantity = self.quantity;
        if let Some(added_by) = self.added_by {
            food.added_by = Some(added_by);
        }
        food.details.extend(self.details);
    }

    pub fn into_food<T>(self, id: T) -> Food<T> {
        Food {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            number_of_purchases: 0,
            added_by: self.added_by,
            details: self.details,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Purchase<T> {
    pub id: T,
    #[serde(rename = "foodId")]
    pub food_id: T,
    pub quantity: u32,
    pub buyer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub order: Details,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase<T> {
    pub food_id: T,
    pub quantity: u32,
    pub buyer_email: String,
    pub buyer_name: Option<String>,
    pub order: Details,
}

impl<T> NewPurchase<T> {
    pub fn into_purchase(self, id: T) -> Purchase<T> {
        Purchase {
            id,
            food_id: self.food_id,
            quantity: self.quantity,
            buyer_email: self.buyer_email,
            buyer_name: self.buyer_name,
            order: self.order,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Feedback<T> {
    pub id: T,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub content: Details,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub content: Details,
}

impl NewFeedback {
    pub fn new(content: Details) -> Self {
        Self { content }
    }
}
