use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foods_core::RecordId;
use foods_core::model::{Feedback, Food, Purchase};
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodResponse<T> {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    food: Food<T>,
}

impl<T> FoodResponse<T> {
    pub fn ok(food: Food<T>) -> Self {
        Self {
            status_code: StatusCode::OK,
            food,
        }
    }

    pub fn created(food: Food<T>) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            food,
        }
    }
}

impl<T: RecordId> IntoResponse for FoodResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

/// The stored purchase record along with the listing's counters after the sale.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse<T> {
    purchase: Purchase<T>,
    food: Food<T>,
}

impl<T> PurchaseResponse<T> {
    pub fn new(purchase: Purchase<T>, food: Food<T>) -> Self {
        Self { purchase, food }
    }
}

impl<T: RecordId> IntoResponse for PurchaseResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse<T> {
    #[serde(flatten)]
    feedback: Feedback<T>,
}

impl<T> FeedbackResponse<T> {
    pub fn created(feedback: Feedback<T>) -> Self {
        Self { feedback }
    }
}

impl<T: RecordId> IntoResponse for FeedbackResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl IntoResponse for SuccessResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodError {
    #[serde(skip)]
    status_code: StatusCode,
    message: Cow<'static, str>,
}

pub type ErrorMessageType = Cow<'static, str>;

impl FoodError {
    pub fn not_found(what: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("the requested {what} does not exist"))
    }

    pub fn unprocessable_entity(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn bad_gateway(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn new(status_code: StatusCode, message: impl Into<ErrorMessageType>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for FoodError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
