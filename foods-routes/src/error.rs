use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use std::error::Error;
use tracing::error;

#[derive(Debug, thiserror::Error)]
#[error("failed to handle food request")]
pub struct FoodServiceError;

/// Any failure an endpoint cannot recover from. The full report is logged, the
/// client only sees a 500.
#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error>(Report<T>);

impl<T: Error> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

impl<T: Error> IntoResponse for EndpointError<T> {
    fn into_response(self) -> Response {
        error!("{:?}", self.0);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
