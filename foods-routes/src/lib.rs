use crate::error::FoodServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<FoodServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<FoodServiceError>>;

pub mod error;
mod metrics;
pub mod payments;
pub mod routes;
pub mod service;
pub mod state;
mod stream;
