use crate::result::PaymentError;
use error_stack::Report;
use serde::Serialize;
use utoipa::ToSchema;

/// An amount in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount(u64);

impl PaymentAmount {
    /// Converts a decimal price into cents, rounding to the nearest cent.
    /// Returns `None` for prices that can't be charged (non-finite, zero or negative).
    pub fn from_price(price: f64) -> Option<Self> {
        if !price.is_finite() {
            return None;
        }
        let cents = (price * 100.0).round();
        if cents < 1.0 || cents > u64::MAX as f64 {
            return None;
        }
        Some(Self(cents as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

pub trait PaymentGateway {
    fn create_intent(
        &self,
        amount: PaymentAmount,
    ) -> impl Future<Output = Result<PaymentIntent, Report<PaymentError>>> + Send;
}
