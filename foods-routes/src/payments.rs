use error_stack::{Report, ResultExt};
use foods_core::payment::{PaymentAmount, PaymentGateway, PaymentIntent};
use foods_core::result::PaymentError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

const PAYMENT_INTENTS_PATH: &str = "/v1/payment_intents";
const CURRENCY: &str = "usd";

/// Creates card payment intents at a Stripe compatible processor.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    intents_url: Arc<str>,
    secret_key: Arc<str>,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    client_secret: String,
}

impl StripeClient {
    pub fn new(base_url: &str, secret_key: impl Into<Arc<str>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            intents_url: format!("{}{PAYMENT_INTENTS_PATH}", base_url.trim_end_matches('/')).into(),
            secret_key: secret_key.into(),
        }
    }
}

impl PaymentGateway for StripeClient {
    #[instrument(skip(self), fields(amount.cents = amount.cents()))]
    async fn create_intent(&self, amount: PaymentAmount) -> Result<PaymentIntent, Report<PaymentError>> {
        let form = [
            ("amount", amount.cents().to_string()),
            ("currency", CURRENCY.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let intent: StripeIntent = self
            .client
            .post(&*self.intents_url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .change_context(PaymentError)
            .attach_with(|| format!("could not reach {}", self.intents_url))?
            .error_for_status()
            .change_context(PaymentError)?
            .json()
            .await
            .change_context(PaymentError)
            .attach("payment intent response was not understood")?;

        debug!("payment intent created");
        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}
