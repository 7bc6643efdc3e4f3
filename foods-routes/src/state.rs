use crate::metrics;
use crate::service::FoodService;
use auth::{CookiePolicy, TokenService};
use axum::extract::FromRef;
use error_stack::Report;
use foods_core::FoodEngine;
use metrics_exporter_prometheus::{BuildError, PrometheusHandle};

#[derive(Clone)]
pub struct FoodAppState<T: FoodEngine> {
    pub service: FoodService<T>,
    pub tokens: TokenService,
    pub cookie_policy: CookiePolicy,
    pub metrics: Option<PrometheusHandle>,
}

impl<T: FoodEngine> FoodAppState<T> {
    /// Installs the global prometheus recorder, so only one state per process can be built this way.
    pub fn new_with_metrics(
        engine: T,
        tokens: TokenService,
        cookie_policy: CookiePolicy,
    ) -> Result<Self, Report<BuildError>> {
        Ok(Self {
            service: FoodService::new(engine),
            tokens,
            cookie_policy,
            metrics: Some(metrics::setup_recorder()?),
        })
    }

    pub fn new_without_metrics(engine: T, tokens: TokenService, cookie_policy: CookiePolicy) -> Self {
        Self {
            service: FoodService::new(engine),
            tokens,
            cookie_policy,
            metrics: None,
        }
    }
}

impl<T: FoodEngine> FromRef<FoodAppState<T>> for FoodService<T> {
    fn from_ref(input: &FoodAppState<T>) -> Self {
        input.service.clone()
    }
}

impl<T: FoodEngine> FromRef<FoodAppState<T>> for TokenService {
    fn from_ref(input: &FoodAppState<T>) -> Self {
        input.tokens.clone()
    }
}

impl<T: FoodEngine> FromRef<FoodAppState<T>> for CookiePolicy {
    fn from_ref(input: &FoodAppState<T>) -> Self {
        input.cookie_policy
    }
}
