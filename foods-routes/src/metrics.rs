use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use error_stack::{Report, ResultExt};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::time::Instant;

const REQUESTS_TOTAL_METRIC_NAME: &str = "http_requests_total";
const REQUEST_DURATION_METRIC_NAME: &str = "http_requests_duration_seconds";
const REQUEST_SIZE_METRIC_NAME: &str = "http_request_size";

const FOODS_CREATED_METRIC_NAME: &str = "num_foods_created";
const FOODS_UPDATED_METRIC_NAME: &str = "num_foods_updated";
const FOODS_DELETED_METRIC_NAME: &str = "num_foods_deleted";
const PURCHASES_RECORDED_METRIC_NAME: &str = "num_purchases_recorded";
const ITEMS_SOLD_METRIC_NAME: &str = "num_items_sold";
const PURCHASES_REVERSED_METRIC_NAME: &str = "num_purchases_reversed";
const FEEDBACK_RECEIVED_METRIC_NAME: &str = "num_feedback_received";
const TOKENS_ISSUED_METRIC_NAME: &str = "num_tokens_issued";

pub fn setup_recorder() -> Result<PrometheusHandle, Report<BuildError>> {
    const EXPONENTIAL_SECONDS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    const REQ_RES_BUCKETS: &[f64] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_METRIC_NAME.to_string()),
            EXPONENTIAL_SECONDS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_SIZE_METRIC_NAME.to_string()),
            REQ_RES_BUCKETS,
        )?
        .install_recorder()
        .attach("a global metrics recorder can only be installed once")
}

pub async fn track_http(req: Request, next: Next) -> impl IntoResponse {
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };

    if path.ends_with("metrics") {
        return next.run(req).await;
    }

    let method = req.method().clone();

    let req_size = req
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if let Some(req_size) = req_size {
        metrics::histogram!(REQUEST_SIZE_METRIC_NAME).record(req_size as f64);
    }

    let start = Instant::now();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];

    metrics::counter!(REQUESTS_TOTAL_METRIC_NAME, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION_METRIC_NAME, &labels).record(latency);
    response
}

#[inline]
pub fn increment_foods_created() {
    metrics::counter!(FOODS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_foods_updated() {
    metrics::counter!(FOODS_UPDATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_foods_deleted() {
    metrics::counter!(FOODS_DELETED_METRIC_NAME).increment(1);
}

#[inline]
pub fn record_purchase(quantity: u32) {
    metrics::counter!(PURCHASES_RECORDED_METRIC_NAME).increment(1);
    metrics::counter!(ITEMS_SOLD_METRIC_NAME).increment(u64::from(quantity));
}

#[inline]
pub fn increment_purchases_reversed() {
    metrics::counter!(PURCHASES_REVERSED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_feedback_received() {
    metrics::counter!(FEEDBACK_RECEIVED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_tokens_issued() {
    metrics::counter!(TOKENS_ISSUED_METRIC_NAME).increment(1);
}
