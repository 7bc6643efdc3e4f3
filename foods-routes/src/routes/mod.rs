use crate::error::{EndpointError, FoodServiceError};
use crate::metrics;
use crate::routes::requests::{
    CreateFoodRequest, FeedbackRequest, FoodSearch, PaymentIntentRequest, PurchaseRequest,
    UpdateFoodRequest,
};
use crate::routes::responses::{FeedbackResponse, FoodError, FoodResponse, PurchaseResponse, SuccessResponse};
use crate::service::{FoodService, ListingOutcome, PaymentOutcome, PurchaseOutcome};
use crate::state::FoodAppState;
use crate::stream::StreamingResponse;
use auth::claims::IdentityClaim;
use auth::router::ProtectedRouter;
use auth::token::TokenIssueErr;
use auth::{AuthedUser, CookiePolicy, TokenService};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use axum_extra::extract::CookieJar;
use foods_core::FoodEngine;
use foods_core::list_filter::FoodListCriteria;
use foods_core::model::{Feedback, Food, Purchase};
use foods_core::payment::PaymentIntent;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{OpenApi, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod api_doc;
pub mod requests;
pub mod responses;

#[derive(OpenApi)]
#[openapi(paths(
    welcome,
    top_foods,
    create_food,
    foods_added_by,
    upsert_food,
    delete_food,
    list_foods,
    get_food,
    search_foods,
    purchase_food,
    list_purchases,
    delete_purchase,
    create_feedback,
    list_feedback,
    issue_token,
    logout,
    create_payment_intent,
))]
struct ApiDoc;

const ROOT_PATH: &str = "/";
const FOODS_PATH: &str = "/foods";
const FOOD_PATH: &str = "/foods/{key}";
const ALL_FOODS_PATH: &str = "/allFoods";
const ALL_FOOD_PATH: &str = "/allFoods/{id}";
const SEARCH_PATH: &str = "/search";
const PURCHASES_PATH: &str = "/purchases";
const PURCHASE_PATH: &str = "/purchases/{key}";
const FEEDBACK_PATH: &str = "/feedback";
const JWT_PATH: &str = "/jwt";
const LOGOUT_PATH: &str = "/logout";
const PAYMENT_INTENT_PATH: &str = "/create-payment-intent";
const METRICS_PATH: &str = "/metrics";

// `/foods/{key}` and `/purchases/{key}` hold an email for GET and an id otherwise.
// The router needs one parameter name per path, the docs describe each method separately.
const FOODS_BY_EMAIL_DOC_PATH: &str = "/foods/{email}";
const FOOD_BY_ID_DOC_PATH: &str = "/foods/{id}";
const PURCHASES_BY_EMAIL_DOC_PATH: &str = "/purchases/{email}";
const PURCHASE_BY_ID_DOC_PATH: &str = "/purchases/{id}";

const WELCOME_MESSAGE: &str = "food ordering server is running";

pub fn build<T: FoodEngine>(app_state: FoodAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}

fn routes<S, T: FoodEngine>(app_state: FoodAppState<T>) -> OpenApiRouter<S> {
    let main_router = OpenApiRouter::new()
        .route(ROOT_PATH, get(welcome))
        .route(FOODS_PATH, get(top_foods::<T>).post(create_food::<T>))
        .route(
            FOOD_PATH,
            get(foods_added_by::<T>)
                .put(upsert_food::<T>)
                .delete(delete_food::<T>),
        )
        .route(ALL_FOODS_PATH, get(list_foods::<T>))
        .route(ALL_FOOD_PATH, get(get_food::<T>))
        .route(SEARCH_PATH, get(search_foods::<T>))
        .route(PURCHASES_PATH, post(purchase_food::<T>))
        .protected_route(PURCHASE_PATH, get(list_purchases::<T>), app_state.tokens.clone())
        .route(PURCHASE_PATH, delete(delete_purchase::<T>))
        .route(FEEDBACK_PATH, get(list_feedback::<T>).post(create_feedback::<T>))
        .route(JWT_PATH, post(issue_token))
        .route(LOGOUT_PATH, post(logout))
        .route(PAYMENT_INTENT_PATH, post(create_payment_intent::<T>));

    let router = match app_state.metrics.clone() {
        Some(metrics_recorder) => {
            info!("metrics enabled, setting up metrics handler");
            main_router
                .route(METRICS_PATH, get(|| async move { metrics_recorder.render() }))
                .route_layer(middleware::from_fn(metrics::track_http))
        }
        None => {
            info!("metrics not enabled, setting up service unavailable metrics handler");
            main_router.route(
                METRICS_PATH,
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
                    )
                }),
            )
        }
    };

    router.with_state(app_state)
}

#[derive(Debug, ToSchema, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
/// The id of a stored document, a hex string when backed by mongodb.
struct IdType;

type FoodType = Food<IdType>;

#[utoipa::path(
    get,
    path = ROOT_PATH,
    responses((status = OK, description = "The server is up", body = String)),
)]
async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// The most purchased listings, most purchased first.
#[utoipa::path(
    get,
    path = FOODS_PATH,
    responses(
        (status = OK, description = "Up to six listings ordered by number of purchases", body = Vec<FoodType>),
    ),
)]
#[instrument(skip(service), err(Debug))]
async fn top_foods<T>(
    State(service): State<FoodService<T>>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let foods = service.top_foods().await?;
    Ok(StreamingResponse::ok(foods).into_response())
}

#[utoipa::path(
    post,
    path = FOODS_PATH,
    responses(
        (status = CREATED, description = "The listing was added", body = FoodType),
        (status = UNPROCESSABLE_ENTITY, description = "A required listing field was missing, had the wrong type or was negative"),
    ),
    request_body = CreateFoodRequest,
)]
#[instrument(skip_all, err(Debug), fields(req.name = %food.name))]
async fn create_food<T>(
    State(service): State<FoodService<T>>,
    Json(food): Json<CreateFoodRequest>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let res = match service.create(food.into()).await? {
        ListingOutcome::Written(food) => FoodResponse::created(food).into_response(),
        ListingOutcome::Invalid(field) => invalid_listing(field).into_response(),
    };

    Ok(res)
}

#[utoipa::path(
    get,
    path = FOODS_BY_EMAIL_DOC_PATH,
    responses(
        (status = OK, description = "Listings added by the given contributor, possibly none", body = Vec<FoodType>),
    ),
    params(("email" = String, Path, description = "Email of the contributor")),
)]
#[instrument(skip(service), err(Debug))]
async fn foods_added_by<T>(
    State(service): State<FoodService<T>>,
    Path(email): Path<String>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let foods = service.list(FoodListCriteria::added_by(email)).await?;
    Ok(StreamingResponse::ok(foods).into_response())
}

/// Overwrite a listing's fields, creating it under the given id if it does not exist.
#[utoipa::path(
    put,
    path = FOOD_BY_ID_DOC_PATH,
    responses(
        (status = OK, description = "The listing after the update", body = FoodType),
        (status = BAD_REQUEST, description = "The id is malformed"),
        (status = UNPROCESSABLE_ENTITY, description = "price or quantity was negative", body = FoodError),
    ),
    params(("id" = IdType, Path, description = "Id of the listing")),
    request_body = UpdateFoodRequest,
)]
#[instrument(skip(service, food), err(Debug), fields(req.name = %food.name))]
async fn upsert_food<T>(
    State(service): State<FoodService<T>>,
    Path(id): Path<T::Id>,
    Json(food): Json<UpdateFoodRequest>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let res = match service.upsert(id, food.into()).await? {
        ListingOutcome::Written(food) => FoodResponse::ok(food).into_response(),
        ListingOutcome::Invalid(field) => invalid_listing(field).into_response(),
    };

    Ok(res)
}

fn invalid_listing(field: &'static str) -> FoodError {
    FoodError::unprocessable_entity(format!("{field} must be a non-negative number"))
}

#[utoipa::path(
    delete,
    path = FOOD_BY_ID_DOC_PATH,
    responses(
        (status = NO_CONTENT, description = "The listing was deleted"),
        (status = NOT_FOUND, description = "No listing has the given id", body = FoodError),
    ),
    params(("id" = IdType, Path, description = "Id of the listing")),
)]
#[instrument(skip(service), err(Debug))]
async fn delete_food<T>(
    State(service): State<FoodService<T>>,
    Path(id): Path<T::Id>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    match service.delete(id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Ok(FoodError::not_found("food").into_response()),
    }
}

#[utoipa::path(
    get,
    path = ALL_FOODS_PATH,
    responses((status = OK, description = "Every listing", body = Vec<FoodType>)),
)]
#[instrument(skip(service), err(Debug))]
async fn list_foods<T>(
    State(service): State<FoodService<T>>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let foods = service.list(FoodListCriteria::all()).await?;
    Ok(StreamingResponse::ok(foods).into_response())
}

#[utoipa::path(
    get,
    path = ALL_FOOD_PATH,
    responses(
        (status = OK, description = "The listing with the given id", body = FoodType),
        (status = NOT_FOUND, description = "No listing has the given id", body = FoodError),
        (status = BAD_REQUEST, description = "The id is malformed"),
    ),
    params(("id" = IdType, Path, description = "Id of the listing")),
)]
#[instrument(skip(service), err(Debug))]
async fn get_food<T>(
    State(service): State<FoodService<T>>,
    Path(id): Path<T::Id>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let food = service.get(id).await?;

    Ok(food
        .map(|f| FoodResponse::ok(f).into_response())
        .unwrap_or_else(|| FoodError::not_found("food").into_response()))
}

#[utoipa::path(
    get,
    path = SEARCH_PATH,
    responses((status = OK, description = "Listings whose name is exactly the one searched for", body = Vec<FoodType>)),
    params(FoodSearch),
)]
#[instrument(skip(service), err(Debug))]
async fn search_foods<T>(
    State(service): State<FoodService<T>>,
    Query(search): Query<FoodSearch>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let foods = service.list(FoodListCriteria::named(search.food_name)).await?;
    Ok(StreamingResponse::ok(foods).into_response())
}

type PurchaseType = Purchase<IdType>;
type FeedbackType = Feedback<IdType>;

/// Buy `quantity` units of a listing. Stock goes down and the purchase counter goes
/// up in one store update, then the purchase is recorded.
#[utoipa::path(
    post,
    path = PURCHASES_PATH,
    responses(
        (
            status = CREATED,
            description = "The purchase was recorded. Contains the record and the listing's counters after the sale",
            body = PurchaseResponse<IdType>,
            example = json!(api_doc::examples::purchase::created()),
        ),
        (status = NOT_FOUND, description = "No listing has the given foodId, nothing was recorded", body = FoodError),
        (status = UNPROCESSABLE_ENTITY, description = "quantity was missing or less than 1", body = FoodError),
    ),
    request_body(content = PurchaseRequest<IdType>, example = json!(api_doc::examples::purchase::request())),
)]
#[instrument(skip_all, err(Debug), fields(req.food_id = %purchase.food_id, req.quantity = purchase.quantity))]
async fn purchase_food<T>(
    State(service): State<FoodService<T>>,
    Json(purchase): Json<PurchaseRequest<T::Id>>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let res = match service.purchase(purchase.into()).await? {
        PurchaseOutcome::Recorded { purchase, food } => PurchaseResponse::new(purchase, food).into_response(),
        PurchaseOutcome::FoodNotFound => FoodError::not_found("food").into_response(),
        PurchaseOutcome::InvalidQuantity => {
            FoodError::unprocessable_entity("quantity must be at least 1").into_response()
        }
    };

    Ok(res)
}

/// Purchases made by the signed in user. Requires the `token` cookie.
#[utoipa::path(
    get,
    path = PURCHASES_BY_EMAIL_DOC_PATH,
    responses(
        (status = OK, description = "Purchases made by the given buyer, possibly none", body = Vec<PurchaseType>),
        (status = UNAUTHORIZED, description = "The token cookie is missing or invalid"),
        (status = FORBIDDEN, description = "The token belongs to someone other than the given buyer"),
    ),
    params(("email" = String, Path, description = "Email of the buyer")),
)]
#[instrument(skip(service, user), err(Debug), fields(user.email = %user.email()))]
async fn list_purchases<T>(
    State(service): State<FoodService<T>>,
    Extension(user): Extension<AuthedUser>,
    Path(email): Path<String>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    if let Err(e) = user.ensure_is(&email) {
        return Ok(e.into_response());
    }

    let purchases = service.purchases_by_buyer(email).await?;
    Ok(StreamingResponse::ok(purchases).into_response())
}

#[utoipa::path(
    delete,
    path = PURCHASE_BY_ID_DOC_PATH,
    responses(
        (status = NO_CONTENT, description = "The purchase record was deleted"),
        (status = NOT_FOUND, description = "No purchase has the given id", body = FoodError),
    ),
    params(("id" = IdType, Path, description = "Id of the purchase")),
)]
#[instrument(skip(service), err(Debug))]
async fn delete_purchase<T>(
    State(service): State<FoodService<T>>,
    Path(id): Path<T::Id>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    match service.delete_purchase(id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Ok(FoodError::not_found("purchase").into_response()),
    }
}

#[utoipa::path(
    post,
    path = FEEDBACK_PATH,
    responses((status = CREATED, description = "The feedback was stored", body = FeedbackType)),
    request_body = FeedbackRequest,
)]
#[instrument(skip_all, err(Debug))]
async fn create_feedback<T>(
    State(service): State<FoodService<T>>,
    Json(FeedbackRequest(content)): Json<FeedbackRequest>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let feedback = service.create_feedback(content).await?;
    Ok(FeedbackResponse::created(feedback).into_response())
}

#[utoipa::path(
    get,
    path = FEEDBACK_PATH,
    responses((status = OK, description = "All feedback", body = Vec<FeedbackType>)),
)]
#[instrument(skip(service), err(Debug))]
async fn list_feedback<T>(
    State(service): State<FoodService<T>>,
) -> Result<Response, EndpointError<FoodServiceError>>
where
    T: FoodEngine,
{
    let feedback = service.list_feedback().await?;
    Ok(StreamingResponse::ok(feedback).into_response())
}

/// Sign the given identity into a token and set it as an http-only `token` cookie.
#[utoipa::path(
    post,
    path = JWT_PATH,
    responses(
        (status = OK, description = "The token cookie was set", body = SuccessResponse),
        (status = UNPROCESSABLE_ENTITY, description = "email was missing"),
    ),
    request_body = IdentityClaim,
)]
#[instrument(skip_all, err(Debug), fields(req.email = %claim.email))]
async fn issue_token(
    State(tokens): State<TokenService>,
    State(cookie_policy): State<CookiePolicy>,
    jar: CookieJar,
    Json(claim): Json<IdentityClaim>,
) -> Result<(CookieJar, SuccessResponse), EndpointError<TokenIssueErr>> {
    let token = tokens.issue(claim)?;
    metrics::increment_tokens_issued();
    Ok((jar.add(cookie_policy.token_cookie(token)), SuccessResponse::new()))
}

/// Tell the browser to drop the `token` cookie. The token itself stays valid until it expires.
#[utoipa::path(
    post,
    path = LOGOUT_PATH,
    responses((status = OK, description = "A removal cookie was sent", body = SuccessResponse)),
)]
async fn logout(State(cookie_policy): State<CookiePolicy>, jar: CookieJar) -> (CookieJar, SuccessResponse) {
    (jar.add(cookie_policy.removal_cookie()), SuccessResponse::new())
}

#[utoipa::path(
    post,
    path = PAYMENT_INTENT_PATH,
    responses(
        (status = OK, description = "A payment intent was created", body = PaymentIntent),
        (status = UNPROCESSABLE_ENTITY, description = "price was not a positive amount", body = FoodError),
        (status = BAD_GATEWAY, description = "The payment processor could not create the intent", body = FoodError),
    ),
    request_body = PaymentIntentRequest,
)]
#[instrument(skip_all, fields(req.price = req.price))]
async fn create_payment_intent<T>(
    State(service): State<FoodService<T>>,
    Json(req): Json<PaymentIntentRequest>,
) -> Response
where
    T: FoodEngine,
{
    match service.create_payment_intent(req.price).await {
        PaymentOutcome::Created(intent) => Json(intent).into_response(),
        PaymentOutcome::InvalidAmount => {
            FoodError::unprocessable_entity("price must be a positive amount").into_response()
        }
        PaymentOutcome::ProcessorFailed => {
            FoodError::bad_gateway("the payment processor could not create a payment intent").into_response()
        }
    }
}
