use app::{AppError, AppProperties, AppResult};
use auth::TokenService;
use axum::Router;
use config::AppConfig;
use dotenv::dotenv;
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use foods_routes::payments::StripeClient;
use foods_routes::state::FoodAppState;
use repositories::mongodb::{ConnectionDetails, DocumentId, MongoStore, feedback, foods, purchases};
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod app;
mod config;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("food service shut down"),
        Err(e) => {
            error!("food service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("FOODS_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    // loaded before logging so FOODS_LOG can come from the .env file
    let dotenv_result = dotenv();
    init_logging();

    if let Err(e) = dotenv_result {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;

    debug!("initializing mongodb store");
    let store = MongoStore::init(ConnectionDetails::Url(config.database_url.clone()), &config.db_name)
        .await
        .change_context(AppError)?;

    let served = serve(store.clone(), config).await;
    store.shutdown().await;
    served
}

async fn serve(store: MongoStore, config: AppConfig) -> AppResult<()> {
    let routes = build_routes(store, &config)?;

    app::run(
        routes,
        AppProperties {
            port: config.port,
            allowed_origins: config.allowed_origins,
        },
    )
    .await
}

fn build_routes(store: MongoStore, config: &AppConfig) -> AppResult<Router> {
    let engine = FoodEngine {
        store,
        payments: StripeClient::new(&config.payment.api_url, config.payment.secret_key.as_str()),
    };
    let tokens = TokenService::new(&config.auth.token_secret);
    let cookie_policy = config.auth.cookie_policy;

    debug!("building routes..");
    let state = if config.metrics_enabled {
        FoodAppState::new_with_metrics(engine, tokens, cookie_policy).change_context(AppError)?
    } else {
        FoodAppState::new_without_metrics(engine, tokens, cookie_policy)
    };

    Ok(foods_routes::routes::build(state)).inspect(|_| debug!("routes built"))
}

#[derive(Debug, Clone)]
struct FoodEngine {
    store: MongoStore,
    payments: StripeClient,
}

impl foods_core::FoodEngine for FoodEngine {
    type Id = DocumentId;
    type Foods = foods::FoodRepo;
    type Purchases = purchases::PurchaseRepo;
    type Feedback = feedback::FeedbackRepo;
    type Payments = StripeClient;

    fn foods(&self) -> Self::Foods {
        self.store.foods()
    }

    fn purchases(&self) -> Self::Purchases {
        self.store.purchases()
    }

    fn feedback(&self) -> Self::Feedback {
        self.store.feedback()
    }

    fn payments(&self) -> Self::Payments {
        self.payments.clone()
    }
}
