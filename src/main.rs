//! Subgate service - HTTP API for authentication and subscription billing.
//!
//! This is the main entry point for the subgate service.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subgate::adapters::auth::{Argon2Config, Argon2PasswordHasher};
use subgate::adapters::http::middleware::auth_middleware;
use subgate::adapters::http::{
    auth_routes, profile_routes, subscription_router, AuthAppState, ProfileAppState,
    SubscriptionAppState,
};
use subgate::adapters::postgres::{
    PostgresRevokedTokenRepository, PostgresSubscriptionRepository, PostgresUserRepository,
};
use subgate::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use subgate::application::{PaymentWebhookProcessor, TokenService};
use subgate::config::AppConfig;
use subgate::ports::{
    PasswordHasher, PaymentProvider, RevokedTokenRepository, SubscriptionRepository,
    UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration errors are fatal; nothing useful can start without them
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = %config.payment.is_test_mode(),
        "Starting subgate"
    );

    // Database pool
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Wire adapters to ports
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let revoked: Arc<dyn RevokedTokenRepository> =
        Arc::new(PostgresRevokedTokenRepository::new(pool.clone()));
    let subscriptions: Arc<dyn SubscriptionRepository> =
        Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new(Argon2Config::default()));
    let payment_provider: Arc<dyn PaymentProvider> = Arc::new(StripePaymentAdapter::new(
        StripeConfig::from_payment_config(&config.payment),
    ));

    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.access_ttl_secs,
        config.auth.refresh_ttl_secs,
        users.clone(),
        revoked.clone(),
    ));

    let webhook_processor = Arc::new(PaymentWebhookProcessor::new(
        &config.payment.stripe_webhook_secret,
        subscriptions.clone(),
    ));

    // A revocation entry matters only while its token's exp would still
    // accept it; sweep entries older than the access TTL every hour.
    let sweep_repo = revoked.clone();
    let sweep_horizon = chrono::Duration::seconds(config.auth.access_ttl_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let cutoff = chrono::Utc::now() - sweep_horizon;
            match sweep_repo.delete_revoked_before(cutoff).await {
                Ok(0) => {}
                Ok(swept) => tracing::info!(swept, "Pruned expired revocation entries"),
                Err(e) => tracing::warn!("Revocation sweep failed: {}", e),
            }
        }
    });

    let auth_state = AuthAppState {
        users: users.clone(),
        hasher,
        tokens: tokens.clone(),
    };

    let profile_state = ProfileAppState { users };

    let subscription_state = SubscriptionAppState {
        subscriptions,
        payment_provider,
        webhook_processor,
    };

    // CORS: explicit origins in production, permissive otherwise
    let cors = match &config.server.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    let api = Router::new()
        .nest("/auth", auth_routes().with_state(auth_state))
        .nest("/profile", profile_routes().with_state(profile_state))
        .merge(subscription_router().with_state(subscription_state));

    let app = Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            tokens.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
