// SPDX-License-Identifier: MIT

//! Clutch API Server
//!
//! Campus marketplace backend: students authenticate with one-time email
//! codes, then post, browse and save listings.

use clutch_api::{
    config::Config,
    db::{redis::RedisEngine, Db},
    services::Mailer,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Clutch API");

    // Connect the durable engine when configured; otherwise run on the
    // in-process store alone.
    let db = match &config.redis_url {
        Some(url) => match RedisEngine::connect(url).await {
            Ok(engine) => Db::new(engine),
            Err(e) => {
                tracing::error!(error = %e, "Redis unavailable, using in-process store");
                Db::in_memory()
            }
        },
        None => {
            tracing::warn!("REDIS_URL not set, using in-process store");
            Db::in_memory()
        }
    };

    // Select the email capability once at startup
    let mailer = Mailer::from_config(&config);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        mailer,
    });

    // Build router
    let app = clutch_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clutch_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
