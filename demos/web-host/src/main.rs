use axum::{Router, extract::Path, http::StatusCode, routing::get};
use bootwright::prelude::*;
use bootwright::{lifecycle::Discovery, probe};

mod bootstrappers;

use bootstrappers::{Cache, SigningKeys};

async fn lookup(Inject(cache): Inject<Cache>, Path(key): Path<String>) -> ApiResponse<String> {
    match cache.get(&key).await {
        Some(value) => ApiResponse::success(value),
        None => ApiResponse::error(StatusCode::NOT_FOUND, format!("No entry for '{}'", key)),
    }
}

async fn fingerprint(Inject(keys): Inject<SigningKeys>) -> ApiResponse<String> {
    ApiResponse::success(keys.fingerprint())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("🚀 Starting web host...");

    // 1. Configuration and bootstrap options from the environment
    let config = ConfigService::new();
    let options = BootstrapOptions::from_config(&config)?;

    // 2. Run every bootstrapper phase; async hooks keep running in the background
    let (app, tasks) = bootstrap_with(
        AppBuilder::with_config(config.clone()),
        &Discovery::everything(),
        &options,
    )?;

    // 3. Flip readiness once the background hooks have settled
    tokio::spawn(async move {
        if let Err(e) = tasks.drain_with(Readiness::global(), &options).await {
            tracing::error!("Background bootstrapping did not finish: {}", e);
        }
    });

    // 4. Create Router
    let router = Router::new()
        .route("/cache/{key}", get(lookup))
        .route("/keys/fingerprint", get(fingerprint))
        .with_state(app)
        .merge(probe::router(Readiness::global().clone()));

    // 5. Start server with graceful shutdown
    let host = config.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let port = config.get("PORT").unwrap_or_else(|| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("✅ Server running on http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("🛑 Initiating graceful shutdown...");
        })
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
