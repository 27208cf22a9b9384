//! Entry point: config, tracing, model load, then serve the routes gateway.
//!
//! A missing or incompatible model artifact aborts startup before the
//! listener binds.
use anyhow::{Context, Result};
use dotenvy::dotenv;

use solar_power_predict::{init_tracing, load_from_env, load_once, routes, Regressor};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = load_from_env()?;
    cfg.log_config();

    let model = load_once(&cfg.model_path)?;
    tracing::info!("Model '{}' ready", model.info().name);

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}:{}", cfg.bind_host, cfg.port))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, routes::router(model, cfg)).await?;

    Ok(())
}
