use axum::Router;

use crate::{Config, Regressor};

mod form;
mod health;
mod predict;

// ---

/// Shared handler state: the process-wide model and the loaded configuration.
pub type AppState = (&'static dyn Regressor, Config);

pub fn router(regressor: &'static dyn Regressor, config: Config) -> Router {
    // ---
    Router::new()
        .merge(form::router())
        .merge(predict::router())
        .merge(health::router())
        .with_state((regressor, config))
}
