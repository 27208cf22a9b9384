//! JSON prediction API.
//!
//! - `POST /api/predict` – run the pipeline on a JSON request body
//! - `GET  /api/model`   – describe the loaded model

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};

use super::AppState;
use crate::{pipeline, ModelInfo, PredictionRequest};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/predict", post(handler))
        .route("/api/model", get(model_info))
}

/// JSON error body for failed predictions.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn handler(
    State((regressor, _config)): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> impl IntoResponse {
    // ---
    info!("POST /api/predict - {:?}", req);

    match pipeline::run(regressor, req) {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => {
            error!("Prediction failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Prediction failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn model_info(State((regressor, _config)): State<AppState>) -> Json<ModelInfo> {
    Json(regressor.info())
}
