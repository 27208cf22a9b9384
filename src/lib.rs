//! Solar AC power prediction service.
//!
//! Collects weather and time inputs, derives cyclic time features, runs a
//! pretrained regressor, and reports the predicted power with a qualitative
//! label. Module layout follows the Explicit Module Boundary Pattern (EMBP):
//! every module is private and reaches its siblings only through the
//! re-exports below.

mod config;
mod features;
mod model;
mod models;
mod pipeline;
pub mod routes;
mod telemetry;

pub use config::{load_from_env, Config};
pub use features::{
    cyclical_encode, encode_time, CyclicFeatures, FeatureVector, FEATURE_COUNT, FEATURE_NAMES,
};
pub use model::{load_once, ModelInfo, OnnxRegressor, Regressor};
pub use models::{postprocess, Month, PowerLevel, Prediction, PredictionRequest};
pub use telemetry::init_tracing;
