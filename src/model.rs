//! Pretrained regressor: ONNX artifact loading and inference.
//!
//! The artifact is an ONNX export of the trained network (for a Keras model,
//! `python -m tf2onnx.convert --keras solar_model.h5 --output solar_model.onnx`).
//! It is evaluated with `tract`. The single output is assumed to be
//! `log(1 + AC power in W)`; that is a training-time convention of the
//! artifact and cannot be checked here.
//!
//! The model is loaded once per process into a write-once cell and shared
//! read-only afterwards.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tract_onnx::prelude::*;

use crate::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

// ---

static MODEL: OnceCell<OnnxRegressor> = OnceCell::new();

type Plan = TypedRunnableModel<TypedModel>;

/// Anything that maps a feature vector to a log-space power estimate.
pub trait Regressor: Send + Sync {
    // ---
    /// Return the raw model output (`prediction_log`).
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Static description for the model information endpoint.
    fn info(&self) -> ModelInfo;
}

/// Description of the loaded model, served by `GET /api/model`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    // ---
    pub name: String,
    pub kind: String,
    pub features: Vec<String>,
    pub output: String,
    pub target_transform: String,
}

/// ONNX network compiled into a runnable `tract` plan for a `[1, 7]` f32 input.
pub struct OnnxRegressor {
    name: String,
    plan: Plan,
}

impl OnnxRegressor {
    // ---
    /// Read, optimize, and validate the ONNX artifact at `path`.
    ///
    /// The input is pinned to `[1, 7]` f32, so a model expecting another
    /// width fails here. A dry run on zeros then checks the output holds
    /// exactly one value.
    pub fn load(path: &Path) -> Result<Self> {
        // ---
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .with_context(|| format!("Failed to read model artifact '{}'", path.display()))?;

        let plan = model
            .with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into())
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .with_context(|| {
                format!(
                    "Incompatible model artifact '{}': expected a [1, {}] f32 input",
                    path.display(),
                    FEATURE_COUNT
                )
            })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();
        let regressor = OnnxRegressor { name, plan };

        let width = regressor.run(&[0.0; FEATURE_COUNT])?.len();
        ensure!(
            width == 1,
            "Incompatible model artifact '{}': expected a single output value, found {}",
            path.display(),
            width
        );

        Ok(regressor)
    }

    fn run(&self, input: &[f64]) -> Result<Vec<f32>> {
        // ---
        let values: Vec<f32> = input.iter().map(|&v| v as f32).collect();
        let tensor = Tensor::from_shape(&[1, input.len()], &values)?;

        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let first = outputs.first().context("model produced no outputs")?;

        Ok(first.to_array_view::<f32>()?.iter().copied().collect())
    }
}

impl Regressor for OnnxRegressor {
    // ---
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        // ---
        let out = self.run(features.as_slice())?;
        let value = out.first().copied().context("model produced an empty output")?;
        ensure!(value.is_finite(), "model produced a non-finite output: {}", value);
        Ok(f64::from(value))
    }

    fn info(&self) -> ModelInfo {
        // ---
        ModelInfo {
            name: self.name.clone(),
            kind: "Neural Network (ONNX, tract)".to_string(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            output: "AC Power (Watts)".to_string(),
            target_transform: "log1p".to_string(),
        }
    }
}

/// Load the process-wide model, reading `path` only on the first call.
///
/// Later calls return the cached handle and ignore `path`. A failed load
/// leaves the cell empty.
pub fn load_once(path: &Path) -> Result<&'static OnnxRegressor> {
    init_once(&MODEL, || OnnxRegressor::load(path))
}

/// Run `load` at most once per cell. Concurrent first callers block until
/// the winner finishes and then share its value.
fn init_once<T>(cell: &'static OnceCell<T>, load: impl FnOnce() -> Result<T>) -> Result<&'static T> {
    cell.get_or_try_init(load)
}
