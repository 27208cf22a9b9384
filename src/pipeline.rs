//! One prediction, end to end: clamp → encode → infer → postprocess.

use anyhow::{ensure, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{FeatureVector, Prediction, PredictionRequest, Regressor};

// ---

/// Run the full pipeline for a single request.
///
/// Inputs outside their domain are clamped first. Fails when the regressor
/// errors or when its output overflows the inverse transform.
pub fn run(regressor: &dyn Regressor, mut req: PredictionRequest) -> Result<Prediction> {
    // ---
    let request_id = Uuid::new_v4();

    let adjusted = req.clamp_to_domain();
    if !adjusted.is_empty() {
        warn!(%request_id, ?adjusted, "Inputs outside their domain were clamped");
    }

    let features = FeatureVector::from_request(&req);
    debug!(%request_id, ?features, "Encoded features");

    let prediction_log = regressor.predict(&features)?;
    let prediction = Prediction::new(request_id, req, features, prediction_log);
    ensure!(
        prediction.prediction_w.is_finite(),
        "model output {} overflows the inverse log transform",
        prediction_log
    );

    info!(
        %request_id,
        prediction_log,
        prediction_w = prediction.prediction_w,
        level = prediction.level.label(),
        "Prediction complete"
    );

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{ModelInfo, Month, PowerLevel};
    use anyhow::bail;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    /// Returns a fixed log value and remembers what it was asked.
    struct Recording {
        output: f64,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl Recording {
        fn new(output: f64) -> Self {
            Recording {
                output,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Regressor for Recording {
        fn predict(&self, features: &FeatureVector) -> Result<f64> {
            self.seen.lock().unwrap().push(*features);
            Ok(self.output)
        }

        fn info(&self) -> ModelInfo {
            unimplemented!()
        }
    }

    struct Broken;

    impl Regressor for Broken {
        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            bail!("weights unavailable")
        }

        fn info(&self) -> ModelInfo {
            unimplemented!()
        }
    }

    #[test]
    fn test_noon_in_june() -> Result<()> {
        // ---
        let model = Recording::new(101f64.ln());
        let req = PredictionRequest {
            ambient_temperature: 25.0,
            module_temperature: 30.0,
            irradiation: 0.5,
            hour: 12,
            month: Month::June,
        };
        let p = run(&model, req)?;

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let v = seen[0].0;
        assert_eq!(&v[..3], &[25.0, 30.0, 0.5]);
        assert_relative_eq!(v[4], -1.0, epsilon = 1e-12);
        assert_relative_eq!(v[6], -1.0, epsilon = 1e-12);

        assert_relative_eq!(p.prediction_w, 100.0, epsilon = 1e-9);
        assert_eq!(p.level, PowerLevel::Moderate);
        assert_eq!(p.summary, "12:00 in June");
        Ok(())
    }

    #[test]
    fn test_out_of_domain_inputs_clamped_before_encoding() -> Result<()> {
        // ---
        let model = Recording::new(-5.0);
        let req = PredictionRequest {
            irradiation: 3.0,
            hour: 99,
            ..PredictionRequest::default()
        };
        let p = run(&model, req)?;

        assert_eq!(model.seen.lock().unwrap()[0].0[2], 1.2);
        assert_eq!(p.inputs.hour, 23);
        assert_eq!(p.prediction_w, 0.0);
        assert_eq!(p.level, PowerLevel::Low);
        Ok(())
    }

    #[test]
    fn test_overflowing_output_rejected() {
        // ---
        let err = run(&Recording::new(800.0), PredictionRequest::default()).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");

        // Just under the f64 exp limit still yields a finite value
        assert!(run(&Recording::new(709.0), PredictionRequest::default()).is_ok());
    }

    #[test]
    fn test_regressor_error_propagates() {
        // ---
        let err = run(&Broken, PredictionRequest::default()).unwrap_err();
        assert!(err.to_string().contains("weights unavailable"));
    }
}
