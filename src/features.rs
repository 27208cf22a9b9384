//! Cyclic time features and the fixed-order model input vector.
//!
//! Hour-of-day and month-of-year are periodic: hour 23 sits next to hour 0,
//! December next to January. Encoding each as a `(sin, cos)` pair on the unit
//! circle keeps that adjacency visible to the regressor.

use std::f64::consts::PI;

use serde::Serialize;

use crate::PredictionRequest;

// ---

/// Number of inputs the regressor consumes.
pub const FEATURE_COUNT: usize = 7;

/// Input names in the order the regressor was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "ambient_temperature",
    "module_temperature",
    "irradiation",
    "hour_sin",
    "hour_cos",
    "month_sin",
    "month_cos",
];

/// Sine/cosine encoding of hour and month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CyclicFeatures {
    // ---
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub month_sin: f64,
    pub month_cos: f64,
}

/// Model input, laid out as [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

/// Map `value` onto the unit circle for a cycle of length `period`.
pub fn cyclical_encode(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// Encode hour (period 24) and month (period 12). Total on every integer.
pub fn encode_time(hour: i64, month: i64) -> CyclicFeatures {
    // ---
    let (hour_sin, hour_cos) = cyclical_encode(hour as f64, 24.0);
    let (month_sin, month_cos) = cyclical_encode(month as f64, 12.0);

    CyclicFeatures {
        hour_sin,
        hour_cos,
        month_sin,
        month_cos,
    }
}

impl FeatureVector {
    // ---
    pub fn from_request(req: &PredictionRequest) -> Self {
        // ---
        let c = encode_time(req.hour, i64::from(req.month.number()));

        FeatureVector([
            req.ambient_temperature,
            req.module_temperature,
            req.irradiation,
            c.hour_sin,
            c.hour_cos,
            c.month_sin,
            c.month_cos,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::Month;
    use approx::assert_abs_diff_eq;

    fn distance(a: CyclicFeatures, b: CyclicFeatures) -> f64 {
        ((a.hour_sin - b.hour_sin).powi(2) + (a.hour_cos - b.hour_cos).powi(2)).sqrt()
    }

    #[test]
    fn test_hour_encoding_on_unit_circle() {
        // ---
        for h in 0..24 {
            let c = encode_time(h, 1);
            assert_abs_diff_eq!(c.hour_sin.powi(2) + c.hour_cos.powi(2), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_month_encoding_on_unit_circle() {
        // ---
        for m in 1..=12 {
            let c = encode_time(0, m);
            assert_abs_diff_eq!(c.month_sin.powi(2) + c.month_cos.powi(2), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_midnight_adjacency() {
        // ---
        let late = encode_time(23, 1);
        let midnight = encode_time(0, 1);
        let noon = encode_time(12, 1);

        assert!(distance(late, midnight) < distance(midnight, noon));
        // 23 and 0 are one step (15 degrees) apart on the circle
        assert!(distance(late, midnight) < 0.3);
    }

    #[test]
    fn test_quarter_points() {
        // ---
        let six = encode_time(6, 3);
        assert_abs_diff_eq!(six.hour_sin, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(six.hour_cos, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(six.month_sin, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(six.month_cos, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_total_outside_domain() {
        // ---
        // Full turns land on the same point
        let a = encode_time(-1, 0);
        let b = encode_time(23, 12);
        assert_abs_diff_eq!(a.hour_sin, b.hour_sin, epsilon = 1e-9);
        assert_abs_diff_eq!(a.hour_cos, b.hour_cos, epsilon = 1e-9);
        assert_abs_diff_eq!(a.month_sin, b.month_sin, epsilon = 1e-9);
        assert_abs_diff_eq!(a.month_cos, b.month_cos, epsilon = 1e-9);
    }

    #[test]
    fn test_noon_in_june_vector() {
        // ---
        let req = PredictionRequest {
            ambient_temperature: 25.0,
            module_temperature: 30.0,
            irradiation: 0.5,
            hour: 12,
            month: Month::June,
        };
        let v = FeatureVector::from_request(&req).0;

        assert_eq!(v[0], 25.0);
        assert_eq!(v[1], 30.0);
        assert_eq!(v[2], 0.5);
        assert_abs_diff_eq!(v[3], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v[4], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v[5], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v[6], -1.0, epsilon = 1e-12);
    }
}
