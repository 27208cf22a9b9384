//! Request and result models for the prediction pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FeatureVector;

// ---

pub const AMBIENT_TEMPERATURE_RANGE: (f64, f64) = (15.0, 40.0);
pub const MODULE_TEMPERATURE_RANGE: (f64, f64) = (15.0, 70.0);
pub const IRRADIATION_RANGE: (f64, f64) = (0.0, 1.2);
pub const HOUR_RANGE: (i64, i64) = (0, 23);

/// Upper bound of the `low` bucket, in watts.
pub const LOW_POWER_LIMIT_W: f64 = 50.0;

/// Lower bound of the `high` bucket, in watts.
pub const HIGH_POWER_LIMIT_W: f64 = 300.0;

/// Calendar month, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MonthInput", into = "String")]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

/// Wire forms a month may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum MonthInput {
    Number(u32),
    Text(String),
}

impl Month {
    // ---
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(n: u32) -> Option<Month> {
        // ---
        match n {
            1..=12 => Some(Month::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        // ---
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Parse a full name, a three-letter abbreviation, or a month number.
    pub fn parse(s: &str) -> Option<Month> {
        // ---
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return Month::from_number(n);
        }
        let lower = s.to_ascii_lowercase();
        Month::ALL.into_iter().find(|m| {
            let name = m.name().to_ascii_lowercase();
            name == lower || (lower.len() == 3 && name.starts_with(&lower))
        })
    }
}

impl TryFrom<MonthInput> for Month {
    type Error = String;

    fn try_from(input: MonthInput) -> Result<Self, Self::Error> {
        // ---
        match input {
            MonthInput::Number(n) => {
                Month::from_number(n).ok_or_else(|| format!("month out of range 1..=12: {n}"))
            }
            MonthInput::Text(s) => Month::parse(&s).ok_or_else(|| format!("unknown month: {s:?}")),
        }
    }
}

impl From<Month> for String {
    fn from(m: Month) -> String {
        m.name().to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One user interaction's worth of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    // ---
    /// Ambient air temperature, °C.
    pub ambient_temperature: f64,

    /// Panel (module) temperature, °C.
    pub module_temperature: f64,

    /// Normalized solar irradiation.
    pub irradiation: f64,

    /// Hour of day, 0-23. Signed so negative input is clamped, not rejected.
    pub hour: i64,

    pub month: Month,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        // ---
        PredictionRequest {
            ambient_temperature: 25.0,
            module_temperature: 30.0,
            irradiation: 0.5,
            hour: 12,
            month: Month::January,
        }
    }
}

impl PredictionRequest {
    // ---
    /// Bring every field into its input domain.
    ///
    /// Non-finite reals fall back to the field default; everything else is
    /// clamped to the nearest bound. Returns the names of adjusted fields.
    pub fn clamp_to_domain(&mut self) -> Vec<&'static str> {
        // ---
        let defaults = PredictionRequest::default();
        let mut adjusted = Vec::new();

        let mut clamp_real = |name: &'static str, value: &mut f64, default: f64, (lo, hi): (f64, f64)| {
            let fixed = if value.is_finite() { value.clamp(lo, hi) } else { default };
            // NaN compares unequal to everything, so it is always replaced
            if fixed != *value {
                *value = fixed;
                adjusted.push(name);
            }
        };

        clamp_real(
            "ambient_temperature",
            &mut self.ambient_temperature,
            defaults.ambient_temperature,
            AMBIENT_TEMPERATURE_RANGE,
        );
        clamp_real(
            "module_temperature",
            &mut self.module_temperature,
            defaults.module_temperature,
            MODULE_TEMPERATURE_RANGE,
        );
        clamp_real(
            "irradiation",
            &mut self.irradiation,
            defaults.irradiation,
            IRRADIATION_RANGE,
        );

        let hour = self.hour.clamp(HOUR_RANGE.0, HOUR_RANGE.1);
        if hour != self.hour {
            self.hour = hour;
            adjusted.push("hour");
        }

        adjusted
    }

    /// `"HH:00 in <Month>"`
    pub fn time_summary(&self) -> String {
        format!("{:02}:00 in {}", self.hour, self.month)
    }
}

/// Qualitative power bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerLevel {
    Low,
    Moderate,
    High,
}

impl PowerLevel {
    // ---
    pub fn classify(prediction_w: f64) -> PowerLevel {
        // ---
        if prediction_w < LOW_POWER_LIMIT_W {
            PowerLevel::Low
        } else if prediction_w < HIGH_POWER_LIMIT_W {
            PowerLevel::Moderate
        } else {
            PowerLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        // ---
        match self {
            PowerLevel::Low => "low",
            PowerLevel::Moderate => "moderate",
            PowerLevel::High => "high",
        }
    }

    pub fn commentary(self) -> &'static str {
        // ---
        match self {
            PowerLevel::Low => "Low power output - likely nighttime or poor weather conditions",
            PowerLevel::Moderate => "Moderate power output - partial sunlight conditions",
            PowerLevel::High => "High power output - excellent solar conditions!",
        }
    }
}

/// Invert the `log(1 + y)` target transform and clamp at zero.
///
/// `f64::max` discards NaN, so a NaN model output also maps to 0.
pub fn postprocess(prediction_log: f64) -> f64 {
    prediction_log.exp_m1().max(0.0)
}

/// Outcome of one prediction, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    // ---
    pub request_id: Uuid,
    pub predicted_at: DateTime<Utc>,

    /// Predicted AC power, W.
    pub prediction_w: f64,

    /// Raw model output before the inverse transform.
    pub prediction_log: f64,

    pub level: PowerLevel,
    pub commentary: &'static str,
    pub features: FeatureVector,
    pub inputs: PredictionRequest,
    pub summary: String,
}

impl Prediction {
    // ---
    pub fn new(
        request_id: Uuid,
        inputs: PredictionRequest,
        features: FeatureVector,
        prediction_log: f64,
    ) -> Self {
        // ---
        let prediction_w = postprocess(prediction_log);
        let level = PowerLevel::classify(prediction_w);

        Prediction {
            request_id,
            predicted_at: Utc::now(),
            prediction_w,
            prediction_log,
            level,
            commentary: level.commentary(),
            features,
            summary: inputs.time_summary(),
            inputs,
        }
    }
}
