//! Interactive HTML form.
//!
//! - `GET  /`        – empty form with default inputs
//! - `POST /predict` – run the pipeline and re-render the form with the result

use std::fmt::Write;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, info};

use super::AppState;
use crate::{
    models::{AMBIENT_TEMPERATURE_RANGE, HOUR_RANGE, IRRADIATION_RANGE, MODULE_TEMPERATURE_RANGE},
    pipeline, ModelInfo, Month, Prediction, PredictionRequest,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/", get(index))
        .route("/predict", post(submit))
}

async fn index(State((regressor, _config)): State<AppState>) -> Html<String> {
    // ---
    Html(render_page(
        &PredictionRequest::default(),
        None,
        &regressor.info(),
    ))
}

async fn submit(
    State((regressor, _config)): State<AppState>,
    Form(req): Form<PredictionRequest>,
) -> impl IntoResponse {
    // ---
    info!("POST /predict - {:?}", req);
    let info = regressor.info();

    match pipeline::run(regressor, req.clone()) {
        Ok(prediction) => {
            let page = render_page(&prediction.inputs, Some(Ok(&prediction)), &info);
            (StatusCode::OK, Html(page))
        }
        Err(e) => {
            error!("Prediction failed: {:#}", e);
            let page = render_page(&req, Some(Err("Prediction failed")), &info);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page))
        }
    }
}

// ---

/// Render the whole page: form, optional outcome panel, and model sidebar.
fn render_page(
    req: &PredictionRequest,
    outcome: Option<Result<&Prediction, &str>>,
    info: &ModelInfo,
) -> String {
    // ---
    let mut month_options = String::new();
    for m in Month::ALL {
        let selected = if m == req.month { " selected" } else { "" };
        let _ = write!(month_options, r#"<option value="{m}"{selected}>{m}</option>"#);
    }

    let result = match outcome {
        None => String::new(),
        Some(Ok(p)) => render_result(p),
        Some(Err(msg)) => format!(r#"<div class="error">{}</div>"#, escape(msg)),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Solar Power Prediction System</title>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
aside {{ width: 16rem; padding: 1rem; background: #f4f4f6; min-height: 100vh; }}
main {{ flex: 1; padding: 1rem 2rem; }}
.columns {{ display: flex; gap: 2rem; }}
fieldset {{ flex: 1; }}
label {{ display: block; margin: 0.5rem 0; }}
.success {{ background: #e6f4ea; padding: 0.75rem; }}
.info {{ background: #e8f0fe; padding: 0.75rem; margin-top: 0.5rem; }}
.error {{ background: #fce8e6; padding: 0.75rem; }}
</style>
</head>
<body>
<aside>
<h2>Model Information</h2>
<ul>
<li><b>Name</b>: {name}</li>
<li><b>Type</b>: {kind}</li>
<li><b>Features</b>: Weather + Time ({feature_count})</li>
<li><b>Output</b>: {output}</li>
</ul>
</aside>
<main>
<h1>Solar Power Prediction System</h1>
<p>Predict AC power output based on weather and time conditions</p>
<form method="post" action="/predict">
<div class="columns">
<fieldset>
<legend>Weather Conditions</legend>
<label>Ambient Temperature (°C)
<input type="number" name="ambient_temperature" min="{amb_lo}" max="{amb_hi}" step="1" value="{amb}"></label>
<label>Module Temperature (°C)
<input type="number" name="module_temperature" min="{mod_lo}" max="{mod_hi}" step="1" value="{module}"></label>
<label>Solar Irradiation
<input type="number" name="irradiation" min="{irr_lo}" max="{irr_hi}" step="0.01" value="{irr}"></label>
</fieldset>
<fieldset>
<legend>Time Settings</legend>
<label>Hour of Day
<input type="number" name="hour" min="{hour_lo}" max="{hour_hi}" step="1" value="{hour}"></label>
<label>Month
<select name="month">{month_options}</select></label>
</fieldset>
</div>
<p><button type="submit">Predict Solar Power</button></p>
</form>
{result}
<hr>
<footer>Built with axum &amp; tract</footer>
</main>
</body>
</html>
"#,
        name = escape(&info.name),
        kind = escape(&info.kind),
        feature_count = info.features.len(),
        output = escape(&info.output),
        amb_lo = AMBIENT_TEMPERATURE_RANGE.0,
        amb_hi = AMBIENT_TEMPERATURE_RANGE.1,
        amb = req.ambient_temperature,
        mod_lo = MODULE_TEMPERATURE_RANGE.0,
        mod_hi = MODULE_TEMPERATURE_RANGE.1,
        module = req.module_temperature,
        irr_lo = IRRADIATION_RANGE.0,
        irr_hi = IRRADIATION_RANGE.1,
        irr = req.irradiation,
        hour_lo = HOUR_RANGE.0,
        hour_hi = HOUR_RANGE.1,
        hour = req.hour,
    )
}

/// Result panel: headline value, commentary, and the input echo.
fn render_result(p: &Prediction) -> String {
    // ---
    format!(
        r#"<div class="success">Predicted AC Power: <b>{power:.2} W</b></div>
<div class="info level-{level}">{commentary}</div>
<details open>
<summary>Input Summary</summary>
<ul>
<li>Ambient Temperature: {amb}°C</li>
<li>Module Temperature: {module}°C</li>
<li>Solar Irradiation: {irr}</li>
<li>Time: {time}</li>
</ul>
</details>"#,
        power = p.prediction_w,
        level = p.level.label(),
        commentary = p.commentary,
        amb = p.inputs.ambient_temperature,
        module = p.inputs.module_temperature,
        irr = p.inputs.irradiation,
        time = p.summary,
    )
}

/// Minimal HTML text escaping for values that did not originate here.
fn escape(s: &str) -> String {
    // ---
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
