//! Configuration loader for the `solar-power-predict` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller), so `env::var` calls stay out of the rest of the
//! codebase.
use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};

/// Parse an optional `u16` environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Path of the pretrained model artifact (ONNX).
    pub model_path: PathBuf,

    /// Interface to bind the HTTP listener on: an IP literal or a hostname.
    pub bind_host: String,

    /// TCP port for the HTTP listener.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Config {
            model_path: PathBuf::from("solar_model.onnx"),
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `MODEL_PATH` – model artifact path (default: `solar_model.onnx`)
/// - `BIND_HOST` – listen interface (default: `0.0.0.0`)
/// - `PORT` – listen port (default: 8080)
///
/// Returns an error if `PORT` is present but not a valid port number.
/// `BIND_HOST` is resolved when the listener binds.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let model_path = PathBuf::from(env_or!("MODEL_PATH", defaults.model_path.display()));
    let bind_host = env_or!("BIND_HOST", defaults.bind_host);
    let port = parse_env_u16!("PORT", defaults.port);

    Ok(Config {
        model_path,
        bind_host,
        port,
    })
}

impl Config {
    // ---
    /// Listen target for `TcpListener::bind`, which also resolves hostnames.
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.bind_host.as_str(), self.port)
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  MODEL_PATH : {}", self.model_path.display());
        tracing::info!("  BIND_HOST  : {}", self.bind_host);
        tracing::info!("  PORT       : {}", self.port);
    }
}
