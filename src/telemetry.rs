//! Tracing subscriber setup.
//!
//! Verbosity comes from `RUST_LOG`, or `AXUM_LOG_LEVEL` when that is unset.
//! `AXUM_SPAN_EVENTS` picks span lifecycle events and `FORCE_COLOR`
//! overrides TTY detection for ANSI output.

use std::{env, io::IsTerminal};

use tracing_subscriber::{filter::EnvFilter, fmt::format::FmtSpan};

// ---

/// Install the global subscriber. Call once, before the first log line.
pub fn init_tracing() {
    // ---
    let env_filter = match env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter_directive(env::var("AXUM_LOG_LEVEL").ok().as_deref())),
    };

    let use_color = force_color(env::var("FORCE_COLOR").ok().as_deref())
        .unwrap_or_else(|| std::io::stdout().is_terminal());

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events(env::var("AXUM_SPAN_EVENTS").ok().as_deref()))
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}

/// Level for our crates; hyper's connection chatter stays at `info`.
fn filter_directive(level: Option<&str>) -> String {
    // ---
    let level = match level {
        Some(l @ ("trace" | "debug" | "info" | "warn" | "error")) => l,
        _ => "debug",
    };
    format!("{level},hyper=info")
}

fn span_events(mode: Option<&str>) -> FmtSpan {
    // ---
    match mode {
        Some("full") => FmtSpan::FULL,
        Some("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    }
}

/// `Some` when the variable forces colors on or off, `None` to auto-detect.
fn force_color(value: Option<&str>) -> Option<bool> {
    // ---
    match value {
        Some("1" | "true" | "yes") => Some(true),
        Some("0" | "false" | "no") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_filter_directive() {
        // ---
        assert_eq!(filter_directive(Some("warn")), "warn,hyper=info");
        assert_eq!(filter_directive(Some("verbose")), "debug,hyper=info");
        assert_eq!(filter_directive(None), "debug,hyper=info");
    }

    #[test]
    fn test_span_events() {
        // ---
        assert_eq!(span_events(Some("full")), FmtSpan::FULL);
        assert_eq!(span_events(Some("enter_exit")), FmtSpan::ENTER | FmtSpan::EXIT);
        assert_eq!(span_events(None), FmtSpan::CLOSE);
    }

    #[test]
    fn test_force_color() {
        // ---
        assert_eq!(force_color(Some("yes")), Some(true));
        assert_eq!(force_color(Some("0")), Some(false));
        assert_eq!(force_color(Some("auto")), None);
        assert_eq!(force_color(None), None);
    }
}
