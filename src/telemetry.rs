//! Tracing subscriber setup.
//!
//! - LOG_LEVEL is an `EnvFilter` directive string, e.g. "debug" or
//!   "info,skilltree=debug,wheel=debug,tower_http=warn".
//! - LOG_FORMAT picks "pretty" (default) or "json".
//!
//! Targets are printed so `skilltree`, `wheel`, `feedback` and `tokenwise_backend`
//! events can be told apart from the per-request spans of tower-http's TraceLayer.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str =
    "info,tokenwise_backend=debug,skilltree=info,wheel=info,feedback=info,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to pretty output.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // json and pretty builders are different types, so init in each arm
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
