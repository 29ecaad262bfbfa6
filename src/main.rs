//! Tokenwise · course backend
//!
//! - Axum HTTP + WebSocket API for the skill tree, sector wheels, the token
//!   narrative, the story steps, the final quiz, the trust survey and feedback
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   COURSE_CONFIG_PATH : path to TOML course config (nodes, certificates, quiz, token tree)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod skilltree;
mod wheel;
mod tokentree;
mod story;
mod quiz;
mod survey;
mod feedback;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

const DEFAULT_PORT: u16 = 3000;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Course content is validated here; a broken config never serves traffic.
  let state = match AppState::from_env() {
    Ok(state) => Arc::new(state),
    Err(e) => {
      error!(target: "tokenwise_backend", error = %e, "Invalid course configuration");
      return Err(e.into());
    }
  };

  let app = build_router(state);

  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(DEFAULT_PORT);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "tokenwise_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "tokenwise_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "tokenwise_backend", error = %e, "Failed to listen for ctrl-c");
  }
}
