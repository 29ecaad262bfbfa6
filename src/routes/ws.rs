//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;
use crate::story::StepId;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "tokenwise_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "tokenwise_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = reply_to_text(&txt, &state);
        let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "tokenwise_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "tokenwise_backend", "WebSocket disconnected");
}

/// Parse one text frame and produce the reply; bad input becomes an `error` message.
fn reply_to_text(txt: &str, state: &AppState) -> ServerWsMessage {
  match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "tokenwise_backend", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state).unwrap_or_else(|e| ServerWsMessage::Error { message: e.to_string() })
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
  }
}

#[instrument(level = "info", skip(state))]
fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> Result<ServerWsMessage, ApiError> {
  let reply = match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Accessible { completed } => {
      ServerWsMessage::Accessible { accessible: accessible_goals(state, &completion_state(completed)) }
    }

    ClientWsMessage::Spin { sectors } => ServerWsMessage::Spin { outcome: spin_sectors(sectors)? },

    ClientWsMessage::TokenSpin { path } => ServerWsMessage::TokenSpin(spin_token(state, &path)?),

    ClientWsMessage::StoryNext { step, event } => {
      let step: StepId = step.parse()?;
      ServerWsMessage::Story(story_next(step, event))
    }

    ClientWsMessage::QuizSubmit(submission) => ServerWsMessage::QuizResult(submit_quiz(state, submission)?),
  };
  Ok(reply)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CourseConfig;
  use serde_json::Value;

  fn roundtrip(state: &AppState, txt: &str) -> Value {
    serde_json::to_value(reply_to_text(txt, state)).unwrap()
  }

  #[test]
  fn dispatches_tagged_messages() {
    let state = AppState::from_config(CourseConfig::default()).unwrap();

    assert_eq!(roundtrip(&state, r#"{"type":"ping"}"#)["type"], "pong");

    let spin = roundtrip(&state, r#"{"type":"spin","sectors":[{"label":"a","probability":1}]}"#);
    assert_eq!(spin["type"], "spin");
    assert_eq!(spin["outcome"]["label"], "a");

    let story = roundtrip(&state, r#"{"type":"story_next","step":"7.2","event":"spinner_finished"}"#);
    assert_eq!(story["type"], "story");
    assert_eq!(story["step"], "7.5");

    let quiz = roundtrip(&state, r#"{"type":"quiz_submit","goalId":"ai-text-generation","answers":[0,2,1]}"#);
    assert_eq!(quiz["type"], "quiz_result");
    assert_eq!(quiz["passed"], true);

    let tokens = roundtrip(&state, r#"{"type":"token_spin","path":[]}"#);
    assert_eq!(tokens["type"], "token_spin");
    assert_eq!(tokens["path"].as_array().unwrap().len(), 1);
  }

  #[test]
  fn errors_become_error_messages() {
    let state = AppState::from_config(CourseConfig::default()).unwrap();
    let bad_json = roundtrip(&state, "not json");
    assert_eq!(bad_json["type"], "error");

    let empty = roundtrip(&state, r#"{"type":"spin","sectors":[]}"#);
    assert_eq!(empty["type"], "error");
    assert!(empty["message"].as_str().unwrap().contains("at least one sector"));
  }
}
