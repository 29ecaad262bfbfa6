//! Error taxonomy.
//!
//! Configuration errors (`CurriculumError`, `WheelError` while loading the token tree,
//! `ConfigError`) abort startup. Runtime input errors are mapped to HTTP 4xx by `ApiError`.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;

/// Authoring mistakes in the skill tree / certificate definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurriculumError {
  #[error("duplicate learning node id '{0}'")]
  DuplicateNode(String),

  #[error("duplicate certificate id '{0}'")]
  DuplicateCertificate(String),

  #[error("node '{node}' lists unknown prerequisite '{prerequisite}'")]
  UnknownPrerequisite { node: String, prerequisite: String },

  #[error("certificate '{certificate}' requires unknown goal '{goal}'")]
  UnknownGoal { certificate: String, goal: String },

  #[error("prerequisite cycle through: {}", .0.join(", "))]
  Cycle(Vec<String>),
}

#[derive(Debug, Error, PartialEq)]
pub enum WheelError {
  #[error("a wheel needs at least one sector")]
  Empty,

  #[error("sector '{label}' has invalid probability {probability}")]
  InvalidProbability { label: String, probability: f64 },

  #[error("sector probabilities sum to {0}, expected a positive total")]
  NonPositiveTotal(f64),

  #[error("no decision point at path {0:?}")]
  UnknownPath(Vec<usize>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
  #[error("a quiz needs at least one question")]
  Empty,

  #[error("question {index} marks option {answer} correct but has {options} options")]
  AnswerOutOfRange { index: usize, answer: usize, options: usize },

  #[error("pass score {pass_score} exceeds question count {total}")]
  PassScoreTooHigh { pass_score: usize, total: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurveyError {
  #[error("rating {0} is outside 1..=5")]
  RatingOutOfRange(u8),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid story step '{0}'")]
pub struct StepParseError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
  #[error("feedback text must not be empty")]
  EmptyText,
}

/// Failure while loading the course configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read { path: String, source: std::io::Error },

  #[error("failed to parse {path}: {source}")]
  Parse { path: String, source: toml::de::Error },

  #[error(transparent)]
  Curriculum(#[from] CurriculumError),

  #[error("token tree: {0}")]
  TokenTree(#[from] WheelError),

  #[error("quiz: {0}")]
  Quiz(#[from] QuizError),
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error(transparent)]
  Wheel(#[from] WheelError),

  #[error(transparent)]
  Survey(#[from] SurveyError),

  #[error(transparent)]
  Feedback(#[from] FeedbackError),

  #[error(transparent)]
  Step(#[from] StepParseError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Wheel(WheelError::UnknownPath(_)) => StatusCode::NOT_FOUND,
      _ => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    tracing::warn!(target: "tokenwise_backend", %status, error = %self, "request rejected");
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}
