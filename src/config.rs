//! Loading course configuration (curriculum, quiz, token tree) from TOML.
//!
//! Every section is optional; whatever is left out falls back to the built-in seeds.
//! Example:
//!
//! ```toml
//! quiz_pass_score = 2
//!
//! [[nodes]]
//! id = "ai-text-generation"
//! title = "How AI Produces Text"
//! hasContent = true
//!
//! [[certificates]]
//! id = "ai-fundamentals"
//! title = "AI Fundamentals"
//! requiredGoals = ["ai-text-generation"]
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Certificate, LearningNode, QuizQuestion};
use crate::error::ConfigError;
use crate::tokentree::TokenTree;

pub const CONFIG_PATH_ENV: &str = "COURSE_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CourseConfig {
  #[serde(default)] pub nodes: Option<Vec<LearningNode>>,
  #[serde(default)] pub certificates: Option<Vec<Certificate>>,
  #[serde(default)] pub quiz: Option<Vec<QuizQuestion>>,
  #[serde(default)] pub quiz_pass_score: Option<usize>,
  #[serde(default)] pub token_tree: Option<TokenTree>,
}

pub fn parse_course_config(raw: &str, path: &str) -> Result<CourseConfig, ConfigError> {
  toml::from_str(raw).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
}

pub fn load_course_config(path: impl AsRef<Path>) -> Result<CourseConfig, ConfigError> {
  let path = path.as_ref();
  let shown = path.display().to_string();
  let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: shown.clone(), source })?;
  let cfg = parse_course_config(&raw, &shown)?;
  info!(
    target: "tokenwise_backend",
    path = %shown,
    nodes = cfg.nodes.as_ref().map(Vec::len),
    certificates = cfg.certificates.as_ref().map(Vec::len),
    quiz = cfg.quiz.as_ref().map(Vec::len),
    token_tree = cfg.token_tree.is_some(),
    "Loaded course config (TOML)"
  );
  Ok(cfg)
}

/// `Ok(None)` when COURSE_CONFIG_PATH is unset. A set but unreadable or invalid
/// file is an error.
pub fn load_course_config_from_env() -> Result<Option<CourseConfig>, ConfigError> {
  match std::env::var(CONFIG_PATH_ENV) {
    Ok(path) if !path.trim().is_empty() => load_course_config(path.trim()).map(Some),
    _ => Ok(None),
  }
}
