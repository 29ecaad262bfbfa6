//! Domain models: skill tree nodes and certificates, wheel sectors, the token tree,
//! quiz questions and feedback entries.

use serde::{Deserialize, Serialize};

/// One learning goal in the skill tree.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningNode {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub hint: String,
  /// Ids that must be completed first. Order is kept for display.
  #[serde(default)] pub prerequisites: Vec<String>,
  /// False for placeholder goals that have no course content yet.
  #[serde(default)] pub has_content: bool,
}

/// Named bundle of required goals.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub icon: String,
  #[serde(default)] pub color: String,
  pub required_goals: Vec<String>,
}

/// A (label, probability) pair. Order inside a wheel is significant.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WheelSector {
  #[serde(alias = "token")]
  pub label: String,
  pub probability: f64,
}

impl WheelSector {
  pub fn new(label: impl Into<String>, probability: f64) -> Self {
    Self { label: label.into(), probability }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
  Nice,
  PassiveAggressive,
  Neutral,
}

/// A candidate next token; `options` continue the sentence, `final` closes it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenOption {
  pub token: String,
  pub probability: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tone: Option<Tone>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<TokenOption>,
  #[serde(default, rename = "final", skip_serializing_if = "Option::is_none")]
  pub final_text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: usize,
}

/// Category a reviewer attaches to free-text feedback.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackFlag {
  TechnicalError,
  FalseInformation,
  GeneralFeedback,
}

impl FeedbackFlag {
  pub fn label(self) -> &'static str {
    match self {
      FeedbackFlag::TechnicalError => "Technical Error",
      FeedbackFlag::FalseInformation => "False Information",
      FeedbackFlag::GeneralFeedback => "General Feedback",
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
  #[serde(default)] pub id: String,
  pub learning_objective: String,
  pub resource: String,
  /// Story element the feedback points at, e.g. `step-7.2`.
  pub content_id: String,
  pub flag: FeedbackFlag,
  pub text: String,
  #[serde(default)] pub timestamp: String,
  #[serde(default)] pub university: String,
}
