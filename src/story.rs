//! Story step machine.
//!
//! The dialogue is a sequence of numbered steps (`3.1`, `7.2`, ...). Plain dialogue
//! steps advance on `Continue`; the survey, the spinner and the quiz each wait for
//! their own completion event. Transitions are a pure table lookup.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::StepParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId {
  pub major: u8,
  pub minor: u8,
}

impl StepId {
  pub const fn new(major: u8, minor: u8) -> Self {
    Self { major, minor }
  }

  /// Id of the page element rendering this step, e.g. `step-7.2`.
  pub fn element_id(self) -> String {
    format!("step-{self}")
  }
}

pub const INTRO: StepId = StepId::new(1, 0);
pub const TRUST_SURVEY: StepId = StepId::new(3, 2);
pub const REFLECTION: StepId = StepId::new(4, 0);
pub const SPINNER: StepId = StepId::new(7, 2);
pub const AFTER_SPINNER: StepId = StepId::new(7, 5);
pub const FINAL_QUIZ: StepId = StepId::new(9, 0);
pub const FINISHED: StepId = StepId::new(10, 0);

impl fmt::Display for StepId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.minor == 0 {
      write!(f, "{}", self.major)
    } else {
      write!(f, "{}.{}", self.major, self.minor)
    }
  }
}

impl FromStr for StepId {
  type Err = StepParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bad = || StepParseError(s.to_string());
    let raw = s.trim();
    let raw = raw.strip_prefix("step-").unwrap_or(raw);
    let (major, minor) = match raw.split_once('.') {
      Some((major, minor)) => (major, minor),
      None => (raw, "0"),
    };
    let major: u8 = major.parse().map_err(|_| bad())?;
    let minor: u8 = minor.parse().map_err(|_| bad())?;
    if minor > 9 {
      return Err(bad());
    }
    Ok(StepId::new(major, minor))
  }
}

impl TryFrom<String> for StepId {
  type Error = StepParseError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

impl From<StepId> for String {
  fn from(step: StepId) -> Self {
    step.to_string()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryEvent {
  Continue,
  SurveySubmitted,
  SpinnerFinished,
  QuizCompleted,
  SkipToEnd,
}

const CONTINUE_TABLE: &[(StepId, StepId)] = &[
  (StepId::new(1, 0), StepId::new(2, 0)),
  (StepId::new(2, 0), StepId::new(3, 0)),
  (StepId::new(3, 0), StepId::new(3, 1)),
  (StepId::new(3, 1), TRUST_SURVEY),
  (REFLECTION, StepId::new(4, 1)),
  (StepId::new(4, 1), StepId::new(5, 0)),
  (StepId::new(5, 0), StepId::new(5, 1)),
  (StepId::new(5, 1), StepId::new(6, 0)),
  (StepId::new(6, 0), StepId::new(6, 1)),
  (StepId::new(6, 1), StepId::new(7, 0)),
  (StepId::new(7, 0), StepId::new(7, 1)),
  (StepId::new(7, 1), SPINNER),
  (AFTER_SPINNER, StepId::new(8, 0)),
  (StepId::new(8, 0), StepId::new(8, 1)),
  (StepId::new(8, 1), StepId::new(8, 2)),
  (StepId::new(8, 2), FINAL_QUIZ),
];

/// Steps that only move on their widget's completion event.
const WAITING_STEPS: [StepId; 3] = [TRUST_SURVEY, SPINNER, FINAL_QUIZ];

/// Where a learner starts: the intro, or straight at the quiz in challenge mode.
pub fn entry_step(challenge_mode: bool) -> StepId {
  if challenge_mode { FINAL_QUIZ } else { INTRO }
}

/// Next step, or `None` when the event does not apply to `step`.
pub fn transition(step: StepId, event: StoryEvent) -> Option<StepId> {
  if step >= FINISHED {
    return None;
  }
  match (step, event) {
    (_, StoryEvent::SkipToEnd) => Some(FINISHED),
    (TRUST_SURVEY, StoryEvent::SurveySubmitted) => Some(REFLECTION),
    (SPINNER, StoryEvent::SpinnerFinished) => Some(AFTER_SPINNER),
    (FINAL_QUIZ, StoryEvent::QuizCompleted) => Some(FINISHED),
    (step, StoryEvent::Continue) if !WAITING_STEPS.contains(&step) => Some(
      CONTINUE_TABLE
        .iter()
        .find(|(from, _)| *from == step)
        .map(|(_, to)| *to)
        .unwrap_or_else(|| advance_minor(step)),
    ),
    _ => None,
  }
}

fn advance_minor(step: StepId) -> StepId {
  if step.minor >= 9 {
    StepId::new(step.major + 1, 0)
  } else {
    StepId::new(step.major, step.minor + 1)
  }
}
