//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Everything here is synchronous and works on the read-only course content in
//! `AppState`; randomness comes from `thread_rng` and never crosses an await.

use rand::thread_rng;
use tracing::{debug, info, instrument};

use crate::error::{ApiError, WheelError};
use crate::domain::WheelSector;
use crate::protocol::{
  CertificateOut, QuizSubmitIn, QuizSubmitOut, StoryOut, TokenSpinOut, TokenTextOut,
};
use crate::quiz::completion_after;
use crate::skilltree::CompletionState;
use crate::state::AppState;
use crate::story::{transition, StepId, StoryEvent, FINISHED};
use crate::wheel::{SectorArc, SpinOutcome, Wheel};

pub fn completion_state(ids: impl IntoIterator<Item = String>) -> CompletionState {
  ids.into_iter().collect()
}

#[instrument(level = "info", skip(state, completed), fields(completed = completed.len()))]
pub fn accessible_goals(state: &AppState, completed: &CompletionState) -> Vec<String> {
  let accessible: Vec<String> = state.skill_tree.accessible(completed).into_iter().collect();
  debug!(target: "skilltree", accessible = accessible.len(), "accessible goals computed");
  accessible
}

#[instrument(level = "info", skip(state, completed))]
pub fn certificate_report(
  state: &AppState,
  certificate_id: &str,
  completed: &CompletionState,
) -> Result<CertificateOut, ApiError> {
  let tree = &state.skill_tree;
  let unknown = || ApiError::NotFound(format!("Unknown certificate: {certificate_id}"));
  let certificate = tree.certificate(certificate_id).ok_or_else(unknown)?.clone();
  let path = tree.certificate_path(certificate_id).ok_or_else(unknown)?;
  let end_goals = tree.certificate_end_goals(certificate_id).ok_or_else(unknown)?;
  let progress = tree.certificate_progress(certificate_id, completed).ok_or_else(unknown)?;
  Ok(CertificateOut {
    earned: tree.is_certificate_earned(certificate_id, completed),
    certificate,
    path: path.into_iter().collect(),
    end_goals: end_goals.into_iter().collect(),
    progress,
  })
}

#[instrument(level = "info", skip(sectors), fields(sectors = sectors.len()))]
pub fn wheel_layout(sectors: Vec<WheelSector>) -> Result<Vec<SectorArc>, WheelError> {
  let arcs = Wheel::new(sectors)?.layout();
  let narrowest = arcs.iter().map(SectorArc::span).fold(f64::INFINITY, f64::min);
  debug!(target: "wheel", arcs = arcs.len(), narrowest, "wheel layout");
  Ok(arcs)
}

#[instrument(level = "info", skip(sectors), fields(sectors = sectors.len()))]
pub fn spin_sectors(sectors: Vec<WheelSector>) -> Result<SpinOutcome, WheelError> {
  let wheel = Wheel::new(sectors)?;
  let outcome = wheel.spin(&mut thread_rng());
  info!(target: "wheel", index = outcome.index, label = %outcome.label, "spin");
  Ok(outcome)
}

#[instrument(level = "info", skip(state), fields(depth = path.len()))]
pub fn spin_token(state: &AppState, path: &[usize]) -> Result<TokenSpinOut, WheelError> {
  let tree = &state.token_tree;
  let outcome = tree.spin_at(path, &mut thread_rng())?;
  let mut next = path.to_vec();
  next.push(outcome.index);
  info!(target: "wheel", token = %outcome.label, path = ?next, "token chosen");
  Ok(TokenSpinOut {
    text: tree.generated_text(&next)?,
    complete: tree.is_complete(&next),
    outcome,
    path: next,
  })
}

pub fn token_text(state: &AppState, path: &[usize]) -> Result<TokenTextOut, WheelError> {
  let tree = &state.token_tree;
  Ok(TokenTextOut { text: tree.generated_text(path)?, complete: tree.is_complete(path) })
}

#[instrument(level = "info")]
pub fn story_next(step: StepId, event: StoryEvent) -> StoryOut {
  let next = transition(step, event);
  if next.is_none() {
    debug!(target: "tokenwise_backend", %step, ?event, "story event ignored");
  }
  story_out(next.unwrap_or(step), next.is_some())
}

pub fn story_out(step: StepId, moved: bool) -> StoryOut {
  StoryOut { step, element_id: step.element_id(), moved, finished: step >= FINISHED }
}

#[instrument(level = "info", skip(state, submission), fields(goal = %submission.goal_id))]
pub fn submit_quiz(state: &AppState, submission: QuizSubmitIn) -> Result<QuizSubmitOut, ApiError> {
  if state.skill_tree.node(&submission.goal_id).is_none() {
    return Err(ApiError::NotFound(format!("Unknown goal: {}", submission.goal_id)));
  }
  let result = state.quiz.grade(&submission.answers);
  let completed = completion_after(&result, &submission.goal_id, completion_state(submission.completed));
  let accessible = accessible_goals(state, &completed);
  info!(target: "tokenwise_backend", score = result.score, total = result.total, passed = result.passed, "quiz graded");
  Ok(QuizSubmitOut { result, completed: completed.into_iter().collect(), accessible })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CourseConfig;
  use crate::story::{FINAL_QUIZ, SPINNER};

  fn state() -> AppState {
    AppState::from_config(CourseConfig::default()).unwrap()
  }

  #[test]
  fn certificate_report_for_seed() {
    let state = state();
    let done = completion_state(["ai-text-generation".to_string(), "ai-hallucinations".to_string()]);
    let report = certificate_report(&state, "ai-fundamentals", &done).unwrap();
    assert_eq!(report.end_goals, vec!["fact-checking".to_string()]);
    assert_eq!(report.progress.percent, 67);
    assert!(!report.earned);
    assert!(matches!(certificate_report(&state, "nope", &done), Err(ApiError::NotFound(_))));
  }

  #[test]
  fn token_spin_extends_path() {
    let state = state();
    let out = spin_token(&state, &[0]).unwrap();
    assert_eq!(out.path.len(), 2);
    assert_eq!(out.path[0], 0);
    assert!(!out.complete);
    assert!(spin_token(&state, &[0, 0, 0]).is_err());
  }

  #[test]
  fn story_ignores_inapplicable_events() {
    let out = story_next(SPINNER, StoryEvent::Continue);
    assert_eq!(out.step, SPINNER);
    assert!(!out.moved);

    let out = story_next(FINAL_QUIZ, StoryEvent::QuizCompleted);
    assert!(out.moved && out.finished);
    assert_eq!(out.element_id, "step-10");
  }

  #[test]
  fn passing_quiz_unlocks_followups() {
    let state = state();
    let out = submit_quiz(
      &state,
      QuizSubmitIn { goal_id: "ai-text-generation".into(), answers: vec![Some(0), Some(2), Some(1)], completed: vec![] },
    )
    .unwrap();
    assert!(out.result.passed);
    assert_eq!(out.completed, vec!["ai-text-generation".to_string()]);
    assert!(out.accessible.contains(&"temperature-randomness".to_string()));

    let err = submit_quiz(&state, QuizSubmitIn { goal_id: "missing".into(), answers: vec![], completed: vec![] });
    assert!(matches!(err, Err(ApiError::NotFound(_))));
  }
}
