//! Final quiz grading.

use serde::Serialize;

use crate::domain::QuizQuestion;
use crate::error::QuizError;
use crate::skilltree::CompletionState;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
  pub score: usize,
  pub total: usize,
  /// One entry per question.
  pub correct: Vec<bool>,
  pub passed: bool,
}

#[derive(Clone, Debug)]
pub struct Quiz {
  questions: Vec<QuizQuestion>,
  pass_score: usize,
}

impl Quiz {
  /// `pass_score` defaults to every question correct.
  pub fn new(questions: Vec<QuizQuestion>, pass_score: Option<usize>) -> Result<Self, QuizError> {
    if questions.is_empty() {
      return Err(QuizError::Empty);
    }
    for (index, q) in questions.iter().enumerate() {
      if q.correct_answer >= q.options.len() {
        return Err(QuizError::AnswerOutOfRange {
          index,
          answer: q.correct_answer,
          options: q.options.len(),
        });
      }
    }
    let total = questions.len();
    let pass_score = pass_score.unwrap_or(total);
    if pass_score > total {
      return Err(QuizError::PassScoreTooHigh { pass_score, total });
    }
    Ok(Self { questions, pass_score })
  }

  pub fn questions(&self) -> &[QuizQuestion] {
    &self.questions
  }

  pub fn pass_score(&self) -> usize {
    self.pass_score
  }

  /// `answers[i]` is the chosen option for question `i`; missing or `None`
  /// answers count as wrong, extra answers are ignored.
  pub fn grade(&self, answers: &[Option<usize>]) -> QuizResult {
    let correct: Vec<bool> = self
      .questions
      .iter()
      .enumerate()
      .map(|(i, q)| answers.get(i).copied().flatten() == Some(q.correct_answer))
      .collect();
    let score = correct.iter().filter(|c| **c).count();
    QuizResult {
      score,
      total: self.questions.len(),
      correct,
      passed: score >= self.pass_score,
    }
  }
}

/// Completion state after a quiz attempt on `goal_id`: the goal is added on a pass,
/// the caller's set is returned unchanged otherwise.
pub fn completion_after(result: &QuizResult, goal_id: &str, completed: CompletionState) -> CompletionState {
  let mut completed = completed;
  if result.passed {
    completed.insert(goal_id.to_string());
  }
  completed
}
