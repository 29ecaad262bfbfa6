//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Input errors come back as `ApiError` (400/404 with an `{"error": ...}` body).

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::feedback::{facets, FeedbackFilter};
use crate::domain::FeedbackEntry;
use crate::protocol::*;
use crate::state::AppState;
use crate::story::{entry_step, StepId};
use crate::survey::SurveyAnalysis;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_skill_tree(State(state): State<Arc<AppState>>) -> Json<SkillTreeOut> {
  let tree = &state.skill_tree;
  Json(SkillTreeOut {
    nodes: tree.nodes().to_vec(),
    certificates: tree.certificates().to_vec(),
    levels: tree.levels(),
    layout: tree.layout(),
    starting_goals: tree.starting_goals().into_iter().map(|n| n.id.clone()).collect(),
    content_goals: tree.goals_with_content().into_iter().map(|n| n.id.clone()).collect(),
  })
}

#[instrument(level = "info", skip(state, body), fields(completed = body.completed.len()))]
pub async fn http_post_accessible(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CompletedIn>,
) -> Json<AccessibleOut> {
  let accessible = accessible_goals(&state, &completion_state(body.completed));
  Json(AccessibleOut { accessible })
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_get_certificate(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Query(q): Query<CompletedQuery>,
) -> Result<Json<CertificateOut>, ApiError> {
  let report = certificate_report(&state, &id, &completion_state(q.ids()))?;
  info!(target: "skilltree", certificate = %id, percent = report.progress.percent, earned = report.earned, "HTTP certificate served");
  Ok(Json(report))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_prerequisites(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<PrerequisitesOut>, ApiError> {
  let tree = &state.skill_tree;
  let unknown = || ApiError::NotFound(format!("Unknown goal: {id}"));
  let prerequisites = tree.all_prerequisites(&id).ok_or_else(unknown)?;
  let level = tree.level_of(&id).ok_or_else(unknown)?;
  Ok(Json(PrerequisitesOut { goal_id: id, level, prerequisites: prerequisites.into_iter().collect() }))
}

#[instrument(level = "info", skip(body), fields(sectors = body.sectors.len()))]
pub async fn http_post_wheel_layout(Json(body): Json<SectorsIn>) -> Result<Json<WheelLayoutOut>, ApiError> {
  Ok(Json(WheelLayoutOut { arcs: wheel_layout(body.sectors)? }))
}

#[instrument(level = "info", skip(body), fields(sectors = body.sectors.len()))]
pub async fn http_post_wheel_spin(Json(body): Json<SectorsIn>) -> Result<Json<WheelSpinOut>, ApiError> {
  Ok(Json(WheelSpinOut { outcome: spin_sectors(body.sectors)? }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_tokens(State(state): State<Arc<AppState>>) -> Json<TokenTreeOut> {
  let tree = &state.token_tree;
  Json(TokenTreeOut { prompt: tree.prompt.clone(), depth: tree.depth(), options: tree.options.clone() })
}

#[instrument(level = "info", skip(state, body), fields(path = ?body.path))]
pub async fn http_post_token_spin(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PathIn>,
) -> Result<Json<TokenSpinOut>, ApiError> {
  Ok(Json(spin_token(&state, &body.path)?))
}

#[instrument(level = "info", skip(state, body), fields(path = ?body.path))]
pub async fn http_post_token_text(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PathIn>,
) -> Result<Json<TokenTextOut>, ApiError> {
  Ok(Json(token_text(&state, &body.path)?))
}

#[instrument(level = "info", skip(q), fields(challenge_mode = q.challenge_mode))]
pub async fn http_get_story_entry(Query(q): Query<StoryEntryQuery>) -> Json<StoryOut> {
  Json(story_out(entry_step(q.challenge_mode), true))
}

#[instrument(level = "info", skip(body), fields(step = %body.step, event = ?body.event))]
pub async fn http_post_story_next(Json(body): Json<StoryNextIn>) -> Result<Json<StoryOut>, ApiError> {
  let step: StepId = body.step.parse()?;
  Ok(Json(story_next(step, body.event)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(State(state): State<Arc<AppState>>) -> Json<QuizOut> {
  let questions = state
    .quiz
    .questions()
    .iter()
    .map(|q| QuestionOut { question: q.question.clone(), options: q.options.clone() })
    .collect();
  Json(QuizOut { questions, pass_score: state.quiz.pass_score() })
}

#[instrument(level = "info", skip(state, body), fields(goal = %body.goal_id, answers = body.answers.len()))]
pub async fn http_post_quiz_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizSubmitIn>,
) -> Result<Json<QuizSubmitOut>, ApiError> {
  Ok(Json(submit_quiz(&state, body)?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_survey(State(state): State<Arc<AppState>>) -> Json<SurveyOut> {
  Json(SurveyOut { question: state.survey.question.clone(), options: state.survey.options.clone() })
}

#[instrument(level = "info", skip(state, body), fields(rating = body.rating))]
pub async fn http_post_survey(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SurveyIn>,
) -> Result<Json<SurveyAnalysis>, ApiError> {
  let analysis = state.survey.analyze(body.rating)?;
  info!(target: "tokenwise_backend", rating = body.rating, average = analysis.average_rating, "HTTP survey analyzed");
  Ok(Json(analysis))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_feedback(
  State(state): State<Arc<AppState>>,
  Query(filter): Query<FeedbackFilter>,
) -> Json<FeedbackListOut> {
  let all = state.feedback.list().await;
  // facets come from the unfiltered list so dropdowns keep every choice
  let facets = facets(&all);
  Json(FeedbackListOut { entries: filter.apply(all), facets })
}

#[instrument(level = "info", skip(state, body), fields(content_id = %body.content_id, flag = body.flag.label()))]
pub async fn http_post_feedback(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FeedbackIn>,
) -> Result<Json<FeedbackEntry>, ApiError> {
  Ok(Json(state.feedback.save(body.into()).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_feedback(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<DeletedOut>, ApiError> {
  if !state.feedback.delete(&id).await {
    return Err(ApiError::NotFound(format!("Unknown feedback id: {id}")));
  }
  Ok(Json(DeletedOut { deleted: true }))
}
