//! Application state: validated course content and the feedback store.
//!
//! Course content (skill tree, quiz, token tree, survey) is read-only after startup;
//! it comes from TOML when COURSE_CONFIG_PATH is set and from the built-in seeds
//! otherwise, section by section. Feedback lives behind `FeedbackRepository`.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_course_config_from_env, CourseConfig};
use crate::error::ConfigError;
use crate::feedback::{FeedbackRepository, InMemoryFeedbackRepository};
use crate::quiz::Quiz;
use crate::seeds::{
    seed_certificates, seed_feedback, seed_quiz_questions, seed_skill_nodes, seed_token_tree,
    seed_trust_survey,
};
use crate::skilltree::SkillTree;
use crate::survey::TrustSurvey;
use crate::tokentree::TokenTree;

#[derive(Clone)]
pub struct AppState {
    pub skill_tree: Arc<SkillTree>,
    pub quiz: Arc<Quiz>,
    pub token_tree: Arc<TokenTree>,
    pub survey: Arc<TrustSurvey>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl AppState {
    /// Build state from env: load config if present, fill gaps with seeds, validate.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = load_course_config_from_env()?;
        if cfg.is_none() {
            info!(target: "tokenwise_backend", "No COURSE_CONFIG_PATH; using built-in course content.");
        }
        Self::from_config(cfg.unwrap_or_default())
    }

    /// Build state from an already parsed config. Invalid content is rejected here,
    /// so handlers can assume a well-formed curriculum.
    pub fn from_config(cfg: CourseConfig) -> Result<Self, ConfigError> {
        let skill_tree = SkillTree::new(
            cfg.nodes.unwrap_or_else(seed_skill_nodes),
            cfg.certificates.unwrap_or_else(seed_certificates),
        )?;

        let quiz = Quiz::new(cfg.quiz.unwrap_or_else(seed_quiz_questions), cfg.quiz_pass_score)?;

        let token_tree = cfg.token_tree.unwrap_or_else(seed_token_tree);
        token_tree.validate()?;

        let feedback = InMemoryFeedbackRepository::with_entries(seed_feedback());

        info!(
            target: "tokenwise_backend",
            nodes = skill_tree.nodes().len(),
            certificates = skill_tree.certificates().len(),
            quiz_questions = quiz.questions().len(),
            pass_score = quiz.pass_score(),
            token_depth = token_tree.depth(),
            "Course content ready"
        );

        Ok(Self {
            skill_tree: Arc::new(skill_tree),
            quiz: Arc::new(quiz),
            token_tree: Arc::new(token_tree),
            survey: Arc::new(seed_trust_survey()),
            feedback: Arc::new(feedback),
        })
    }
}
