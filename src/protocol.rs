//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Field names are camelCase on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Certificate, FeedbackEntry, FeedbackFlag, LearningNode, TokenOption, WheelSector};
use crate::feedback::FeedbackFacets;
use crate::quiz::QuizResult;
use crate::skilltree::{CertificateProgress, NodePosition};
use crate::story::{StepId, StoryEvent};
use crate::survey::SurveyOption;
use crate::wheel::{SectorArc, SpinOutcome};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Accessible {
        #[serde(default)]
        completed: Vec<String>,
    },
    Spin {
        sectors: Vec<WheelSector>,
    },
    TokenSpin {
        #[serde(default)]
        path: Vec<usize>,
    },
    StoryNext {
        step: String,
        event: StoryEvent,
    },
    QuizSubmit(QuizSubmitIn),
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Accessible {
        accessible: Vec<String>,
    },
    Spin {
        outcome: SpinOutcome,
    },
    TokenSpin(TokenSpinOut),
    Story(StoryOut),
    QuizResult(QuizSubmitOut),
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeOut {
    pub nodes: Vec<LearningNode>,
    pub certificates: Vec<Certificate>,
    /// Node ids grouped by level, level 0 first.
    pub levels: Vec<Vec<String>>,
    pub layout: BTreeMap<String, NodePosition>,
    pub starting_goals: Vec<String>,
    /// Goals that have course content behind them.
    pub content_goals: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompletedIn {
    #[serde(default)]
    pub completed: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessibleOut {
    pub accessible: Vec<String>,
}

/// `completed` is a comma separated id list, e.g. `?completed=a,b`.
#[derive(Debug, Default, Deserialize)]
pub struct CompletedQuery {
    pub completed: Option<String>,
}

impl CompletedQuery {
    pub fn ids(&self) -> Vec<String> {
        self.completed
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateOut {
    pub certificate: Certificate,
    pub path: Vec<String>,
    pub end_goals: Vec<String>,
    pub progress: CertificateProgress,
    pub earned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisitesOut {
    pub goal_id: String,
    pub level: usize,
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SectorsIn {
    pub sectors: Vec<WheelSector>,
}

#[derive(Debug, Serialize)]
pub struct WheelLayoutOut {
    pub arcs: Vec<SectorArc>,
}

#[derive(Debug, Serialize)]
pub struct WheelSpinOut {
    pub outcome: SpinOutcome,
}

#[derive(Debug, Serialize)]
pub struct TokenTreeOut {
    pub prompt: String,
    pub depth: usize,
    pub options: Vec<TokenOption>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathIn {
    #[serde(default)]
    pub path: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct TokenSpinOut {
    pub outcome: SpinOutcome,
    /// The request path with the winning index appended.
    pub path: Vec<usize>,
    pub text: String,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenTextOut {
    pub text: String,
    pub complete: bool,
}

/// `step` accepts `"7.2"` as well as the element id `"step-7.2"`.
#[derive(Debug, Deserialize)]
pub struct StoryNextIn {
    pub step: String,
    pub event: StoryEvent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEntryQuery {
    #[serde(default)]
    pub challenge_mode: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOut {
    pub step: StepId,
    pub element_id: String,
    /// False when the event did not apply and `step` is unchanged.
    pub moved: bool,
    pub finished: bool,
}

/// A question as shown to learners; the correct answer stays server-side.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOut {
    pub questions: Vec<QuestionOut>,
    pub pass_score: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmitIn {
    pub goal_id: String,
    #[serde(default)]
    pub answers: Vec<Option<usize>>,
    #[serde(default)]
    pub completed: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizSubmitOut {
    #[serde(flatten)]
    pub result: QuizResult,
    pub completed: Vec<String>,
    pub accessible: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SurveyOut {
    pub question: String,
    pub options: Vec<SurveyOption>,
}

#[derive(Debug, Deserialize)]
pub struct SurveyIn {
    pub rating: u8,
}

/// Body of `POST /feedback`; id and timestamp are assigned server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackIn {
    pub learning_objective: String,
    pub resource: String,
    pub content_id: String,
    pub flag: FeedbackFlag,
    pub text: String,
    #[serde(default)]
    pub university: String,
}

impl From<FeedbackIn> for FeedbackEntry {
    fn from(f: FeedbackIn) -> Self {
        FeedbackEntry {
            id: String::new(),
            learning_objective: f.learning_objective,
            resource: f.resource,
            content_id: f.content_id,
            flag: f.flag,
            text: f.text,
            timestamp: String::new(),
            university: f.university,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackListOut {
    pub entries: Vec<FeedbackEntry>,
    pub facets: FeedbackFacets,
}

#[derive(Debug, Serialize)]
pub struct DeletedOut {
    pub deleted: bool,
}
