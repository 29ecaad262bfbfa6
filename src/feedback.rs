//! Reviewer feedback attached to course elements, plus the admin panel's filters.
//!
//! Storage sits behind `FeedbackRepository`; the in-memory store below is the only
//! backend shipped.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{FeedbackEntry, FeedbackFlag};
use crate::error::FeedbackError;
use crate::util::trunc_for_log;

/// `YYYY-MM-DD HH:MM`, UTC. Sorts chronologically as a string.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
  /// Store an entry under a fresh id and return it.
  async fn save(&self, entry: FeedbackEntry) -> Result<FeedbackEntry, FeedbackError>;
  /// All entries, newest first.
  async fn list(&self) -> Vec<FeedbackEntry>;
  /// True if an entry with this id existed.
  async fn delete(&self, id: &str) -> bool;
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
  entries: RwLock<HashMap<String, FeedbackEntry>>,
}

impl InMemoryFeedbackRepository {
  pub fn with_entries(entries: Vec<FeedbackEntry>) -> Self {
    let map = entries.into_iter().map(|e| (e.id.clone(), e)).collect();
    Self { entries: RwLock::new(map) }
  }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
  #[instrument(level = "info", skip(self, entry), fields(content_id = %entry.content_id, flag = ?entry.flag))]
  async fn save(&self, mut entry: FeedbackEntry) -> Result<FeedbackEntry, FeedbackError> {
    if entry.text.trim().is_empty() {
      return Err(FeedbackError::EmptyText);
    }
    // ids are always server-assigned, so a save never replaces an existing entry
    entry.id = Uuid::new_v4().to_string();
    if entry.timestamp.is_empty() {
      entry.timestamp = now_timestamp();
    }
    info!(target: "feedback", id = %entry.id, text = %trunc_for_log(&entry.text, 80), "Feedback saved");
    self.entries.write().await.insert(entry.id.clone(), entry.clone());
    Ok(entry)
  }

  async fn list(&self) -> Vec<FeedbackEntry> {
    let mut all: Vec<FeedbackEntry> = self.entries.read().await.values().cloned().collect();
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
    all
  }

  #[instrument(level = "info", skip(self))]
  async fn delete(&self, id: &str) -> bool {
    let removed = self.entries.write().await.remove(id).is_some();
    info!(target: "feedback", %id, removed, "Feedback delete");
    removed
  }
}

/// Admin panel filters; unset fields match everything.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilter {
  pub flag: Option<FeedbackFlag>,
  pub learning_objective: Option<String>,
  pub university: Option<String>,
}

impl FeedbackFilter {
  pub fn matches(&self, entry: &FeedbackEntry) -> bool {
    self.flag.map_or(true, |f| entry.flag == f)
      && self.learning_objective.as_ref().map_or(true, |o| &entry.learning_objective == o)
      && self.university.as_ref().map_or(true, |u| &entry.university == u)
  }

  pub fn apply(&self, entries: Vec<FeedbackEntry>) -> Vec<FeedbackEntry> {
    entries.into_iter().filter(|e| self.matches(e)).collect()
  }
}

/// Distinct values offered in the admin panel's filter dropdowns.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFacets {
  pub learning_objectives: BTreeSet<String>,
  pub universities: BTreeSet<String>,
}

pub fn facets(entries: &[FeedbackEntry]) -> FeedbackFacets {
  FeedbackFacets {
    learning_objectives: entries.iter().map(|e| e.learning_objective.clone()).collect(),
    universities: entries.iter().map(|e| e.university.clone()).filter(|u| !u.is_empty()).collect(),
  }
}

fn now_timestamp() -> String {
  Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_feedback;

  fn entry(text: &str, flag: FeedbackFlag) -> FeedbackEntry {
    FeedbackEntry {
      id: String::new(),
      learning_objective: "Understanding How AI Produces Text".into(),
      resource: "Story-driven Course".into(),
      content_id: "step-7.2".into(),
      flag,
      text: text.into(),
      timestamp: String::new(),
      university: "TU Munich".into(),
    }
  }

  #[tokio::test]
  async fn save_assigns_id_and_timestamp() {
    let repo = InMemoryFeedbackRepository::default();
    let saved = repo.save(entry("Wheel label overlaps", FeedbackFlag::TechnicalError)).await.unwrap();
    assert!(Uuid::parse_str(&saved.id).is_ok());
    assert!(chrono::NaiveDateTime::parse_from_str(&saved.timestamp, TIMESTAMP_FORMAT).is_ok());
    assert_eq!(repo.list().await, vec![saved]);
  }

  #[tokio::test]
  async fn rejects_blank_text() {
    let repo = InMemoryFeedbackRepository::default();
    let err = repo.save(entry("   ", FeedbackFlag::GeneralFeedback)).await.unwrap_err();
    assert_eq!(err, FeedbackError::EmptyText);
    assert!(repo.list().await.is_empty());
  }

  #[tokio::test]
  async fn list_is_newest_first_and_delete_reports_presence() {
    let repo = InMemoryFeedbackRepository::with_entries(seed_feedback());
    let listed = repo.list().await;
    assert_eq!(listed.len(), seed_feedback().len());
    assert!(listed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let first = listed[0].id.clone();
    assert!(repo.delete(&first).await);
    assert!(!repo.delete(&first).await);
    assert_eq!(repo.list().await.len(), listed.len() - 1);
  }

  #[tokio::test]
  async fn save_never_replaces_an_existing_entry() {
    let repo = InMemoryFeedbackRepository::with_entries(seed_feedback());
    let original = repo.list().await.into_iter().find(|e| e.id == "1").unwrap();

    let mut incoming = entry("Second opinion on the intro", FeedbackFlag::GeneralFeedback);
    incoming.id = "1".into();
    let saved = repo.save(incoming).await.unwrap();

    assert_ne!(saved.id, "1");
    assert!(Uuid::parse_str(&saved.id).is_ok());
    let listed = repo.list().await;
    assert_eq!(listed.len(), seed_feedback().len() + 1);
    assert!(listed.contains(&original));
  }

  #[test]
  fn filters_combine() {
    let all = seed_feedback();
    let by_flag = FeedbackFilter { flag: Some(FeedbackFlag::TechnicalError), ..Default::default() };
    assert!(by_flag.apply(all.clone()).iter().all(|e| e.flag == FeedbackFlag::TechnicalError));

    let narrow = FeedbackFilter {
      flag: Some(FeedbackFlag::TechnicalError),
      learning_objective: None,
      university: Some("LMU Munich".into()),
    };
    let hits = narrow.apply(all.clone());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content_id, "step-3.2");

    assert_eq!(FeedbackFilter::default().apply(all.clone()).len(), all.len());
  }

  #[test]
  fn facets_are_distinct() {
    let f = facets(&seed_feedback());
    assert!(f.learning_objectives.contains("Prompt Engineering Basics"));
    assert_eq!(f.universities.len(), 5);
  }
}
