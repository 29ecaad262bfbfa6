//! Trust survey: "how often does an LLM give the same answer to the same prompt?"
//! and how a learner's rating compares with earlier participants.

use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveyOption {
  pub value: u8,
  pub label: String,
  pub description: String,
}

/// Earlier participants who picked `rating`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RatingBucket {
  pub rating: u8,
  pub label: String,
  pub count: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketShare {
  pub rating: u8,
  pub label: String,
  pub count: u32,
  pub percentage: u32,
  pub is_user_rating: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnalysis {
  pub user_rating: u8,
  pub user_label: String,
  pub total_participants: u32,
  /// Rounded to one decimal.
  pub average_rating: f64,
  pub distribution: Vec<BucketShare>,
}

#[derive(Clone, Debug)]
pub struct TrustSurvey {
  pub question: String,
  pub options: Vec<SurveyOption>,
  pub baseline: Vec<RatingBucket>,
}

impl TrustSurvey {
  pub fn analyze(&self, rating: u8) -> Result<SurveyAnalysis, SurveyError> {
    let option = self
      .options
      .iter()
      .find(|o| o.value == rating)
      .ok_or(SurveyError::RatingOutOfRange(rating))?;

    let total: u32 = self.baseline.iter().map(|b| b.count).sum();
    let weighted: u32 = self.baseline.iter().map(|b| u32::from(b.rating) * b.count).sum();
    let average = if total == 0 { 0.0 } else { f64::from(weighted) / f64::from(total) };

    let distribution = self
      .baseline
      .iter()
      .map(|b| BucketShare {
        rating: b.rating,
        label: b.label.clone(),
        count: b.count,
        percentage: if total == 0 { 0 } else { (f64::from(b.count) * 100.0 / f64::from(total)).round() as u32 },
        is_user_rating: b.rating == rating,
      })
      .collect();

    Ok(SurveyAnalysis {
      user_rating: rating,
      user_label: option.label.clone(),
      total_participants: total,
      average_rating: (average * 10.0).round() / 10.0,
      distribution,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::seed_trust_survey;

  #[test]
  fn analysis_against_baseline() {
    let survey = seed_trust_survey();
    let analysis = survey.analyze(3).unwrap();
    assert_eq!(analysis.total_participants, 520);
    assert_eq!(analysis.average_rating, 3.2);
    assert_eq!(analysis.user_label, "Sometimes the same");
    let mine: Vec<&BucketShare> = analysis.distribution.iter().filter(|b| b.is_user_rating).collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].percentage, 35);
  }

  #[test]
  fn rejects_out_of_range() {
    let survey = seed_trust_survey();
    assert_eq!(survey.analyze(0).unwrap_err(), SurveyError::RatingOutOfRange(0));
    assert_eq!(survey.analyze(6).unwrap_err(), SurveyError::RatingOutOfRange(6));
  }
}
