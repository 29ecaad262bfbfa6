//! Branching next-token narrative.
//!
//! Each decision point is a list of weighted candidate tokens. A path is the list of
//! option indices chosen so far; the wheel for the next decision is derived from the
//! options under that path.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{TokenOption, WheelSector};
use crate::error::WheelError;
use crate::wheel::{SpinOutcome, Wheel};

const MISSING_TOKEN: &str = "___";
const UNFINISHED: &str = "...";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenTree {
  pub prompt: String,
  pub options: Vec<TokenOption>,
}

impl TokenTree {
  /// Every decision point must form a valid wheel.
  pub fn validate(&self) -> Result<(), WheelError> {
    fn walk(options: &[TokenOption]) -> Result<(), WheelError> {
      wheel_for(options)?;
      options
        .iter()
        .filter(|o| !o.options.is_empty())
        .try_for_each(|o| walk(&o.options))
    }
    walk(&self.options)
  }

  /// Number of token slots on the longest branch.
  pub fn depth(&self) -> usize {
    fn deepest(options: &[TokenOption]) -> usize {
      options.iter().map(|o| 1 + deepest(&o.options)).max().unwrap_or(0)
    }
    deepest(&self.options)
  }

  /// Options chosen along `path`, in order.
  pub fn selections(&self, path: &[usize]) -> Result<Vec<&TokenOption>, WheelError> {
    let mut current = self.options.as_slice();
    let mut chosen = Vec::with_capacity(path.len());
    for &i in path {
      let option = current.get(i).ok_or_else(|| WheelError::UnknownPath(path.to_vec()))?;
      chosen.push(option);
      current = &option.options;
    }
    Ok(chosen)
  }

  /// Candidates at the decision point reached by `path`.
  pub fn options_at(&self, path: &[usize]) -> Result<&[TokenOption], WheelError> {
    let options = match self.selections(path)?.last() {
      Some(last) => last.options.as_slice(),
      None => self.options.as_slice(),
    };
    if options.is_empty() {
      return Err(WheelError::UnknownPath(path.to_vec()));
    }
    Ok(options)
  }

  pub fn wheel_at(&self, path: &[usize]) -> Result<Wheel, WheelError> {
    wheel_for(self.options_at(path)?)
  }

  pub fn spin_at<R: Rng>(&self, path: &[usize], rng: &mut R) -> Result<SpinOutcome, WheelError> {
    Ok(self.wheel_at(path)?.spin(rng))
  }

  /// True once the path ends on an option with no continuation.
  pub fn is_complete(&self, path: &[usize]) -> bool {
    matches!(self.selections(path), Ok(chosen) if chosen.last().is_some_and(|o| o.options.is_empty()))
  }

  /// The prompt followed by the chosen tokens, blanks for open slots and the
  /// closing text once a leaf is reached.
  pub fn generated_text(&self, path: &[usize]) -> Result<String, WheelError> {
    let chosen = self.selections(path)?;
    let mut parts: Vec<&str> = vec![self.prompt.as_str()];
    parts.extend(chosen.iter().map(|o| o.token.as_str()));
    let open_slots = self.depth().saturating_sub(chosen.len());
    parts.extend(std::iter::repeat(MISSING_TOKEN).take(open_slots));
    let ending = chosen.last().and_then(|o| o.final_text.as_deref()).unwrap_or(UNFINISHED);
    parts.push(ending);
    Ok(parts.join(" "))
  }
}

fn wheel_for(options: &[TokenOption]) -> Result<Wheel, WheelError> {
  Wheel::new(
    options
      .iter()
      .map(|o| WheelSector::new(o.token.clone(), o.probability))
      .collect(),
  )
}
