//! Weighted sector picker.
//!
//! Sectors tile the circle in list order from -90° to 270°. A spin rotates the
//! wheel clockwise by a uniformly random amount while the pointer stays fixed; the
//! angle under the pointer is then `-rotation`, taken into `[-90, 270)`, and the
//! sector whose arc contains it is the sample. Because the fractional turn is uniform on
//! `[0, 360)`, sector `i` wins with probability equal to its share of the circle.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::WheelSector;
use crate::error::WheelError;
use crate::util::normalize_degrees;

/// Angle of the pointer, and of the first sector's leading edge.
pub const START_ANGLE: f64 = -90.0;
pub const SUM_TOLERANCE: f64 = 1e-6;
const MIN_FULL_TURNS: u32 = 3;
const MAX_FULL_TURNS: u32 = 5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorArc {
  pub start_angle: f64,
  pub end_angle: f64,
  pub mid_angle: f64,
}

impl SectorArc {
  pub fn span(&self) -> f64 {
    self.end_angle - self.start_angle
  }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
  /// Total clockwise rotation in degrees, full turns included.
  pub rotation: f64,
  pub index: usize,
  pub label: String,
}

/// A non-empty, normalized list of sectors.
#[derive(Clone, Debug)]
pub struct Wheel {
  sectors: Vec<WheelSector>,
  // cumulative share at each sector's end; the last entry is exactly 1.0
  bounds: Vec<f64>,
}

impl Wheel {
  /// Validate and normalize. A total off from 1.0 is scaled rather than rejected.
  pub fn new(sectors: Vec<WheelSector>) -> Result<Self, WheelError> {
    if sectors.is_empty() {
      return Err(WheelError::Empty);
    }
    if let Some(bad) = sectors.iter().find(|s| !s.probability.is_finite() || s.probability <= 0.0) {
      return Err(WheelError::InvalidProbability {
        label: bad.label.clone(),
        probability: bad.probability,
      });
    }
    let total: f64 = sectors.iter().map(|s| s.probability).sum();
    if !total.is_finite() || total <= 0.0 {
      return Err(WheelError::NonPositiveTotal(total));
    }

    let sectors: Vec<WheelSector> = if (total - 1.0).abs() > SUM_TOLERANCE {
      debug!(target: "wheel", total, "normalizing sector probabilities");
      sectors
        .into_iter()
        .map(|s| WheelSector { probability: s.probability / total, ..s })
        .collect()
    } else {
      sectors
    };

    let mut acc = 0.0;
    let mut bounds: Vec<f64> = sectors
      .iter()
      .map(|s| {
        acc += s.probability;
        acc
      })
      .collect();
    if let Some(last) = bounds.last_mut() {
      *last = 1.0;
    }

    Ok(Self { sectors, bounds })
  }

  pub fn sectors(&self) -> &[WheelSector] {
    &self.sectors
  }

  /// Contiguous arcs; sector `i` ends where `i + 1` starts and the last one
  /// closes the circle at 270°.
  pub fn layout(&self) -> Vec<SectorArc> {
    let mut start = START_ANGLE;
    self
      .bounds
      .iter()
      .map(|&bound| {
        let end = START_ANGLE + bound * 360.0;
        let arc = SectorArc { start_angle: start, end_angle: end, mid_angle: (start + end) / 2.0 };
        start = end;
        arc
      })
      .collect()
  }

  /// Sector under the pointer after rotating the wheel clockwise by `rotation`.
  /// Intervals are half-open `[start, end)`, so every angle hits exactly one sector.
  pub fn sector_at(&self, rotation: f64) -> usize {
    let under_pointer = normalize_degrees(-rotation, START_ANGLE);
    let share = (under_pointer - START_ANGLE) / 360.0;
    self
      .bounds
      .iter()
      .position(|&end| share < end)
      .unwrap_or(self.bounds.len() - 1)
  }

  #[instrument(level = "debug", skip(self, rng), fields(sectors = self.sectors.len()))]
  pub fn spin<R: Rng>(&self, rng: &mut R) -> SpinOutcome {
    let full_turns = rng.gen_range(MIN_FULL_TURNS..=MAX_FULL_TURNS);
    let rotation = f64::from(full_turns) * 360.0 + rng.gen_range(0.0..360.0);
    let index = self.sector_at(rotation);
    let label = self.sectors[index].label.clone();
    debug!(target: "wheel", rotation, index, %label, "wheel stopped");
    SpinOutcome { rotation, index, label }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;
  use rand::{rngs::StdRng, SeedableRng};

  fn sentence_wheel() -> Wheel {
    Wheel::new(vec![
      WheelSector::new("I", 0.5),
      WheelSector::new("really", 0.3),
      WheelSector::new("was", 0.15),
      WheelSector::new("must", 0.05),
    ])
    .unwrap()
  }

  fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
  }

  #[test]
  fn layout_spans_follow_probabilities() {
    let arcs = sentence_wheel().layout();
    assert_eq!(arcs[0].start_angle, -90.0);
    let spans: Vec<f64> = arcs.iter().map(SectorArc::span).collect();
    for (got, want) in spans.iter().zip([180.0, 108.0, 54.0, 18.0]) {
      assert!(close(*got, want), "{got} != {want}");
    }
    assert!(close(spans.iter().sum::<f64>(), 360.0));
    assert_eq!(arcs[3].end_angle, 270.0);
    assert!(close(arcs[0].mid_angle, 0.0));
  }

  #[test]
  fn rejects_empty_and_nonpositive() {
    assert_eq!(Wheel::new(vec![]).unwrap_err(), WheelError::Empty);
    assert!(matches!(
      Wheel::new(vec![WheelSector::new("a", 0.0)]),
      Err(WheelError::InvalidProbability { .. })
    ));
    assert!(matches!(
      Wheel::new(vec![WheelSector::new("a", f64::NAN)]),
      Err(WheelError::InvalidProbability { .. })
    ));
  }

  #[test]
  fn normalizes_off_totals() {
    let wheel = Wheel::new(vec![WheelSector::new("a", 2.0), WheelSector::new("b", 6.0)]).unwrap();
    assert!(close(wheel.sectors()[0].probability, 0.25));
    assert!(close(wheel.layout()[0].span(), 90.0));
  }

  #[test]
  fn pointer_resolution_matches_clockwise_rotation() {
    let wheel = sentence_wheel();
    // arcs: I [-90, 90), really [90, 198), was [198, 252), must [252, 270)
    assert_eq!(wheel.sector_at(0.0), 0);
    assert_eq!(wheel.sector_at(10.0), 0);
    // -100 wraps to 260, inside "must"
    assert_eq!(wheel.sector_at(100.0), 3);
    // -90 is the leading edge of "I"
    assert_eq!(wheel.sector_at(90.0), 0);
    assert_eq!(wheel.sector_at(91.0), 3);
    // -270 wraps to 90, the leading edge of "really"
    assert_eq!(wheel.sector_at(270.0), 1);
    assert_eq!(wheel.sector_at(270.001), 0);
    assert_eq!(wheel.sector_at(4.0 * 360.0 + 270.0), 1);
    // pointer angle 200 lies in "was" and needs rotation 160
    assert_eq!(wheel.sector_at(160.0), 2);
    assert_eq!(wheel.sector_at(160.0 - 360.0), 2);
  }

  #[test]
  fn single_sector_always_wins() {
    let wheel = Wheel::new(vec![WheelSector::new("only", 1.0)]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
      assert_eq!(wheel.spin(&mut rng).index, 0);
    }
  }

  #[test]
  fn spins_converge_to_probabilities() {
    let wheel = sentence_wheel();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let runs = 100_000;
    let mut counts = [0usize; 4];
    for _ in 0..runs {
      let outcome = wheel.spin(&mut rng);
      assert!(outcome.rotation >= 3.0 * 360.0 && outcome.rotation < 6.0 * 360.0);
      counts[outcome.index] += 1;
    }
    for (count, p) in counts.iter().zip([0.5, 0.3, 0.15, 0.05]) {
      let freq = *count as f64 / runs as f64;
      assert!((freq - p).abs() < 0.01, "frequency {freq} too far from {p}");
    }
  }

  proptest! {
    #[test]
    fn arcs_tile_the_circle(weights in prop::collection::vec(0.001f64..10.0, 1..16)) {
      let sectors = weights.iter().enumerate().map(|(i, w)| WheelSector::new(format!("s{i}"), *w)).collect();
      let arcs = Wheel::new(sectors).unwrap().layout();
      prop_assert_eq!(arcs[0].start_angle, START_ANGLE);
      for pair in arcs.windows(2) {
        prop_assert_eq!(pair[0].end_angle, pair[1].start_angle);
        prop_assert!(pair[0].span() > 0.0);
      }
      let total: f64 = arcs.iter().map(SectorArc::span).sum();
      prop_assert!((total - 360.0).abs() < 1e-6);
    }

    #[test]
    fn every_rotation_selects_the_covering_arc(weights in prop::collection::vec(0.01f64..10.0, 1..8), rotation in -5000.0f64..5000.0) {
      let sectors = weights.iter().enumerate().map(|(i, w)| WheelSector::new(format!("s{i}"), *w)).collect();
      let wheel = Wheel::new(sectors).unwrap();
      let index = wheel.sector_at(rotation);
      let arc = wheel.layout()[index];
      let angle = normalize_degrees(-rotation, START_ANGLE);
      prop_assert!(angle >= arc.start_angle - 1e-9 && angle < arc.end_angle + 1e-9);
    }
  }
}
