//! Small utility helpers used across modules.

/// Map any angle (degrees) into `[lower, lower + 360)`.
pub fn normalize_degrees(angle: f64, lower: f64) -> f64 {
  let shifted = (angle - lower).rem_euclid(360.0);
  // rem_euclid can round up to exactly 360 for tiny negative inputs
  if shifted >= 360.0 { lower } else { lower + shifted }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with long free-text feedback.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    None => s.to_string(),
    Some((cut, _)) => format!("{}… ({} bytes total)", &s[..cut], s.len()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_into_window() {
    assert_eq!(normalize_degrees(-90.0, -90.0), -90.0);
    assert_eq!(normalize_degrees(270.0, -90.0), -90.0);
    assert_eq!(normalize_degrees(-450.0, -90.0), -90.0);
    assert_eq!(normalize_degrees(-100.0, -90.0), 260.0);
    assert_eq!(normalize_degrees(1000.0, 0.0), 280.0);
    assert_eq!(normalize_degrees(-1e-18, 0.0), 0.0);
  }

  #[test]
  fn truncates_on_char_boundary() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert_eq!(trunc_for_log("héllo wörld", 5), "héllo… (13 bytes total)");
  }
}
