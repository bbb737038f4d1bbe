//! Accuracy-to-band conversion.
//!
//! The single place where "fraction correct" becomes the exam's 0-90 scale.
//! Keeping the banding policy out of the individual scorers means changing
//! it (e.g. to a non-linear curve) touches exactly one function.

use serde_json::{Map, Value};

use crate::domain::{ScoringResult, Section};

/// Top of the reported band scale.
pub const MAX_BAND: u8 = 90;

/// Substituted when a scorer hands over an empty rationale.
const MISSING_RATIONALE: &str = "no rationale recorded";

/// Build a `ScoringResult` from a raw accuracy and optional word-error-rate.
///
/// Accuracy is clamped to [0,1] and wer to >= 0 (NaN resolves to 0 in both);
/// the band score is the linear map `round(accuracy * 90)`. Rationale and
/// meta pass through verbatim for traceability.
pub fn build(
  section: Section,
  accuracy: f64,
  rationale: String,
  meta: Map<String, Value>,
  wer: Option<f64>,
) -> ScoringResult {
  let accuracy = clamp01(accuracy);
  let score = ((accuracy * f64::from(MAX_BAND)).round() as u8).min(MAX_BAND);
  let wer = wer.map(|w| if w.is_nan() { 0.0 } else { w.max(0.0) });
  let rationale = if rationale.trim().is_empty() {
    MISSING_RATIONALE.to_string()
  } else {
    rationale
  };

  ScoringResult { section, accuracy, score, wer, rationale, meta }
}

fn clamp01(x: f64) -> f64 {
  if x.is_nan() {
    return 0.0;
  }
  x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn meta() -> Map<String, Value> {
    Map::new()
  }

  #[test]
  fn band_is_linear_over_accuracy() {
    let r = build(Section::Reading, 1.0, "all correct".into(), meta(), None);
    assert_eq!(r.score, 90);
    let r = build(Section::Reading, 0.0, "none correct".into(), meta(), None);
    assert_eq!(r.score, 0);
    let r = build(Section::Reading, 2.0 / 3.0, "two thirds".into(), meta(), None);
    assert_eq!(r.score, 60);
  }

  #[test]
  fn accuracy_is_clamped_into_unit_interval() {
    let r = build(Section::Reading, 1.7, "over".into(), meta(), None);
    assert_eq!(r.accuracy, 1.0);
    assert_eq!(r.score, 90);
    let r = build(Section::Reading, -0.4, "under".into(), meta(), None);
    assert_eq!(r.accuracy, 0.0);
    assert_eq!(r.score, 0);
    let r = build(Section::Reading, f64::NAN, "nan".into(), meta(), None);
    assert_eq!(r.accuracy, 0.0);
  }

  #[test]
  fn wer_is_floored_at_zero_but_not_capped() {
    let r = build(Section::Listening, 0.0, "w".into(), meta(), Some(-0.5));
    assert_eq!(r.wer, Some(0.0));
    let r = build(Section::Listening, 0.0, "w".into(), meta(), Some(1.8));
    assert_eq!(r.wer, Some(1.8));
    let r = build(Section::Reading, 1.0, "w".into(), meta(), None);
    assert_eq!(r.wer, None);
  }

  #[test]
  fn empty_rationale_is_substituted() {
    let r = build(Section::Reading, 0.5, "   ".into(), meta(), None);
    assert!(!r.rationale.is_empty());
    assert_eq!(r.rationale, "no rationale recorded");
  }

  #[test]
  fn section_and_meta_pass_through() {
    let mut m = Map::new();
    m.insert("tp".into(), Value::from(2));
    let r = build(Section::Writing, 0.5, "half".into(), m, None);
    assert_eq!(r.section, Section::Writing);
    assert_eq!(r.meta.get("tp"), Some(&Value::from(2)));
  }
}
