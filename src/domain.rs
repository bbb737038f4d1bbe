//! Domain models shared by the scorers and the timing resolver: exam section,
//! result structs, and the per-task answer payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which part of the exam produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
  Reading,
  Listening,
  Speaking,
  Writing,
}

impl Section {
  pub fn as_str(&self) -> &'static str {
    match self {
      Section::Reading => "reading",
      Section::Listening => "listening",
      Section::Speaking => "speaking",
      Section::Writing => "writing",
    }
  }

  /// Case-insensitive parse of a section tag as it appears in question
  /// metadata. Surrounding whitespace is tolerated.
  pub fn parse(s: &str) -> Option<Section> {
    match s.trim().to_lowercase().as_str() {
      "reading" => Some(Section::Reading),
      "listening" => Some(Section::Listening),
      "speaking" => Some(Section::Speaking),
      "writing" => Some(Section::Writing),
      _ => None,
    }
  }
}

/// Output of every deterministic scorer.
///
/// `accuracy` is the fraction-correct measure in [0,1]; `score` is the
/// normalized 0-90 band derived from it. `wer` is present only for
/// dictation-style tasks. `meta` carries raw counts (TP/FP, edit distance,
/// token counts) so a persisted result can be audited without re-scoring.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
  pub section: Section,
  pub accuracy: f64,
  pub score: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub wer: Option<f64>,
  pub rationale: String,
  pub meta: Map<String, Value>,
}

/// Countdown budgets for one item or one section. Exactly one shape applies
/// per section rule: speaking items carry prep + answer, writing items and
/// the self-timed listening type carry answer only, reading (and all other
/// listening types) share a section-wide budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimingResult {
  #[serde(rename_all = "camelCase")]
  Prepared { prep_ms: u64, answer_ms: u64 },
  #[serde(rename_all = "camelCase")]
  SelfTimed { answer_ms: u64 },
  #[serde(rename_all = "camelCase")]
  SectionWide { section_ms: u64 },
}

//
// Scorer payloads. Caller-constructed, consumed once, no identity of their
// own; the caller supplies the answer-key side from storage.
//

/// Single-option selection (reading).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleChoicePayload {
  pub selected: String,
  pub correct: String,
}

/// Multiple-option selection (reading), scored with partial credit and an
/// over-selection penalty.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoicePayload {
  #[serde(default)]
  pub selected_options: Vec<String>,
  #[serde(default)]
  pub correct_options: Vec<String>,
}

/// Fill-in-the-blanks (reading). Both maps are keyed by blank index;
/// `correct` enumerates exactly the blanks to be graded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlanksPayload {
  #[serde(default)]
  pub answers: HashMap<u32, String>,
  #[serde(default)]
  pub correct: HashMap<u32, String>,
}

/// Paragraph reordering (reading). Paragraph ids as submitted by the user
/// and in reference order.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
  #[serde(default)]
  pub order: Vec<u32>,
  #[serde(default)]
  pub reference: Vec<u32>,
}

/// Write-from-dictation (listening): the played target and what the user
/// typed.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationPayload {
  pub target_text: String,
  pub user_text: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn section_parse_is_case_insensitive_and_trims() {
    assert_eq!(Section::parse("Reading"), Some(Section::Reading));
    assert_eq!(Section::parse("  SPEAKING "), Some(Section::Speaking));
    assert_eq!(Section::parse("grammar"), None);
    assert_eq!(Section::parse(""), None);
  }

  #[test]
  fn timing_result_serializes_to_flat_camel_case() {
    let t = TimingResult::Prepared { prep_ms: 35_000, answer_ms: 40_000 };
    let v = serde_json::to_value(t).unwrap();
    assert_eq!(v, serde_json::json!({"prepMs": 35_000, "answerMs": 40_000}));

    let t = TimingResult::SectionWide { section_ms: 600_000 };
    let v = serde_json::to_value(t).unwrap();
    assert_eq!(v, serde_json::json!({"sectionMs": 600_000}));
  }

  #[test]
  fn payloads_accept_camel_case_wire_shape() {
    let p: MultiChoicePayload =
      serde_json::from_value(serde_json::json!({"selectedOptions": ["A"], "correctOptions": ["A", "B"]}))
        .unwrap();
    assert_eq!(p.selected_options, vec!["A"]);
    assert_eq!(p.correct_options, vec!["A", "B"]);

    let p: DictationPayload =
      serde_json::from_value(serde_json::json!({"targetText": "the cat", "userText": "a cat"})).unwrap();
    assert_eq!(p.target_text, "the cat");

    let p: FillBlanksPayload =
      serde_json::from_value(serde_json::json!({"answers": {"0": "cat"}, "correct": {"0": "cat", "1": "dog"}}))
        .unwrap();
    assert_eq!(p.answers.get(&0).map(String::as_str), Some("cat"));
    assert_eq!(p.correct.len(), 2);
  }
}
