//! Timing-override loading from process configuration.
//!
//! The override blob is JSON shaped exactly like the defaults (section →
//! question type → millisecond fields), with every field optional. Parsing
//! happens once at startup; any read or parse error is logged at error
//! level and resolves to `None` (defaults-only).
//!
//! See `TimingOverrides` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::util::trunc_for_log;

/// File-path variant: a JSON document on disk.
pub const TIMING_OVERRIDES_PATH_VAR: &str = "TIMING_OVERRIDES_PATH";
/// Inline variant: the JSON blob itself, for container deployments without
/// a mounted config volume.
pub const TIMING_OVERRIDES_VAR: &str = "TIMING_OVERRIDES";

/// Root override schema. Sections are independently optional; unknown JSON
/// keys are dropped by serde rather than rejected.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimingOverrides {
  pub speaking: SpeakingOverrides,
  pub writing: WritingOverrides,
  pub reading: SectionBudgetOverride,
  pub listening: ListeningOverrides,
}

/// Per-type speaking overrides, `{prepMs?, answerMs?}` each.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpeakingOverrides {
  pub read_aloud: Option<PrepAnswerOverride>,
  pub repeat_sentence: Option<PrepAnswerOverride>,
  pub describe_image: Option<PrepAnswerOverride>,
  pub retell_lecture: Option<PrepAnswerOverride>,
  pub answer_short_question: Option<PrepAnswerOverride>,
}

/// Per-type writing overrides, `{answerMs?}` each.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WritingOverrides {
  pub summarize_written_text: Option<SelfTimedOverride>,
  pub write_essay: Option<SelfTimedOverride>,
}

/// `{sectionMs?}`, used by the reading section.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionBudgetOverride {
  pub section_ms: Option<u64>,
}

/// Listening carries both a section budget and the one self-timed type.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListeningOverrides {
  pub section_ms: Option<u64>,
  #[serde(rename = "summarize_spoken_text")]
  pub summarize_spoken_text: Option<SelfTimedOverride>,
}

/// `{prepMs?, answerMs?}` for items with a preparation phase.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrepAnswerOverride {
  pub prep_ms: Option<u64>,
  pub answer_ms: Option<u64>,
}

/// `{answerMs?}` for self-timed items.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelfTimedOverride {
  pub answer_ms: Option<u64>,
}

/// Attempt to load `TimingOverrides` from the environment: a JSON file named
/// by TIMING_OVERRIDES_PATH wins over inline JSON in TIMING_OVERRIDES.
/// On any read or parse error, returns None.
pub fn load_timing_overrides_from_env() -> Option<TimingOverrides> {
  if let Ok(path) = std::env::var(TIMING_OVERRIDES_PATH_VAR) {
    return match std::fs::read_to_string(&path) {
      Ok(blob) => parse_overrides(&blob, &path),
      Err(e) => {
        error!(target: "timing", %path, error = %e, "Failed to read timing override file");
        None
      }
    };
  }
  if let Ok(blob) = std::env::var(TIMING_OVERRIDES_VAR) {
    return parse_overrides(&blob, "<inline>");
  }
  None
}

fn parse_overrides(blob: &str, origin: &str) -> Option<TimingOverrides> {
  match serde_json::from_str::<TimingOverrides>(blob) {
    Ok(overrides) => {
      info!(target: "timing", %origin, "Loaded timing overrides (JSON)");
      Some(overrides)
    }
    Err(e) => {
      error!(target: "timing", %origin, error = %e, blob = %trunc_for_log(blob, 200), "Failed to parse timing overrides");
      None
    }
  }
}
