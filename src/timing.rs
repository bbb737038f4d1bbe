//! Exam timing: per-question-type defaults, override merging, and the lookup
//! that answers "what are the prep/answer/section budgets for this item?".
//!
//! The resolver is a pure lookup over an immutable snapshot built once at
//! startup. Resolution is total: unknown question types fall back to the
//! section's canonical type and unknown sections to a short reading-style
//! budget, with the substitution logged at warn level and surfaced in
//! `ResolvedTiming::fallback`.

use serde::Serialize;
use tracing::warn;

use crate::config::{self, PrepAnswerOverride, SelfTimedOverride, TimingOverrides};
use crate::domain::{Section, TimingResult};

// Speaking items, prep then answer.
const READ_ALOUD_MS: PrepAnswer = PrepAnswer { prep_ms: 35_000, answer_ms: 40_000 };
const REPEAT_SENTENCE_MS: PrepAnswer = PrepAnswer { prep_ms: 1_000, answer_ms: 15_000 };
const DESCRIBE_IMAGE_MS: PrepAnswer = PrepAnswer { prep_ms: 25_000, answer_ms: 40_000 };
const RETELL_LECTURE_MS: PrepAnswer = PrepAnswer { prep_ms: 10_000, answer_ms: 40_000 };
const ANSWER_SHORT_QUESTION_MS: PrepAnswer = PrepAnswer { prep_ms: 3_000, answer_ms: 10_000 };

// Writing items, answer only.
const SUMMARIZE_WRITTEN_TEXT_MS: u64 = 600_000;
const WRITE_ESSAY_MS: u64 = 1_200_000;

// Section-wide budgets.
const READING_SECTION_MS: u64 = 1_920_000;
const LISTENING_SECTION_MS: u64 = 2_100_000;
// The one listening type that times itself per item.
const SUMMARIZE_SPOKEN_TEXT_MS: u64 = 600_000;

// Sections we don't recognize resolve to this short fixed budget.
const UNKNOWN_SECTION_MS: u64 = 600_000;

/// Canonical type substituted when a speaking lookup misses.
pub const FALLBACK_SPEAKING_TYPE: &str = "read_aloud";
/// Canonical type substituted when a writing lookup misses.
pub const FALLBACK_WRITING_TYPE: &str = "write_essay";

/// Prep + answer budget for one speaking item type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepAnswer {
  pub prep_ms: u64,
  pub answer_ms: u64,
}

/// Marks a lookup that resolved through substituted defaults instead of an
/// exact match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingFallback {
  UnknownQuestionType { requested: String, substituted: &'static str },
  UnknownSection { requested: String },
}

/// Resolver output: the budgets, plus the fallback marker when defaults were
/// substituted. `fallback` is `None` on exact resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTiming {
  pub timing: TimingResult,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fallback: Option<TimingFallback>,
}

fn exact(timing: TimingResult) -> ResolvedTiming {
  ResolvedTiming { timing, fallback: None }
}

/// Immutable timing snapshot: hard-coded defaults, optionally deep-merged
/// with a configuration override. Built once at process start; concurrent
/// reads need no coordination because nothing is ever written afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
  speaking: SpeakingTimings,
  writing: WritingTimings,
  reading: ReadingTimings,
  listening: ListeningTimings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SpeakingTimings {
  read_aloud: PrepAnswer,
  repeat_sentence: PrepAnswer,
  describe_image: PrepAnswer,
  retell_lecture: PrepAnswer,
  answer_short_question: PrepAnswer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WritingTimings {
  summarize_written_text_ms: u64,
  write_essay_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ReadingTimings {
  section_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ListeningTimings {
  summarize_spoken_text_ms: u64,
  section_ms: u64,
}

impl Default for TimingConfig {
  fn default() -> Self {
    Self::defaults()
  }
}

impl TimingConfig {
  /// The hard-coded per-section, per-type defaults.
  pub fn defaults() -> Self {
    TimingConfig {
      speaking: SpeakingTimings {
        read_aloud: READ_ALOUD_MS,
        repeat_sentence: REPEAT_SENTENCE_MS,
        describe_image: DESCRIBE_IMAGE_MS,
        retell_lecture: RETELL_LECTURE_MS,
        answer_short_question: ANSWER_SHORT_QUESTION_MS,
      },
      writing: WritingTimings {
        summarize_written_text_ms: SUMMARIZE_WRITTEN_TEXT_MS,
        write_essay_ms: WRITE_ESSAY_MS,
      },
      reading: ReadingTimings { section_ms: READING_SECTION_MS },
      listening: ListeningTimings {
        summarize_spoken_text_ms: SUMMARIZE_SPOKEN_TEXT_MS,
        section_ms: LISTENING_SECTION_MS,
      },
    }
  }

  /// Defaults deep-merged with an override: a field present in the override
  /// wins, absent fields keep their default. The merge walks typed optional
  /// fields, so overriding one value never disturbs its siblings.
  pub fn merged(overrides: &TimingOverrides) -> Self {
    let mut cfg = Self::defaults();

    apply_prep_answer(&mut cfg.speaking.read_aloud, overrides.speaking.read_aloud);
    apply_prep_answer(&mut cfg.speaking.repeat_sentence, overrides.speaking.repeat_sentence);
    apply_prep_answer(&mut cfg.speaking.describe_image, overrides.speaking.describe_image);
    apply_prep_answer(&mut cfg.speaking.retell_lecture, overrides.speaking.retell_lecture);
    apply_prep_answer(&mut cfg.speaking.answer_short_question, overrides.speaking.answer_short_question);

    apply_answer(&mut cfg.writing.summarize_written_text_ms, overrides.writing.summarize_written_text);
    apply_answer(&mut cfg.writing.write_essay_ms, overrides.writing.write_essay);

    if let Some(ms) = overrides.reading.section_ms {
      cfg.reading.section_ms = ms;
    }
    if let Some(ms) = overrides.listening.section_ms {
      cfg.listening.section_ms = ms;
    }
    apply_answer(&mut cfg.listening.summarize_spoken_text_ms, overrides.listening.summarize_spoken_text);

    cfg
  }

  /// Snapshot for this process: defaults merged with the env-supplied
  /// override, if any.
  pub fn from_env() -> Self {
    match config::load_timing_overrides_from_env() {
      Some(overrides) => Self::merged(&overrides),
      None => Self::defaults(),
    }
  }

  /// Resolve the countdown budgets for an item. Total for any caller input:
  /// section and question type are matched case-insensitively, misses fall
  /// back per section rule (see module docs) rather than failing.
  pub fn resolve(&self, section: &str, question_type: Option<&str>) -> ResolvedTiming {
    let requested = question_type
      .map(|t| t.trim().to_lowercase())
      .filter(|t| !t.is_empty());

    let Some(parsed) = Section::parse(section) else {
      warn!(target: "timing", requested = %section, "Unknown section; resolving to the short fallback budget");
      return ResolvedTiming {
        timing: TimingResult::SectionWide { section_ms: UNKNOWN_SECTION_MS },
        fallback: Some(TimingFallback::UnknownSection { requested: section.trim().to_string() }),
      };
    };

    match parsed {
      // Reading has no per-item timer at all.
      Section::Reading => exact(TimingResult::SectionWide { section_ms: self.reading.section_ms }),

      // Listening: one self-timed type, everything else shares the section
      // budget (that is the rule, not a fallback).
      Section::Listening => match requested.as_deref() {
        Some("summarize_spoken_text") => {
          exact(TimingResult::SelfTimed { answer_ms: self.listening.summarize_spoken_text_ms })
        }
        _ => exact(TimingResult::SectionWide { section_ms: self.listening.section_ms }),
      },

      Section::Speaking => {
        let (slot, fallback) = self.speaking_slot(requested.as_deref());
        ResolvedTiming {
          timing: TimingResult::Prepared { prep_ms: slot.prep_ms, answer_ms: slot.answer_ms },
          fallback,
        }
      }

      Section::Writing => {
        let (answer_ms, fallback) = self.writing_slot(requested.as_deref());
        ResolvedTiming { timing: TimingResult::SelfTimed { answer_ms }, fallback }
      }
    }
  }

  fn speaking_slot(&self, qtype: Option<&str>) -> (PrepAnswer, Option<TimingFallback>) {
    match qtype {
      Some("read_aloud") => (self.speaking.read_aloud, None),
      Some("repeat_sentence") => (self.speaking.repeat_sentence, None),
      Some("describe_image") => (self.speaking.describe_image, None),
      Some("retell_lecture") => (self.speaking.retell_lecture, None),
      Some("answer_short_question") => (self.speaking.answer_short_question, None),
      other => {
        let requested = other.unwrap_or_default().to_string();
        warn!(target: "timing", section = "speaking", %requested, substituted = FALLBACK_SPEAKING_TYPE, "Unknown speaking question type; using canonical defaults");
        (
          self.speaking.read_aloud,
          Some(TimingFallback::UnknownQuestionType { requested, substituted: FALLBACK_SPEAKING_TYPE }),
        )
      }
    }
  }

  fn writing_slot(&self, qtype: Option<&str>) -> (u64, Option<TimingFallback>) {
    match qtype {
      Some("summarize_written_text") => (self.writing.summarize_written_text_ms, None),
      Some("write_essay") => (self.writing.write_essay_ms, None),
      other => {
        let requested = other.unwrap_or_default().to_string();
        warn!(target: "timing", section = "writing", %requested, substituted = FALLBACK_WRITING_TYPE, "Unknown writing question type; using canonical defaults");
        (
          self.writing.write_essay_ms,
          Some(TimingFallback::UnknownQuestionType { requested, substituted: FALLBACK_WRITING_TYPE }),
        )
      }
    }
  }
}

fn apply_prep_answer(slot: &mut PrepAnswer, overrides: Option<PrepAnswerOverride>) {
  if let Some(ov) = overrides {
    if let Some(ms) = ov.prep_ms {
      slot.prep_ms = ms;
    }
    if let Some(ms) = ov.answer_ms {
      slot.answer_ms = ms;
    }
  }
}

fn apply_answer(slot: &mut u64, overrides: Option<SelfTimedOverride>) {
  if let Some(ov) = overrides {
    if let Some(ms) = ov.answer_ms {
      *slot = ms;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn overrides(json: &str) -> TimingOverrides {
    serde_json::from_str(json).expect("override json")
  }

  #[test]
  fn reading_is_always_section_wide() {
    let cfg = TimingConfig::defaults();
    for qtype in [None, Some("multiple_choice"), Some("reorder_paragraphs"), Some("nonsense")] {
      let resolved = cfg.resolve("reading", qtype);
      assert_eq!(resolved.timing, TimingResult::SectionWide { section_ms: READING_SECTION_MS });
      assert_eq!(resolved.fallback, None);
    }
  }

  #[test]
  fn read_aloud_carries_prep_and_answer() {
    let cfg = TimingConfig::defaults();
    let resolved = cfg.resolve("speaking", Some("read_aloud"));
    assert_eq!(resolved.timing, TimingResult::Prepared { prep_ms: 35_000, answer_ms: 40_000 });
    assert_eq!(resolved.fallback, None);
  }

  #[test]
  fn audio_only_speaking_item_has_near_zero_prep() {
    let cfg = TimingConfig::defaults();
    match cfg.resolve("speaking", Some("repeat_sentence")).timing {
      TimingResult::Prepared { prep_ms, answer_ms } => {
        assert!(prep_ms <= 1_000);
        assert!(answer_ms > 0);
      }
      other => panic!("expected prep+answer, got {other:?}"),
    }
  }

  #[test]
  fn lookups_are_case_insensitive() {
    let cfg = TimingConfig::defaults();
    let a = cfg.resolve("SPEAKING", Some(" Read_Aloud "));
    let b = cfg.resolve("speaking", Some("read_aloud"));
    assert_eq!(a, b);
  }

  #[test]
  fn listening_self_timed_type_gets_answer_budget() {
    let cfg = TimingConfig::defaults();
    let resolved = cfg.resolve("listening", Some("summarize_spoken_text"));
    assert_eq!(resolved.timing, TimingResult::SelfTimed { answer_ms: SUMMARIZE_SPOKEN_TEXT_MS });
    assert_eq!(resolved.fallback, None);
  }

  #[test]
  fn other_listening_types_share_the_section_budget() {
    let cfg = TimingConfig::defaults();
    for qtype in [None, Some("highlight_correct_summary"), Some("fill_blanks")] {
      let resolved = cfg.resolve("listening", qtype);
      assert_eq!(resolved.timing, TimingResult::SectionWide { section_ms: LISTENING_SECTION_MS });
      assert_eq!(resolved.fallback, None);
    }
  }

  #[test]
  fn unknown_speaking_type_falls_back_to_read_aloud_and_says_so() {
    let cfg = TimingConfig::defaults();
    let resolved = cfg.resolve("speaking", Some("sing_a_song"));
    assert_eq!(resolved.timing, TimingResult::Prepared { prep_ms: 35_000, answer_ms: 40_000 });
    assert_eq!(
      resolved.fallback,
      Some(TimingFallback::UnknownQuestionType {
        requested: "sing_a_song".into(),
        substituted: "read_aloud",
      })
    );
  }

  #[test]
  fn missing_writing_type_falls_back_to_essay_budget() {
    let cfg = TimingConfig::defaults();
    let resolved = cfg.resolve("writing", None);
    assert_eq!(resolved.timing, TimingResult::SelfTimed { answer_ms: WRITE_ESSAY_MS });
    assert!(matches!(resolved.fallback, Some(TimingFallback::UnknownQuestionType { .. })));
  }

  #[test]
  fn unknown_section_resolves_to_short_budget_with_marker() {
    let cfg = TimingConfig::defaults();
    let resolved = cfg.resolve("grammar", Some("read_aloud"));
    assert_eq!(resolved.timing, TimingResult::SectionWide { section_ms: UNKNOWN_SECTION_MS });
    assert_eq!(
      resolved.fallback,
      Some(TimingFallback::UnknownSection { requested: "grammar".into() })
    );
  }

  #[test]
  fn override_of_one_field_preserves_siblings() {
    let cfg = TimingConfig::merged(&overrides(
      r#"{"speaking": {"read_aloud": {"answerMs": 45000}}}"#,
    ));
    let resolved = cfg.resolve("speaking", Some("read_aloud"));
    // answerMs overridden, prepMs still the default
    assert_eq!(resolved.timing, TimingResult::Prepared { prep_ms: 35_000, answer_ms: 45_000 });
    // unrelated types untouched
    assert_eq!(
      cfg.resolve("speaking", Some("describe_image")).timing,
      TimingResult::Prepared { prep_ms: 25_000, answer_ms: 40_000 }
    );
  }

  #[test]
  fn override_reaches_every_section() {
    let cfg = TimingConfig::merged(&overrides(
      r#"{
        "writing": {"summarize_written_text": {"answerMs": 480000}},
        "reading": {"sectionMs": 1800000},
        "listening": {"sectionMs": 1980000, "summarize_spoken_text": {"answerMs": 540000}}
      }"#,
    ));
    assert_eq!(
      cfg.resolve("writing", Some("summarize_written_text")).timing,
      TimingResult::SelfTimed { answer_ms: 480_000 }
    );
    assert_eq!(cfg.resolve("reading", None).timing, TimingResult::SectionWide { section_ms: 1_800_000 });
    assert_eq!(
      cfg.resolve("listening", Some("summarize_spoken_text")).timing,
      TimingResult::SelfTimed { answer_ms: 540_000 }
    );
    assert_eq!(
      cfg.resolve("listening", Some("multiple_choice")).timing,
      TimingResult::SectionWide { section_ms: 1_980_000 }
    );
    // writing essay keeps its default
    assert_eq!(cfg.resolve("writing", Some("write_essay")).timing, TimingResult::SelfTimed { answer_ms: WRITE_ESSAY_MS });
  }

  #[test]
  fn empty_override_equals_defaults() {
    assert_eq!(TimingConfig::merged(&overrides("{}")), TimingConfig::defaults());
  }
}
