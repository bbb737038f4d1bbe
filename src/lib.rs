//! prepcore · Deterministic scoring & timing core
//!
//! The scoring and timing subsystem of an exam-preparation platform for a
//! standardized English test banded 0-90:
//! - Text-normalized answer comparison (case/diacritics/punctuation safe)
//! - Partial-credit multi-choice scoring with an over-selection penalty
//! - Word-error-rate dictation scoring over token-level edit distance
//! - Pairwise order accuracy for paragraph reordering
//! - Config-driven exam timing with env-sourced JSON overrides
//!
//! Everything is pure and synchronous; the one-time timing-override load at
//! startup is the only I/O. The embedding service supplies payloads (answer
//! keys included; this crate never fetches them) and persists the returned
//! results.
//!
//! Important env variables:
//!   TIMING_OVERRIDES_PATH : path to a JSON timing override file
//!   TIMING_OVERRIDES      : inline JSON timing override blob
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod normalize;
pub mod distance;
pub mod band;
pub mod scoring;
pub mod config;
pub mod timing;
pub mod clock;

pub use domain::{
  DictationPayload, FillBlanksPayload, MultiChoicePayload, ReorderPayload, ScoringResult, Section,
  SingleChoicePayload, TimingResult,
};
pub use scoring::{
  score_dictation, score_fill_blanks, score_multi_choice, score_reorder, score_single_choice,
};
pub use timing::{ResolvedTiming, TimingConfig, TimingFallback};
