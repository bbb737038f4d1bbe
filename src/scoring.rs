//! Deterministic scorers, one pure function per objective question type.
//!
//! All scorers are total: malformed input (empty strings, empty collections)
//! degrades to a defined numeric result instead of an error; scoring sits
//! on the critical path of an exam submission. Comparison always runs on
//! normalized text; raw counts go into `meta` for auditability.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Map, Value};

use crate::band;
use crate::distance::levenshtein;
use crate::domain::{
  DictationPayload, FillBlanksPayload, MultiChoicePayload, ReorderPayload, ScoringResult, Section,
  SingleChoicePayload,
};
use crate::normalize::{normalize, tokenize};

/// Tag stamped into `meta.provider` by every scorer here; AI-graded tasks
/// (speaking, essays) live elsewhere and carry their own tag.
const PROVIDER: &str = "deterministic";

fn base_meta(task: &str) -> Map<String, Value> {
  let mut meta = Map::new();
  meta.insert("task".into(), json!(task));
  meta.insert("provider".into(), json!(PROVIDER));
  meta
}

/// Single-option selection: full credit iff the normalized selection equals
/// the normalized key, zero otherwise.
pub fn score_single_choice(payload: &SingleChoicePayload) -> ScoringResult {
  let selected = normalize(&payload.selected);
  let correct = normalize(&payload.correct);
  let hit = selected == correct;
  let accuracy = if hit { 1.0 } else { 0.0 };

  let rationale = if hit {
    format!("normalized selection '{selected}' matches the key")
  } else {
    format!("normalized selection '{selected}' does not match key '{correct}'")
  };

  let mut meta = base_meta("single_choice");
  meta.insert("selected_normalized".into(), json!(selected));
  meta.insert("correct_normalized".into(), json!(correct));
  band::build(Section::Reading, accuracy, rationale, meta, None)
}

/// Multiple-option selection with partial credit and an over-selection
/// penalty: `accuracy = clamp((TP - FP) / C, 0, 1)` where C is the size of
/// the correct set, floored at 1. Each wrong pick cancels a right one, so
/// "select everything" scores 0 as soon as FP >= TP. Both sides are
/// deduplicated as sets of normalized options before counting.
pub fn score_multi_choice(payload: &MultiChoicePayload) -> ScoringResult {
  let correct: HashSet<String> = payload.correct_options.iter().map(|o| normalize(o)).collect();
  let selected: HashSet<String> = payload.selected_options.iter().map(|o| normalize(o)).collect();

  let tp = selected.intersection(&correct).count();
  let fp = selected.len() - tp;
  let c = correct.len().max(1);
  let accuracy = (tp as f64 - fp as f64) / c as f64;

  let rationale = format!("TP={tp}, FP={fp}, C={c}: accuracy = (TP-FP)/C, clamped to [0,1]");

  let mut meta = base_meta("multi_choice");
  meta.insert("true_positives".into(), json!(tp));
  meta.insert("false_positives".into(), json!(fp));
  meta.insert("correct_count".into(), json!(correct.len()));
  meta.insert("selected_count".into(), json!(selected.len()));
  band::build(Section::Reading, accuracy, rationale, meta, None)
}

/// Fill-in-the-blanks: every blank enumerated in `correct` weighs equally;
/// a blank counts iff the normalized user answer equals the normalized
/// expected answer. An empty answer key degrades to accuracy 0.
pub fn score_fill_blanks(payload: &FillBlanksPayload) -> ScoringResult {
  let total = payload.correct.len();
  if total == 0 {
    let mut meta = base_meta("fill_blanks");
    meta.insert("blanks_total".into(), json!(0));
    meta.insert("blanks_matched".into(), json!(0));
    return band::build(
      Section::Reading,
      0.0,
      "no gradable blanks in the answer key".into(),
      meta,
      None,
    );
  }

  let mut matched = 0usize;
  for (blank, expected) in &payload.correct {
    let given = payload.answers.get(blank).map(String::as_str).unwrap_or("");
    if normalize(given) == normalize(expected) {
      matched += 1;
    }
  }
  let accuracy = matched as f64 / total as f64;

  let rationale = format!("{matched}/{total} blanks matched after normalization");

  let mut meta = base_meta("fill_blanks");
  meta.insert("blanks_total".into(), json!(total));
  meta.insert("blanks_matched".into(), json!(matched));
  band::build(Section::Reading, accuracy, rationale, meta, None)
}

/// Paragraph reordering, scored as pairwise order agreement with the
/// reference. Ids unknown to the reference are dropped before pairing, as
/// are repeats after their first occurrence. Degenerate cases are defined
/// rather than computed: one surviving paragraph is trivially in order
/// (accuracy 1), none leaves nothing to compare (accuracy 0).
pub fn score_reorder(payload: &ReorderPayload) -> ScoringResult {
  let ref_pos: HashMap<u32, usize> = payload
    .reference
    .iter()
    .enumerate()
    .map(|(pos, id)| (*id, pos))
    .collect();

  let mut seen = HashSet::new();
  let submitted: Vec<u32> = payload
    .order
    .iter()
    .copied()
    .filter(|id| ref_pos.contains_key(id) && seen.insert(*id))
    .collect();

  let n = submitted.len();
  let (accuracy, ordered, pairs, rationale) = match n {
    0 => (0.0, 0, 0, "no submitted paragraph appears in the reference order".to_string()),
    1 => (1.0, 0, 0, "a single common paragraph is trivially in order".to_string()),
    _ => {
      let pairs = n * (n - 1) / 2;
      let mut ordered = 0usize;
      for i in 0..n {
        for j in (i + 1)..n {
          if ref_pos[&submitted[i]] < ref_pos[&submitted[j]] {
            ordered += 1;
          }
        }
      }
      let accuracy = ordered as f64 / pairs as f64;
      let rationale = format!("{ordered}/{pairs} common-paragraph pairs follow the reference order");
      (accuracy, ordered, pairs, rationale)
    }
  };

  let mut meta = base_meta("reorder_paragraphs");
  meta.insert("common_paragraphs".into(), json!(n));
  meta.insert("comparable_pairs".into(), json!(pairs));
  meta.insert("ordered_pairs".into(), json!(ordered));
  band::build(Section::Reading, accuracy, rationale, meta, None)
}

/// Write-from-dictation: word-error-rate of the user's text against the
/// normalized target, `wer = edits / |target tokens|`. An empty target is
/// defined as maximal error (wer 1) no matter the hypothesis. The rate is
/// reported uncapped (a hypothesis much longer than the target genuinely
/// exceeds 1) while accuracy clamps at 0.
pub fn score_dictation(payload: &DictationPayload) -> ScoringResult {
  let target = tokenize(&payload.target_text);
  let user = tokenize(&payload.user_text);

  let mut meta = base_meta("write_from_dictation");
  meta.insert("target_tokens".into(), json!(target.len()));
  meta.insert("user_tokens".into(), json!(user.len()));

  if target.is_empty() {
    meta.insert("edit_distance".into(), json!(user.len()));
    return band::build(
      Section::Listening,
      0.0,
      "empty dictation target: word-error-rate defined as maximal (1)".into(),
      meta,
      Some(1.0),
    );
  }

  let edits = levenshtein(&target, &user);
  let wer = edits as f64 / target.len() as f64;
  let accuracy = (1.0 - wer).max(0.0);

  let rationale = format!(
    "edit distance {edits} over {} reference tokens (WER {wer:.3})",
    target.len()
  );
  meta.insert("edit_distance".into(), json!(edits));
  band::build(Section::Listening, accuracy, rationale, meta, Some(wer))
}
