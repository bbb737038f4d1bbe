//! Free-text answer canonicalization.
//!
//! Every scorer compares answers only after `normalize`, so case, accents,
//! punctuation, and spacing never produce false negatives.
//!
//! Example:
//!   input:  "  The CAFÉ, obviously! "
//!   output: "the cafe obviously"

use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text for comparison: lower-case, Unicode canonical
/// decomposition (NFD), keep only letters/digits/whitespace/apostrophes
/// (the combining marks NFD splits off fall out here, which is what makes
/// "café" equal to "cafe"), collapse whitespace runs, trim.
///
/// Total function: never fails, empty input normalizes to the empty string.
pub fn normalize(text: &str) -> String {
  let kept: String = text
    .to_lowercase()
    .nfd()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
    .collect();
  kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized word tokens, for dictation-style comparisons.
pub fn tokenize(text: &str) -> Vec<String> {
  normalize(text)
    .split_whitespace()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_is_idempotent() {
    for s in ["", "  A  b ", "Café, sí!", "don't stop", "a\tb\nc"] {
      let once = normalize(s);
      assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
    }
  }

  #[test]
  fn case_punctuation_and_spacing_are_ignored() {
    assert_eq!(normalize("  The CAT.  "), "the cat");
    assert_eq!(normalize("the,cat"), "thecat");
    assert_eq!(normalize("a \t b\n c"), "a b c");
  }

  #[test]
  fn diacritics_compare_equal_to_base_letters() {
    assert_eq!(normalize("Café"), "cafe");
    assert_eq!(normalize("naïve résumé"), "naive resume");
  }

  #[test]
  fn apostrophes_survive() {
    assert_eq!(normalize("Don't"), "don't");
  }

  #[test]
  fn empty_and_junk_input_degrade_to_empty() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("   "), "");
    assert_eq!(normalize("?!...;"), "");
  }

  #[test]
  fn tokenize_splits_normalized_words() {
    assert_eq!(tokenize("The cat, sat!"), vec!["the", "cat", "sat"]);
    assert!(tokenize(" . ").is_empty());
  }
}
