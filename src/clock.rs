//! Countdown rendering and clock arithmetic for exam timers.
//!
//! All inputs and outputs are plain epoch/duration milliseconds; the caller
//! owns the clocks. Nothing here takes corrective action on drift: the
//! value is advisory and thresholds (warn, auto-submit) are caller policy.

/// Render a millisecond duration as "mm:ss", switching to "hh:mm:ss" once
/// the duration reaches one hour. Negative durations render as zero;
/// sub-second remainders are floored, not rounded.
pub fn format_clock(duration_ms: i64) -> String {
  let total_secs = duration_ms.max(0) / 1000;
  let hours = total_secs / 3600;
  let minutes = (total_secs % 3600) / 60;
  let seconds = total_secs % 60;
  if hours > 0 {
    format!("{hours:02}:{minutes:02}:{seconds:02}")
  } else {
    format!("{minutes:02}:{seconds:02}")
  }
}

/// Deadline for an item started at `start_at_ms`; a negative duration
/// counts as zero elapsed time.
pub fn end_at_from(start_at_ms: i64, duration_ms: i64) -> i64 {
  start_at_ms + duration_ms.max(0)
}

/// Signed clock drift; positive means the client clock runs ahead of the
/// server.
pub fn drift_ms(server_now_ms: i64, client_now_ms: i64) -> i64 {
  client_now_ms - server_now_ms
}
