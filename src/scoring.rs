//! Accuracy and speed scoring for a single typed word.
//!
//! Both scores land on a 0-100 scale and are rounded to two decimals.
//! Two edge behaviours, both covered by tests:
//! - accuracy penalties above 100 are reflected with `abs()` instead of
//!   being floored at zero (six backspaces on a five letter word scores 20)
//! - a time ratio of exactly 1.0 scores 0

use std::time::SystemTime;

use crate::capture::CaptureResult;
use crate::word::TestWord;

/// Average reaction time before the first keystroke, in seconds
pub const AVG_TRANSITION_SECS: f64 = 0.4;
/// Average time for one keystroke, in seconds
pub const AVG_KEYSTROKE_SECS: f64 = 0.28;

pub const ACCURACY_WEIGHT: f64 = 0.5;
pub const TIME_WEIGHT: f64 = 0.5;

/// Round to two decimal places, working on the exact binary value.
///
/// Exact halfway values (only possible for multiples of 1/8, e.g. 90.625)
/// go to the even hundredth.
pub fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        // value * 100 is exact here and ends in .5
        let lower = (value * 100.0).floor();
        let hundredths = if lower.rem_euclid(2.0) == 0.0 {
            lower
        } else {
            lower + 1.0
        };
        return hundredths / 100.0;
    }

    // {:.2} rounds the exact decimal expansion, not a pre-scaled copy
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Positional character distance between two strings.
///
/// Characters are compared pairwise over the shared prefix length, then every
/// extra or missing character adds one.
pub fn count_mismatches(reference: &str, candidate: &str) -> usize {
    let reference_len = reference.chars().count();
    let candidate_len = candidate.chars().count();

    let differing = reference
        .chars()
        .zip(candidate.chars())
        .filter(|(r, c)| r != c)
        .count();

    differing + reference_len.abs_diff(candidate_len)
}

/// Percentage weight of a single character of `test_word`
pub fn per_letter_score(test_word: &TestWord) -> f64 {
    100.0 / test_word.len() as f64
}

pub fn calc_accuracy_score(typed_word: &str, test_word: &TestWord, backspace_count: u32) -> f64 {
    let per_letter = per_letter_score(test_word);
    let backspace_penalty = backspace_count as f64 * per_letter;
    let mismatch_count = count_mismatches(test_word.as_str(), typed_word);
    let mismatch_penalty = mismatch_count as f64 * per_letter;

    round2((100.0 - backspace_penalty - mismatch_penalty).abs())
}

/// Expected seconds to type `typed_word` plus the terminating Enter
pub fn expected_typing_secs(typed_word: &str) -> f64 {
    AVG_TRANSITION_SECS + AVG_KEYSTROKE_SECS * (typed_word.chars().count() + 1) as f64
}

/// Signed wall-clock seconds from `start` to `end`; negative when the clock
/// went backwards.
pub fn signed_secs_between(start: SystemTime, end: SystemTime) -> f64 {
    match end.duration_since(start) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

pub fn calc_time_score(start_time: SystemTime, end_time: SystemTime, typed_word: &str) -> f64 {
    time_score_from_elapsed(signed_secs_between(start_time, end_time), typed_word)
}

pub fn time_score_from_elapsed(elapsed_secs: f64, typed_word: &str) -> f64 {
    let raw_score = elapsed_secs / expected_typing_secs(typed_word);

    let mut score = 0.0;
    if raw_score < 1.0 {
        score = 100.0;
    } else if raw_score > 1.0 {
        score = (100.0 / raw_score).max(0.0);
    }

    round2(score)
}

pub fn calc_total_score(accuracy_score: f64, time_score: f64) -> f64 {
    round2(accuracy_score * ACCURACY_WEIGHT + time_score * TIME_WEIGHT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub accuracy_score: f64,
    pub time_score: f64,
    pub total_score: f64,
}

impl Scores {
    pub fn compute(test_word: &TestWord, capture: &CaptureResult) -> Self {
        let accuracy_score =
            calc_accuracy_score(&capture.typed_word, test_word, capture.backspace_count);
        let time_score = calc_time_score(capture.start_time, capture.end_time, &capture.typed_word);
        let total_score = calc_total_score(accuracy_score, time_score);

        tracing::info!(accuracy_score, time_score, total_score, "scored round");

        Self {
            accuracy_score,
            time_score,
            total_score,
        }
    }
}
