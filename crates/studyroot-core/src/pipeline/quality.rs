//! Heuristic quality gate for generated answers
//!
//! Rejects output that looks truncated, degenerate or garbled. Rejected
//! answers are never persisted and never shown to the student.

use std::collections::HashMap;
use std::fmt;

/// Minimum trimmed answer length, in characters
pub const MIN_ANSWER_CHARS: usize = 50;

/// Why an answer was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    MostlyLineBreaks,
    ExcessiveEllipses,
    RepeatedToken,
    RepeatedPattern,
    BrokenEncoding,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::TooShort => "answer too short",
            Rejection::MostlyLineBreaks => "mostly line breaks",
            Rejection::ExcessiveEllipses => "too many ellipses",
            Rejection::RepeatedToken => "one token dominates the answer",
            Rejection::RepeatedPattern => "degenerate repetition",
            Rejection::BrokenEncoding => "encoding corruption",
        };
        f.write_str(reason)
    }
}

/// Check an answer, returning the first failed check
pub fn assess(answer: &str) -> Result<(), Rejection> {
    let clean = answer.trim();
    let len = clean.chars().count();

    if len < MIN_ANSWER_CHARS {
        return Err(Rejection::TooShort);
    }

    if clean.matches('\n').count() > 20 && len < 200 {
        return Err(Rejection::MostlyLineBreaks);
    }

    if clean.matches("...").count() > 3 {
        return Err(Rejection::ExcessiveEllipses);
    }

    let lower = clean.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() > 5 {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in &words {
            *counts.entry(word).or_insert(0) += 1;
        }
        let limit = words.len() as f64 * 0.3;
        if counts.values().any(|&count| count as f64 > limit) {
            return Err(Rejection::RepeatedToken);
        }
    }

    if lower.contains("eta eta eta") {
        return Err(Rejection::RepeatedPattern);
    }

    if clean.contains('\u{FFFD}') || clean.matches('?').count() as f64 > len as f64 * 0.2 {
        return Err(Rejection::BrokenEncoding);
    }

    Ok(())
}

/// Whether an answer passes every check
pub fn is_quality(answer: &str) -> bool {
    assess(answer).is_ok()
}
