//! Outcome classification from captured output
//!
//! Test binaries self-report through sentinel markers somewhere in their
//! output stream. Matching is substring containment over the whole captured
//! stream, not line-anchored, and the pass marker is checked first; both
//! choices are load-bearing for compatibility with existing trace tooling.

use serde::Serialize;

/// Marker a test binary emits on self-reported success
pub const PASS_MARKER: &[u8] = b"RISCV_TEST_PASS";
/// Marker a test binary emits on self-reported failure
pub const FAIL_MARKER: &[u8] = b"RISCV_TEST_FAIL";

/// Terminal classification of one candidate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Candidate self-reported success
    Pass,
    /// Candidate ran to completion and self-reported failure
    Fail,
    /// Neither marker found: abnormal termination, kill after timeout, or
    /// unrecognizable output
    Crash,
}

impl Outcome {
    /// Console label used in the per-test report line
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail normal",
            Self::Crash => "Fail crash",
        }
    }
}

/// Classify a candidate trace
///
/// Pure function of the input bytes: identical input always yields an
/// identical outcome.
pub fn classify(trace: &[u8]) -> Outcome {
    if contains(trace, PASS_MARKER) {
        Outcome::Pass
    } else if contains(trace, FAIL_MARKER) {
        Outcome::Fail
    } else {
        Outcome::Crash
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
