//! RV-Conform - a conformance-test harness for RISC-V simulators
//!
//! This library drives a candidate instruction-set simulator against a corpus
//! of compiled test binaries, caches runs of a trusted reference simulator
//! (the oracle), and classifies each run from sentinel markers in the
//! captured output.

pub mod cli;
pub mod commands;
pub mod common;
pub mod corpus;
pub mod exec;
pub mod harness;
pub mod trace;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::classify::{classify, Outcome};
