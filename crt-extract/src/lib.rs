//! # crt-extract
//!
//! Turns an utterance into typed hard-slot facts plus open tuples (C2):
//! Tier A deterministic rules over the reserved hard-slot set, and a
//! bundled reference Tier B rule-based extractor for open tuples.

pub mod extractor;
pub mod hard_slots;
pub mod open_tuples;

pub use extractor::RuleBasedExtractor;
pub use hard_slots::extract_hard_slots;
pub use open_tuples::extract_open_tuples;
