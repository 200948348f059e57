//! # crt-contradiction
//!
//! The contradiction detector and classifier (C5) and the append-only
//! ledger plus semantic anchor (C6) — spec §4.5, §4.6.

pub mod anchor;
pub mod classify;
pub mod detector;
pub mod ledger;

pub use anchor::build_anchor;
pub use detector::Detector;
pub use ledger::{LedgerEngine, ResolutionEffect};
