//! # crt-trust
//!
//! The bounded trust/confidence update model (C7) — spec §4.7.

pub mod engine;

pub use engine::{TrustEngine, TrustMutation, TrustUpdatePlan};
