//! Single source of truth for default tunables — mirrors the numeric
//! defaults named throughout spec.md.

// --- Embedding + scoring (§4.1) ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;
pub const DEFAULT_VECTOR_VERSION: &str = "hashing-v1";
/// λ chosen so ρ(20) = 0.5: λ = ln(2) / 20.
pub const DEFAULT_RECENCY_LAMBDA: f64 = std::f64::consts::LN_2 / 20.0;
pub const DEFAULT_BELIEF_ALPHA: f64 = 0.7;
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

// --- Claim extraction (§4.2) ---
pub const DEFAULT_OPEN_TUPLE_CONFIDENCE_FLOOR: f64 = 0.6;
pub const DEFAULT_HARD_SLOT_CONFIDENCE: f64 = 1.0;

// --- Memory store (§4.3) ---
pub const DEFAULT_DB_FILENAME: &str = "crt.db";
pub const DEFAULT_EXACT_SCAN_CEILING: usize = 1000;

// --- Retrieval (§4.4) ---
pub const DEFAULT_CANDIDATE_FANOUT_MULTIPLIER: usize = 4;
pub const DEFAULT_MIN_TRUST: f64 = 0.0;

// --- Contradiction detection (§4.5) ---
pub const DEFAULT_THETA_CONTRA: f64 = 0.42;

// --- Gates (§4.8) ---
pub const DEFAULT_THETA_CITE: f64 = 0.6;

// --- Trust / confidence (§4.7) ---
pub const DEFAULT_KAPPA_CONFIRM: f64 = 0.2;
pub const DEFAULT_KAPPA_DEGRADE: f64 = 0.2;
pub const DEFAULT_TRUST_FLOOR: f64 = 0.1;
pub const DEFAULT_TRUST_CEILING: f64 = 1.0;
