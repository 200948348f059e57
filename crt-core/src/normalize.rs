//! Canonical-value normalization for hard slots (spec §3 "value").
//!
//! Shared between `crt-extract` (producing `Memory::value`) and
//! `crt-contradiction` (comparing normalized values on the fast path).

/// Per-slot stopwords stripped from the lowercased, trimmed value.
fn stopwords_for(slot: &str) -> &'static [&'static str] {
    match slot {
        "employer" | "undergrad_school" | "masters_school" => {
            &["the", "a", "an", "inc", "inc.", "llc", "corp", "corp.", "co", "co."]
        }
        "location" => &["the", "a", "an", "in", "at"],
        "title" | "occupation" => &["a", "an", "the", "senior", "junior"],
        _ => &[],
    }
}

/// Lowercase, trim, and strip per-slot stopwords — the canonical `value`
/// stored on a `Memory` for a given `slot`.
pub fn normalize_value(slot: &str, raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stop = stopwords_for(slot);
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| !stop.contains(w))
        .collect();
    let joined = words.join(" ");
    if joined.is_empty() {
        lowered
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_stopwords_and_case() {
        assert_eq!(normalize_value("employer", "  The Amazon Inc. "), "amazon");
        assert_eq!(normalize_value("name", "Ada"), "ada");
    }

    #[test]
    fn falls_back_to_lowercased_when_all_stopwords() {
        assert_eq!(normalize_value("employer", "the inc"), "the inc");
    }
}
