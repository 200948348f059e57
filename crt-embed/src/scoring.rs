//! The three deterministic score primitives from spec §4.1, plus the
//! composite retrieval score `R = sim · ρ · w`.

/// Cosine similarity of two vectors. Undefined (zero-norm) vectors compare
/// to 0, never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// ρ(Δt) = exp(−λ·Δt). Monotone non-increasing in Δt. `delta_turns` is
/// clamped to ≥ 0 (a memory can't be more recent than "now").
pub fn recency(delta_turns: i64, lambda: f64) -> f64 {
    let dt = delta_turns.max(0) as f64;
    (-lambda * dt).exp()
}

/// w = α·trust + (1−α)·confidence.
pub fn belief_weight(trust: f64, confidence: f64, alpha: f64) -> f64 {
    alpha * trust + (1.0 - alpha) * confidence
}

/// R = sim · ρ · w — the composite score used by retrieval ranking (§4.4).
pub fn retrieval_score(sim: f64, rho: f64, w: f64) -> f64 {
    sim * rho * w
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
    }

    #[test]
    fn recency_is_monotone_non_increasing() {
        let lambda = std::f64::consts::LN_2 / 20.0;
        let mut prev = recency(0, lambda);
        for dt in 1..100 {
            let cur = recency(dt, lambda);
            assert!(cur <= prev);
            prev = cur;
        }
    }

    #[test]
    fn recency_at_twenty_turns_is_one_half() {
        let lambda = std::f64::consts::LN_2 / 20.0;
        assert!((recency(20, lambda) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn negative_delta_clamped_to_zero() {
        let lambda = std::f64::consts::LN_2 / 20.0;
        assert_eq!(recency(-5, lambda), recency(0, lambda));
    }
}
