use std::collections::HashSet;

/// Raw cosine similarity between two equal-length vectors.
///
/// Returns 0.0 on dimension mismatch (a data-integrity bug upstream, not a
/// user error, so it is logged and swallowed) and on zero-norm inputs.
/// The result is not clamped here; pseudo-embeddings can produce negative
/// cosine, and ranking callers clamp to [0, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Jaccard index over the token vocabularies of two texts:
/// |intersection| / |union| of the distinct lower-cased whitespace-split
/// tokens. Symmetric, deterministic, 0.0 when the union is empty.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let tokens_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();

    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_a_vector_with_itself_is_one() {
        let a = vec![0.3, -0.7, 0.2, 0.9];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vec![0.1, 0.5, -0.3];
        let b = vec![-0.4, 0.2, 0.8];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn cosine_returns_zero_on_dimension_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_returns_zero_for_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_can_be_negative_before_clamping() {
        assert!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) < 0.0);
    }

    #[test]
    fn overlap_of_identical_texts_is_one() {
        let text = "senior react developer with five years experience";
        assert_eq!(token_overlap(text, text), 1.0);
    }

    #[test]
    fn overlap_of_disjoint_vocabularies_is_zero() {
        assert_eq!(token_overlap("rust tokio axum", "python django flask"), 0.0);
    }

    #[test]
    fn overlap_is_case_insensitive_and_symmetric() {
        let a = "Rust Developer";
        let b = "rust engineer";
        assert_eq!(token_overlap(a, b), token_overlap(b, a));
        assert!(token_overlap(a, b) > 0.0);
    }

    #[test]
    fn overlap_of_empty_texts_is_zero() {
        assert_eq!(token_overlap("", ""), 0.0);
        assert_eq!(token_overlap("   ", "\t\n"), 0.0);
    }

    #[test]
    fn overlap_uses_the_jaccard_formula_over_token_sets() {
        // Two twenty-word texts differing in exactly one word:
        // intersection 19, union 21 → 19/21, not a word-count ratio.
        let a = "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12 w13 w14 w15 w16 w17 w18 w19 w20";
        let b = "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12 w13 w14 w15 w16 w17 w18 w19 different";
        let sim = token_overlap(a, b);
        assert!((sim - 19.0 / 21.0).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn overlap_counts_distinct_tokens_only() {
        // Repetition does not inflate the score.
        assert_eq!(token_overlap("rust rust rust", "rust"), 1.0);
    }
}
