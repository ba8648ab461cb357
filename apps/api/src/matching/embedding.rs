//! Deterministic pseudo-embedding generation.
//!
//! This is a hash-style stand-in for a real semantic model: identical input
//! always produces an identical vector (so stored vectors stay retrievable),
//! but the dimensions carry no semantic meaning. Scores derived from these
//! vectors are a heuristic signal only. If a real embedding model is
//! integrated later it must keep the 384-dim contract and re-index existing
//! records.

use crate::matching::text::normalize_for_embedding;

/// System-wide embedding dimensionality, shared by the jobs and cvs
/// collections. Matches the all-MiniLM-L6-v2 size the vector collections
/// are configured for.
pub const EMBEDDING_DIM: usize = 384;

/// Maps text to a fixed-length vector. Constructed at startup and injected
/// via `AppState`; no global instance.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingGenerator;

impl EmbeddingGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates a 384-dim vector with every component in [-1, 1].
    /// Pure arithmetic over the normalized lower-cased text; never fails.
    ///
    /// For each dimension `i`, accumulate `(code * (j+1) * (i+1)) % 1000`
    /// over every character position `j`, then fold the sum into [-1, 1].
    pub fn generate(&self, text: &str) -> Vec<f32> {
        let normalized = normalize_for_embedding(text);
        let codes: Vec<u64> = normalized.chars().map(|c| c as u64).collect();

        let mut embedding = Vec::with_capacity(EMBEDDING_DIM);
        for i in 0..EMBEDDING_DIM as u64 {
            let mut value: u64 = 0;
            for (j, &code) in codes.iter().enumerate() {
                value += (code * (j as u64 + 1) * (i + 1)) % 1000;
            }
            embedding.push(((value % 2000) as f32 - 1000.0) / 1000.0);
        }
        embedding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_has_fixed_dimension() {
        let gen = EmbeddingGenerator::new();
        assert_eq!(gen.generate("Senior Rust Developer").len(), EMBEDDING_DIM);
        assert_eq!(gen.generate("").len(), EMBEDDING_DIM);
    }

    #[test]
    fn embedding_components_stay_in_range() {
        let gen = EmbeddingGenerator::new();
        let emb = gen.generate("Full-stack engineer with React and PostgreSQL experience");
        assert!(emb.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn identical_text_yields_identical_vectors() {
        let gen = EmbeddingGenerator::new();
        let text = "Backend developer, 5 years of Go and Kubernetes";
        assert_eq!(gen.generate(text), gen.generate(text));
    }

    #[test]
    fn case_and_markup_do_not_change_the_vector() {
        let gen = EmbeddingGenerator::new();
        assert_eq!(
            gen.generate("<p>Rust   Developer</p>"),
            gen.generate("rust developer")
        );
    }

    #[test]
    fn distinct_texts_yield_distinct_vectors() {
        let gen = EmbeddingGenerator::new();
        let a = gen.generate("embedded firmware engineer");
        let b = gen.generate("marketing content strategist");
        assert_ne!(a, b);
    }
}
