//! Match orchestration: the two-tier search behind both submission
//! endpoints.
//!
//! Tier one queries the external vector index on the opposite collection
//! and resolves each hit against the document store. Tier two is the
//! deterministic text-overlap fallback over a full collection scan, entered
//! whenever tier one produced no usable result (no embedding, no client,
//! service unavailable, zero hits, or every hit stale). Fallback strictly
//! replaces an empty vector-path result; the two tiers never merge.

use std::time::Duration;

use tracing::{info, warn};

use crate::matching::similarity::token_overlap;
use crate::models::{CvRow, JobRow, MatchResult};
use crate::state::AppState;
use crate::store;
use crate::vector_index::{ScoredPoint, VectorSearchOutcome, CVS_COLLECTION, JOBS_COLLECTION};

/// Maximum results returned on either tier.
pub const MATCH_LIMIT: usize = 5;

/// Fallback results must score strictly above this overlap similarity.
pub const FALLBACK_THRESHOLD: f64 = 0.2;

const SCAN_TIMEOUT_SECS: u64 = 10;

/// Finds the top candidate profiles for a freshly stored job posting.
pub async fn match_cvs_for_job(state: &AppState, job: &JobRow) -> Vec<MatchResult> {
    let mut matches = Vec::new();

    for hit in vector_hits(state, CVS_COLLECTION, &job.embedding).await {
        match store::find_cv(&state.db, hit.id).await {
            Ok(Some(cv)) => matches.push(MatchResult::from_cv(&cv, clamp_score(hit.score))),
            // Stale index entry: the vector outlived its record. Skip.
            Ok(None) => {}
            Err(e) => warn!(id = %hit.id, error = %e, "failed to resolve vector hit; skipping"),
        }
    }

    if matches.is_empty() {
        info!("vector path yielded no CV matches; using text-overlap fallback");
        let cvs = scan_with_timeout(store::scan_cvs(&state.db)).await;
        matches = fallback_rank(&job.description, cvs, |cv| cv.experience.as_str())
            .into_iter()
            .map(|(cv, similarity)| MatchResult::from_cv(&cv, similarity))
            .collect();
    }

    matches
}

/// Finds the top job postings for a freshly stored candidate profile.
pub async fn match_jobs_for_cv(state: &AppState, cv: &CvRow) -> Vec<MatchResult> {
    let mut matches = Vec::new();

    for hit in vector_hits(state, JOBS_COLLECTION, &cv.embedding).await {
        match store::find_job(&state.db, hit.id).await {
            Ok(Some(job)) => matches.push(MatchResult::from_job(&job, clamp_score(hit.score))),
            Ok(None) => {}
            Err(e) => warn!(id = %hit.id, error = %e, "failed to resolve vector hit; skipping"),
        }
    }

    if matches.is_empty() {
        info!("vector path yielded no job matches; using text-overlap fallback");
        let jobs = scan_with_timeout(store::scan_jobs(&state.db)).await;
        matches = fallback_rank(&cv.experience, jobs, |job| job.description.as_str())
            .into_iter()
            .map(|(job, similarity)| MatchResult::from_job(&job, similarity))
            .collect();
    }

    matches
}

/// k-NN hits from the opposite collection, or an empty list when the vector
/// path is unusable for any reason.
async fn vector_hits(state: &AppState, collection: &str, embedding: &[f32]) -> Vec<ScoredPoint> {
    if embedding.is_empty() {
        return Vec::new();
    }
    let Some(index) = &state.vector else {
        return Vec::new();
    };

    match index.search(collection, embedding, MATCH_LIMIT).await {
        VectorSearchOutcome::Hits(hits) => hits,
        VectorSearchOutcome::Empty => Vec::new(),
        VectorSearchOutcome::Unavailable => {
            warn!(collection, "vector index unavailable; falling back to text search");
            Vec::new()
        }
    }
}

/// Scores every candidate against the query text, keeps those strictly
/// above the threshold, and returns at most `MATCH_LIMIT` in descending
/// similarity order. The sort is stable, so equal scores keep their scan
/// order across repeated identical queries.
pub fn fallback_rank<T>(
    query: &str,
    candidates: Vec<T>,
    text_of: impl Fn(&T) -> &str,
) -> Vec<(T, f64)> {
    let mut scored: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let similarity = token_overlap(query, text_of(&candidate));
            (similarity > FALLBACK_THRESHOLD).then_some((candidate, similarity))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MATCH_LIMIT);
    scored
}

/// Vector-reported scores are clamped into [0, 1]: pseudo-embeddings can
/// produce negative cosine, which ranks as zero similarity.
fn clamp_score(score: f32) -> f64 {
    (score as f64).clamp(0.0, 1.0)
}

/// Bounds the full-collection scan. A timeout or store error here degrades
/// to "no fallback candidates" rather than failing the request; the primary
/// record was already written.
async fn scan_with_timeout<T>(
    scan: impl std::future::Future<Output = Result<Vec<T>, sqlx::Error>>,
) -> Vec<T> {
    match tokio::time::timeout(Duration::from_secs(SCAN_TIMEOUT_SECS), scan).await {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) => {
            warn!(error = %e, "fallback scan failed; returning no candidates");
            Vec::new()
        }
        Err(_) => {
            warn!("fallback scan timed out; returning no candidates");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, prefix: &str) -> String {
        (0..n).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn fallback_rank_excludes_scores_at_the_threshold() {
        // 1 shared token over 5 distinct → exactly 0.2: excluded.
        let query = "a b c";
        let at_threshold = vec!["a x y".to_string()];
        assert!(fallback_rank(query, at_threshold, |s| s.as_str()).is_empty());

        // 1 shared over 4 distinct → 0.25: included.
        let above = vec!["a x".to_string()];
        let ranked = fallback_rank(query, above, |s| s.as_str());
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].1 - 0.25).abs() < 1e-9);
    }

    #[test]
    fn fallback_rank_caps_results_at_five() {
        let query = words(10, "w");
        let candidates: Vec<String> = (0..8).map(|_| query.clone()).collect();
        assert_eq!(fallback_rank(&query, candidates, |s| s.as_str()).len(), MATCH_LIMIT);
    }

    #[test]
    fn fallback_rank_sorts_descending() {
        let query = "alpha beta gamma delta";
        let candidates = vec![
            "alpha unrelated1 unrelated2".to_string(), // weaker overlap
            "alpha beta gamma delta".to_string(),      // identical → 1.0
            "alpha beta other".to_string(),            // middling
        ];
        let ranked = fallback_rank(query, candidates, |s| s.as_str());
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(ranked[0].1, 1.0);
    }

    #[test]
    fn fallback_rank_preserves_scan_order_on_ties() {
        let query = "one two three four";
        let candidates = vec![
            "one two x y".to_string(),
            "one two p q".to_string(),
            "one two m n".to_string(),
        ];
        let ranked = fallback_rank(query, candidates.clone(), |s| s.as_str());
        let order: Vec<&str> = ranked.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, vec!["one two x y", "one two p q", "one two m n"]);

        // Repeating the identical query must not reorder.
        let again = fallback_rank(query, candidates, |s| s.as_str());
        let order_again: Vec<&str> = again.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(order, order_again);
    }

    #[test]
    fn fallback_rank_identical_text_scores_one() {
        let query = "senior react developer with 5 years experience";
        let ranked = fallback_rank(query, vec![query.to_string()], |s| s.as_str());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].1, 1.0);
    }

    #[test]
    fn clamp_score_maps_negative_cosine_to_zero() {
        assert_eq!(clamp_score(-0.4), 0.0);
        assert_eq!(clamp_score(0.5), 0.5);
        assert_eq!(clamp_score(1.2), 1.0);
    }
}
