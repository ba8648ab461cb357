//! Vector Index Client — the single point of entry for all vector-search
//! service calls.
//!
//! Wraps a Qdrant-compatible REST API holding two named collections of
//! 384-dim cosine vectors keyed by record id. Every operation degrades to
//! "unavailable" (`false` / `VectorSearchOutcome::Unavailable`) on any
//! transport or service error; retry/backoff, if ever added, belongs in the
//! orchestrator, not here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::matching::embedding::EMBEDDING_DIM;

pub const JOBS_COLLECTION: &str = "jobs";
pub const CVS_COLLECTION: &str = "cvs";

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// One nearest-neighbor hit as reported by the external service.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: Uuid,
    pub score: f32,
}

/// Explicit outcome of a k-NN search. `Empty` and `Unavailable` both route
/// the caller to the fallback path, but they are distinct, testable states
/// rather than a side effect of error handling.
#[derive(Debug)]
pub enum VectorSearchOutcome {
    Hits(Vec<ScoredPoint>),
    Empty,
    Unavailable,
}

/// Seam for the external nearest-neighbor service. Held in `AppState` as
/// `Option<Arc<dyn VectorIndex>>`; `None` means the service is not
/// configured and matching runs purely on the fallback path.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Idempotently creates `collection` for 384-dim cosine vectors if it
    /// does not exist. Safe to call before every read/write; concurrent
    /// first-time initialization may race, which the service tolerates.
    async fn ensure_collection(&self, collection: &str) -> bool;

    /// Stores or replaces the vector for `id`. A `false` return must never
    /// abort the enclosing write of the primary record: a missing vector
    /// just leaves that record unreachable via vector search.
    async fn upsert(&self, collection: &str, id: Uuid, vector: &[f32]) -> bool;

    /// Returns up to `limit` hits ordered by descending score.
    async fn search(&self, collection: &str, vector: &[f32], limit: usize)
        -> VectorSearchOutcome;
}

#[derive(Debug, Error)]
enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vector service returned status {0}")]
    Api(u16),
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: serde_json::Value,
    score: f32,
}

/// Qdrant REST client. Explicitly constructed at startup and injected; the
/// reqwest client carries a bounded per-request timeout so an unresponsive
/// service maps to the degrade paths instead of hanging requests.
pub struct QdrantClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool, IndexError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/collections/{collection}"))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn create_collection(&self, collection: &str) -> Result<(), IndexError> {
        let body = CreateCollectionRequest {
            vectors: VectorParams {
                size: EMBEDDING_DIM,
                distance: "Cosine",
            },
        };
        let response = self
            .request(reqwest::Method::PUT, &format!("/collections/{collection}"))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexError::Api(response.status().as_u16()));
        }
        info!(collection, "vector collection created");
        Ok(())
    }

    async fn try_upsert(
        &self,
        collection: &str,
        id: Uuid,
        vector: &[f32],
    ) -> Result<(), IndexError> {
        let body = json!({
            "points": [{
                "id": id.to_string(),
                "vector": vector,
                "payload": { "type": collection }
            }]
        });
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{collection}/points"),
            )
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexError::Api(response.status().as_u16()));
        }
        Ok(())
    }

    async fn try_search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, IndexError> {
        let body = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{collection}/points/search"),
            )
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexError::Api(response.status().as_u16()));
        }
        let parsed: SearchResponse = response.json().await?;
        Ok(parse_hits(parsed))
    }
}

#[async_trait]
impl VectorIndex for QdrantClient {
    async fn ensure_collection(&self, collection: &str) -> bool {
        match self.collection_exists(collection).await {
            Ok(true) => true,
            Ok(false) => match self.create_collection(collection).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(collection, error = %e, "failed to create vector collection");
                    false
                }
            },
            Err(e) => {
                warn!(collection, error = %e, "vector service unreachable during collection check");
                false
            }
        }
    }

    async fn upsert(&self, collection: &str, id: Uuid, vector: &[f32]) -> bool {
        if !self.ensure_collection(collection).await {
            return false;
        }
        match self.try_upsert(collection, id, vector).await {
            Ok(()) => {
                debug!(collection, %id, "vector upserted");
                true
            }
            Err(e) => {
                warn!(collection, %id, error = %e, "vector upsert failed");
                false
            }
        }
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> VectorSearchOutcome {
        if !self.ensure_collection(collection).await {
            return VectorSearchOutcome::Unavailable;
        }
        match self.try_search(collection, vector, limit).await {
            Ok(hits) if hits.is_empty() => VectorSearchOutcome::Empty,
            Ok(hits) => VectorSearchOutcome::Hits(hits),
            Err(e) => {
                warn!(collection, error = %e, "vector search failed");
                VectorSearchOutcome::Unavailable
            }
        }
    }
}

/// Extracts `(id, score)` pairs from a search response, dropping hits whose
/// id is not a UUID (points written by an incompatible producer).
fn parse_hits(response: SearchResponse) -> Vec<ScoredPoint> {
    response
        .result
        .into_iter()
        .filter_map(|hit| {
            let id = hit.id.as_str().and_then(|s| Uuid::parse_str(s).ok())?;
            Some(ScoredPoint {
                id,
                score: hit.score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hits_keeps_uuid_ids_in_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let response: SearchResponse = serde_json::from_value(json!({
            "result": [
                { "id": a.to_string(), "score": 0.91 },
                { "id": b.to_string(), "score": 0.64 },
            ]
        }))
        .unwrap();

        let hits = parse_hits(response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, a);
        assert_eq!(hits[1].id, b);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn parse_hits_drops_non_uuid_ids() {
        let keep = Uuid::new_v4();
        let response: SearchResponse = serde_json::from_value(json!({
            "result": [
                { "id": 42, "score": 0.9 },
                { "id": "not-a-uuid", "score": 0.8 },
                { "id": keep.to_string(), "score": 0.7 },
            ]
        }))
        .unwrap();

        let hits = parse_hits(response);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, keep);
    }

    #[test]
    fn parse_hits_of_empty_result_is_empty() {
        let response: SearchResponse = serde_json::from_value(json!({ "result": [] })).unwrap();
        assert!(parse_hits(response).is_empty());
    }
}
