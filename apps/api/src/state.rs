use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::embedding::EmbeddingGenerator;
use crate::vector_index::VectorIndex;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// `None` when `VECTOR_DB_URL` is not configured; matching then runs
    /// entirely on the text-overlap fallback path.
    pub vector: Option<Arc<dyn VectorIndex>>,
    pub embedder: EmbeddingGenerator,
    pub config: Config,
}
