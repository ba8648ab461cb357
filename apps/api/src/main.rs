mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
mod store;
mod vector_index;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::matching::embedding::EmbeddingGenerator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_index::{QdrantClient, VectorIndex, CVS_COLLECTION, JOBS_COLLECTION};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and the document-store schema
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the vector index client; absent configuration means the
    // service runs on the fallback path only.
    let vector: Option<Arc<dyn VectorIndex>> = match &config.vector_db_url {
        Some(url) => {
            let client = QdrantClient::new(url.clone(), config.vector_db_api_key.clone());
            info!("Vector index client initialized ({url})");
            Some(Arc::new(client))
        }
        None => {
            warn!("VECTOR_DB_URL not set; vector search disabled, matching uses text-overlap fallback");
            None
        }
    };

    // Best-effort collection setup; failures here are retried per request.
    if let Some(index) = &vector {
        for collection in [JOBS_COLLECTION, CVS_COLLECTION] {
            if !index.ensure_collection(collection).await {
                warn!(collection, "vector collection not ready at startup");
            }
        }
    }

    let embedder = EmbeddingGenerator::new();

    // Build app state
    let state = AppState {
        db,
        vector,
        embedder,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
