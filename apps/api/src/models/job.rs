use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job posting. Append-only: rows are never updated in place.
/// `embedding` is empty when no vector was generated for the record; when
/// present it is always exactly `EMBEDDING_DIM` long.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}
