use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted candidate profile. Same lifecycle as `JobRow`: append-only,
/// embedding empty when absent and 384-dim when present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub education: String,
    pub skills: Vec<String>,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}
