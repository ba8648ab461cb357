//! Document store queries. Append-only: records are inserted once and never
//! updated in place.
//!
//! `scan_jobs` / `scan_cvs` load the whole collection into memory for the
//! fallback matching path. That is an explicit scalability ceiling of this
//! design, acceptable for small datasets; a production-scale deployment
//! would replace the full scan with pagination or push overlap scoring into
//! the store.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CvRow, JobRow};

pub async fn insert_job(pool: &PgPool, job: &JobRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO jobs (id, title, description, company, location, requirements, embedding, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(job.id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.company)
    .bind(&job.location)
    .bind(&job.requirements)
    .bind(&job.embedding)
    .bind(job.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_cv(pool: &PgPool, cv: &CvRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cvs (id, name, email, phone, experience, education, skills, embedding, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(cv.id)
    .bind(&cv.name)
    .bind(&cv.email)
    .bind(&cv.phone)
    .bind(&cv.experience)
    .bind(&cv.education)
    .bind(&cv.skills)
    .bind(&cv.embedding)
    .bind(cv.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_cv(pool: &PgPool, id: Uuid) -> Result<Option<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn scan_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn scan_cvs(pool: &PgPool) -> Result<Vec<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs ORDER BY created_at")
        .fetch_all(pool)
        .await
}
