use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::pipeline::{match_cvs_for_job, match_jobs_for_cv};
use crate::models::{CvRow, JobRow, MatchResult};
use crate::state::AppState;
use crate::store;
use crate::vector_index::{CVS_COLLECTION, JOBS_COLLECTION};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingRequest {
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateProfileRequest {
    #[serde(default, rename = "cvData")]
    pub cv_data: Option<CvData>,
}

#[derive(Debug, Deserialize)]
pub struct CvData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileResponse {
    pub success: bool,
    pub cv_id: Uuid,
    pub matches: Vec<MatchResult>,
}

/// POST /match/job-posting
///
/// Validates, embeds, persists, then matches against the cvs collection.
/// Only the primary insert can fail the request; every matching failure
/// downstream degrades to fewer or fallback results.
pub async fn handle_job_posting(
    State(state): State<AppState>,
    Json(req): Json<JobPostingRequest>,
) -> Result<Json<JobPostingResponse>, AppError> {
    let description = match req.job_description {
        Some(ref d) if !d.trim().is_empty() => d.clone(),
        _ => {
            return Err(AppError::Validation(
                "Job description is required".to_string(),
            ))
        }
    };

    let embedding = state.embedder.generate(&description);

    let job = JobRow {
        id: Uuid::new_v4(),
        title: req.title,
        description,
        company: req.company,
        location: req.location,
        requirements: req.requirements,
        embedding,
        created_at: Utc::now(),
    };

    store::insert_job(&state.db, &job).await?;
    index_vector(&state, JOBS_COLLECTION, job.id, &job.embedding).await;

    let matches = match_cvs_for_job(&state, &job).await;

    Ok(Json(JobPostingResponse {
        success: true,
        job_id: job.id,
        matches,
    }))
}

/// POST /match/candidate-profile
///
/// Mirror of `handle_job_posting` with cvs as source and jobs as target.
pub async fn handle_candidate_profile(
    State(state): State<AppState>,
    Json(req): Json<CandidateProfileRequest>,
) -> Result<Json<CandidateProfileResponse>, AppError> {
    let Some(data) = req.cv_data else {
        return Err(AppError::Validation("CV experience is required".to_string()));
    };
    let experience = match data.experience {
        Some(ref e) if !e.trim().is_empty() => e.clone(),
        _ => return Err(AppError::Validation("CV experience is required".to_string())),
    };

    let embedding = state.embedder.generate(&experience);

    let cv = CvRow {
        id: Uuid::new_v4(),
        name: data.name.unwrap_or_else(|| "Anonymous".to_string()),
        email: data.email.unwrap_or_default(),
        phone: data.phone.unwrap_or_default(),
        experience,
        education: data.education.unwrap_or_default(),
        skills: data.skills.unwrap_or_default(),
        embedding,
        created_at: Utc::now(),
    };

    store::insert_cv(&state.db, &cv).await?;
    index_vector(&state, CVS_COLLECTION, cv.id, &cv.embedding).await;

    let matches = match_jobs_for_cv(&state, &cv).await;

    Ok(Json(CandidateProfileResponse {
        success: true,
        cv_id: cv.id,
        matches,
    }))
}

/// Best-effort upsert of the new record's vector into its own collection so
/// later submissions from the other side can find it. Failure just leaves
/// the record unreachable via vector search until re-indexed.
async fn index_vector(state: &AppState, collection: &str, id: Uuid, embedding: &[f32]) {
    if embedding.is_empty() {
        return;
    }
    if let Some(index) = &state.vector {
        index.upsert(collection, id, embedding).await;
    }
}
