use serde::Serialize;
use uuid::Uuid;

use crate::models::{CvRow, JobRow};

/// Transient projection of one stored record plus its similarity score.
/// Built fresh per query, never persisted. The field set is the union of
/// the job-facing and profile-facing display fields; absent sides are
/// omitted from the JSON entirely.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub id: Uuid,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
}

impl MatchResult {
    /// Candidate-facing result returned to a job submission.
    pub fn from_cv(cv: &CvRow, similarity: f64) -> Self {
        Self {
            id: cv.id,
            similarity,
            name: Some(cv.name.clone()),
            email: Some(cv.email.clone()),
            experience: Some(cv.experience.clone()),
            skills: Some(cv.skills.clone()),
            title: None,
            description: None,
            company: None,
            location: None,
            requirements: None,
        }
    }

    /// Job-facing result returned to a CV submission. Display defaults for
    /// unpopulated optional fields match the stored-data contract.
    pub fn from_job(job: &JobRow, similarity: f64) -> Self {
        Self {
            id: job.id,
            similarity,
            name: None,
            email: None,
            experience: None,
            skills: None,
            title: Some(job.title.clone().unwrap_or_else(|| "Job Posting".to_string())),
            description: Some(job.description.clone()),
            company: Some(job.company.clone().unwrap_or_else(|| "Company".to_string())),
            location: Some(job.location.clone().unwrap_or_else(|| "Location".to_string())),
            requirements: job.requirements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_cv() -> CvRow {
        CvRow {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            experience: "compiler engineering".to_string(),
            education: String::new(),
            skills: vec!["rust".to_string()],
            embedding: vec![],
            created_at: Utc::now(),
        }
    }

    fn sample_job() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: None,
            description: "build compilers".to_string(),
            company: None,
            location: None,
            requirements: None,
            embedding: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cv_result_omits_job_side_fields_in_json() {
        let result = MatchResult::from_cv(&sample_cv(), 0.8);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("name").is_some());
        assert!(json.get("skills").is_some());
        assert!(json.get("title").is_none());
        assert!(json.get("company").is_none());
    }

    #[test]
    fn job_result_fills_display_defaults() {
        let result = MatchResult::from_job(&sample_job(), 0.5);
        assert_eq!(result.title.as_deref(), Some("Job Posting"));
        assert_eq!(result.company.as_deref(), Some("Company"));
        assert_eq!(result.location.as_deref(), Some("Location"));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("name").is_none());
        assert!(json.get("requirements").is_none());
    }
}
