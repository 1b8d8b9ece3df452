use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::{Company, EmploymentType, ExperienceLevel};
use crate::models::profile::Profile;
use crate::models::{contains_ci, Identified, Populated};
use crate::session::types::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Hired => "Hired",
        }
    }

    /// Order used for unscored applications in a recruiter's list.
    fn review_priority(&self) -> u8 {
        match self {
            ApplicationStatus::Shortlisted => 0,
            ApplicationStatus::Reviewed => 1,
            ApplicationStatus::Pending => 2,
            ApplicationStatus::Rejected => 3,
            ApplicationStatus::Hired => 4,
        }
    }
}

/// The job as embedded in an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
}

impl Identified for JobSummary {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

impl Identified for Applicant {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Opaque analysis produced by the backend's AI service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub job: Populated<JobSummary>,
    #[serde(default)]
    pub applicant: Option<Populated<Applicant>>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: Option<String>,
    /// Match score in percent, computed by the backend.
    #[serde(default)]
    pub ai_score: Option<f64>,
    #[serde(default)]
    pub ai_insights: Option<AiInsights>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Application {
    /// The backend's score rounded and clamped to 0..=100.
    pub fn match_score(&self) -> Option<u8> {
        self.ai_score
            .filter(|s| s.is_finite())
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
    }

    pub fn job_title(&self) -> Option<&str> {
        self.job.record().map(|j| j.title.as_str())
    }

    pub fn applicant_record(&self) -> Option<&Applicant> {
        self.applicant.as_ref().and_then(Populated::record)
    }
}

/// Body for `POST /applications/{jobId}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Body for `PUT /applications/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
}

/// The applicant's existing application for `job_id`, if any.
pub fn find_application_for_job<'a>(
    applications: &'a [Application],
    job_id: &RecordId,
) -> Option<&'a Application> {
    applications.iter().find(|a| a.job.id() == job_id)
}

/// Scored applications first, best score first; the rest by review status.
pub fn rank_applications(applications: &mut [Application]) {
    applications.sort_by(|a, b| match (a.ai_score, b.ai_score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.status.review_priority().cmp(&b.status.review_priority()),
    });
}

/// Client-side narrowing of a recruiter's application list.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub job_id: Option<RecordId>,
    pub status: Option<ApplicationStatus>,
    /// Matched against applicant name, applicant email and job title.
    pub search: Option<String>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        if let Some(job_id) = &self.job_id {
            if application.job.id() != job_id {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != application.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                let applicant = application.applicant_record();
                applicant.is_some_and(|a| contains_ci(&a.name, &term) || contains_ci(&a.email, &term))
                    || application.job_title().is_some_and(|t| contains_ci(t, &term))
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        applications.iter().filter(|a| self.matches(a)).collect()
    }
}
