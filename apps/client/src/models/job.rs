use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{contains_ci, Identified};
use crate::session::types::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    #[default]
    Mid,
    Senior,
    Lead,
    Executive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default)]
    pub min: Option<u64>,
    #[serde(default)]
    pub max: Option<u64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for Salary {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            currency: default_currency(),
        }
    }
}

impl Salary {
    /// `"USD 50,000 - 80,000"`, or `None` unless both bounds are set and non-zero.
    pub fn display(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > 0 && max > 0 => Some(format!(
                "{} {} - {}",
                self.currency,
                group_thousands(min),
                group_thousands(max)
            )),
            _ => None,
        }
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub title: String,
    pub company: Company,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Job {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl Job {
    pub fn salary_display(&self) -> String {
        self.salary
            .as_ref()
            .and_then(Salary::display)
            .unwrap_or_else(|| "Salary not specified".to_string())
    }
}

/// Body for `POST /jobs`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: Company,
    pub description: String,
    pub requirements: String,
    pub skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub employment_type: EmploymentType,
    pub salary: Salary,
    pub location: String,
    pub remote: bool,
}

impl NewJob {
    /// Adds a trimmed skill unless it is blank or already listed.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }
}

/// Partial body for `PUT /jobs/{id}`; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Salary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

/// Query string for `GET /jobs`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
}

/// Client-side narrowing of a fetched job list.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Matched against title, company name and location.
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub experience_level: Option<ExperienceLevel>,
    pub employment_type: Option<EmploymentType>,
    pub remote_only: bool,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if self.experience_level.is_some_and(|l| l != job.experience_level) {
            return false;
        }
        if self.employment_type.is_some_and(|t| t != job.employment_type) {
            return false;
        }
        if self.remote_only && !job.remote {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                contains_ci(&job.title, &term)
                    || contains_ci(&job.company.name, &term)
                    || contains_ci(&job.location, &term)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, jobs: &'a [Job]) -> Vec<&'a Job> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(title: &str, company: &str, location: &str, remote: bool, status: &str) -> Job {
        serde_json::from_value(json!({
            "_id": title.to_lowercase().replace(' ', "-"),
            "title": title,
            "company": { "name": company },
            "location": location,
            "remote": remote,
            "status": status,
            "experienceLevel": "senior",
            "employmentType": "full-time",
            "skills": ["react"]
        }))
        .unwrap()
    }

    #[test]
    fn test_job_decodes_backend_shape() {
        let job: Job = serde_json::from_value(json!({
            "_id": "j1",
            "title": "Senior React Developer",
            "company": { "name": "TechInnovate Inc.", "website": "https://t.io" },
            "employmentType": "part-time",
            "experienceLevel": "lead",
            "salary": { "min": 50000, "max": 80000, "currency": "EUR" },
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(job.id, RecordId::from("j1"));
        assert_eq!(job.employment_type, EmploymentType::PartTime);
        assert_eq!(job.experience_level, ExperienceLevel::Lead);
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.salary_display(), "EUR 50,000 - 80,000");
    }

    #[test]
    fn test_salary_needs_both_bounds() {
        let salary = Salary {
            min: Some(50_000),
            max: None,
            ..Salary::default()
        };
        assert_eq!(salary.display(), None);
        let salary = Salary {
            min: Some(0),
            max: Some(10),
            ..Salary::default()
        };
        assert_eq!(salary.display(), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_add_skill_trims_and_dedupes() {
        let mut draft = NewJob::default();
        assert!(draft.add_skill("  Rust "));
        assert!(!draft.add_skill("Rust"));
        assert!(!draft.add_skill("   "));
        assert_eq!(draft.skills, vec!["Rust".to_string()]);
        draft.remove_skill("Rust");
        assert!(draft.skills.is_empty());
    }

    #[test]
    fn test_job_update_serializes_only_set_fields() {
        let update = JobUpdate {
            status: Some(JobStatus::Closed),
            ..JobUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "closed" }));
    }

    #[test]
    fn test_filter_search_covers_title_company_location() {
        let jobs = vec![
            job("Backend Engineer", "Acme", "Berlin", false, "open"),
            job("Designer", "Globex", "Remote EU", true, "open"),
            job("Data Analyst", "Initech", "Austin", false, "closed"),
        ];

        let by_company = JobFilter {
            search: Some("GLOBEX".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(by_company.apply(&jobs).len(), 1);

        let by_location = JobFilter {
            search: Some("austin".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(by_location.apply(&jobs)[0].title, "Data Analyst");

        let open_remote = JobFilter {
            status: Some(JobStatus::Open),
            remote_only: true,
            ..JobFilter::default()
        };
        let found = open_remote.apply(&jobs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Designer");
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let jobs = vec![job("Backend Engineer", "Acme", "Berlin", false, "open")];
        let filter = JobFilter {
            search: Some("  ".to_string()),
            ..JobFilter::default()
        };
        assert_eq!(filter.apply(&jobs).len(), 1);
    }
}
