use reqwest::Method;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::job::{Job, JobQuery, JobStatus, JobUpdate, NewJob};
use crate::session::types::RecordId;

/// GET /jobs
pub async fn list_jobs(api: &ApiClient, query: &JobQuery) -> Result<Vec<Job>, ApiError> {
    api.fetch_data(api.request(Method::GET, "/jobs").query(query))
        .await
}

/// GET /jobs/{id}
pub async fn get_job(api: &ApiClient, id: &RecordId) -> Result<Job, ApiError> {
    api.get_data(&format!("/jobs/{id}")).await
}

/// POST /jobs
pub async fn create_job(api: &ApiClient, job: &NewJob) -> Result<Job, ApiError> {
    api.post_data("/jobs", job).await
}

/// PUT /jobs/{id}
pub async fn update_job(api: &ApiClient, id: &RecordId, update: &JobUpdate) -> Result<Job, ApiError> {
    api.put_data(&format!("/jobs/{id}"), update).await
}

/// Opens or closes a listing.
pub async fn set_job_status(api: &ApiClient, id: &RecordId, status: JobStatus) -> Result<Job, ApiError> {
    let update = JobUpdate {
        status: Some(status),
        ..JobUpdate::default()
    };
    update_job(api, id, &update).await
}

/// DELETE /jobs/{id}
pub async fn delete_job(api: &ApiClient, id: &RecordId) -> Result<(), ApiError> {
    api.delete(&format!("/jobs/{id}")).await
}

/// GET /jobs/recruiter/my-jobs
pub async fn my_jobs(api: &ApiClient) -> Result<Vec<Job>, ApiError> {
    api.get_data("/jobs/recruiter/my-jobs").await
}
