use reqwest::Method;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::session::types::RecordId;

/// POST /ai/shortlist/{jobId}. Asks the backend to score and shortlist every
/// application for the job. Results are read back through the applications routes.
pub async fn trigger_shortlisting(api: &ApiClient, job_id: &RecordId) -> Result<(), ApiError> {
    api.send(api.request(Method::POST, &format!("/ai/shortlist/{job_id}")))
        .await
}

/// POST /ai/analyze/{applicationId}
pub async fn analyze_application(api: &ApiClient, application_id: &RecordId) -> Result<(), ApiError> {
    api.send(api.request(Method::POST, &format!("/ai/analyze/{application_id}")))
        .await
}
