use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::application::{Application, ApplicationStatus, NewApplication, StatusChange};
use crate::session::types::RecordId;

/// POST /applications/{jobId}
pub async fn apply_for_job(
    api: &ApiClient,
    job_id: &RecordId,
    application: &NewApplication,
) -> Result<Application, ApiError> {
    api.post_data(&format!("/applications/{job_id}"), application)
        .await
}

/// GET /applications/my-applications
pub async fn my_applications(api: &ApiClient) -> Result<Vec<Application>, ApiError> {
    api.get_data("/applications/my-applications").await
}

/// GET /applications/job/{jobId}
pub async fn job_applications(api: &ApiClient, job_id: &RecordId) -> Result<Vec<Application>, ApiError> {
    api.get_data(&format!("/applications/job/{job_id}")).await
}

/// GET /applications/job/{jobId}/shortlisted
pub async fn shortlisted_applications(
    api: &ApiClient,
    job_id: &RecordId,
) -> Result<Vec<Application>, ApiError> {
    api.get_data(&format!("/applications/job/{job_id}/shortlisted"))
        .await
}

/// GET /applications/{id}
pub async fn get_application(api: &ApiClient, id: &RecordId) -> Result<Application, ApiError> {
    api.get_data(&format!("/applications/{id}")).await
}

/// PUT /applications/{id}
pub async fn update_status(
    api: &ApiClient,
    id: &RecordId,
    status: ApplicationStatus,
) -> Result<Application, ApiError> {
    api.put_data(&format!("/applications/{id}"), &StatusChange { status })
        .await
}

/// DELETE /applications/{id}
pub async fn delete_application(api: &ApiClient, id: &RecordId) -> Result<(), ApiError> {
    api.delete(&format!("/applications/{id}")).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::session::storage::MemoryStore;
    use crate::session::SessionSlot;
    use crate::testing::spawn_backend;

    fn api(base_url: &str) -> ApiClient {
        let slot = Arc::new(SessionSlot::new(Arc::new(MemoryStore::new())));
        ApiClient::new(base_url, Duration::from_secs(5), slot).unwrap()
    }

    #[tokio::test]
    async fn test_apply_sends_cover_letter() {
        let router = Router::new().route(
            "/applications/:job_id",
            post(|Path(job_id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "data": {
                        "_id": "app1",
                        "job": job_id,
                        "status": "pending",
                        "coverLetter": body["coverLetter"]
                    }
                }))
            }),
        );
        let api = api(&spawn_backend(router).await);

        let application = NewApplication {
            cover_letter: Some("I build things.".to_string()),
        };
        let created = apply_for_job(&api, &RecordId::from("j1"), &application)
            .await
            .unwrap();

        assert_eq!(created.job.id(), &RecordId::from("j1"));
        assert_eq!(created.cover_letter.as_deref(), Some("I build things."));
        assert_eq!(created.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn test_shortlisted_reads_scores() {
        let router = Router::new().route(
            "/applications/job/:job_id/shortlisted",
            get(|| async {
                Json(json!({
                    "data": [{
                        "_id": "app2",
                        "job": { "_id": "j1", "title": "Backend Engineer" },
                        "applicant": { "_id": "u2", "name": "Bo", "email": "bo@mail.test" },
                        "status": "shortlisted",
                        "aiScore": 88
                    }]
                }))
            }),
        );
        let api = api(&spawn_backend(router).await);

        let shortlisted = shortlisted_applications(&api, &RecordId::from("j1"))
            .await
            .unwrap();

        assert_eq!(shortlisted[0].match_score(), Some(88));
        assert_eq!(shortlisted[0].applicant_record().unwrap().name, "Bo");
    }

    #[tokio::test]
    async fn test_duplicate_application_surfaces_message() {
        let router = Router::new().route(
            "/applications/:job_id",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "message": "You have already applied for this job" })),
                )
            }),
        );
        let api = api(&spawn_backend(router).await);

        let err = apply_for_job(&api, &RecordId::from("j1"), &NewApplication::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.backend_message(),
            Some("You have already applied for this job")
        );
    }
}
