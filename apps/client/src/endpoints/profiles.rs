use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::profile::{Education, Experience, Profile, ResumeUpload};
use crate::session::types::RecordId;

/// GET /profiles/me
pub async fn my_profile(api: &ApiClient) -> Result<Profile, ApiError> {
    api.get_data("/profiles/me").await
}

/// PUT /profiles
pub async fn update_profile(api: &ApiClient, profile: &Profile) -> Result<Profile, ApiError> {
    api.put_data("/profiles", profile).await
}

/// POST /profiles/resume. The backend parses the file and answers with the
/// updated profile.
pub async fn upload_resume(api: &ApiClient, resume: ResumeUpload) -> Result<Profile, ApiError> {
    let part = Part::bytes(resume.bytes)
        .file_name(resume.file_name)
        .mime_str(resume.mime_type)?;
    let form = Form::new().part("resume", part);
    api.fetch_data(api.request(Method::POST, "/profiles/resume").multipart(form))
        .await
}

/// PUT /profiles/experience
pub async fn add_experience(api: &ApiClient, experience: &Experience) -> Result<Profile, ApiError> {
    api.put_data("/profiles/experience", experience).await
}

/// DELETE /profiles/experience/{id}
pub async fn delete_experience(api: &ApiClient, id: &RecordId) -> Result<(), ApiError> {
    api.delete(&format!("/profiles/experience/{id}")).await
}

/// PUT /profiles/education
pub async fn add_education(api: &ApiClient, education: &Education) -> Result<Profile, ApiError> {
    api.put_data("/profiles/education", education).await
}

/// DELETE /profiles/education/{id}
pub async fn delete_education(api: &ApiClient, id: &RecordId) -> Result<(), ApiError> {
    api.delete(&format!("/profiles/education/{id}")).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::Multipart;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::session::storage::MemoryStore;
    use crate::session::SessionSlot;
    use crate::testing::spawn_backend;

    #[tokio::test]
    async fn test_upload_resume_sends_resume_field() {
        let router = Router::new().route(
            "/profiles/resume",
            post(|mut multipart: Multipart| async move {
                let field = multipart.next_field().await.unwrap().unwrap();
                let name = field.name().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.unwrap();
                Json(json!({
                    "data": {
                        "title": format!("{name:?}|{file_name:?}|{content_type:?}|{}", bytes.len()),
                        "skills": ["Rust", "SQL"],
                        "resume": { "originalName": file_name }
                    }
                }))
            }),
        );
        let base = spawn_backend(router).await;
        let slot = Arc::new(SessionSlot::new(Arc::new(MemoryStore::new())));
        let api = ApiClient::new(&base, Duration::from_secs(5), slot).unwrap();

        let upload = ResumeUpload::new("cv.pdf", b"%PDF-1.4".to_vec()).unwrap();
        let profile = upload_resume(&api, upload).await.unwrap();

        assert_eq!(
            profile.title.as_deref(),
            Some(r#"Some("resume")|Some("cv.pdf")|Some("application/pdf")|8"#)
        );
        assert_eq!(profile.skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }
}
