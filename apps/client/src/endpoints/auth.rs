use reqwest::Method;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::session::types::{AuthResponse, Credentials, Registration, User};

/// POST /auth/register. Answers `{token, user}` without an envelope.
pub async fn register(api: &ApiClient, registration: &Registration) -> Result<AuthResponse, ApiError> {
    api.fetch(api.request(Method::POST, "/auth/register").json(registration))
        .await
}

/// POST /auth/login. Answers `{token, user}` without an envelope.
pub async fn login(api: &ApiClient, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
    api.fetch(api.request(Method::POST, "/auth/login").json(credentials))
        .await
}

/// GET /auth/me
pub async fn me(api: &ApiClient) -> Result<User, ApiError> {
    api.get_data("/auth/me").await
}

/// GET /auth/logout
pub async fn logout(api: &ApiClient) -> Result<(), ApiError> {
    api.send(api.request(Method::GET, "/auth/logout")).await
}
