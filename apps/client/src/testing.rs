//! In-process stand-in for the recruitment backend.

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `routes` under `/api` on an ephemeral port and returns the base URL.
pub async fn spawn_backend(routes: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().nest("/api", routes);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// A base URL nothing listens on, so every call fails at connect time.
pub async fn unreachable_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

pub fn user_json(role: &str) -> Value {
    json!({ "_id": "u1", "name": "A", "email": "a@b.com", "role": role })
}
