//! Typed calls for every backend route, grouped the way the backend groups them.
//! Each function takes the shared `ApiClient`, so all of them carry the bearer
//! token and are subject to the 401 policy.

pub mod ai;
pub mod applications;
pub mod auth;
pub mod jobs;
pub mod profiles;
