pub mod api_client;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod models;
pub mod navigation;
pub mod session;

#[cfg(test)]
mod testing;
