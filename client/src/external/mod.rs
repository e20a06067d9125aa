//! HTTP clients for the externally owned services

pub mod auth;
pub mod predictions;
pub mod weather;

pub use auth::AuthClient;
pub use predictions::PredictionClient;
pub use weather::WeatherClient;

use std::time::Duration;

use reqwest::Client;

use crate::error::ClientResult;

/// Build the HTTP client shared by all service clients
pub fn http_client(timeout: Duration) -> ClientResult<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Join a base URL and an absolute path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Describe a reqwest failure for logs and transport errors
pub(crate) fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_decode() {
        format!("could not read response body: {}", e)
    } else {
        e.to_string()
    }
}
