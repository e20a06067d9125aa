//! Authentication service client
//!
//! `GET /api/verify-token`, `GET /api/profile` and `POST /api/logout`, all
//! authenticated with the stored bearer token.

use reqwest::Client;
use shared::{is_success, PredictionError, ProfileResponse, Unauthenticated};

use super::{describe, endpoint};

/// Client for the authentication service
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Ask the auth service whether the token is still valid. Never retried.
    pub async fn verify_token(&self, token: &str) -> Result<(), Unauthenticated> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "/api/verify-token"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Unauthenticated::unreachable(describe(&e)))?;

        let status = response.status().as_u16();
        if is_success(status) {
            Ok(())
        } else {
            Err(Unauthenticated::rejected(status))
        }
    }

    /// Fetch the user's profile, including optional agronomic defaults
    pub async fn fetch_profile(&self, token: &str) -> Result<ProfileResponse, PredictionError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "/api/profile"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PredictionError::transport(describe(&e)))?;

        let status = response.status().as_u16();
        if !is_success(status) {
            return Err(PredictionError::transport(format!(
                "Profile service returned status {}",
                status
            )));
        }

        response
            .json::<ProfileResponse>()
            .await
            .map_err(|e| PredictionError::transport(format!("Failed to parse profile: {}", e)))
    }

    /// Invalidate the token server-side
    pub async fn logout(&self, token: &str) -> Result<(), PredictionError> {
        let response = self
            .client
            .post(endpoint(&self.base_url, "/api/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PredictionError::transport(describe(&e)))?;

        let status = response.status().as_u16();
        if is_success(status) {
            Ok(())
        } else {
            Err(PredictionError::transport(format!(
                "Logout returned status {}",
                status
            )))
        }
    }
}
