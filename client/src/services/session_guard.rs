//! Session guard: no predictive action without a verified session

use shared::{AgronomicDefaults, Route, Session, Unauthenticated};

use crate::external::AuthClient;
use crate::storage::SessionStore;

/// A session the authentication service has just confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSession {
    pub session: Session,
    /// Profile values for pre-filling forms; empty if the profile fetch failed
    pub defaults: AgronomicDefaults,
}

/// Verifies the stored credential before any prediction call
#[derive(Clone)]
pub struct SessionGuard {
    store: SessionStore,
    auth: AuthClient,
}

impl SessionGuard {
    pub fn new(store: SessionStore, auth: AuthClient) -> Self {
        Self { store, auth }
    }

    /// Verify the stored session, then refresh the profile.
    ///
    /// Any failure clears the local session; the caller must then navigate
    /// to [`Unauthenticated::redirect_to`].
    pub async fn verify_session(&self) -> Result<VerifiedSession, Unauthenticated> {
        let Some(mut session) = self.store.load() else {
            tracing::info!("No stored session, redirecting to sign-in");
            self.store.invalidate();
            return Err(Unauthenticated::missing_credentials());
        };

        if let Err(e) = self.auth.verify_token(&session.token).await {
            tracing::warn!("Token verification failed: {:?}", e.reason);
            self.store.invalidate();
            return Err(e);
        }
        tracing::debug!("Token verified for {}", session.user.name);

        let defaults = match self.auth.fetch_profile(&session.token).await {
            Ok(profile) => {
                let user = profile.to_user();
                if let Err(e) = self.store.update_user(&user) {
                    tracing::warn!("Failed to store refreshed profile: {}", e);
                }
                session.user = user;
                profile.defaults()
            }
            Err(e) => {
                tracing::warn!("Failed to load profile: {}", e);
                AgronomicDefaults::default()
            }
        };

        Ok(VerifiedSession { session, defaults })
    }

    /// Sign out: best-effort server call, then unconditional local cleanup
    pub async fn logout(&self) -> Route {
        if let Some(token) = self.store.token() {
            if let Err(e) = self.auth.logout(&token).await {
                tracing::warn!("Logout API error: {}", e);
            }
        }
        self.store.invalidate();
        Route::Landing
    }
}
