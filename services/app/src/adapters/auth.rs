//! services/app/src/adapters/auth.rs
//!
//! An `AuthProvider` backed by a session issued out of band (configured at
//! startup). Without one, every authenticated operation is refused.

use async_trait::async_trait;
use pawtrack_core::domain::{AuthSession, User};
use pawtrack_core::ports::{AuthProvider, PortResult};

use crate::config::SessionConfig;

#[derive(Clone, Default)]
pub struct StaticAuthProvider {
    session: Option<SessionConfig>,
}

impl StaticAuthProvider {
    pub fn new(session: Option<SessionConfig>) -> Self {
        Self { session }
    }

    /// A provider with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn current_session(&self) -> PortResult<Option<AuthSession>> {
        Ok(self.session.as_ref().map(|s| AuthSession {
            access_token: s.access_token.clone(),
            user_id: s.user_id,
        }))
    }

    async fn current_user(&self) -> PortResult<Option<User>> {
        Ok(self.session.as_ref().map(|s| User {
            id: s.user_id,
            email: s.email.clone(),
        }))
    }
}
