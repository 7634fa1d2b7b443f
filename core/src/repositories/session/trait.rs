//! Session store trait for cookie-identified session state.

use async_trait::async_trait;

use crate::domain::entities::session::SessionData;
use crate::errors::DomainError;

/// Storage backend for session data keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the data of a live session
    ///
    /// # Returns
    /// * `Ok(Some(SessionData))` - Session exists and has not expired
    /// * `Ok(None)` - Unknown or expired session
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, DomainError>;

    /// Store `data` under `session_id`, replacing previous data
    async fn save(&self, session_id: &str, data: SessionData) -> Result<(), DomainError>;

    /// Remove a session
    ///
    /// # Returns
    /// * `Ok(true)` - Session existed and was removed
    /// * `Ok(false)` - No such session
    async fn destroy(&self, session_id: &str) -> Result<bool, DomainError>;
}
