//! Session recipe errors.

use thiserror::Error;

use super::RECIPE_ID;
use crate::error::SuperTokensError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No valid session; the frontend should log the user out.
    #[error("{message}")]
    Unauthorised { message: String },

    /// Access token expired; the frontend should call the refresh API.
    #[error("{message}")]
    TryRefreshToken { message: String },

    /// A refresh token was reused. The session gets revoked.
    #[error("token theft detected for session {session_handle}")]
    TokenTheftDetected {
        session_handle: String,
        user_id: String,
    },
}

impl From<SessionError> for SuperTokensError {
    fn from(err: SessionError) -> Self {
        SuperTokensError::recipe(RECIPE_ID, err)
    }
}
