//! Authentication error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The authentication response did not carry exactly one download cookie.
    #[error("no download authorization cookie in authentication response")]
    NoCookie,

    #[error("session rejected by authentication service (HTTP {status})")]
    SessionRejected { status: u16 },
}

impl UserFacingError for AuthError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoCookie => Some(
                "Sign in again and pass a fresh session with --cookie or XCFETCH_SESSION_COOKIE.",
            ),
            Self::SessionRejected { .. } => Some("The session cookie has expired; sign in again."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoCookie => "auth.no_cookie",
            Self::SessionRejected { .. } => "auth.session_rejected",
        })
    }
}
