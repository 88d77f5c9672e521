//! Curator identity.
//!
//! Sign-in is handled by the identity provider in front of this service, which
//! forwards the signed-in user's email in `x-gallery-user-email`. Handlers pick
//! the identity up through extractors:
//! - `SessionIdentity`: any signed-in user (401 without the header)
//! - `AdminIdentity`: signed-in and on the `ADMIN_EMAILS` allowlist (403 otherwise)

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const IDENTITY_HEADER: &str = "x-gallery-user-email";

/// A signed-in user, email lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub email: String,
}

/// A signed-in user who may curate content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
}

pub fn is_admin(allowlist: &[String], email: &str) -> bool {
    allowlist.iter().any(|allowed| allowed.eq_ignore_ascii_case(email))
}

fn forwarded_email(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let email = forwarded_email(parts).ok_or(AppError::Unauthorized)?;
        Ok(SessionIdentity { email })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let SessionIdentity { email } = SessionIdentity::from_request_parts(parts, state).await?;
        if !is_admin(&state.config.admin_emails, &email) {
            warn!("Rejected admin request from {email}");
            return Err(AppError::Forbidden);
        }
        Ok(AdminIdentity { email })
    }
}
