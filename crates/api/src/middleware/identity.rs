//! # Identity Extraction
//!
//! Authentication happens upstream. The fronting identity provider forwards the
//! caller's subject id and role in trusted headers, which this extractor reads.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use careslot_core::{errors::BookingError, models::booking::ActorRole};

use super::error_handling::AppError;

pub const SUBJECT_HEADER: &str = "x-subject-id";
pub const ROLE_HEADER: &str = "x-actor-role";

/// Caller identity as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: Option<String>,
    pub role: ActorRole,
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let role = header(ROLE_HEADER)
            .ok_or_else(|| {
                BookingError::Validation(format!("missing {} header", ROLE_HEADER))
            })?
            .parse::<ActorRole>()
            .map_err(BookingError::Validation)?;

        Ok(Identity {
            subject_id: header(SUBJECT_HEADER),
            role,
        })
    }
}
