use crate::claims::IdentityClaim;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Inserted into request extensions once a token has been verified.
/// Carries the whole decoded claim, extra fields included.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    claim: Arc<IdentityClaim>,
}

impl AuthedUser {
    pub fn email(&self) -> &str {
        &self.claim.email
    }

    pub fn claim(&self) -> &IdentityClaim {
        &self.claim
    }

    /// Identity-scoped reads are only allowed for the identity named in the request.
    pub fn ensure_is(&self, email: &str) -> Result<(), AuthError> {
        if self.email() == email {
            Ok(())
        } else {
            warn!("user {} tried to read data belonging to {email}", self.email());
            Err(AuthError::Forbidden)
        }
    }
}

impl From<IdentityClaim> for AuthedUser {
    fn from(value: IdentityClaim) -> Self {
        Self {
            claim: Arc::new(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthedUser};
    use crate::claims::IdentityClaim;
    use serde_json::json;

    #[test]
    fn claim_fields_are_kept() {
        let mut claim = IdentityClaim::new("user@example.com");
        claim.extra.insert("name".to_string(), json!("User"));

        let user = AuthedUser::from(claim.clone());

        assert_eq!("user@example.com", user.email());
        assert_eq!(&claim, user.claim());
    }

    #[test]
    fn only_own_identity_is_allowed() {
        let user = AuthedUser::from(IdentityClaim::new("user@example.com"));

        assert_eq!(Ok(()), user.ensure_is("user@example.com"));
        assert_eq!(Err(AuthError::Forbidden), user.ensure_is("other@example.com"));
    }
}
