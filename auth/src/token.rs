use crate::claims::{Claims, IdentityClaim};
use crate::cookie::TOKEN_COOKIE_NAME;
use crate::user::{AuthError, AuthedUser};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use chrono::{DateTime, TimeDelta, Utc};
use error_stack::{Report, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME: TimeDelta = TimeDelta::hours(30);

#[derive(Debug, thiserror::Error)]
#[error("failed to issue token")]
pub struct TokenIssueErr;

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    validation: Arc<Validation>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            validation: Arc::new(validation),
        }
    }

    pub fn issue(&self, claim: IdentityClaim) -> Result<String, Report<TokenIssueErr>> {
        self.issue_at(claim, Utc::now())
    }

    #[instrument(skip_all, fields(claim.email = %claim.email))]
    pub fn issue_at(
        &self,
        claim: IdentityClaim,
        issued_at: DateTime<Utc>,
    ) -> Result<String, Report<TokenIssueErr>> {
        let expires_at = issued_at
            .checked_add_signed(TOKEN_LIFETIME)
            .ok_or(TokenIssueErr)
            .attach_with(|| format!("token issued at {issued_at} cannot expire"))?;

        let claims = Claims::new(claim, issued_at.timestamp(), expires_at.timestamp());

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .change_context(TokenIssueErr)
    }

    /// Any failure to decode, a bad signature or an expired token are all treated the same.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims.identity)
            .map_err(|e| {
                debug!("token rejected: {e}");
                AuthError::Unauthorized
            })
    }
}

/// Rejects the request with 401 unless it carries a valid `token` cookie.
/// Handlers behind this can extract `Extension<AuthedUser>`.
#[instrument(skip_all)]
pub async fn require_token(
    State(tokens): State<TokenService>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(cookie) = jar.get(TOKEN_COOKIE_NAME) else {
        error!("endpoint requires a token, none was found");
        return Err(AuthError::Unauthorized);
    };

    let user = AuthedUser::from(tokens.verify(cookie.value())?);
    info!("token validated for user '{}'", user.email());

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
