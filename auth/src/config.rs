use error_stack::{Report, ResultExt};
use std::str::FromStr;
use tracing::info;

pub type AuthConfigResult<T> = Result<T, Report<MissingAuthProperty>>;

#[derive(Debug, thiserror::Error)]
#[error("{0} auth property not specified")]
pub struct MissingAuthProperty(&'static str);

const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
const APP_ENV: &str = "APP_ENV";

/// Security attributes of the session cookie. Production serves the frontend from
/// another site over https, so the cookie has to be `Secure` and `SameSite=None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookiePolicy {
    Production,
    #[default]
    Development,
}

impl FromStr for CookiePolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_secret: String,
    pub cookie_policy: CookiePolicy,
}

impl AuthConfig {
    pub fn from_env() -> AuthConfigResult<Self> {
        let token_secret = std::env::var(ACCESS_TOKEN_SECRET)
            .change_context(MissingAuthProperty(ACCESS_TOKEN_SECRET))?;

        let cookie_policy = match std::env::var(APP_ENV) {
            Ok(env) => env.parse().unwrap_or_default(),
            Err(_) => {
                info!("{APP_ENV} not specified, using development cookie policy");
                CookiePolicy::Development
            }
        };

        Ok(Self {
            token_secret,
            cookie_policy,
        })
    }
}
