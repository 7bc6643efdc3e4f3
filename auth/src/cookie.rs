use crate::config::CookiePolicy;
use axum_extra::extract::cookie::{Cookie, SameSite};

pub const TOKEN_COOKIE_NAME: &str = "token";

impl CookiePolicy {
    /// HTTP-only cookie carrying `token`, readable by every path.
    pub fn token_cookie(&self, token: String) -> Cookie<'static> {
        let (secure, same_site) = match self {
            CookiePolicy::Production => (true, SameSite::None),
            CookiePolicy::Development => (false, SameSite::Strict),
        };

        Cookie::build((TOKEN_COOKIE_NAME, token))
            .http_only(true)
            .path("/")
            .secure(secure)
            .same_site(same_site)
            .build()
    }

    /// Expired, empty version of [`CookiePolicy::token_cookie`]. Browsers only drop a cookie
    /// when name, path and security attributes all match the one they hold.
    /// The token itself stays valid until it expires.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.token_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
