pub mod claims;
pub mod config;
pub mod cookie;
pub mod router;
pub mod token;
pub mod user;

pub use config::{AuthConfig, CookiePolicy};
pub use token::{TokenService, require_token};
pub use user::{AuthError, AuthedUser};
