use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// What a client asks to be identified as. Only `email` is interpreted, anything
/// else the client sends is carried through the token untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdentityClaim {
    pub email: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl IdentityClaim {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

/// Registered claims set by the server, never taken from the client.
const SERVER_CLAIMS: [&str; 2] = ["iat", "exp"];

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    /// issued at, seconds since epoch
    pub iat: i64,
    /// expiration, seconds since epoch
    pub exp: i64,
}

impl Claims {
    pub(crate) fn new(mut identity: IdentityClaim, iat: i64, exp: i64) -> Self {
        for key in SERVER_CLAIMS {
            identity.extra.remove(key);
        }
        Self { identity, iat, exp }
    }
}
