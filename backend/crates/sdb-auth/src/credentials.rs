use crate::{AuthError, Result as AuthErrorResult};

use std::fmt;
use std::panic::Location;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use error_location::ErrorLocation;

/// Credentials presented with a request
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { user: String, pass: String },
    Bearer { token: String },
}

impl Credentials {
    /// Decode the `<base64(user:pass)>` part of a Basic authorization header.
    ///
    /// The password may itself contain colons, only the first one splits.
    #[track_caller]
    pub fn from_basic(encoded: &str) -> AuthErrorResult<Self> {
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::MalformedCredentials {
                message: format!("basic auth data is not base64: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials {
            message: "basic auth data is not UTF-8".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let (user, pass) =
            decoded
                .split_once(':')
                .ok_or_else(|| AuthError::MalformedCredentials {
                    message: "basic auth data has no ':' separator".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        Ok(Self::Basic {
            user: user.to_string(),
            pass: pass.to_string(),
        })
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Label used in logs and metrics
    pub fn method(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("pass", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}
