use std::net::IpAddr;

use error_location::ErrorLocation;
use http::StatusCode;
use thiserror::Error;

/// Reasons a request could not be authenticated.
///
/// Every variant is terminal for the request: the next handler never runs.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed credentials: {message} {location}")]
    MalformedCredentials {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid credentials {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("Root authentication not allowed from {ip} {location}")]
    ForbiddenIp {
        ip: String,
        location: ErrorLocation,
    },

    #[error("Malformed token: {message} {location}")]
    MalformedToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unexpected signing method: {algorithm} {location}")]
    UnexpectedSigningMethod {
        algorithm: String,
        location: ErrorLocation,
    },

    #[error("Credentials failed: {message} {location}")]
    CredentialsFailed {
        message: String,
        location: ErrorLocation,
    },

    #[error("No available token for the supplied claims {location}")]
    NoAvailableToken { location: ErrorLocation },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    pub fn forbidden_ip(ip: Option<IpAddr>, location: ErrorLocation) -> Self {
        Self::ForbiddenIp {
            ip: ip.map_or_else(|| "unknown address".to_string(), |ip| ip.to_string()),
            location,
        }
    }

    /// Machine-readable code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedCredentials { .. } => "MALFORMED_CREDENTIALS",
            Self::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            Self::ForbiddenIp { .. } => "FORBIDDEN_IP",
            Self::MalformedToken { .. } => "MALFORMED_TOKEN",
            Self::UnexpectedSigningMethod { .. } => "UNEXPECTED_SIGNING_METHOD",
            Self::CredentialsFailed { .. } => "CREDENTIALS_FAILED",
            Self::NoAvailableToken { .. } => "NO_AVAILABLE_TOKEN",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ForbiddenIp { .. } => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to return to the client. Never echoes claims or secrets.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MalformedCredentials { .. } => "Problem with basic auth data",
            Self::ForbiddenIp { .. } => "IP invalid for root authentication",
            Self::Internal { .. } => "Internal server error",
            _ => "Invalid authentication details",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
