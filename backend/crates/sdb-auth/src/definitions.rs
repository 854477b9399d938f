use crate::{AuthError, Result as AuthErrorResult};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey};

/// Verification key material together with its declared algorithm
#[derive(Clone)]
pub struct SigningKey {
    pub algorithm: Algorithm,
    /// HMAC secret, or a PEM encoded public key for asymmetric algorithms
    pub code: String,
}

impl SigningKey {
    pub fn new(algorithm: Algorithm, code: impl Into<String>) -> Self {
        Self {
            algorithm,
            code: code.into(),
        }
    }

    /// Build the `jsonwebtoken` key for this algorithm family
    #[track_caller]
    pub fn decoding_key(&self) -> AuthErrorResult<DecodingKey> {
        let bytes = self.code.as_bytes();
        let key = match self.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Ok(DecodingKey::from_secret(bytes))
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(bytes),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(bytes),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(bytes),
        };

        key.map_err(|e| {
            log::warn!("Unusable {:?} verification key: {}", self.algorithm, e);
            AuthError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("code", &"<redacted>")
            .finish()
    }
}

/// A tenant-defined authentication scope
#[derive(Clone)]
pub struct ScopeDefinition {
    pub name: String,
    /// HMAC secret for tokens signed with the reserved "default" token name
    pub code: String,
    /// Statement run at signin to materialize the bound identity
    pub connect: Option<String>,
}

impl fmt::Debug for ScopeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeDefinition")
            .field("name", &self.name)
            .field("code", &"<redacted>")
            .field("connect", &self.connect)
            .finish()
    }
}

/// A namespace or database user, as far as token verification needs it
#[derive(Clone)]
pub struct UserDefinition {
    pub name: String,
    /// HMAC secret for the user's "default" tokens
    pub code: String,
}

impl fmt::Debug for UserDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDefinition")
            .field("name", &self.name)
            .field("code", &"<redacted>")
            .finish()
    }
}
