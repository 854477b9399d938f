//! Bearer token authentication.
//!
//! The verification key is chosen from claims that have not been verified
//! yet, so the work is split in two phases. [`BearerAuthenticator::resolve_key`]
//! reads the unverified claims and looks up key material, returning what it
//! would grant as a [`PendingTrust`]. [`verify_signature`] then checks the
//! token against that key. The trust context is only written by
//! [`PendingTrust::apply`], after both phases succeed.

use crate::{
    AuthError, CLOCK_SKEW_LEEWAY_SECS, Claims, Datastore, KeyCache, Result as AuthErrorResult,
    SigningKey, TokenBranch, scope_connect,
};

use sdb_core::{ANY, AuthLevel, Identity, TrustContext};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use log::{debug, error, warn};
use serde_json::{Map, Value};

/// Trust a token will confer once its signature checks out
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTrust {
    pub level: AuthLevel,
    pub ns: String,
    /// `None` for namespace-level trust, which spans every database
    pub db: Option<String>,
    pub scope: Option<String>,
    pub identity: Option<Identity>,
}

impl PendingTrust {
    /// Write the granted level and tenant pins into `ctx`
    pub fn apply(self, mut ctx: TrustContext) -> TrustContext {
        ctx.kind = self.level;
        ctx.selected.ns = self.ns.clone();
        ctx.possible.ns = self.ns;

        match self.db {
            Some(db) => {
                ctx.selected.db = db.clone();
                ctx.possible.db = db;
            }
            None => ctx.possible.db = ANY.to_string(),
        }

        ctx.scope = self.scope;
        ctx.identity = self.identity;
        ctx
    }
}

/// Output of the key derivation phase
#[derive(Debug, Clone)]
pub struct KeyResolution {
    pub key: SigningKey,
    pub pending: PendingTrust,
}

#[derive(Clone)]
pub struct BearerAuthenticator {
    datastore: Arc<dyn Datastore>,
}

impl BearerAuthenticator {
    pub fn new(datastore: Arc<dyn Datastore>) -> Self {
        Self { datastore }
    }

    /// Verify `token` and return `ctx` elevated to the level it grants.
    ///
    /// One read transaction backs all lookups and the scope connect
    /// statement. It is cancelled before this returns, whatever the outcome.
    pub async fn authenticate(
        &self,
        ctx: TrustContext,
        token: &str,
    ) -> AuthErrorResult<TrustContext> {
        let tx = self.datastore.transaction().await.map_err(|e| {
            error!("Failed to open key lookup transaction: {e}");
            AuthError::Internal {
                message: "could not open a read transaction".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let mut cache = KeyCache::new(tx);
        let outcome = self.resolve_and_verify(&mut cache, token).await;
        cache.release().await;

        let pending = outcome?;
        debug!(
            "Bearer token accepted at {} level for ns={}",
            pending.level.as_str(),
            pending.ns
        );
        Ok(pending.apply(ctx))
    }

    async fn resolve_and_verify(
        &self,
        cache: &mut KeyCache,
        token: &str,
    ) -> AuthErrorResult<PendingTrust> {
        let KeyResolution { key, pending } = self.resolve_key(cache, token).await?;
        verify_signature(token, &key)?;
        Ok(pending)
    }

    /// Phase A: pick the verification key from the unverified token
    pub async fn resolve_key(
        &self,
        cache: &mut KeyCache,
        token: &str,
    ) -> AuthErrorResult<KeyResolution> {
        let header = decode_header(token).map_err(|e| AuthError::MalformedToken {
            message: format!("unreadable token header: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let alg = header.alg;

        let claims = Claims::decode_unverified(token)?;
        claims.check_time(chrono::Utc::now().timestamp())?;

        if claims.is_default_token() && !is_hmac(alg) {
            warn!("Rejected default token signed with {alg:?}");
            return Err(unexpected_signing_method(alg));
        }

        match claims.branch() {
            TokenBranch::Scope { ns, db, sc, tk } => {
                let scope = cache.scope(ns, db, sc).await?;

                let mut identity = claims.thing().map(Identity::from);
                if let Some(statement) = scope.connect.as_deref() {
                    identity =
                        Some(scope_connect(cache, statement, ns, db, identity.as_ref()).await?);
                }

                let key = if claims.is_default_token() {
                    SigningKey::new(alg, scope.code)
                } else {
                    named_key(cache.scope_token(ns, db, sc, tk).await?, alg)?
                };

                Ok(KeyResolution {
                    key,
                    pending: PendingTrust {
                        level: AuthLevel::Scope,
                        ns: ns.to_string(),
                        db: Some(db.to_string()),
                        scope: Some(sc.to_string()),
                        identity,
                    },
                })
            }
            TokenBranch::Database { ns, db, tk, us } => {
                let key = if claims.is_default_token() {
                    let us = us.ok_or_else(no_available_token)?;
                    SigningKey::new(alg, cache.database_user(ns, db, us).await?.code)
                } else {
                    named_key(cache.database_token(ns, db, tk).await?, alg)?
                };

                Ok(KeyResolution {
                    key,
                    pending: PendingTrust {
                        level: AuthLevel::Database,
                        ns: ns.to_string(),
                        db: Some(db.to_string()),
                        scope: None,
                        identity: None,
                    },
                })
            }
            TokenBranch::Namespace { ns, tk, us } => {
                let key = if claims.is_default_token() {
                    let us = us.ok_or_else(no_available_token)?;
                    SigningKey::new(alg, cache.namespace_user(ns, us).await?.code)
                } else {
                    named_key(cache.namespace_token(ns, tk).await?, alg)?
                };

                Ok(KeyResolution {
                    key,
                    pending: PendingTrust {
                        level: AuthLevel::Namespace,
                        ns: ns.to_string(),
                        db: None,
                        scope: None,
                        identity: None,
                    },
                })
            }
            TokenBranch::Unrecognized => {
                debug!("Token claims select no verification branch");
                Err(no_available_token())
            }
        }
    }
}

/// Phase B: check the signature and the time claims against `key`.
///
/// No claim is required and the audience is not checked.
#[track_caller]
pub fn verify_signature(token: &str, key: &SigningKey) -> AuthErrorResult<()> {
    let decoding_key = key.decoding_key()?;

    let mut validation = Validation::new(key.algorithm);
    validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Map<String, Value>>(token, &decoding_key, &validation)
        .map(|_| ())
        .map_err(|e| {
            warn!("Token signature rejected: {e}");
            AuthError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            }
        })
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// A named key only verifies tokens signed with the algorithm it declares
#[track_caller]
fn named_key(key: SigningKey, alg: Algorithm) -> AuthErrorResult<SigningKey> {
    if key.algorithm != alg {
        warn!(
            "Token signed with {alg:?} but its key declares {:?}",
            key.algorithm
        );
        return Err(unexpected_signing_method(alg));
    }
    Ok(key)
}

#[track_caller]
fn unexpected_signing_method(alg: Algorithm) -> AuthError {
    AuthError::UnexpectedSigningMethod {
        algorithm: format!("{alg:?}"),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn no_available_token() -> AuthError {
    AuthError::NoAvailableToken {
        location: ErrorLocation::from(Location::caller()),
    }
}
