use crate::{AuthError, AuthSettings, Result as AuthErrorResult, Signin, StoreResult};

use sdb_core::{ANY, AuthLevel, TrustContext};

use std::net::IpAddr;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, error, warn};

/// Username/password authentication: root, then namespace, then database.
#[derive(Clone)]
pub struct BasicAuthenticator {
    settings: Arc<AuthSettings>,
    signin: Arc<dyn Signin>,
}

impl BasicAuthenticator {
    pub fn new(settings: Arc<AuthSettings>, signin: Arc<dyn Signin>) -> Self {
        Self { settings, signin }
    }

    /// Elevate `ctx` with the first trust level whose credentials match.
    ///
    /// A root match from a network outside the allow-list is rejected
    /// outright and never retried at a lower level.
    pub async fn authenticate(
        &self,
        mut ctx: TrustContext,
        user: &str,
        pass: &str,
        ip: Option<IpAddr>,
    ) -> AuthErrorResult<TrustContext> {
        if self.settings.is_root(user, pass) {
            if self.settings.ip_allowed(ip) {
                debug!("Root login accepted");
                ctx.grant_root();
                return Ok(ctx);
            }

            warn!("Root login refused from {:?}: address not allowed", ip);
            return Err(AuthError::forbidden_ip(
                ip,
                ErrorLocation::from(Location::caller()),
            ));
        }

        if !ctx.selected.has_namespace() {
            return Err(AuthError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let ns = ctx.selected.ns.clone();

        if check(self.signin.signin_namespace(&ns, user, pass).await)? {
            debug!("Namespace login accepted for ns={ns}");
            ctx.kind = AuthLevel::Namespace;
            ctx.possible.ns = ns;
            ctx.possible.db = ANY.to_string();
            return Ok(ctx);
        }

        if ctx.selected.has_database() {
            let db = ctx.selected.db.clone();

            if check(self.signin.signin_database(&ns, &db, user, pass).await)? {
                debug!("Database login accepted for ns={ns} db={db}");
                ctx.kind = AuthLevel::Database;
                ctx.possible.ns = ns;
                ctx.possible.db = db;
                return Ok(ctx);
            }
        }

        warn!("Basic login rejected for ns={ns}");
        Err(AuthError::InvalidCredentials {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// A storage failure is not a credential mismatch: it stops the cascade.
#[track_caller]
fn check(outcome: StoreResult<bool>) -> AuthErrorResult<bool> {
    outcome.map_err(|e| {
        error!("Signin lookup failed: {e}");
        AuthError::Internal {
            message: "signin lookup failed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })
}
