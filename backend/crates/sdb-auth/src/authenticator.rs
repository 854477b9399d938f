use crate::{
    AuthMetrics, AuthRequest, AuthSettings, BasicAuthenticator, BearerAuthenticator,
    Credentials, Datastore, Result as AuthErrorResult, Signin, extract,
};

use sdb_core::TrustContext;

use std::sync::Arc;

use log::{debug, warn};

/// Entry point of the resolver: classifies a request's credentials and
/// runs the matching authenticator.
#[derive(Clone)]
pub struct Authenticator {
    basic: BasicAuthenticator,
    bearer: BearerAuthenticator,
    metrics: AuthMetrics,
}

impl Authenticator {
    pub fn new(
        settings: AuthSettings,
        signin: Arc<dyn Signin>,
        datastore: Arc<dyn Datastore>,
    ) -> Self {
        Self {
            basic: BasicAuthenticator::new(Arc::new(settings), signin),
            bearer: BearerAuthenticator::new(datastore),
            metrics: AuthMetrics::new(),
        }
    }

    /// Resolve the trust context for `request`.
    ///
    /// A request without credentials resolves to an unauthenticated context.
    pub async fn authenticate(&self, request: &AuthRequest<'_>) -> AuthErrorResult<TrustContext> {
        let outcome = self.resolve(request).await;

        match &outcome {
            Ok(ctx) if ctx.is_authenticated() => self.metrics.success(ctx.kind),
            Ok(_) => {}
            Err(e) => {
                warn!("Authentication failed: {e}");
                self.metrics.failure(e.error_code());
            }
        }

        outcome
    }

    async fn resolve(&self, request: &AuthRequest<'_>) -> AuthErrorResult<TrustContext> {
        let (ctx, credentials) = match extract(request) {
            Ok(extracted) => extracted,
            Err(e) => {
                self.metrics.attempt("basic");
                return Err(e);
            }
        };

        let Some(credentials) = credentials else {
            debug!("No credentials presented, continuing unauthenticated");
            self.metrics.anonymous();
            return Ok(ctx);
        };

        self.metrics.attempt(credentials.method());

        match credentials {
            Credentials::Basic { user, pass } => {
                self.basic
                    .authenticate(ctx, &user, &pass, request.ip)
                    .await
            }
            Credentials::Bearer { token } => self.bearer.authenticate(ctx, &token).await,
        }
    }
}
