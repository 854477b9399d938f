pub mod authenticator;
pub mod basic;
pub mod bearer;
pub mod claims;
pub mod connect;
pub mod credentials;
pub mod definitions;
pub mod error;
pub mod extractor;
pub mod key_cache;
pub mod metrics;
pub mod settings;
pub mod store;

pub use authenticator::Authenticator;
pub use basic::BasicAuthenticator;
pub use bearer::{BearerAuthenticator, KeyResolution, PendingTrust, verify_signature};
pub use claims::{Claims, DEFAULT_TOKEN, TokenBranch};
pub use connect::scope_connect;
pub use credentials::Credentials;
pub use definitions::{ScopeDefinition, SigningKey, UserDefinition};
pub use error::{AuthError, Result};
pub use extractor::{AuthRequest, extract};
pub use key_cache::KeyCache;
pub use metrics::AuthMetrics;
pub use settings::{AuthSettings, RootCredentials};
pub use store::{
    Datastore, QueryResponse, Signin, StoreError, StoreResult, Transaction, Variables,
};

/// Allowed clock skew when checking token time claims
pub const CLOCK_SKEW_LEEWAY_SECS: u64 = 30;

#[cfg(test)]
mod tests;
