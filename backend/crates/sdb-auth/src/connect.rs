use crate::{AuthError, KeyCache, Result as AuthErrorResult, Variables};

use sdb_core::{Identity, TrustContext};

use std::panic::Location;

use error_location::ErrorLocation;
use log::debug;
use serde_json::Value;

/// Run a scope's connect statement to turn a token's record reference into
/// the identity bound to the request.
///
/// The statement executes once, at database level inside `ns`/`db`, on the
/// attempt's own transaction, with `$id` bound to the tentative identity
/// (or null). Exactly one statement result holding exactly one record is
/// accepted.
pub async fn scope_connect(
    cache: &mut KeyCache,
    statement: &str,
    ns: &str,
    db: &str,
    identity: Option<&Identity>,
) -> AuthErrorResult<Identity> {
    let ctx = TrustContext::database(ns, db);

    let mut vars = Variables::new();
    vars.insert(
        "id".to_string(),
        identity.map_or(Value::Null, Identity::to_value),
    );

    let mut responses = cache.execute(&ctx, statement, &vars).await?.into_iter();

    let record = match (responses.next(), responses.next()) {
        (Some(response), None) if response.result.len() == 1 => response.result.into_iter().next(),
        (Some(response), None) => {
            debug!("Scope connect returned {} records", response.result.len());
            None
        }
        _ => {
            debug!("Scope connect did not return exactly one statement result");
            None
        }
    };

    record
        .map(Identity::Record)
        .ok_or_else(|| AuthError::CredentialsFailed {
            message: "scope connect did not produce exactly one record".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
