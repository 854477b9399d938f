use crate::{ApiError, AppState};

use sdb_auth::AuthRequest;

use std::net::SocketAddr;

use axum::extract::rejection::ExtensionRejection;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use log::debug;

/// Resolve the caller's trust context and attach it to the request.
///
/// The next handler only runs once authentication has succeeded. Without
/// connection info the peer address is unknown, which rules out root logins.
pub async fn authenticate(
    State(state): State<AppState>,
    connect_info: Result<ConnectInfo<SocketAddr>, ExtensionRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = connect_info.ok().map(|ConnectInfo(addr)| addr.ip());

    let ctx = {
        let authority = request.uri().authority().map(|a| a.as_str());
        let auth_request = AuthRequest::new(request.headers())
            .with_authority(authority)
            .with_ip(ip);

        state.authenticator.authenticate(&auth_request).await?
    };

    debug!(
        "Request resolved at {} level (ns={:?}, db={:?})",
        ctx.kind, ctx.selected.ns, ctx.selected.db
    );

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
