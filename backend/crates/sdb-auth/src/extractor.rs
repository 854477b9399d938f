use crate::{Credentials, Result as AuthErrorResult};

use sdb_core::TrustContext;

use std::net::IpAddr;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HOST, SEC_WEBSOCKET_PROTOCOL};

const NS_HEADER: &str = "ns";
const DB_HEADER: &str = "db";
const BASIC_PREFIX: &str = "Basic ";
const BEARER_PREFIX: &str = "Bearer ";
const SUBPROTOCOL_BEARER_PREFIX: &str = "bearer-";

/// The parts of an inbound request the resolver looks at
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    pub headers: &'a HeaderMap,
    /// Authority from the request URI, used when there is no Host header
    pub authority: Option<&'a str>,
    /// Peer address as seen by the transport
    pub ip: Option<IpAddr>,
}

impl<'a> AuthRequest<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self {
            headers,
            authority: None,
            ip: None,
        }
    }

    pub fn with_authority(mut self, authority: Option<&'a str>) -> Self {
        self.authority = authority;
        self
    }

    pub fn with_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.ip = ip;
        self
    }

    fn header(&self, name: impl http::header::AsHeaderName) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn host(&self) -> Option<&'a str> {
        self.header(HOST).or(self.authority)
    }
}

/// Build the provisional trust context and classify the presented credentials.
///
/// Returns `None` credentials when the request carries nothing we
/// recognise; that request proceeds unauthenticated.
pub fn extract(request: &AuthRequest<'_>) -> AuthErrorResult<(TrustContext, Option<Credentials>)> {
    let mut ctx = TrustContext::new();

    if let Some((ns, db)) = request.host().and_then(tenant_from_host) {
        ctx.select_namespace(ns);
        ctx.select_database(db);
    }

    if let Some(ns) = request.header(NS_HEADER).filter(|ns| !ns.is_empty()) {
        ctx.select_namespace(ns);
    }

    if let Some(db) = request.header(DB_HEADER).filter(|db| !db.is_empty()) {
        ctx.select_database(db);
    }

    // A blank Authorization header counts as absent
    let authorization = request
        .headers
        .get(AUTHORIZATION)
        .filter(|value| !value.as_bytes().trim_ascii().is_empty());

    let credentials = match authorization {
        None => bearer_from_subprotocols(request.headers),
        Some(value) => match value.to_str() {
            Ok(value) => from_authorization(value)?,
            Err(_) => None,
        },
    };

    Ok((ctx, credentials))
}

/// `<ns>-<db>.example.com` selects namespace `ns` and database `db`
fn tenant_from_host(host: &str) -> Option<(&str, &str)> {
    if host.starts_with('[') {
        return None;
    }

    let host = host.split_once(':').map_or(host, |(name, _port)| name);
    let label = host.split('.').next()?;

    let mut subs = label.split('-');
    match (subs.next(), subs.next(), subs.next()) {
        (Some(ns), Some(db), None) => Some((ns, db)),
        _ => None,
    }
}

fn from_authorization(value: &str) -> AuthErrorResult<Option<Credentials>> {
    if let Some(encoded) = value.strip_prefix(BASIC_PREFIX) {
        return Credentials::from_basic(encoded).map(Some);
    }

    if let Some(token) = value.strip_prefix(BEARER_PREFIX)
        && !token.is_empty()
    {
        return Ok(Some(Credentials::bearer(token.trim())));
    }

    Ok(None)
}

fn bearer_from_subprotocols(headers: &HeaderMap) -> Option<Credentials> {
    headers
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .find_map(|protocol| {
            protocol
                .strip_prefix(SUBPROTOCOL_BEARER_PREFIX)
                .filter(|token| !token.is_empty())
        })
        .map(Credentials::bearer)
}
