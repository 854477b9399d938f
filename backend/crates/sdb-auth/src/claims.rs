use crate::{AuthError, CLOCK_SKEW_LEEWAY_SECS, Result as AuthErrorResult};

use sdb_core::Thing;

use std::panic::Location;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use error_location::ErrorLocation;
use serde_json::{Map, Value};

/// Reserved token name: the token is signed with the scope's or user's own code
pub const DEFAULT_TOKEN: &str = "default";

/// Claim body of a bearer token, read BEFORE the signature is checked.
///
/// Only string values count: a claim holding a number or object is treated
/// as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    pub ns: Option<String>,
    pub db: Option<String>,
    pub sc: Option<String>,
    pub tk: Option<String>,
    pub us: Option<String>,
    pub tb: Option<String>,
    pub id: Option<String>,
    pub exp: Option<i64>,
    pub nbf: Option<i64>,
    pub iat: Option<i64>,
}

/// Verification branch selected by which claims are present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBranch<'a> {
    Scope {
        ns: &'a str,
        db: &'a str,
        sc: &'a str,
        tk: &'a str,
    },
    Database {
        ns: &'a str,
        db: &'a str,
        tk: &'a str,
        us: Option<&'a str>,
    },
    Namespace {
        ns: &'a str,
        tk: &'a str,
        us: Option<&'a str>,
    },
    Unrecognized,
}

impl Claims {
    /// Decode the payload segment of a compact JWS without verifying it
    #[track_caller]
    pub fn decode_unverified(token: &str) -> AuthErrorResult<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(AuthError::MalformedToken {
                    message: "expected three dot-separated segments".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::MalformedToken {
                message: format!("payload is not base64url: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let map: Map<String, Value> =
            serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken {
                message: format!("payload is not a JSON object: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Self::from_map(&map)
    }

    #[track_caller]
    pub fn from_map(map: &Map<String, Value>) -> AuthErrorResult<Self> {
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(String::from);

        Ok(Self {
            ns: text("NS"),
            db: text("DB"),
            sc: text("SC"),
            tk: text("TK"),
            us: text("US"),
            tb: text("TB"),
            id: text("ID"),
            exp: numeric_date(map, "exp")?,
            nbf: numeric_date(map, "nbf")?,
            iat: numeric_date(map, "iat")?,
        })
    }

    /// Standard time-based validity: not expired, not used early, not issued in the future
    #[track_caller]
    pub fn check_time(&self, now: i64) -> AuthErrorResult<()> {
        let leeway = CLOCK_SKEW_LEEWAY_SECS as i64;

        let problem = if self.exp.is_some_and(|exp| exp < now - leeway) {
            Some("token has expired")
        } else if self.nbf.is_some_and(|nbf| nbf > now + leeway) {
            Some("token is not valid yet")
        } else if self.iat.is_some_and(|iat| iat > now + leeway) {
            Some("token was issued in the future")
        } else {
            None
        };

        match problem {
            Some(message) => Err(AuthError::MalformedToken {
                message: message.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
    }

    pub fn is_default_token(&self) -> bool {
        self.tk.as_deref() == Some(DEFAULT_TOKEN)
    }

    /// Most specific branch first: scope, then database, then namespace
    pub fn branch(&self) -> TokenBranch<'_> {
        let ns = self.ns.as_deref();
        let db = self.db.as_deref();
        let sc = self.sc.as_deref();
        let tk = self.tk.as_deref();
        let us = self.us.as_deref();

        match (ns, db, sc, tk) {
            (Some(ns), Some(db), Some(sc), Some(tk)) => TokenBranch::Scope { ns, db, sc, tk },
            (Some(ns), Some(db), _, Some(tk)) => TokenBranch::Database { ns, db, tk, us },
            (Some(ns), _, _, Some(tk)) => TokenBranch::Namespace { ns, tk, us },
            _ => TokenBranch::Unrecognized,
        }
    }

    /// Record reference carried in `TB`/`ID`, when both are present
    pub fn thing(&self) -> Option<Thing> {
        match (&self.tb, &self.id) {
            (Some(tb), Some(id)) => Some(Thing::new(tb.as_str(), id.as_str())),
            _ => None,
        }
    }
}

#[track_caller]
fn numeric_date(map: &Map<String, Value>, key: &str) -> AuthErrorResult<Option<i64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| AuthError::MalformedToken {
                message: format!("claim '{key}' is out of range"),
                location: ErrorLocation::from(Location::caller()),
            }),
        Some(_) => Err(AuthError::MalformedToken {
            message: format!("claim '{key}' must be a number"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
