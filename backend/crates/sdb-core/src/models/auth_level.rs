use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Privilege tier a request was authenticated at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthLevel {
    /// Unauthenticated, denies all query access
    #[default]
    #[serde(rename = "none")]
    No,
    /// Unrestricted access to every namespace and database
    Root,
    /// Confined to one namespace
    Namespace,
    /// Confined to one database inside a namespace
    Database,
    /// Confined to one database through a scope-issued token
    Scope,
}

impl AuthLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "none",
            Self::Root => "root",
            Self::Namespace => "namespace",
            Self::Database => "database",
            Self::Scope => "scope",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::No)
    }
}

impl FromStr for AuthLevel {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "none" => Ok(Self::No),
            "root" => Ok(Self::Root),
            "namespace" => Ok(Self::Namespace),
            "database" => Ok(Self::Database),
            "scope" => Ok(Self::Scope),
            _ => Err(CoreError::InvalidAuthLevel {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
