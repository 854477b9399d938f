use sdb_config::{AuthConfig, ConfigErrorResult, Network};

use std::fmt;
use std::net::IpAddr;

/// Configured root user
#[derive(Clone, PartialEq, Eq)]
pub struct RootCredentials {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for RootCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Static settings injected into the authenticators at construction
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub root: Option<RootCredentials>,
    pub allowed_networks: Vec<Network>,
}

impl AuthSettings {
    pub fn from_config(config: &AuthConfig) -> ConfigErrorResult<Self> {
        let root = match (&config.root_user, &config.root_pass) {
            (Some(user), Some(pass)) => Some(RootCredentials {
                user: user.clone(),
                pass: pass.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            root,
            allowed_networks: config.networks()?,
        })
    }

    /// Byte-exact comparison against the configured root user
    pub fn is_root(&self, user: &str, pass: &str) -> bool {
        self.root.as_ref().is_some_and(|root| {
            root.user.as_bytes() == user.as_bytes() && root.pass.as_bytes() == pass.as_bytes()
        })
    }

    /// Whether root logins are accepted from `ip`. An unknown peer never is.
    pub fn ip_allowed(&self, ip: Option<IpAddr>) -> bool {
        ip.is_some_and(|ip| self.allowed_networks.iter().any(|net| net.contains(&ip)))
    }
}
