use crate::{ConfigError, ConfigErrorResult, DEFAULT_ALLOWED_NETWORKS, Network};

use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Root user name; root login is disabled when unset
    pub root_user: Option<String>,
    /// Root password
    pub root_pass: Option<String>,
    /// Networks (CIDR) root logins are accepted from
    pub allowed_networks: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            root_user: None,
            root_pass: None,
            allowed_networks: DEFAULT_ALLOWED_NETWORKS
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match (&self.root_user, &self.root_pass) {
            (Some(user), Some(_)) if user.is_empty() => {
                return Err(ConfigError::auth("auth.root_user cannot be empty"));
            }
            (Some(_), None) => {
                return Err(ConfigError::auth(
                    "auth.root_pass is required when auth.root_user is set",
                ));
            }
            (None, Some(_)) => {
                return Err(ConfigError::auth(
                    "auth.root_user is required when auth.root_pass is set",
                ));
            }
            _ => {}
        }

        self.networks()?;

        Ok(())
    }

    /// Parse the allow-listed networks
    pub fn networks(&self) -> ConfigErrorResult<Vec<Network>> {
        self.allowed_networks
            .iter()
            .map(|n| Network::from_str(n))
            .collect()
    }

    pub fn root_enabled(&self) -> bool {
        self.root_user.is_some() && self.root_pass.is_some()
    }
}
