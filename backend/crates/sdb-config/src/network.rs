use crate::{ConfigError, ConfigErrorResult};

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IP network in CIDR notation, e.g. `10.0.0.0/8` or `::1/128`.
///
/// A bare address is accepted as a single-host network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    addr: IpAddr,
    prefix: u8,
}

impl Network {
    #[track_caller]
    pub fn new(addr: IpAddr, prefix: u8) -> ConfigErrorResult<Self> {
        let max = max_prefix(&addr);
        if prefix > max {
            return Err(ConfigError::auth(format!(
                "prefix /{prefix} is too long for {addr} (max /{max})"
            )));
        }
        Ok(Self { addr, prefix })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Whether `ip` falls inside this network.
    ///
    /// IPv4-mapped IPv6 addresses are matched against IPv4 networks.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip.to_canonical()) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = mask_u32(self.prefix);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = mask_u128(self.prefix);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask_u32(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0)
}

fn mask_u128(prefix: u8) -> u128 {
    u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0)
}

impl FromStr for Network {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        let s = s.trim();
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr = IpAddr::from_str(addr)
            .map_err(|e| ConfigError::auth(format!("invalid network address '{s}': {e}")))?;

        let prefix = match prefix {
            Some(p) => p
                .parse::<u8>()
                .map_err(|e| ConfigError::auth(format!("invalid network prefix '{s}': {e}")))?,
            None => max_prefix(&addr),
        };

        Network::new(addr, prefix)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}
