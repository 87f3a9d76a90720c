//! Resolves the active and passive data channel policy of a listener.

use crate::{
    config::{ActiveConfig, DataConnectionConfig, PassiveConfig},
    options::DEFAULT_IDLE_TIMEOUT,
};
use std::{
    fmt::{self, Display, Formatter},
    net::IpAddr,
    ops::RangeInclusive,
    str::FromStr,
    time::Duration,
};
use thiserror::Error;

/// Data channel policy of a listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataConnectionSpec {
    /// Idle timeout of the data channel. Zero means it never idles out.
    pub idle_timeout: Duration,
    /// Active mode parameters.
    pub active: ActivePolicy,
    /// Passive mode parameters.
    pub passive: PassivePolicy,
}

/// Active mode (`PORT`/`EPRT`): the server connects out to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivePolicy {
    /// Whether clients may use active mode.
    pub enabled: bool,
    /// Local address to connect from. The session engine chooses when absent.
    pub bind_address: Option<IpAddr>,
    /// Local port to connect from. The session engine chooses when absent.
    pub bind_port: Option<u16>,
    /// Whether the data channel peer must be the control channel peer.
    pub ip_check: bool,
}

/// Passive mode (`PASV`/`EPSV`): the client connects in to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassivePolicy {
    /// Ports to accept passive connections on. Unrestricted when absent.
    pub ports: Option<PassivePorts>,
    /// Local address to accept passive connections on.
    pub bind_address: Option<IpAddr>,
    /// Address advertised in the `PASV` reply, for servers behind NAT.
    pub external_address: Option<IpAddr>,
}

impl Default for DataConnectionSpec {
    fn default() -> Self {
        DataConnectionSpec {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            active: ActivePolicy {
                enabled: true,
                bind_address: None,
                bind_port: None,
                ip_check: false,
            },
            passive: PassivePolicy {
                ports: None,
                bind_address: None,
                external_address: None,
            },
        }
    }
}

/// Resolves the `data-connection` section of a listener.
pub fn resolve(config: &DataConnectionConfig) -> Result<DataConnectionSpec, PortRangeError> {
    let defaults = DataConnectionSpec::default();
    Ok(DataConnectionSpec {
        idle_timeout: config.idle_timeout.map(Duration::from_secs).unwrap_or(defaults.idle_timeout),
        active: resolve_active(&config.active, defaults.active),
        passive: resolve_passive(&config.passive)?,
    })
}

fn resolve_active(config: &ActiveConfig, defaults: ActivePolicy) -> ActivePolicy {
    ActivePolicy {
        enabled: config.enabled.unwrap_or(defaults.enabled),
        bind_address: config.local_address,
        bind_port: config.local_port,
        ip_check: config.ip_check.unwrap_or(defaults.ip_check),
    }
}

fn resolve_passive(config: &PassiveConfig) -> Result<PassivePolicy, PortRangeError> {
    Ok(PassivePolicy {
        ports: config.ports.as_deref().map(str::parse).transpose()?,
        bind_address: config.address,
        external_address: config.external_address,
    })
}

/// A set of passive ports written as comma separated ports and ranges, e.g. `2300-2399`,
/// `2300,2301` or `2300-` (up to 65535).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassivePorts {
    text: String,
    ranges: Vec<RangeInclusive<u16>>,
}

impl PassivePorts {
    /// The ranges in declaration order. A single port is a range of one.
    pub fn ranges(&self) -> &[RangeInclusive<u16>] {
        &self.ranges
    }

    /// True if passive connections may use this port.
    pub fn contains(&self, port: u16) -> bool {
        self.ranges.iter().any(|range| range.contains(&port))
    }

    /// The range as it was written.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for PassivePorts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returned when a passive port range cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid passive port range element '{token}'")]
pub struct PortRangeError {
    token: String,
}

impl PortRangeError {
    fn new(token: &str) -> Self {
        PortRangeError { token: token.to_string() }
    }
}

fn parse_port(s: &str, token: &str) -> Result<u16, PortRangeError> {
    match s.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(PortRangeError::new(token)),
        Ok(port) => Ok(port),
    }
}

impl FromStr for PassivePorts {
    type Err = PortRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();
        for token in s.split(',').map(str::trim) {
            let range = match token.split_once('-') {
                Some((start, end)) => {
                    let start = if start.trim().is_empty() { 1 } else { parse_port(start, token)? };
                    let end = if end.trim().is_empty() { u16::MAX } else { parse_port(end, token)? };
                    if start > end {
                        return Err(PortRangeError::new(token));
                    }
                    start..=end
                }
                None => {
                    let port = parse_port(token, token)?;
                    port..=port
                }
            };
            ranges.push(range);
        }
        Ok(PassivePorts {
            text: s.trim().to_string(),
            ranges,
        })
    }
}
