//! Resolves the listener declarations into listener descriptors.

use crate::{
    config::{BlacklistConfig, Declarations, ListenerConfig},
    datachan::{self, DataConnectionSpec},
    error::{ConfigError, ConfigErrorKind},
    options::{DEFAULT_IDLE_TIMEOUT, DEFAULT_LISTENER_NAME, DEFAULT_PORT},
    tls::{self, TlsSpec},
};
use ipnet::IpNet;
use std::{
    collections::{BTreeSet, HashSet},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

/// A network endpoint accepting control connections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerSpec {
    /// Unique name of the listener.
    pub name: String,
    /// Control channel port, never 0.
    pub port: u16,
    /// Address to bind to. All interfaces when absent.
    pub bind_address: Option<IpAddr>,
    /// Whether clients must start TLS immediately after connecting. Implies `tls` is present.
    pub implicit_tls: bool,
    /// Control channel idle timeout. Zero means sessions never idle out.
    pub idle_timeout: Duration,
    /// TLS material. The listener is plaintext only when absent.
    pub tls: Option<TlsSpec>,
    /// Data channel policy.
    pub data_connection: DataConnectionSpec,
    /// Denied client addresses.
    pub blacklist: Blacklist,
}

impl ListenerSpec {
    /// The address the session engine binds the control channel to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)), self.port)
    }
}

/// Client addresses a listener refuses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    /// Denied addresses.
    pub addresses: BTreeSet<IpAddr>,
    /// Denied networks without duplicates, in declaration order.
    pub networks: Vec<IpNet>,
}

impl Blacklist {
    /// True if connections from `ip` must be refused. IPv4-mapped IPv6 addresses, as seen on a
    /// dual-stack socket, are matched as their IPv4 address.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.addresses.contains(&ip) || self.networks.iter().any(|net| net.contains(&ip))
    }

    /// True if nothing is denied.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.networks.is_empty()
    }
}

fn resolve_blacklist(name: &str, config: &BlacklistConfig) -> Result<Blacklist, ConfigError> {
    let mut networks: Vec<IpNet> = Vec::with_capacity(config.networks.len());
    for network in &config.networks {
        let net = network
            .trim()
            .parse::<IpNet>()
            .map_err(|e| ConfigError::new(ConfigErrorKind::InvalidNetwork(name.to_string()), e))?
            .trunc();
        if !networks.contains(&net) {
            networks.push(net);
        }
    }
    Ok(Blacklist {
        addresses: config.addresses.iter().copied().collect(),
        networks,
    })
}

/// Resolves one listener declaration. Other listeners play no part in it.
pub fn resolve_one(name: &str, config: &ListenerConfig) -> Result<ListenerSpec, ConfigError> {
    let port = config.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(ConfigErrorKind::InvalidPort(name.to_string()).into());
    }
    let data_connection = datachan::resolve(&config.data_connection)
        .map_err(|e| ConfigError::new(ConfigErrorKind::InvalidPassivePorts(name.to_string()), e))?;
    Ok(ListenerSpec {
        name: name.to_string(),
        port,
        bind_address: config.local_address,
        implicit_tls: config.implicit_ssl.unwrap_or(false),
        idle_timeout: config.idle_timeout.map(Duration::from_secs).unwrap_or(DEFAULT_IDLE_TIMEOUT),
        tls: tls::resolve(&config.ssl),
        data_connection,
        blacklist: resolve_blacklist(name, &config.blacklist)?,
    })
}

/// Resolves all listener declarations, in declaration order.
///
/// When nothing is declared a single listener named `default` on port 21 is synthesized, so the
/// result is never empty. Two declarations with the same name are an error.
pub fn resolve(declarations: &Declarations<ListenerConfig>) -> Result<Vec<ListenerSpec>, ConfigError> {
    if declarations.is_empty() {
        return Ok(vec![resolve_one(DEFAULT_LISTENER_NAME, &ListenerConfig::default())?]);
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(declarations.len());
    let mut listeners = Vec::with_capacity(declarations.len());
    for (name, config) in declarations.iter() {
        if !seen.insert(name) {
            return Err(ConfigErrorKind::DuplicateListener(name.to_string()).into());
        }
        listeners.push(resolve_one(name, config)?);
    }
    Ok(listeners)
}
