use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use parley_config::{McpAuthConfig, McpConfig};
use secrecy::SecretString;
use url::{Host, Url};

use crate::error::McpError;

/// Where the tool server lives and how to reach it
#[derive(Debug, Clone)]
pub struct ToolEndpoint {
    /// Streamable-HTTP endpoint
    pub url: Url,
    /// Label provider-hosted strategies attach to the endpoint
    pub server_label: String,
    /// Bearer token, if the endpoint needs one
    pub token: Option<SecretString>,
    /// Whether provider-hosted strategies require a public address
    pub require_public: bool,
}

impl ToolEndpoint {
    pub fn from_config(config: &McpConfig) -> Self {
        let token = config.auth.as_ref().map(|auth| match auth {
            McpAuthConfig::Token { token } => token.clone(),
        });

        Self {
            url: config.url.clone(),
            server_label: config.server_label.clone(),
            token,
            require_public: config.require_public_url,
        }
    }

    /// Fail when a remote provider could not reach this endpoint
    ///
    /// Always succeeds when `require_public` is off.
    pub fn ensure_public(&self) -> Result<(), McpError> {
        if !self.require_public || is_public_host(&self.url) {
            return Ok(());
        }

        Err(McpError::NonPublicEndpoint {
            url: self.url.to_string(),
        })
    }
}

fn is_public_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            !(domain == "localhost"
                || domain.ends_with(".localhost")
                || domain.ends_with(".local")
                || domain.ends_with(".internal"))
        }
        Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
        None => false,
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_public_v4(ip),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => is_public_v4(mapped),
            None => is_public_v6(ip),
        },
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    // 100.64.0.0/10, carrier-grade NAT
    let shared = ip.octets()[0] == 100 && (ip.octets()[1] & 0b1100_0000) == 64;

    !(ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified() || ip.is_broadcast() || shared)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    !(ip.is_loopback() || ip.is_unspecified() || ip.is_unique_local() || ip.is_unicast_link_local())
}
