//! Host name resolution used as a validation gate for submitted URLs.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::errors::{AppError, Result};

/// Confirms that a host name resolves to at least one address.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve_host(&self, host: &str) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// System resolver backed by `tokio::net::lookup_host`.
///
/// A lookup that does not finish within `timeout` is a failure; there is
/// no retry.
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve_host(&self, host: &str) -> Result<()> {
        match tokio::time::timeout(self.timeout, tokio::net::lookup_host((host, 0))).await {
            Ok(Ok(mut addrs)) => match addrs.next() {
                Some(addr) => {
                    trace!("Resolved {} to {}", host, addr.ip());
                    Ok(())
                }
                None => Err(AppError::invalid_url(format!(
                    "Host {} has no addresses",
                    host
                ))),
            },
            Ok(Err(e)) => {
                debug!("DNS lookup failed for {}: {}", host, e);
                Err(AppError::invalid_url(format!(
                    "Host {} could not be resolved",
                    host
                )))
            }
            Err(_) => {
                debug!("DNS lookup timed out for {} after {:?}", host, self.timeout);
                Err(AppError::invalid_url(format!(
                    "Host {} resolution timed out",
                    host
                )))
            }
        }
    }

    fn name(&self) -> &'static str {
        "dns"
    }
}

/// Fixed host table. Hosts outside the table fail to resolve.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    hosts: HashSet<String>,
    accept_all: bool,
}

impl StaticResolver {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.into().to_ascii_lowercase())
                .collect(),
            accept_all: false,
        }
    }

    /// Resolves every host.
    pub fn accept_all() -> Self {
        Self {
            hosts: HashSet::new(),
            accept_all: true,
        }
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn resolve_host(&self, host: &str) -> Result<()> {
        if self.accept_all || self.hosts.contains(&host.to_ascii_lowercase()) {
            Ok(())
        } else {
            Err(AppError::invalid_url(format!(
                "Host {} could not be resolved",
                host
            )))
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver_table() {
        let resolver = StaticResolver::new(["example.com"]);
        assert!(resolver.resolve_host("example.com").await.is_ok());
        assert!(resolver.resolve_host("EXAMPLE.com").await.is_ok());
        assert!(matches!(
            resolver.resolve_host("nope.invalid").await,
            Err(AppError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_static_resolver_accept_all() {
        let resolver = StaticResolver::accept_all();
        assert!(resolver.resolve_host("anything.invalid").await.is_ok());
    }

    #[tokio::test]
    async fn test_dns_resolver_localhost() {
        let resolver = DnsResolver::new(Duration::from_secs(5));
        assert!(resolver.resolve_host("localhost").await.is_ok());
    }

    #[tokio::test]
    async fn test_dns_resolver_reserved_tld() {
        // RFC 2606: .invalid never resolves
        let resolver = DnsResolver::new(Duration::from_secs(5));
        assert!(
            resolver
                .resolve_host("this-host-does-not-exist.invalid")
                .await
                .is_err()
        );
    }
}
