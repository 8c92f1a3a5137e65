//! Short-link registry
//!
//! Maps monotonically increasing integer ids to submitted URLs. State is
//! memory-resident and lives as long as the process.
//!
//! `submit` validates first (parse, then name resolution) without touching
//! the registry lock. Only the id assignment and insert run inside the
//! write-locked critical section, so concurrent submissions never share an
//! id and a rejected URL never consumes one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};
use url::Host;

use crate::errors::{AppError, Result};
use crate::services::resolver::HostResolver;
use crate::utils::validate_url;

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub id: u64,
    pub original_url: String,
}

struct RegistryState {
    next_id: u64,
    links: HashMap<u64, String>,
}

pub struct ShortLinkRegistry {
    state: RwLock<RegistryState>,
    resolver: Arc<dyn HostResolver>,
    allowed_schemes: Vec<String>,
}

impl ShortLinkRegistry {
    pub fn new(resolver: Arc<dyn HostResolver>, allowed_schemes: Vec<String>) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                next_id: 1,
                links: HashMap::new(),
            }),
            resolver,
            allowed_schemes,
        }
    }

    /// Validate `raw_url` and store it under the next id.
    ///
    /// The stored string is `raw_url` exactly as given.
    pub async fn submit(&self, raw_url: &str) -> Result<ShortLink> {
        let url = validate_url(raw_url, &self.allowed_schemes).map_err(|e| {
            debug!("Rejected URL {:?}: {}", raw_url, e);
            inc_counter!(crate::metrics::METRICS.shorturl_submissions_total, &["invalid"]);
            AppError::invalid_url(e.to_string())
        })?;

        // IP literals resolve to themselves
        if let Some(Host::Domain(domain)) = url.host() {
            if let Err(e) = self.resolver.resolve_host(domain).await {
                debug!(
                    "Rejected URL {:?} via {} resolver: {}",
                    raw_url,
                    self.resolver.name(),
                    e
                );
                inc_counter!(
                    crate::metrics::METRICS.shorturl_submissions_total,
                    &["unresolvable"]
                );
                return Err(e);
            }
        }

        let link = {
            let mut state = self.state.write();
            let id = state.next_id;
            state.next_id += 1;
            state.links.insert(id, raw_url.to_string());
            ShortLink {
                id,
                original_url: raw_url.to_string(),
            }
        };

        inc_counter!(crate::metrics::METRICS.shorturl_submissions_total, &["accepted"]);
        info!("Short URL {} -> {}", link.id, link.original_url);
        Ok(link)
    }

    /// Look up the URL stored under `id`.
    pub fn resolve(&self, id: u64) -> Result<String> {
        self.state
            .read()
            .links
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("No short URL found"))
    }

    pub fn len(&self) -> usize {
        self.state.read().links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id the next successful submission will receive.
    pub fn next_id(&self) -> u64 {
        self.state.read().next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resolver::StaticResolver;

    fn registry() -> ShortLinkRegistry {
        ShortLinkRegistry::new(
            Arc::new(StaticResolver::new(["example.com", "www.freecodecamp.org"])),
            vec!["http".to_string(), "https".to_string()],
        )
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let registry = registry();
        let a = registry.submit("https://example.com").await.unwrap();
        let b = registry.submit("https://example.com/b").await.unwrap();
        let c = registry.submit("https://www.freecodecamp.org").await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_returns_exact_string() {
        let registry = registry();
        let raw = "HTTPS://Example.com/Path/?q=1#frag";
        let link = registry.submit(raw).await.unwrap();
        assert_eq!(link.original_url, raw);
        assert_eq!(registry.resolve(link.id).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_failed_submission_does_not_consume_id() {
        let registry = registry();
        assert!(matches!(
            registry.submit("http://this-host-does-not-exist.invalid").await,
            Err(AppError::InvalidUrl(_))
        ));
        assert!(matches!(
            registry.submit("not a url").await,
            Err(AppError::InvalidUrl(_))
        ));
        assert_eq!(registry.next_id(), 1);
        assert!(registry.is_empty());

        let link = registry.submit("http://example.com").await.unwrap();
        assert_eq!(link.id, 1);
    }

    #[tokio::test]
    async fn test_ip_literal_skips_resolution() {
        let registry = ShortLinkRegistry::new(
            Arc::new(StaticResolver::new(Vec::<String>::new())),
            vec!["http".to_string()],
        );
        assert!(registry.submit("http://127.0.0.1:8080/x").await.is_ok());
        assert!(registry.submit("http://[::1]/").await.is_ok());
        assert!(registry.submit("http://example.com/").await.is_err());
    }

    #[test]
    fn test_resolve_unknown_id() {
        let registry = registry();
        assert_eq!(
            registry.resolve(9999),
            Err(AppError::not_found("No short URL found"))
        );
    }
}
