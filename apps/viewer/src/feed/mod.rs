//! Word data feed client.
//!
//! HTTP sources are fetched network-first: a successful response refreshes
//! the local cache, a failed one falls back to the last cached body so the
//! viewer keeps working offline. Directory sources are read directly.

use crate::db::FeedCacheRepository;
use deck_core::feed::{VERSION_RESOURCE, VOCAB_RESOURCE};
use deck_core::{parse_version, parse_words, LoadError, LoadOutcome, VersionStore};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where word data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Base URL of a feed server; resources live under `/data/`.
    Http(String),
    /// Directory holding `vocab.json` and `latest.json`.
    Directory(PathBuf),
}

impl FeedSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Http(value.trim_end_matches('/').to_string())
        } else {
            Self::Directory(PathBuf::from(value))
        }
    }

    fn is_cacheable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{}", url),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct FeedClient {
    source: FeedSource,
    client: Client,
}

impl FeedClient {
    pub fn new(source: FeedSource) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LoadError::fetch("client", e))?;
        Ok(Self { source, client })
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch one resource from the source, bypassing the cache.
    pub async fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            FeedSource::Http(base) => {
                let url = format!("{}/data/{}", base, resource);
                tracing::debug!(%url, "fetching");
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| LoadError::fetch(resource, e))?
                    .error_for_status()
                    .map_err(|e| LoadError::fetch(resource, e))?;
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::fetch(resource, e))?;
                Ok(body.to_vec())
            }
            FeedSource::Directory(dir) => tokio::fs::read(dir.join(resource))
                .await
                .map_err(|e| LoadError::fetch(resource, e)),
        }
    }

    /// Resolve a fetch result against the cache: store fresh bodies, fall
    /// back to the cached body when the fetch failed.
    fn resolve_cached<R: FeedCacheRepository + ?Sized>(
        &self,
        cache: &R,
        resource: &str,
        fetched: Result<Vec<u8>, LoadError>,
    ) -> Result<Vec<u8>, LoadError> {
        if !self.source.is_cacheable() {
            return fetched;
        }

        match fetched {
            Ok(body) => {
                if let Err(e) = cache.save_cached_feed(resource, &body) {
                    tracing::warn!(resource, "failed to cache feed response: {}", e);
                }
                Ok(body)
            }
            Err(fetch_error) => match cache.get_cached_feed(resource) {
                Ok(Some(cached)) => {
                    tracing::info!(
                        resource,
                        fetched_at = %cached.fetched_at,
                        "network unavailable, serving cached feed: {}",
                        fetch_error
                    );
                    Ok(cached.body)
                }
                Ok(None) => Err(fetch_error),
                Err(e) => {
                    tracing::warn!(resource, "feed cache unreadable: {}", e);
                    Err(fetch_error)
                }
            },
        }
    }

    /// Load words and the data version, compare with the stored version and
    /// persist the new one.
    ///
    /// Both resources are requested concurrently; either failing (with no
    /// cached copy) fails the whole load.
    pub async fn load<R>(&self, repo: &mut R) -> Result<LoadOutcome, LoadError>
    where
        R: FeedCacheRepository + VersionStore,
    {
        let (vocab, latest) = tokio::join!(self.fetch(VOCAB_RESOURCE), self.fetch(VERSION_RESOURCE));

        let vocab = self.resolve_cached(repo, VOCAB_RESOURCE, vocab)?;
        let latest = self.resolve_cached(repo, VERSION_RESOURCE, latest)?;

        let words = parse_words(&vocab)?;
        let version = parse_version(&latest)?;
        tracing::info!(
            source = %self.source,
            words = words.len(),
            version = %version.version,
            "feed loaded"
        );

        Ok(LoadOutcome::resolve_with(words, version, repo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_http_source() {
        assert_eq!(
            FeedSource::parse("http://localhost:3000/"),
            FeedSource::Http("http://localhost:3000".to_string())
        );
        assert_eq!(
            FeedSource::parse("https://example.org/cards"),
            FeedSource::Http("https://example.org/cards".to_string())
        );
    }

    #[test]
    fn parses_directory_source() {
        assert_eq!(
            FeedSource::parse("./docs/data"),
            FeedSource::Directory(PathBuf::from("./docs/data"))
        );
    }
}
