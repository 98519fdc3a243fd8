//! Feed service: reads the published word data from the data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use deck_core::feed::{VERSION_RESOURCE, VOCAB_RESOURCE};
use deck_core::{parse_version, parse_words, RatingReport, VersionInfo, WordRecord};
use sha2::{Digest, Sha256};

use crate::error::{ApiError, Result};

/// Calculate SHA256 hash of content.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Serves `vocab.json` and `latest.json` from a directory.
#[derive(Debug, Clone)]
pub struct FeedService {
    data_dir: PathBuf,
}

impl FeedService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read a resource; `Ok(None)` when the file does not exist.
    async fn read_optional(&self, resource: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.data_dir.join(resource)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_vocab(&self) -> Result<Vec<u8>> {
        self.read_optional(VOCAB_RESOURCE)
            .await?
            .ok_or_else(|| ApiError::NotFound(VOCAB_RESOURCE.to_string()))
    }

    /// Word list, validated and normalized.
    pub async fn words(&self) -> Result<Vec<WordRecord>> {
        let bytes = self.read_vocab().await?;
        Ok(parse_words(&bytes)?)
    }

    /// Data version: the published `latest.json` if present, otherwise a
    /// content hash of the word list.
    pub async fn latest(&self) -> Result<VersionInfo> {
        if let Some(bytes) = self.read_optional(VERSION_RESOURCE).await? {
            return Ok(parse_version(&bytes)?);
        }

        let bytes = self.read_vocab().await?;
        let words = parse_words(&bytes)?;
        tracing::debug!("no {} published, deriving version", VERSION_RESOURCE);
        Ok(VersionInfo {
            version: hash_content(&bytes),
            count: Some(words.len()),
        })
    }

    /// Distribution of the published baseline ratings.
    pub async fn report(&self) -> Result<RatingReport> {
        let words = self.words().await?;
        Ok(RatingReport::baseline(&words))
    }
}
