//! Common test utilities and fixtures for integration tests.
//!
//! Each [`TestContext`] owns a temporary data directory, so tests run in
//! parallel without sharing published files.

#![allow(dead_code)]

pub mod fixtures;

use std::path::Path;

use axum::Router;
use tempfile::TempDir;

use vocab_feed_backend::services::feed::FeedService;
use vocab_feed_backend::{router, AppState};

/// Test context containing a data directory and the router serving it.
pub struct TestContext {
    dir: TempDir,
    app: Router,
}

impl TestContext {
    /// Create a new test context with an empty data directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp data dir");
        let app = router(AppState::new(FeedService::new(dir.path())));
        Self { dir, app }
    }

    /// Create a test context with `vocab.json` already published.
    pub fn with_vocab(vocab: &str) -> Self {
        let ctx = Self::new();
        ctx.write_vocab(vocab);
        ctx
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_vocab(&self, content: &str) {
        std::fs::write(self.dir.path().join("vocab.json"), content)
            .expect("Failed to write vocab.json");
    }

    pub fn write_latest(&self, content: &str) {
        std::fs::write(self.dir.path().join("latest.json"), content)
            .expect("Failed to write latest.json");
    }
}
