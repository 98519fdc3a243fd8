//! Local SQLite persistence for ratings, the data version and the feed cache.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{CachedFeed, FeedCacheRepository, MetaRepository, RatingRepository, SqliteRepository};
