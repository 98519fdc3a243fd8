//! Import and export of rating overrides as `{"headword": rating}` JSON.

use crate::db::{DbError, RatingRepository};
use deck_core::MemoryRatingStore;
use std::path::Path;

/// Merge ratings from a JSON file into the repository. Invalid entries are
/// skipped; returns how many ratings were written.
pub fn import_ratings<R: RatingRepository>(repo: &R, path: &Path) -> anyhow::Result<usize> {
    let json = std::fs::read_to_string(path)?;
    let imported = MemoryRatingStore::from_json(&json);

    let mut written = 0;
    for (en, rating) in imported.iter() {
        repo.save_rating(en, rating)?;
        written += 1;
    }
    tracing::info!(path = %path.display(), written, "imported ratings");
    Ok(written)
}

/// All stored overrides in the import format.
pub fn export_ratings<R: RatingRepository>(repo: &R) -> Result<String, DbError> {
    let store: MemoryRatingStore = repo.get_all_ratings()?.into_iter().collect();
    Ok(store.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteRepository;
    use deck_core::Rating;
    use pretty_assertions::assert_eq;

    #[test]
    fn import_skips_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.json");
        std::fs::write(&path, r#"{"cat": 4, "dog": 9, "owl": "high", "fox": 1}"#).unwrap();

        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(import_ratings(&repo, &path).unwrap(), 2);
        assert_eq!(
            repo.get_all_ratings().unwrap(),
            vec![
                ("cat".to_string(), Rating::from_value(4).unwrap()),
                ("fox".to_string(), Rating::MIN),
            ]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(import_ratings(&repo, Path::new("/nonexistent/ratings.json")).is_err());
    }

    #[test]
    fn export_round_trips_through_import() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.save_rating("cat", Rating::MAX).unwrap();
        let json = export_ratings(&repo).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"cat": 5}));
    }
}
