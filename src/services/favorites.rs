// src/services/favorites.rs
// DOCUMENTATION: Favorite cafés store
// PURPOSE: Keep the user's favorite cafés in a JSON file, saved on every change

use crate::errors::CafeError;
use crate::models::Cafe;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Favorites store
/// DOCUMENTATION: Keyed by café id. Loaded once at startup and written back
/// after every mutation. A failed write is reported to the caller and leaves
/// the in-memory list as it was, so memory never runs ahead of the file
pub struct FavoritesStore {
    /// Backing JSON file; None keeps favorites in memory only
    path: Option<PathBuf>,
    favorites: RwLock<Vec<Cafe>>,
}

impl FavoritesStore {
    /// Store without a backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            favorites: RwLock::new(Vec::new()),
        }
    }

    /// Load favorites from `path`
    /// DOCUMENTATION: A missing file starts an empty list. An unreadable or
    /// corrupt file also starts empty (logged) and is overwritten on the next save
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let favorites = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Vec<Cafe>>(&contents) {
                Ok(favorites) => {
                    log::info!("Loaded {} favorites from {}", favorites.len(), path.display());
                    favorites
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt favorites file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No favorites file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("Could not read favorites file {}: {}", path.display(), e);
                Vec::new()
            }
        };

        Self {
            path: Some(path),
            favorites: RwLock::new(favorites),
        }
    }

    pub async fn list(&self) -> Vec<Cafe> {
        self.favorites.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.favorites.read().await.len()
    }

    pub async fn is_favorite(&self, cafe_id: i64) -> bool {
        self.favorites.read().await.iter().any(|fav| fav.id == cafe_id)
    }

    /// Add a café; returns false when it was already a favorite
    pub async fn add(&self, cafe: Cafe) -> Result<bool, CafeError> {
        let mut favorites = self.favorites.write().await;
        if favorites.iter().any(|fav| fav.id == cafe.id) {
            return Ok(false);
        }

        let mut updated = favorites.clone();
        updated.push(cafe);
        self.commit(&mut favorites, updated).await?;
        Ok(true)
    }

    /// Remove a café by id; returns false when it wasn't a favorite
    pub async fn remove(&self, cafe_id: i64) -> Result<bool, CafeError> {
        let mut favorites = self.favorites.write().await;
        if !favorites.iter().any(|fav| fav.id == cafe_id) {
            return Ok(false);
        }

        let updated: Vec<Cafe> = favorites
            .iter()
            .filter(|fav| fav.id != cafe_id)
            .cloned()
            .collect();
        self.commit(&mut favorites, updated).await?;
        Ok(true)
    }

    /// Flip favorite state; returns whether the café is a favorite afterwards
    pub async fn toggle(&self, cafe: Cafe) -> Result<bool, CafeError> {
        let mut favorites = self.favorites.write().await;
        let mut updated = favorites.clone();

        let now_favorite = if let Some(index) = updated.iter().position(|fav| fav.id == cafe.id) {
            updated.remove(index);
            false
        } else {
            updated.push(cafe);
            true
        };

        self.commit(&mut favorites, updated).await?;
        Ok(now_favorite)
    }

    pub async fn clear(&self) -> Result<(), CafeError> {
        let mut favorites = self.favorites.write().await;
        self.commit(&mut favorites, Vec::new()).await
    }

    /// Replace the in-memory list only once `updated` is on disk
    async fn commit(&self, current: &mut Vec<Cafe>, updated: Vec<Cafe>) -> Result<(), CafeError> {
        self.save(&updated).await?;
        *current = updated;
        Ok(())
    }

    /// Write the list through a temp file so a crash never leaves half a file
    async fn save(&self, favorites: &[Cafe]) -> Result<(), CafeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(favorites)
            .map_err(|e| CafeError::StorageError(format!("Serialize favorites: {}", e)))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            log::error!("Failed to write {}: {}", tmp.display(), e);
            CafeError::StorageError(format!("Write favorites: {}", e))
        })?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            log::error!("Failed to replace {}: {}", path.display(), e);
            CafeError::StorageError(format!("Replace favorites: {}", e))
        })?;

        log::debug!("Saved {} favorites to {}", favorites.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::cafe;
    use tokio_test::{assert_err, assert_ok};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cafe-finder-{}-{}-{}.json",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[tokio::test]
    async fn test_add_is_idempotent_by_id() {
        let store = FavoritesStore::in_memory();

        assert!(store.add(cafe(1, "Blue Bottle Coffee", 10)).await.unwrap());
        assert!(!store.add(cafe(1, "Blue Bottle Coffee", 99)).await.unwrap());
        assert_eq!(store.count().await, 1);
        assert!(store.is_favorite(1).await);
        assert!(!store.is_favorite(2).await);
    }

    #[tokio::test]
    async fn test_toggle_and_remove() {
        let store = FavoritesStore::in_memory();

        assert!(store.toggle(cafe(5, "Telescope", 200)).await.unwrap());
        assert!(store.is_favorite(5).await);
        assert!(!store.toggle(cafe(5, "Telescope", 200)).await.unwrap());
        assert!(!store.is_favorite(5).await);

        store.add(cafe(6, "Ten Belles", 300)).await.unwrap();
        assert!(store.remove(6).await.unwrap());
        assert!(!store.remove(6).await.unwrap());

        store.add(cafe(7, "Fragments", 400)).await.unwrap();
        assert_ok!(store.clear().await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_persists_across_loads() {
        let path = temp_path("persist");

        let store = FavoritesStore::load(&path).await;
        assert_eq!(store.count().await, 0);
        store.add(cafe(1, "Blue Bottle Coffee", 10)).await.unwrap();
        store.add(cafe(2, "Coutume", 20)).await.unwrap();
        store.remove(1).await.unwrap();

        let reloaded = FavoritesStore::load(&path).await;
        let favorites = reloaded.list().await;
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Coutume");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FavoritesStore::load(&path).await;
        assert_eq!(store.count().await, 0);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_save_leaves_favorites_unchanged() {
        let path = std::env::temp_dir()
            .join("cafe-finder-missing-dir")
            .join("nested")
            .join("favorites.json");
        let store = FavoritesStore::load(&path).await;

        let result = store.add(cafe(1, "Blue Bottle Coffee", 10)).await;
        assert_err!(&result);
        assert!(matches!(result, Err(CafeError::StorageError(_))));
        assert!(!store.is_favorite(1).await);

        // Retrying reports the failure again instead of claiming a duplicate
        let retry = store.add(cafe(1, "Blue Bottle Coffee", 10)).await;
        assert!(matches!(retry, Err(CafeError::StorageError(_))));

        assert!(matches!(
            store.toggle(cafe(2, "Coutume", 20)).await,
            Err(CafeError::StorageError(_))
        ));
        assert!(!store.is_favorite(2).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_remove_and_clear_keep_favorites() {
        let path = temp_path("rollback");
        let store = FavoritesStore::load(&path).await;
        store.add(cafe(1, "Blue Bottle Coffee", 10)).await.unwrap();
        store.add(cafe(2, "Coutume", 20)).await.unwrap();

        // A directory where the temp file should go makes every later write fail
        let tmp = path.with_extension("json.tmp");
        tokio::fs::create_dir(&tmp).await.unwrap();

        assert!(matches!(store.remove(1).await, Err(CafeError::StorageError(_))));
        assert!(matches!(store.clear().await, Err(CafeError::StorageError(_))));
        assert_eq!(store.count().await, 2);
        assert!(store.is_favorite(1).await);

        let _ = tokio::fs::remove_dir(&tmp).await;
        let _ = tokio::fs::remove_file(&path).await;
    }
}
