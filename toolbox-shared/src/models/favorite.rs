/// Favorite tools
///
/// At most one favorite per (user, tool) pair, stored in `favorites.json`.
/// Adding an existing favorite is a no-op that reports `false`; removing a
/// favorite that does not exist also reports `false`. Neither case writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{RecordSet, RecordStore, StoreError};

/// A tool a user has marked as favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Surrogate record ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Tool identifier
    pub tool_name: String,

    /// When the favorite was added
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Adds a favorite
    ///
    /// # Returns
    ///
    /// `true` if a new record was appended, `false` if the pair already existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites file cannot be written.
    pub async fn add(
        store: &RecordStore,
        user_id: Uuid,
        tool_name: &str,
    ) -> Result<bool, StoreError> {
        let mut favorites = store.load::<Favorite>(RecordSet::Favorites).await;

        if favorites
            .records
            .iter()
            .any(|fav| fav.user_id == user_id && fav.tool_name == tool_name)
        {
            return Ok(false);
        }

        favorites.records.push(Favorite {
            id: Uuid::new_v4(),
            user_id,
            tool_name: tool_name.to_string(),
            created_at: Utc::now(),
        });

        store.save(RecordSet::Favorites, &favorites).await?;
        Ok(true)
    }

    /// Removes a favorite
    ///
    /// # Returns
    ///
    /// `true` if a matching record was removed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites file cannot be written.
    pub async fn remove(
        store: &RecordStore,
        user_id: Uuid,
        tool_name: &str,
    ) -> Result<bool, StoreError> {
        let mut favorites = store.load::<Favorite>(RecordSet::Favorites).await;
        let before = favorites.records.len();

        favorites
            .records
            .retain(|fav| !(fav.user_id == user_id && fav.tool_name == tool_name));

        if favorites.records.len() == before {
            return Ok(false);
        }

        store.save(RecordSet::Favorites, &favorites).await?;
        Ok(true)
    }

    /// Lists a user's favorites, newest first
    pub async fn list_by_user(store: &RecordStore, user_id: Uuid) -> Vec<Favorite> {
        let favorites: Vec<Favorite> = store.read_all(RecordSet::Favorites).await;

        let mut mine: Vec<Favorite> = favorites
            .into_iter()
            .filter(|fav| fav.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.init().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_add_twice_is_noop() {
        let (_dir, store) = test_store().await;
        let user_id = Uuid::new_v4();

        assert!(Favorite::add(&store, user_id, "translation").await.unwrap());
        assert!(!Favorite::add(&store, user_id, "translation").await.unwrap());

        let all: Vec<Favorite> = store.read_all(RecordSet::Favorites).await;
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_same_tool_different_users() {
        let (_dir, store) = test_store().await;

        assert!(Favorite::add(&store, Uuid::new_v4(), "translation").await.unwrap());
        assert!(Favorite::add(&store, Uuid::new_v4(), "translation").await.unwrap());

        let all: Vec<Favorite> = store.read_all(RecordSet::Favorites).await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_store_unchanged() {
        let (_dir, store) = test_store().await;
        let user_id = Uuid::new_v4();
        Favorite::add(&store, user_id, "code-assistant").await.unwrap();

        let before = std::fs::read_to_string(store.path_for(RecordSet::Favorites)).unwrap();
        assert!(!Favorite::remove(&store, user_id, "image-generator").await.unwrap());
        let after = std::fs::read_to_string(store.path_for(RecordSet::Favorites)).unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let (_dir, store) = test_store().await;
        let user_id = Uuid::new_v4();
        Favorite::add(&store, user_id, "code-assistant").await.unwrap();

        assert!(Favorite::remove(&store, user_id, "code-assistant").await.unwrap());
        assert!(Favorite::list_by_user(&store, user_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = test_store().await;
        let user_id = Uuid::new_v4();
        let base = Utc::now();

        let records: Vec<Favorite> = [("old", 0), ("newest", 20), ("middle", 10)]
            .into_iter()
            .map(|(tool, minutes)| Favorite {
                id: Uuid::new_v4(),
                user_id,
                tool_name: tool.to_string(),
                created_at: base + Duration::minutes(minutes),
            })
            .collect();
        store.write_all(RecordSet::Favorites, &records).await.unwrap();

        let order: Vec<String> = Favorite::list_by_user(&store, user_id)
            .await
            .into_iter()
            .map(|fav| fav.tool_name)
            .collect();
        assert_eq!(order, vec!["newest", "middle", "old"]);
    }
}
