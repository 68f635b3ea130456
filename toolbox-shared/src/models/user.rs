/// User model and record store operations
///
/// This module provides the User model and the lookups the auth flow needs.
/// Users are stored in `users.json` and are never deleted.
///
/// # On-disk shape
///
/// ```json
/// {
///   "id": "0b0c…",
///   "username": "alice",
///   "email": "alice@example.com",
///   "password_hash": "$argon2id$…",
///   "avatar_url": null,
///   "created_at": "2024-05-01T12:00:00Z",
///   "updated_at": "2024-05-01T12:00:00Z",
///   "is_active": true,
///   "user_type": "free"
/// }
/// ```
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::db::RecordStore;
/// use toolbox_shared::models::user::{CreateUser, User};
///
/// # async fn example(store: RecordStore) -> Result<(), Box<dyn std::error::Error>> {
/// let created = User::create(
///     &store,
///     CreateUser {
///         username: "alice".to_string(),
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_id(&store, created.id).await;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{RecordSet, RecordStore, StoreError};

/// Account tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Default tier for every new account
    #[default]
    Free,

    /// Paid tier
    Premium,
}

/// User model representing a user account
///
/// Includes the password hash; only hand this to code that verifies
/// credentials. Everything else should use [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name, not required to be unique
    pub username: String,

    /// Email address, the lookup key for login
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// Optional avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Whether the account is active
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Account tier
    #[serde(default)]
    pub user_type: UserType,
}

fn default_active() -> bool {
    true
}

/// User record with the password hash stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub user_type: UserType,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_active: user.is_active,
            user_type: user.user_type,
        }
    }
}

/// Public subset returned right after registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub username: String,

    /// Email address (caller checks uniqueness first)
    pub email: String,

    /// Already-hashed password (NOT plaintext!)
    pub password_hash: String,
}

impl User {
    /// Appends a new user to the users set
    ///
    /// Generates the ID and timestamps and defaults the tier to `free`.
    /// Email uniqueness is the caller's responsibility.
    ///
    /// # Returns
    ///
    /// The public summary (id, username, email); the hash is never returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the users file cannot be written.
    pub async fn create(store: &RecordStore, data: CreateUser) -> Result<UserSummary, StoreError> {
        let mut users = store.load::<User>(RecordSet::Users).await;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            avatar_url: None,
            created_at: now,
            updated_at: now,
            is_active: true,
            user_type: UserType::Free,
        };

        let summary = UserSummary {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        };

        users.records.push(user);
        store.save(RecordSet::Users, &users).await?;

        tracing::info!(user_id = %summary.id, "Created user");
        Ok(summary)
    }

    /// Finds a user by exact email match, including the password hash
    pub async fn find_by_email(store: &RecordStore, email: &str) -> Option<User> {
        let users: Vec<User> = store.read_all(RecordSet::Users).await;
        users.into_iter().find(|user| user.email == email)
    }

    /// Finds a user by ID with the password hash stripped
    pub async fn find_by_id(store: &RecordStore, id: Uuid) -> Option<PublicUser> {
        let users: Vec<User> = store.read_all(RecordSet::Users).await;
        users
            .into_iter()
            .find(|user| user.id == id)
            .map(PublicUser::from)
    }

    /// Number of stored users
    pub async fn count(store: &RecordStore) -> usize {
        store.read_all::<User>(RecordSet::Users).await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.init().await.unwrap();
        (dir, store)
    }

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$fake".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_summary_with_defaults_on_disk() {
        let (_dir, store) = test_store().await;

        let summary = User::create(&store, new_user("alice@example.com")).await.unwrap();
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.email, "alice@example.com");

        let stored = User::find_by_email(&store, "alice@example.com").await.unwrap();
        assert_eq!(stored.id, summary.id);
        assert_eq!(stored.user_type, UserType::Free);
        assert!(stored.is_active);
        assert!(stored.avatar_url.is_none());
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let (_dir, store) = test_store().await;

        let a = User::create(&store, new_user("a@example.com")).await.unwrap();
        let b = User::create(&store, new_user("b@example.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(User::count(&store).await, 2);
    }

    #[tokio::test]
    async fn test_find_by_email_is_exact() {
        let (_dir, store) = test_store().await;
        User::create(&store, new_user("alice@example.com")).await.unwrap();

        assert!(User::find_by_email(&store, "alice@example.com").await.is_some());
        assert!(User::find_by_email(&store, "bob@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_never_exposes_password_hash() {
        let (_dir, store) = test_store().await;
        let summary = User::create(&store, new_user("alice@example.com")).await.unwrap();

        let public = User::find_by_id(&store, summary.id).await.unwrap();
        let json = serde_json::to_value(&public).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["user_type"], "free");
    }

    #[tokio::test]
    async fn test_find_by_id_unknown() {
        let (_dir, store) = test_store().await;
        assert!(User::find_by_id(&store, Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_tolerates_records_without_optional_fields() {
        let (_dir, store) = test_store().await;
        let id = Uuid::new_v4();
        std::fs::write(
            store.path_for(RecordSet::Users),
            serde_json::json!([{
                "id": id,
                "username": "legacy",
                "email": "legacy@example.com",
                "password_hash": "x",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }])
            .to_string(),
        )
        .unwrap();

        let user = User::find_by_id(&store, id).await.unwrap();
        assert!(user.is_active);
        assert_eq!(user.user_type, UserType::Free);
    }

    #[tokio::test]
    async fn test_create_keeps_users_that_do_not_decode() {
        let (_dir, store) = test_store().await;
        std::fs::write(
            store.path_for(RecordSet::Users),
            serde_json::json!([
                {
                    "id": Uuid::new_v4(),
                    "username": "a",
                    "email": "a@example.com",
                    "password_hash": "x",
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-01T00:00:00Z"
                },
                {
                    "id": Uuid::new_v4(),
                    "username": "b",
                    "email": "b@example.com",
                    "password_hash": "x",
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-01T00:00:00Z",
                    "user_type": "enterprise"
                }
            ])
            .to_string(),
        )
        .unwrap();

        assert_eq!(User::count(&store).await, 1);

        User::create(&store, new_user("c@example.com")).await.unwrap();

        let raw: Vec<serde_json::Value> = serde_json::from_str(
            &std::fs::read_to_string(store.path_for(RecordSet::Users)).unwrap(),
        )
        .unwrap();
        let emails: Vec<&str> = raw.iter().map(|u| u["email"].as_str().unwrap()).collect();
        assert_eq!(emails.len(), 3);
        assert!(emails.contains(&"a@example.com"));
        assert!(emails.contains(&"b@example.com"));
        assert!(emails.contains(&"c@example.com"));
        assert!(User::find_by_email(&store, "a@example.com").await.is_some());
    }
}
