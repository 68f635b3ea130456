/// Server-side login sessions
///
/// Login opens a session and hands the browser a signed cookie; logout
/// destroys it. Sessions live in process memory only and expire after 24
/// hours. They are independent of bearer tokens: destroying a session does
/// not revoke any token.
///
/// # Cookie format
///
/// ```text
/// sid=<session id>.<hex HMAC-SHA256(session id)>
/// ```
///
/// # Example
///
/// ```
/// use toolbox_shared::auth::session::SessionStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionStore::new("session-secret");
/// let cookie_value = sessions.create(Uuid::new_v4()).await?;
///
/// assert!(sessions.get(&cookie_value).await.is_some());
/// assert!(sessions.destroy(&cookie_value).await);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

const SESSION_ID_LENGTH: usize = 32;

/// Lifetime of a session
pub fn session_lifetime() -> Duration {
    Duration::hours(24)
}

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The signing key could not be initialised
    #[error("Invalid session signing key: {0}")]
    InvalidKey(String),
}

/// One open session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// User who logged in
    pub user_id: Uuid,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// When the session stops being honoured
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory session registry with signed cookie values
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    secret: Arc<Vec<u8>>,
}

impl SessionStore {
    /// Creates an empty store signing cookies with `secret`
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            secret: Arc::new(secret.as_ref().to_vec()),
        }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| SessionError::InvalidKey(e.to_string()))
    }

    fn sign(&self, session_id: &str) -> Result<String, SessionError> {
        let mut mac = self.mac()?;
        mac.update(session_id.as_bytes());
        Ok(format!("{}.{}", session_id, hex::encode(mac.finalize().into_bytes())))
    }

    /// Checks the signature and returns the bare session ID
    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (session_id, signature) = cookie_value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(session_id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(session_id)
    }

    /// Opens a session for `user_id`
    ///
    /// Expired sessions are swept on the way in.
    ///
    /// # Returns
    ///
    /// The signed value to put in the session cookie
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie value cannot be signed
    pub async fn create(&self, user_id: Uuid) -> Result<String, SessionError> {
        let session_id = generate_session_id();
        let cookie_value = self.sign(&session_id)?;

        let now = Utc::now();
        let session = Session {
            user_id,
            created_at: now,
            expires_at: now + session_lifetime(),
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired());
        sessions.insert(session_id, session);

        Ok(cookie_value)
    }

    /// Looks up a live session by its signed cookie value
    pub async fn get(&self, cookie_value: &str) -> Option<Session> {
        let session_id = self.verify(cookie_value)?;
        let sessions = self.sessions.read().await;

        sessions
            .get(session_id)
            .filter(|session| !session.is_expired())
            .cloned()
    }

    /// Destroys the session named by a signed cookie value
    ///
    /// Returns `true` if a session was removed.
    pub async fn destroy(&self, cookie_value: &str) -> bool {
        let Some(session_id) = self.verify(cookie_value) else {
            return false;
        };

        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Number of sessions held, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are held
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn generate_session_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..SESSION_ID_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Builds the `Set-Cookie` value for a new session
pub fn session_cookie(cookie_value: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        cookie_value,
        session_lifetime().num_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Finds the session cookie value in a `Cookie` header
pub fn session_cookie_value(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let sessions = SessionStore::new("secret");
        let user_id = Uuid::new_v4();

        let cookie_value = sessions.create(user_id).await.unwrap();
        let session = sessions.get(&cookie_value).await.unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.expires_at - session.created_at, session_lifetime());
    }

    #[tokio::test]
    async fn test_destroy() {
        let sessions = SessionStore::new("secret");
        let cookie_value = sessions.create(Uuid::new_v4()).await.unwrap();

        assert!(sessions.destroy(&cookie_value).await);
        assert!(sessions.get(&cookie_value).await.is_none());
        assert!(!sessions.destroy(&cookie_value).await);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_tampered_cookie_rejected() {
        let sessions = SessionStore::new("secret");
        let cookie_value = sessions.create(Uuid::new_v4()).await.unwrap();
        let (session_id, _) = cookie_value.rsplit_once('.').unwrap();

        assert!(sessions.get(session_id).await.is_none());
        assert!(sessions.get(&format!("{session_id}.deadbeef")).await.is_none());
        assert!(!sessions.destroy(&format!("{session_id}.00")).await);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_other_secret_rejected() {
        let ours = SessionStore::new("secret");
        let theirs = SessionStore::new("another-secret");

        let cookie_value = theirs.create(Uuid::new_v4()).await.unwrap();
        assert!(ours.get(&cookie_value).await.is_none());
    }

    #[test]
    fn test_session_ids_are_random() {
        let a = generate_session_id();
        let b = generate_session_id();

        assert_eq!(a.len(), SESSION_ID_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_cookie_helpers() {
        let cookie = session_cookie("abc.123", true);
        assert!(cookie.starts_with("sid=abc.123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.ends_with("; Secure"));

        assert!(!session_cookie("abc.123", false).contains("Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn test_session_cookie_value() {
        assert_eq!(session_cookie_value("theme=dark; sid=abc.123"), Some("abc.123"));
        assert_eq!(session_cookie_value("sid=xyz"), Some("xyz"));
        assert_eq!(session_cookie_value("theme=dark"), None);
    }
}
