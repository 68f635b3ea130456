/// Authentication utilities
///
/// This module provides the authentication primitives for AI Toolbox:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and length validation
/// - [`jwt`]: Seven-day bearer token generation and validation
/// - [`middleware`]: Axum middleware that turns a bearer token into a `Principal`
/// - [`session`]: In-memory login sessions behind a signed cookie
///
/// # Known limitations
///
/// - Bearer tokens are stateless and cannot be revoked; logout only ends the
///   cookie session.
/// - When `JWT_SECRET` / `SESSION_SECRET` are unset, the server falls back to
///   hardcoded secrets and logs a warning.
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::auth::password::{hash_password, verify_password};
/// use toolbox_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com");
/// let token = create_token(&claims, "secret")?;
/// let validated = validate_token(&token, "secret")?;
/// assert_eq!(validated.email, "user@example.com");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;
