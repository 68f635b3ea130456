/// Bearer token authentication for Axum
///
/// Protected routes sit behind [`jwt_auth_middleware`]. It reads the
/// `Authorization` header, validates the token and inserts the resulting
/// [`Principal`] into the request extensions for handlers to pick up.
///
/// # Outcomes
///
/// - no token → `AuthError::MissingCredentials` (401)
/// - invalid, expired or mis-signed token → `AuthError::InvalidCredentials` (403)
/// - valid token → request continues with a `Principal`
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use toolbox_shared::auth::middleware::{create_jwt_middleware, Principal};
///
/// async fn protected_handler(Extension(principal): Extension<Principal>) -> String {
///     format!("Hello, {}!", principal.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret".to_string())));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email carried in the token
    pub email: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on the request
    MissingCredentials,

    /// Token present but rejected
    InvalidCredentials(String),
}

impl AuthError {
    /// Status code for the failure
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidCredentials("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidCredentials("Invalid issuer".to_string()),
            other => AuthError::InvalidCredentials(format!("Invalid token: {}", other)),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AuthError::MissingCredentials => ("unauthorized", "Missing credentials".to_string()),
            AuthError::InvalidCredentials(msg) => ("forbidden", msg),
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

/// Pulls the token out of the `Authorization` header
///
/// Takes the second whitespace-separated part, so `Bearer <token>` works and
/// a bare scheme with no token counts as missing.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_whitespace().nth(1))
}

/// Verifies the bearer token on a set of request headers
///
/// # Errors
///
/// See the module docs for the mapping.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Principal, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingCredentials)?;
    let claims = validate_token(token, secret)?;
    Ok(Principal::from(claims))
}

/// JWT authentication middleware
///
/// # Errors
///
/// Rejects the request with 401 or 403 as described in the module docs.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = authenticate(req.headers(), &secret)?;

    tracing::debug!(user_id = %principal.user_id, "Authenticated request");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the secret so the result can go straight into
/// `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: String,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::{body::Body, http::HeaderValue, middleware, routing::get, Extension, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_missing() {
        assert_eq!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_authenticate_valid() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id, "a@example.com"), SECRET).unwrap();

        let principal = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap();
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.email, "a@example.com");
    }

    #[test]
    fn test_authenticate_expired_is_invalid() {
        let claims = Claims::issued_at(Uuid::new_v4(), "a@example.com", Utc::now() - Duration::days(8));
        let token = create_token(&claims, SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {token}")), SECRET).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_error_status() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidCredentials("bad".to_string()).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_middleware_attaches_principal() {
        async fn whoami(Extension(principal): Extension<Principal>) -> String {
            principal.email
        }

        let app = Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn(create_jwt_middleware(SECRET.to_string())));

        let token = create_token(&Claims::new(Uuid::new_v4(), "b@example.com"), SECRET).unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"b@example.com");

        let response = app
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
