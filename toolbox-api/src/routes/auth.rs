/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login (bearer token plus session cookie)
/// - Logout (ends the cookie session)
/// - Current user
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token
/// - `POST /api/auth/logout` - Destroy the session
/// - `GET  /api/auth/me` - Current user (bearer token required)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::parse_body,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use toolbox_shared::{
    auth::{jwt, middleware::Principal, password, session},
    models::user::{CreateUser, User, UserSummary, UserType},
};
use uuid::Uuid;
use validator::Validate;

/// Same message for unknown email and wrong password
const INVALID_LOGIN: &str = "Invalid email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(
        required(message = "Please fill in all required fields"),
        length(min = 1, message = "Please fill in all required fields")
    )]
    pub username: Option<String>,

    /// Email address (the unique lookup key)
    #[validate(
        required(message = "Please fill in all required fields"),
        length(min = 1, message = "Please fill in all required fields")
    )]
    pub email: Option<String>,

    /// Plaintext password
    #[validate(
        required(message = "Please fill in all required fields"),
        length(min = 1, message = "Please fill in all required fields")
    )]
    pub password: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Please enter email and password"),
        length(min = 1, message = "Please enter email and password")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Please enter email and password"),
        length(min = 1, message = "Please enter email and password")
    )]
    pub password: Option<String>,
}

/// User as returned by login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub user_type: UserType,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
    pub token: String,
}

/// User as returned by `/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// `/me` response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: MeUser,
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Converts validator output into an `ApiError`
pub(crate) fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

fn issue_token(user_id: Uuid, email: &str, secret: &str) -> ApiResult<String> {
    let claims = jwt::Claims::new(user_id, email);
    Ok(jwt::create_token(&claims, secret)?)
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "hunter22"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "message": "Registration successful",
///   "user": { "id": "uuid", "username": "alice", "email": "alice@example.com" },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or non-string field, or password shorter than 6 characters
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Store write failed
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<JsonValue>,
) -> ApiResult<impl IntoResponse> {
    let req: RegisterRequest = parse_body(body)?;
    req.validate().map_err(validation_error)?;

    let (Some(username), Some(email), Some(raw_password)) = (req.username, req.email, req.password)
    else {
        return Err(ApiError::BadRequest("Please fill in all required fields".to_string()));
    };

    password::validate_password_length(&raw_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail::new("password", e)])
    })?;

    if User::find_by_email(&state.store, &email).await.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = password::hash_password(&raw_password)?;

    let user = User::create(
        &state.store,
        CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    let token = issue_token(user.id, &user.email, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user,
            token,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates a user, returns a bearer token and opens a cookie session.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "password": "hunter22"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or non-string email or password
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<JsonValue>,
) -> ApiResult<impl IntoResponse> {
    let req: LoginRequest = parse_body(body)?;
    req.validate().map_err(validation_error)?;

    let (Some(email), Some(raw_password)) = (req.email, req.password) else {
        return Err(ApiError::BadRequest("Please enter email and password".to_string()));
    };

    let user = User::find_by_email(&state.store, &email)
        .await
        .ok_or_else(|| ApiError::Unauthorized(INVALID_LOGIN.to_string()))?;

    let valid = password::verify_password(&raw_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_LOGIN.to_string()));
    }

    let token = issue_token(user.id, &user.email, state.jwt_secret())?;

    let session_value = state.sessions.create(user.id).await?;
    let cookie = session::session_cookie(&session_value, state.config.api.production);

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: LoginUser {
                id: user.id,
                username: user.username,
                email: user.email,
                user_type: user.user_type,
            },
            token,
        }),
    ))
}

/// Logout endpoint
///
/// Destroys the cookie session if there is one. Bearer tokens stay valid
/// until they expire.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session_value = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session::session_cookie_value);

    if let Some(value) = session_value {
        if state.sessions.destroy(value).await {
            tracing::debug!("Session destroyed");
        }
    }

    (
        [(
            header::SET_COOKIE,
            session::clear_session_cookie(state.config.api.production),
        )],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current user endpoint
///
/// # Errors
///
/// - `404 Not Found`: The token's user no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.store, principal.user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: MeUser {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            user_type: user.user_type,
            created_at: user.created_at,
        },
    }))
}
