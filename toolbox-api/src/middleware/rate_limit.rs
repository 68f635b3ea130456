/// Per-IP rate limiting middleware
///
/// Every request consumes one token from a bucket keyed by the client IP.
/// Buckets live in process memory; a restart forgets them.
///
/// # Algorithm
///
/// Token bucket:
/// - Capacity = requests per minute
/// - Tokens refill continuously at `capacity / 60` per second
/// - Each request consumes 1 token
/// - Request rejected with 429 if the bucket is empty
///
/// # Headers
///
/// - `X-RateLimit-Limit`: Requests allowed per minute
/// - `X-RateLimit-Remaining`: Whole tokens left after this request
/// - `Retry-After`: Seconds to wait (429 responses only)
///
/// # Client identity
///
/// The peer address from `ConnectInfo`. Requests without one (tests,
/// in-process calls) share the `unknown` bucket.

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::{sync::Mutex, time::Instant};

/// Buckets beyond this count trigger a sweep of idle ones
const PRUNE_THRESHOLD: usize = 10_000;

/// Token bucket for one client
#[derive(Debug, Clone)]
struct TokenBucket {
    /// Current number of tokens
    tokens: f64,

    /// Last refill time
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a new full bucket
    fn new(capacity: u32, now: Instant) -> Self {
        TokenBucket {
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32, now: Instant) {
        let elapsed_secs = now.saturating_duration_since(self.last_refill).as_secs_f64();

        self.tokens = (self.tokens + elapsed_secs * rate).min(capacity as f64);
        self.last_refill = now;
    }

    /// Attempts to consume N tokens
    fn try_consume(&mut self, count: f64) -> bool {
        if self.tokens >= count {
            self.tokens -= count;
            true
        } else {
            false
        }
    }

    /// Calculates seconds until N tokens available
    fn seconds_until_available(&self, count: f64, rate: f64) -> u64 {
        let deficit = count - self.tokens;
        if deficit <= 0.0 {
            0
        } else {
            (deficit / rate).ceil() as u64
        }
    }
}

/// Result of rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether request is allowed
    pub ok: bool,

    /// Tokens remaining
    pub remaining: u32,

    /// Seconds until a token is available
    pub reset_after: u64,
}

/// In-memory token buckets keyed by client
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    capacity: u32,
    refill_rate: f64,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests_per_minute` per client
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            capacity: requests_per_minute,
            refill_rate: requests_per_minute as f64 / 60.0,
        }
    }

    /// Requests allowed per minute
    pub fn limit(&self) -> u32 {
        self.capacity
    }

    /// Takes one token from `key`'s bucket
    pub async fn check(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;

        if buckets.len() > PRUNE_THRESHOLD {
            let capacity = self.capacity as f64;
            let rate = self.refill_rate;
            // A bucket that would be full again carries no state
            buckets.retain(|_, bucket| {
                let idle = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens + idle * rate < capacity
            });
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, now));
        bucket.refill(self.refill_rate, self.capacity, now);

        let ok = bucket.try_consume(1.0);
        RateLimitResult {
            ok,
            remaining: bucket.tokens.floor() as u32,
            reset_after: if ok {
                0
            } else {
                bucket.seconds_until_available(1.0, self.refill_rate).max(1)
            },
        }
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware layer
///
/// # Errors
///
/// - 429 Too Many Requests: Rate limit exceeded
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&request);
    let result = state.rate_limiter.check(&key).await;

    if !result.ok {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return Err(create_rate_limit_error(result));
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(state.rate_limiter.limit()),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(result.remaining),
    );

    Ok(response)
}

/// Creates a rate limit exceeded error response
fn create_rate_limit_error(result: RateLimitResult) -> ApiError {
    ApiError::RateLimitExceeded {
        retry_after: result.reset_after,
        message: format!(
            "Too many requests. Try again in {} seconds",
            result.reset_after
        ),
    }
}
