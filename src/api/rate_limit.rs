//! Per-IP fixed-window rate limiting

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorResponse;

/// Per-key window state
#[derive(Debug, Clone)]
struct WindowState {
    count: u64,
    window_start: Instant,
}

/// Shared fixed-window rate limiter. Each instance covers one scope (the
/// API at large, or the login route) with its own window and message.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u64,
    window_secs: u64,
    message: &'static str,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u64, window_secs: u64, message: &'static str) -> Self {
        Self {
            max_requests,
            window_secs,
            message,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether a request from the given key is within its window budget
    fn check(&self, key: &str) -> bool {
        let mut windows = self.windows.write().expect("rate limit lock poisoned");
        let now = Instant::now();

        let window = windows.entry(key.to_string()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        if now.duration_since(window.window_start).as_secs() >= self.window_secs {
            window.count = 0;
            window.window_start = now;
        }

        if window.count >= self.max_requests {
            false
        } else {
            window.count += 1;
            true
        }
    }
}

/// Middleware that enforces the limiter it captured. Requests are keyed by
/// client IP; when the server runs without connect info the key collapses
/// to a single shared bucket.
pub async fn rate_limit_middleware(limiter: RateLimiter, request: Request, next: Next) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check(&key) {
        let body = ErrorResponse {
            error: limiter.message.to_string(),
            mensagem: None,
        };
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denies_over_budget() {
        let limiter = RateLimiter::new(2, 900, "limite");
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        // other clients have their own window
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn test_zero_window_always_resets() {
        let limiter = RateLimiter::new(1, 0, "limite");
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
    }
}
