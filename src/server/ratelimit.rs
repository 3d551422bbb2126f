use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::AppState;

/// Outcome of a rate limit check for one client.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
}

/// Per-client request throttling. Implementations must be safe to share
/// across the whole router.
pub trait RateLimiter: Send + Sync {
    fn check(&self, client: &str) -> Decision;
}

/// Sliding window limiter over in-memory timestamps. Pruning happens on
/// each check, so idle clients cost nothing after one window.
pub struct SlidingWindow {
    max_requests: u32,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindow {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for SlidingWindow {
    fn check(&self, client: &str) -> Decision {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        // Prune expired timestamps everywhere and drop clients with none
        // left, so the map does not retain every address ever seen.
        hits.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < self.window);
            !timestamps.is_empty()
        });

        let timestamps = hits.entry(client.to_string()).or_default();
        if timestamps.len() >= self.max_requests as usize {
            return Decision {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
            };
        }

        timestamps.push(now);
        Decision {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - timestamps.len() as u32,
        }
    }
}

/// Limiter that admits everything. Used in tests and demos.
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn check(&self, _client: &str) -> Decision {
        Decision {
            allowed: true,
            limit: u32::MAX,
            remaining: u32::MAX,
        }
    }
}

/// Resolves the client identity from proxy headers, falling back to a
/// shared bucket when none are present.
fn client_id(request: &Request) -> String {
    let headers = request.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    // Liveness probes are exempt.
    let path = request.uri().path();
    if path == "/" || path == "/healthz" {
        return next.run(request).await;
    }

    let client = client_id(&request);
    let decision = state.limiter.check(&client);

    if !decision.allowed {
        tracing::warn!("Rate limit exceeded for {client}");
        let body = json!({ "data": null, "error": "Too many requests" });
        let mut response =
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
        let headers = response.headers_mut();
        if let Ok(v) = decision.limit.to_string().parse() {
            headers.insert("X-RateLimit-Limit", v);
        }
        headers.insert(
            "X-RateLimit-Remaining",
            axum::http::HeaderValue::from_static("0"),
        );
        return response;
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = SlidingWindow::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").allowed);
        }
        assert!(!limiter.check("10.0.0.1").allowed);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = SlidingWindow::new(1, Duration::from_secs(60));
        assert!(limiter.check("10.0.0.1").allowed);
        assert!(!limiter.check("10.0.0.1").allowed);
        assert!(limiter.check("10.0.0.2").allowed);
    }

    #[test]
    fn test_window_expiry_frees_slots() {
        let limiter = SlidingWindow::new(1, Duration::from_millis(10));
        assert!(limiter.check("10.0.0.1").allowed);
        assert!(!limiter.check("10.0.0.1").allowed);
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("10.0.0.1").allowed);
    }

    #[test]
    fn test_idle_clients_are_dropped() {
        let limiter = SlidingWindow::new(1, Duration::from_millis(10));
        assert!(limiter.check("10.0.0.1").allowed);
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("10.0.0.2").allowed);

        let hits = limiter.hits.lock().unwrap();
        assert!(!hits.contains_key("10.0.0.1"));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = SlidingWindow::new(3, Duration::from_secs(60));
        assert_eq!(limiter.check("10.0.0.1").remaining, 2);
        assert_eq!(limiter.check("10.0.0.1").remaining, 1);
        assert_eq!(limiter.check("10.0.0.1").remaining, 0);
    }
}
