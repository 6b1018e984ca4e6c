//! Per-IP rate limiting for public lookup routes
//!
//! Order tracking and coupon validation are unauthenticated and accept
//! guessable inputs, so each is capped per client IP. `X-Forwarded-For` is
//! only honoured when the server runs behind a proxy that overwrites it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(trust_forwarded_for: bool) -> Self {
        Self {
            trust_forwarded_for,
            ..Self::default()
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }

        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Client IP: the peer address, or the first `X-Forwarded-For` entry when
/// the proxy header is trusted
fn extract_ip(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    state: &AppState,
    route: &'static str,
    max_requests: u32,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.rate_limiter.trust_forwarded_for);
    if !state.rate_limiter.check(route, &ip, max_requests, 60).await {
        tracing::warn!(route, ip = %ip, "Rate limit exceeded");
        return Err(AppError::new(ErrorCode::RateLimited));
    }
    Ok(next.run(request).await)
}

/// Order tracking: 10 requests/minute per IP
pub async fn tracking_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state, "order_tracking", 10, request, next).await
}

/// Coupon validation: 30 requests/minute per IP
pub async fn coupon_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit(&state, "coupon_validate", 30, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_limit_per_ip() {
        let limiter = RateLimiter::new(false);
        for _ in 0..3 {
            assert!(limiter.check("track", "1.2.3.4", 3, 60).await);
        }
        assert!(!limiter.check("track", "1.2.3.4", 3, 60).await);
        assert!(limiter.check("track", "5.6.7.8", 3, 60).await);
        assert!(limiter.check("coupon", "1.2.3.4", 3, 60).await);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_entries() {
        let limiter = RateLimiter::new(false);
        assert!(limiter.check("track", "1.2.3.4", 1, 60).await);
        limiter.cleanup().await;
        assert!(!limiter.check("track", "1.2.3.4", 1, 60).await);
    }

    fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/api/orders/track");
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: std::net::SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(axum::extract::ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_for_ignored_unless_trusted() {
        let request = request_from("198.51.100.4:50000", Some("203.0.113.7"));
        assert_eq!(extract_ip(&request, false), "198.51.100.4");
    }

    #[test]
    fn test_trusted_proxy_uses_first_forwarded_entry() {
        let request = request_from("10.0.0.2:443", Some(" 203.0.113.7 , 10.0.0.1"));
        assert_eq!(extract_ip(&request, true), "203.0.113.7");

        let request = request_from("10.0.0.2:443", None);
        assert_eq!(extract_ip(&request, true), "10.0.0.2");
    }

    #[tokio::test]
    async fn test_spoofed_header_does_not_reset_budget() {
        let limiter = RateLimiter::new(false);
        let first = extract_ip(&request_from("198.51.100.4:50000", Some("1.1.1.1")), false);
        let second = extract_ip(&request_from("198.51.100.4:50000", Some("2.2.2.2")), false);
        assert!(limiter.check("track", &first, 1, 60).await);
        assert!(!limiter.check("track", &second, 1, 60).await);
    }
}
