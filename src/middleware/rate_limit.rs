// Rate limiting for the public lead form
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::{ErrorMessage, HttpError};

// In-memory sliding window, per client
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.is_allowed_at(key, Instant::now())
    }

    pub fn is_allowed_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Drop requests outside the window, and clients left with none
        requests.retain(|_, timestamps| {
            timestamps.retain(|&timestamp| now.saturating_duration_since(timestamp) < self.window);
            !timestamps.is_empty()
        });

        let entry = requests.entry(key.to_string()).or_default();
        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            if entry.is_empty() {
                requests.remove(key);
            }
            false
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_id = client_id(request.headers(), peer);

    if !limiter.is_allowed(&client_id) {
        tracing::warn!("Rate limit hit for {} on {}", client_id, request.uri().path());
        return Err(HttpError::too_many_requests(ErrorMessage::TooManyRequests.to_string()));
    }

    Ok(next.run(request).await)
}

/// First address in `x-forwarded-for`, then `x-real-ip`, then the peer
/// address of the connection.
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        });

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "anonymous".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn allows_up_to_the_limit_within_a_window() {
        let limiter = RateLimiter::per_minute(2);
        let start = Instant::now();
        assert!(limiter.is_allowed_at("1.2.3.4", start));
        assert!(limiter.is_allowed_at("1.2.3.4", start + Duration::from_secs(1)));
        assert!(!limiter.is_allowed_at("1.2.3.4", start + Duration::from_secs(2)));
        assert!(limiter.is_allowed_at("5.6.7.8", start + Duration::from_secs(2)));
    }

    #[test]
    fn window_slides() {
        let limiter = RateLimiter::per_minute(1);
        let start = Instant::now();
        assert!(limiter.is_allowed_at("a", start));
        assert!(!limiter.is_allowed_at("a", start + Duration::from_secs(59)));
        assert!(limiter.is_allowed_at("a", start + Duration::from_secs(61)));
    }

    #[test]
    fn idle_clients_are_forgotten() {
        let limiter = RateLimiter::per_minute(5);
        let start = Instant::now();
        for i in 0..1000 {
            assert!(limiter.is_allowed_at(&format!("10.0.{}.{}", i / 256, i % 256), start));
        }
        assert_eq!(limiter.tracked_clients(), 1000);

        assert!(limiter.is_allowed_at("192.0.2.1", start + Duration::from_secs(3600)));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn zero_limit_tracks_nobody() {
        let limiter = RateLimiter::per_minute(0);
        assert!(!limiter.is_allowed("192.0.2.1"));
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn client_id_prefers_forwarded_for() {
        let peer: SocketAddr = "198.51.100.4:50123".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_id(&headers, None), "anonymous");
        assert_eq!(client_id(&headers, Some(peer)), "198.51.100.4");

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_id(&headers, Some(peer)), "10.0.0.2");

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_id(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn direct_peers_get_separate_buckets() {
        let limiter = RateLimiter::per_minute(5);
        let headers = HeaderMap::new();
        let first = client_id(&headers, Some("198.51.100.4:50123".parse().unwrap()));
        let second = client_id(&headers, Some("198.51.100.9:40000".parse().unwrap()));
        assert_ne!(first, second);

        for _ in 0..5 {
            assert!(limiter.is_allowed(&first));
        }
        assert!(!limiter.is_allowed(&first));
        assert!(limiter.is_allowed(&second));
    }
}
