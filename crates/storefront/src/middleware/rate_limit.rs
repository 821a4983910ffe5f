//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `auth_rate_limiter`: admin login (~10/min per IP)
//! - `chat_rate_limiter`: shopping assistant, each call costs a model request (~20/min per IP)
//!
//! Clients are keyed by peer address. Proxy headers are only consulted when
//! the server is configured to trust them, since any direct client can set
//! them to whatever it likes.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers carrying the client IP, in order of trust.
const CLIENT_IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-real-ip", "fly-client-ip"];

/// Key extractor keyed on the client IP.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    /// Prefer proxy headers over the peer address.
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req, self.trust_proxy_headers).ok_or(GovernorError::UnableToExtractKey)
    }
}

fn client_ip<T>(req: &Request<T>, trust_proxy_headers: bool) -> Option<IpAddr> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    if !trust_proxy_headers {
        return peer;
    }

    forwarded_ip(req).or(peer)
}

fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    let headers = req.headers();

    let single = CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    });
    if single.is_some() {
        return single;
    }

    // First hop of X-Forwarded-For
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the admin login endpoint.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. `per_second(6)` and `burst_size(5)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { trust_proxy_headers })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for the shopping assistant.
///
/// Configuration: 1 request every 3 seconds (replenish), burst of 10.
///
/// # Panics
///
/// This function will not panic. `per_second(3)` and `burst_size(10)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn chat_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor { trust_proxy_headers })
        .per_second(3)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(3) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_peer(peer: [u8; 4]) -> axum::http::request::Builder {
        Request::builder().extension(ConnectInfo(SocketAddr::from((peer, 40000))))
    }

    #[test]
    fn test_untrusted_headers_are_ignored() {
        let req = from_peer([192, 0, 2, 9])
            .header("x-forwarded-for", "10.9.0.1")
            .header("cf-connecting-ip", "203.0.113.7")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req, false), Some("192.0.2.9".parse().unwrap()));
    }

    #[test]
    fn test_trusted_prefers_cloudflare_header() {
        let req = from_peer([192, 0, 2, 9])
            .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
            .header("cf-connecting-ip", "203.0.113.7")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req, true), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_trusted_uses_first_forwarded_hop() {
        let req = from_peer([192, 0, 2, 9])
            .header("x-forwarded-for", "198.51.100.4, 10.0.0.2")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req, true), Some("198.51.100.4".parse().unwrap()));
    }

    #[test]
    fn test_trusted_falls_back_to_peer_address() {
        let req = from_peer([192, 0, 2, 9]).body(()).unwrap();
        assert_eq!(client_ip(&req, true), Some("192.0.2.9".parse().unwrap()));
    }

    #[test]
    fn test_no_source_is_none() {
        let req = Request::builder().body(()).unwrap();
        assert!(client_ip(&req, false).is_none());
        assert!(client_ip(&req, true).is_none());
    }
}
