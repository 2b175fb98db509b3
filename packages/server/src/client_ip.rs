//! Best-effort client identity for rate limiting.
//!
//! Not a security boundary: a spoofed header only moves a caller into a
//! different advisory rate-limit bucket.

use actix_web::HttpRequest;

/// Bucket shared by all clients whose address cannot be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request.
///
/// Takes the first `X-Forwarded-For` entry when present (the original
/// client, per proxy convention), then the peer address, then a shared
/// `"unknown"` bucket.
pub fn client_key(req: &HttpRequest) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_takes_first_entry() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn blank_forwarded_header_falls_through() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "  "))
            .peer_addr("192.0.2.4:443".parse().unwrap())
            .to_http_request();
        assert_eq!(client_key(&req), "192.0.2.4");
    }

    #[test]
    fn peer_address_without_header() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.9:80".parse().unwrap())
            .to_http_request();
        assert_eq!(client_key(&req), "192.0.2.9");
    }

    #[test]
    fn unknown_bucket_when_nothing_identifies_the_client() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_key(&req), UNKNOWN_CLIENT);
    }
}
