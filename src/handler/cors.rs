//! Cross-origin response decoration
//!
//! Every response leaving the server is passed through [`apply`] after the
//! base handler has finished building it, error responses included. The hook
//! uses insert semantics on the header map, so a value set earlier in the
//! pipeline cannot survive it.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::Response;

pub const ALLOWED_ORIGIN: &str = "*";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Attach the permissive cross-origin headers to a finished response.
pub fn apply(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOWED_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http;

    #[test]
    fn test_headers_added_to_success_response() {
        let mut resp = http::build_file_response(b"hello".to_vec(), "text/plain", false);
        apply(&mut resp);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(
            resp.headers().get("access-control-allow-methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            resp.headers().get("access-control-allow-headers").unwrap(),
            "Content-Type"
        );
    }

    #[test]
    fn test_headers_added_to_error_response() {
        let mut resp = http::build_404_response();
        apply(&mut resp);
        assert_eq!(resp.status(), 404);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[test]
    fn test_earlier_value_cannot_survive() {
        let mut resp = hyper::Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "https://example.com")
            .body(Full::new(Bytes::new()))
            .unwrap();
        apply(&mut resp);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(
            resp.headers()
                .get_all("access-control-allow-origin")
                .iter()
                .count(),
            1
        );
    }
}
