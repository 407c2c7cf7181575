//! Request dispatch
//!
//! Entry point for HTTP request processing: method dispatch, static file
//! serving, access logging, and cross-origin decoration of the finished
//! response.

use crate::config::AppState;
use crate::handler::{cors, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context passed down to the serving functions
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling.
///
/// Generic over the request body, which is never read: a file server only
/// looks at the method, path and headers. Every response produced here,
/// errors included, passes through [`cors::apply`] as the final step before
/// transmission.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.as_str().to_string(),
        path.clone(),
    );
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
    };

    let mut response = match &method {
        &Method::GET | &Method::HEAD => static_files::serve(&ctx, &state).await,
        &Method::OPTIONS => http::build_options_response(),
        other => http::build_unsupported_method_response(other.as_str()),
    };

    cors::apply(&mut response);

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.format);
    }

    Ok(response)
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
