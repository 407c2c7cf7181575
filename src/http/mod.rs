//! HTTP protocol layer
//!
//! MIME lookup and response builders, decoupled from request handling.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_file_response, build_listing_response, build_options_response,
    build_redirect_response, build_unsupported_method_response,
};
