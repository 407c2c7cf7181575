//! Static file serving
//!
//! Resolves request paths against the serving root and builds the matching
//! response: file bytes, an index file, a generated listing, a redirect for
//! directories missing their trailing slash, or 404.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of mapping a request path onto the filesystem
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Regular file (possibly an index file substituted for a directory)
    File(PathBuf),
    /// Directory to be listed
    Directory(PathBuf),
    /// Directory requested without its trailing slash
    Redirect(String),
    NotFound,
}

/// Serve a GET/HEAD request from the configured root.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match resolve(
        &state.root,
        ctx.path,
        &state.config.serve.index_files,
    ) {
        Resolved::File(path) => serve_file(ctx, &path).await,
        Resolved::Directory(path) => serve_listing(ctx, &path).await,
        Resolved::Redirect(location) => http::build_redirect_response(&location),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a raw request path onto a file or directory under `root`.
///
/// The path is percent-decoded, stripped of `..` components, joined onto the
/// root and canonicalized. Anything that resolves outside the canonical root
/// is treated as not found.
pub fn resolve(root: &Path, raw_path: &str, index_files: &[String]) -> Resolved {
    let decoded = decode_percent(raw_path);
    // Remove leading slash and prevent directory traversal
    let clean_path = decoded.trim_start_matches('/').replace("..", "");

    let joined = root.join(&clean_path);
    let Ok(canonical) = joined.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            raw_path,
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        // The original URL must end in a slash so relative links inside the
        // listing resolve against the directory, not its parent.
        if !raw_path.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }
        for index_file in index_files {
            let index_path = canonical.join(index_file);
            if index_path.is_file() {
                return Resolved::File(index_path);
            }
        }
        return Resolved::Directory(canonical);
    }

    if canonical.is_file() {
        Resolved::File(canonical)
    } else {
        Resolved::NotFound
    }
}

async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {}", path.display(), e));
            return http::build_404_response();
        }
    };
    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    http::build_file_response(content, content_type, ctx.is_head)
}

async fn serve_listing(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    match listing::render(path, &decode_percent(ctx.path)).await {
        Ok(html) => http::build_listing_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {}",
                path.display(),
                e
            ));
            http::build_404_response()
        }
    }
}

/// Decode `%XX` escapes in a request path. Invalid escapes pass through
/// unchanged; non-UTF-8 results are replaced lossily.
fn decode_percent(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(hex) = std::str::from_utf8(&bytes[i + 1..i + 3]) {
                if let Ok(value) = u8::from_str_radix(hex, 16) {
                    out.push(value);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("corserve-static-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[test]
    fn test_resolve_existing_file() {
        let root = test_root("file");
        std::fs::write(root.join("page.html"), b"<h1>hi</h1>").unwrap();

        let resolved = resolve(&root, "/page.html", &index_files());
        assert_eq!(resolved, Resolved::File(root.join("page.html")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_missing_file() {
        let root = test_root("missing");
        assert_eq!(resolve(&root, "/nope.html", &index_files()), Resolved::NotFound);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_directory_prefers_index() {
        let root = test_root("index");
        std::fs::create_dir(root.join("docs")).unwrap();
        std::fs::write(root.join("docs/index.html"), b"idx").unwrap();

        let resolved = resolve(&root, "/docs/", &index_files());
        assert_eq!(resolved, Resolved::File(root.join("docs/index.html")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_directory_without_index_lists() {
        let root = test_root("listing");
        std::fs::create_dir(root.join("files")).unwrap();

        let resolved = resolve(&root, "/files/", &index_files());
        assert_eq!(resolved, Resolved::Directory(root.join("files")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_resolve_directory_missing_slash_redirects() {
        let root = test_root("redirect");
        std::fs::create_dir(root.join("assets")).unwrap();

        let resolved = resolve(&root, "/assets", &index_files());
        assert_eq!(resolved, Resolved::Redirect("/assets/".to_string()));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_traversal_is_blocked() {
        let root = test_root("traversal");
        std::fs::create_dir(root.join("public")).unwrap();
        std::fs::write(root.join("secret.txt"), b"secret").unwrap();

        // Escapes are stripped before the path is joined, and anything that
        // still resolves outside the root is rejected after canonicalization.
        let inner = root.join("public");
        assert_ne!(
            resolve(&inner, "/../secret.txt", &index_files()),
            Resolved::File(root.join("secret.txt"))
        );
        assert_ne!(
            resolve(&inner, "/%2e%2e/secret.txt", &index_files()),
            Resolved::File(root.join("secret.txt"))
        );

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_percent_decoded_paths_resolve() {
        let root = test_root("decode");
        std::fs::write(root.join("with space.txt"), b"x").unwrap();

        let resolved = resolve(&root, "/with%20space.txt", &index_files());
        assert_eq!(resolved, Resolved::File(root.join("with space.txt")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_decode_percent() {
        assert_eq!(decode_percent("/a%20b"), "/a b");
        assert_eq!(decode_percent("/plain"), "/plain");
        // Invalid escapes pass through
        assert_eq!(decode_percent("/100%zz"), "/100%zz");
        assert_eq!(decode_percent("/trailing%2"), "/trailing%2");
    }
}
