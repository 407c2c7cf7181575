//! Directory listing generation
//!
//! Renders an HTML index for a directory: sorted entries, directories shown
//! with a trailing slash, hrefs percent-encoded so they survive the browser
//! round trip.

use std::path::Path;
use tokio::fs;

/// Render the listing page for `dir`, titled with the request path.
pub async fn render(dir: &Path, request_path: &str) -> std::io::Result<String> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if is_dir {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let title = format!("Directory listing for {}", escape_html(request_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for name in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_href(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Percent-encode a relative href, leaving unreserved characters and the
/// directory slash intact.
fn encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for b in name.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(char::from(b));
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Escape text for embedding in HTML
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("corserve-listing-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_listing_contains_sorted_entries() {
        let dir = test_dir("sorted");
        std::fs::write(dir.join("b.txt"), b"b").unwrap();
        std::fs::write(dir.join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.join("sub")).unwrap();

        let html = render(&dir, "/").await.unwrap();
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("<a href=\"a.txt\">a.txt</a>"));
        assert!(html.contains("<a href=\"b.txt\">b.txt</a>"));
        // Directories carry a trailing slash
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
        assert!(html.find("a.txt").unwrap() < html.find("b.txt").unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_listing_encodes_hrefs_and_escapes_names() {
        let dir = test_dir("encode");
        std::fs::write(dir.join("with space.txt"), b"x").unwrap();

        let html = render(&dir, "/").await.unwrap();
        assert!(html.contains("href=\"with%20space.txt\""));
        assert!(html.contains(">with space.txt<"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_errors() {
        let dir = std::env::temp_dir().join("corserve-listing-missing");
        assert!(render(&dir, "/gone/").await.is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_encode_href_keeps_unreserved() {
        assert_eq!(encode_href("notes-v1.0_final~/"), "notes-v1.0_final~/");
        assert_eq!(encode_href("100%.txt"), "100%25.txt");
    }
}
