//! Static frontend files.

use crate::http::HttpResponse;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// File served for `/`.
const INDEX_FILE: &str = "index.html";

/// Serves files from one directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Creates a server rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path onto a file under the root.
    ///
    /// Returns `None` for paths that would escape the root (`..`, absolute
    /// or prefixed components).
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        let relative = if relative.is_empty() { INDEX_FILE } else { relative };

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    /// Serves `request_path`, or 404 if there is no such file.
    pub async fn serve(&self, request_path: &str) -> HttpResponse {
        let Some(path) = self.resolve(request_path) else {
            return not_found();
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return not_found(),
        }

        match tokio::fs::read(&path).await {
            Ok(body) => HttpResponse::bytes(200, content_type(&path), body),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read static file");
                HttpResponse::empty(500)
            }
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::bytes(404, "text/plain; charset=utf-8", b"Not Found".to_vec())
}

/// Content type for a file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
