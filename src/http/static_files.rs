//! Serving files from a directory on disk.
//!
//! # Responsibilities
//! - Map the `*filepath` path variable onto a file under a root directory
//! - Answer 404 for missing files, 400 for paths that climb out of the root
//! - Pick a content type from the file extension
//!
//! # Design Decisions
//! - Handlers run on a blocking worker, so files are read synchronously
//! - A directory is served through its `index.html`, never listed
//! - `..` segments are rejected outright rather than resolved

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::http::StatusCode;

use crate::http::chain::{Flow, Handler};
use crate::http::context::Context;

/// Name of the path variable the file path is bound to.
pub const FILEPATH_PARAM: &str = "filepath";

const INDEX_FILE: &str = "index.html";

/// Handler that serves files below `root`.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request-relative file path under the root.
    ///
    /// Returns `None` when a segment would leave the root.
    pub fn resolve(&self, filepath: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in filepath.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains('\\') || s.contains(':') || s.contains('\0') => return None,
                s => path.push(s),
            }
        }
        Some(path)
    }
}

impl Handler for StaticFiles {
    fn call(&self, ctx: &mut Context) -> Flow {
        let filepath = ctx.param(FILEPATH_PARAM).unwrap_or_default().to_string();
        let Some(mut path) = self.resolve(&filepath) else {
            tracing::warn!(request_id = %ctx.request_id(), filepath = %filepath, "Rejected static file path");
            ctx.string(StatusCode::BAD_REQUEST, "invalid URL path");
            return Flow::Handled;
        };
        if path.is_dir() {
            path.push(INDEX_FILE);
        }

        match fs::read(&path) {
            Ok(contents) => {
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                ctx.set_header("content-type", mime_type_for_extension(extension));
                ctx.data(StatusCode::OK, contents);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ctx.status(StatusCode::NOT_FOUND);
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                ctx.string(StatusCode::FORBIDDEN, "403 Forbidden");
            }
            Err(e) => {
                tracing::error!(
                    request_id = %ctx.request_id(),
                    path = %path.display(),
                    error = %e,
                    "Failed to read static file"
                );
                ctx.string(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error");
            }
        }
        Flow::Handled
    }
}

/// MIME type for a file extension; unknown extensions are octet streams.
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
