//! # Static File Serving
//!
//! Extension tables deciding which URIs count as static assets, the MIME
//! lookup used for `Content-Type`, and the multi-root file loader with path
//! sanitization.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;

/// Extensions treated as static resources and served from the registered
/// static directories instead of being routed to handlers.
static STATIC_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Web documents
        "html", "htm", "xhtml", "xml",
        // Stylesheets
        "css", "scss", "sass", "less",
        // JavaScript
        "js", "mjs", "jsx", "ts", "tsx",
        // Images
        "png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "svg", "webp", "ico", "cur", "avif",
        // Fonts
        "woff", "woff2", "ttf", "otf", "eot",
        // Audio
        "mp3", "wav", "ogg", "m4a", "aac", "flac",
        // Video
        "mp4", "webm", "avi", "mov", "wmv", "flv", "mkv",
        // Documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf",
        // Archives
        "zip", "rar", "7z", "tar", "gz", "bz2",
        // Data formats
        "json", "csv", "yaml", "yml", "toml",
        // Web manifests
        "manifest", "webmanifest", "map",
    ]
    .into_iter()
    .collect()
});

/// Extension to `Content-Type` mapping for static responses.
static MIME_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("html", "text/html"),
        ("htm", "text/html"),
        ("xhtml", "application/xhtml+xml"),
        ("xml", "application/xml"),
        ("css", "text/css"),
        ("js", "application/javascript"),
        ("mjs", "application/javascript"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("bmp", "image/bmp"),
        ("tiff", "image/tiff"),
        ("tif", "image/tiff"),
        ("svg", "image/svg+xml"),
        ("webp", "image/webp"),
        ("ico", "image/x-icon"),
        ("cur", "image/x-icon"),
        ("avif", "image/avif"),
        ("woff", "font/woff"),
        ("woff2", "font/woff2"),
        ("ttf", "font/ttf"),
        ("otf", "font/otf"),
        ("eot", "application/vnd.ms-fontobject"),
        ("mp3", "audio/mpeg"),
        ("wav", "audio/wav"),
        ("ogg", "audio/ogg"),
        ("m4a", "audio/mp4"),
        ("aac", "audio/aac"),
        ("flac", "audio/flac"),
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
        ("avi", "video/x-msvideo"),
        ("mov", "video/quicktime"),
        ("mkv", "video/x-matroska"),
        ("pdf", "application/pdf"),
        ("txt", "text/plain"),
        ("rtf", "application/rtf"),
        ("zip", "application/zip"),
        ("tar", "application/x-tar"),
        ("gz", "application/gzip"),
        ("json", "application/json"),
        ("csv", "text/csv"),
        ("yaml", "application/yaml"),
        ("yml", "application/yaml"),
        ("toml", "application/toml"),
        ("webmanifest", "application/manifest+json"),
    ]
    .into_iter()
    .collect()
});

const DEFAULT_MIME: &str = "application/octet-stream";

/// Lowercased extension of the path portion of a URI, if any.
pub fn extension_of(uri: &str) -> Option<String> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let file = path.rsplit('/').next().unwrap_or(path);
    let dot = file.rfind('.')?;
    let ext = &file[dot + 1..];
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether a URI points at a static resource, judged by extension.
pub fn is_uri_static(uri: &str) -> bool {
    extension_of(uri)
        .map(|ext| STATIC_EXTENSIONS.contains(ext.as_str()))
        .unwrap_or(false)
}

/// `Content-Type` for an extension; unknown extensions fall back to
/// `application/octet-stream`.
pub fn mime_for_extension(extension: &str) -> &'static str {
    MIME_TYPES
        .get(extension.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_MIME)
}

/// Ordered set of directories to serve static files from.
#[derive(Clone, Default)]
pub struct StaticFiles {
    roots: Vec<PathBuf>,
}

impl StaticFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root<P: Into<PathBuf>>(&mut self, root: P) {
        self.roots.push(root.into());
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Map a request URI to a relative filesystem path, refusing anything
    /// that could escape a root. `..` sequences are stripped and any
    /// remaining parent-directory component is rejected outright.
    fn map_path(url_path: &str) -> Option<PathBuf> {
        let path = url_path.split(['?', '#']).next().unwrap_or(url_path);
        let clean = path.replace("..", "");
        let clean = clean.trim_start_matches('/');

        let mut mapped = PathBuf::new();
        for component in Path::new(clean).components() {
            match component {
                Component::Normal(segment) => mapped.push(segment),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if mapped.as_os_str().is_empty() {
            return None;
        }
        Some(mapped)
    }

    /// Serve `uri` from the first root that has the file.
    pub fn load(&self, uri: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let relative = Self::map_path(uri)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid static path"))?;
        let mime = extension_of(uri)
            .map(|ext| mime_for_extension(&ext))
            .unwrap_or(DEFAULT_MIME);

        for root in &self.roots {
            let candidate = root.join(&relative);
            if candidate.is_file() {
                return Ok((fs::read(candidate)?, mime));
            }
        }
        Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
    }
}
