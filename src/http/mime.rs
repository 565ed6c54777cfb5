//! MIME type detection based on file extensions.

/// Returned for unknown or missing extensions.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("xml", "application/xml"),
    ("csv", "text/csv"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("wasm", "application/wasm"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("mp4", "video/mp4"),
    ("mp3", "audio/mpeg"),
];

/// Maps a file extension (without the dot) to a content type.
///
/// Matching ignores ASCII case. Anything not in the table, including the
/// empty string, maps to [`DEFAULT_MIME_TYPE`].
///
/// # Example
///
/// ```
/// # use sandstone::http::mime::mime_type;
/// assert_eq!(mime_type("css"), "text/css");
/// assert_eq!(mime_type("unknown"), "text/plain");
/// ```
pub fn mime_type(extension: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Extension of the last segment of a URL path, if it has one.
///
/// Dotfiles such as `/.env` have no extension.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Content type for a URL path, falling back to the default.
pub fn mime_type_for_path(path: &str) -> &'static str {
    extension_of(path).map(mime_type).unwrap_or(DEFAULT_MIME_TYPE)
}
