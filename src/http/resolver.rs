//! Static resource resolution.
//!
//! Maps a request path onto a file below the document root. Every outcome is
//! a [`ResolvedResource`] variant; nothing here returns an error, and nothing
//! is retried.

use crate::config::{ContainmentPolicy, StaticConfig};
use crate::http::mime;
use crate::http::response::StatusCode;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Outcome of resolving one request path.
#[derive(Debug)]
pub enum ResolvedResource {
    /// An open regular file and its content type
    Ok { file: File, mime_type: &'static str },
    /// Nothing readable at that path
    NotFound,
    /// The path resolved outside the document root
    Forbidden,
    /// The document root itself could not be resolved
    ServerError,
}

impl ResolvedResource {
    /// The status line this outcome is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ResolvedResource::Ok { .. } => StatusCode::Ok,
            ResolvedResource::NotFound => StatusCode::NotFound,
            ResolvedResource::Forbidden => StatusCode::Forbidden,
            ResolvedResource::ServerError => StatusCode::InternalServerError,
        }
    }

    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            ResolvedResource::Ok { mime_type, .. } => Some(*mime_type),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResolvedResource::Ok { .. })
    }
}

/// Resolves request paths against one document root.
///
/// Holds no mutable state, so a single resolver can be shared by every
/// connection.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    document_root: PathBuf,
    default_document: String,
    containment: ContainmentPolicy,
}

impl StaticResolver {
    pub fn new(
        document_root: impl Into<PathBuf>,
        default_document: impl Into<String>,
        containment: ContainmentPolicy,
    ) -> Self {
        Self {
            document_root: document_root.into(),
            default_document: default_document.into(),
            containment,
        }
    }

    /// Builds a resolver from configuration. `None` when no document root is
    /// configured, which selects the canned-greeting variant.
    pub fn from_config(cfg: &StaticConfig) -> Option<Self> {
        cfg.document_root.as_ref().map(|root| {
            Self::new(root.clone(), cfg.default_document.clone(), cfg.containment)
        })
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Resolves `requested_path` to an open file below the document root.
    ///
    /// 1. Strip any query string or fragment; map `/` to the default document
    /// 2. Join the root with the path minus its leading separators
    /// 3. Canonicalize the root (`ServerError` on failure) and the joined path
    ///    (`NotFound` on failure)
    /// 4. Reject canonical paths outside the root (`Forbidden`)
    /// 5. Open the file; anything but a readable regular file is `NotFound`
    ///
    /// The content type comes from the requested path, not the canonical one,
    /// so a symlink named `a.css` is served as CSS whatever its target is
    /// called.
    pub async fn resolve(&self, requested_path: &str) -> ResolvedResource {
        let path = normalize_request_path(requested_path, &self.default_document);
        let joined = self.document_root.join(path.trim_start_matches('/'));

        let root = match tokio::fs::canonicalize(&self.document_root).await {
            Ok(root) => root,
            Err(e) => {
                tracing::error!(
                    root = %self.document_root.display(),
                    error = %e,
                    "Document root cannot be resolved"
                );
                return ResolvedResource::ServerError;
            }
        };

        let canonical = match tokio::fs::canonicalize(&joined).await {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Requested path does not resolve");
                return ResolvedResource::NotFound;
            }
        };

        if !is_contained(&canonical, &root, self.containment) {
            tracing::warn!(
                path = %requested_path,
                resolved = %canonical.display(),
                "Rejected path outside document root"
            );
            return ResolvedResource::Forbidden;
        }

        let file = match File::open(&canonical).await {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(resolved = %canonical.display(), error = %e, "Failed to open file");
                return ResolvedResource::NotFound;
            }
        };

        match file.metadata().await {
            Ok(meta) if meta.is_file() => {}
            _ => {
                tracing::debug!(resolved = %canonical.display(), "Not a regular file");
                return ResolvedResource::NotFound;
            }
        }

        ResolvedResource::Ok {
            file,
            mime_type: mime::mime_type_for_path(&path),
        }
    }
}

/// Resolves `requested_path` under `document_root` with the default document
/// `index.html` and segment-based containment.
pub async fn resolve(requested_path: &str, document_root: impl AsRef<Path>) -> ResolvedResource {
    StaticResolver::new(
        document_root.as_ref(),
        "index.html",
        ContainmentPolicy::Segment,
    )
    .resolve(requested_path)
    .await
}

/// Whether `canonical` lies inside `root`. Both must already be canonical.
pub fn is_contained(canonical: &Path, root: &Path, policy: ContainmentPolicy) -> bool {
    match policy {
        ContainmentPolicy::Segment => canonical.starts_with(root),
        ContainmentPolicy::Prefix => canonical
            .as_os_str()
            .as_encoded_bytes()
            .starts_with(root.as_os_str().as_encoded_bytes()),
    }
}

fn normalize_request_path(requested: &str, default_document: &str) -> String {
    let path = requested
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if path.is_empty() || path == "/" {
        format!("/{}", default_document.trim_start_matches('/'))
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_maps_to_default_document() {
        assert_eq!(normalize_request_path("/", "index.html"), "/index.html");
        assert_eq!(normalize_request_path("/?v=2", "home.htm"), "/home.htm");
    }

    #[test]
    fn query_and_fragment_are_stripped() {
        assert_eq!(normalize_request_path("/a.css?v=1", "index.html"), "/a.css");
        assert_eq!(normalize_request_path("/b.js#top", "index.html"), "/b.js");
    }

    #[test]
    fn segment_policy_rejects_sibling_prefix() {
        let root = Path::new("/srv/web");

        assert!(is_contained(Path::new("/srv/web"), root, ContainmentPolicy::Segment));
        assert!(is_contained(Path::new("/srv/web/a.html"), root, ContainmentPolicy::Segment));
        assert!(!is_contained(Path::new("/srv/webhook/a"), root, ContainmentPolicy::Segment));
        assert!(is_contained(Path::new("/srv/webhook/a"), root, ContainmentPolicy::Prefix));
        assert!(!is_contained(Path::new("/etc/passwd"), root, ContainmentPolicy::Prefix));
    }
}
