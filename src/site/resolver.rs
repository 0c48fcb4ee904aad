use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, PathBuf};

use crate::http::mime::{self, ContentType};

/// The local identity of a requested resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Path relative to the document root
    pub local_path: PathBuf,
    /// Final path segment, used for classification
    pub display_name: String,
    pub content_type: ContentType,
}

/// Maps request targets onto resource paths.
#[derive(Debug, Clone)]
pub struct PathResolver {
    default_path: PathBuf,
    default_name: String,
}

impl PathResolver {
    pub fn new(default_path: impl Into<PathBuf>, default_name: impl Into<String>) -> Self {
        Self {
            default_path: default_path.into(),
            default_name: default_name.into(),
        }
    }

    /// Resolves a request target. `/` maps to the default resource.
    pub fn resolve(&self, target: &str) -> ResourceDescriptor {
        if target.trim() == "/" {
            return ResourceDescriptor {
                local_path: self.default_path.clone(),
                content_type: mime::classify(&self.default_name),
                display_name: self.default_name.clone(),
            };
        }

        let local = normalize_target(target);
        let display_name = local
            .rsplit(MAIN_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();

        ResourceDescriptor {
            content_type: mime::classify(&display_name),
            local_path: PathBuf::from(local),
            display_name,
        }
    }
}

/// Turns a request target into a relative path string.
///
/// One trailing '/' is dropped. A target with more than one '/' and more
/// than one '.' collapses to its final segment, so nested paths carrying
/// dotted names are served from the top level only. A remaining nested
/// path becomes `./a/b` with the platform separator; a single segment
/// becomes a bare file name.
pub fn normalize_target(target: &str) -> String {
    let mut path = target.strip_suffix('/').unwrap_or(target);

    if path.matches('/').count() > 1 && path.matches('.').count() > 1 {
        if let Some(last) = path.rfind('/') {
            path = &path[last..];
        }
    }

    let mut chars = path.chars();
    chars.next();
    if chars.as_str().contains('/') {
        format!(".{}", path.replace('/', MAIN_SEPARATOR_STR))
    } else {
        path.replace('/', "")
    }
}
