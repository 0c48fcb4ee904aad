//! Site content
//!
//! Everything a connection needs to turn a valid request into a response:
//! where resources live, how targets map onto them, the error templates and
//! the redirect records. A [`Site`] is built once at startup and shared
//! read-only by every connection.

pub mod redirect;
pub mod resolver;
pub mod template;

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;

pub use redirect::{RedirectRecord, RedirectRegistry};
pub use resolver::{PathResolver, ResourceDescriptor};
pub use template::Templates;

#[derive(Debug, Clone)]
pub struct Site {
    pub document_root: PathBuf,
    pub resolver: PathResolver,
    pub templates: Templates,
    pub redirects: RedirectRegistry,
    pub header_timeout: Option<Duration>,
    pub max_header_bytes: usize,
}

impl Site {
    /// Builds the site from configuration, reading the redirect records.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            document_root: cfg.site.document_root.clone(),
            resolver: PathResolver::new(
                cfg.site.default_resource.clone(),
                cfg.site.default_resource_name.clone(),
            ),
            templates: Templates::new(&cfg.templates),
            redirects: RedirectRegistry::load(&cfg.site.redirects_file),
            header_timeout: cfg.server.header_timeout(),
            max_header_bytes: cfg.server.max_header_bytes,
        }
    }

    /// Path of a resource on disk.
    pub fn local_file(&self, descriptor: &ResourceDescriptor) -> PathBuf {
        self.document_root.join(&descriptor.local_path)
    }
}
