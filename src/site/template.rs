use std::path::{Path, PathBuf};

use crate::config::TemplateConfig;
use crate::http::response::flatten_lines;

/// Message bodies for the 301, 400 and 404 responses.
///
/// Files are read on every use. A read failure is logged and yields an
/// empty body rather than a different status.
#[derive(Debug, Clone)]
pub struct Templates {
    moved_permanently: PathBuf,
    bad_request: PathBuf,
    not_found: PathBuf,
}

impl Templates {
    pub fn new(config: &TemplateConfig) -> Self {
        Self {
            moved_permanently: config.moved_permanently.clone(),
            bad_request: config.bad_request.clone(),
            not_found: config.not_found.clone(),
        }
    }

    pub async fn moved_permanently(&self) -> String {
        render(&self.moved_permanently).await
    }

    pub async fn bad_request(&self) -> String {
        render(&self.bad_request).await
    }

    pub async fn not_found(&self) -> String {
        render(&self.not_found).await
    }
}

async fn render(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => flatten_lines(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read template");
            String::new()
        }
    }
}
