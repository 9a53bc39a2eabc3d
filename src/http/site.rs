use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::http::mime::MimeResolver;

/// Everything a session needs to answer a request. Shared read-only
/// between sessions.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub index_page: String,
    pub error_page: String,
    pub mime: MimeResolver,
    pub max_request_bytes: usize,
    pub chunk_size: usize,
}

impl Site {
    /// A site rooted at `root` with the stock page names and limits. The
    /// mime table is looked up relative to the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&Config {
            root: root.into(),
            ..Config::default()
        })
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            root: cfg.root.clone(),
            index_page: cfg.index_page.clone(),
            error_page: cfg.error_page.clone(),
            mime: MimeResolver::new(&cfg.mime_table),
            max_request_bytes: cfg.max_request_bytes,
            chunk_size: cfg.chunk_size,
        }
    }

    pub fn with_mime_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.mime = MimeResolver::new(path);
        self
    }

    pub fn error_path(&self) -> PathBuf {
        self.root.join(&self.error_page)
    }

    /// Path of `name` under the root if it is a readable regular file.
    ///
    /// Names that would leave the root (`..`, absolute paths) are refused
    /// without touching the filesystem.
    pub async fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if !stays_under_root(relative) {
            return None;
        }

        let path = self.root.join(relative);
        let file = tokio::fs::File::open(&path).await.ok()?;
        let metadata = file.metadata().await.ok()?;

        metadata.is_file().then_some(path)
    }
}

fn stays_under_root(relative: &Path) -> bool {
    let mut components = relative.components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
