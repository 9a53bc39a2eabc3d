//! MIME type lookup.
//!
//! The table is a small tab-separated file: the first line holds a record
//! count (advisory only, never checked), every following line is
//! `<extension><TAB><mime-type>` with the extension written with its dot.
//! The file is read again on every lookup.

use std::path::PathBuf;

use tracing::warn;

/// Type reported when the table is missing or has no matching entry.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// The substring of `name` from its last `.` onward, dot included.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeTable {
    entries: Vec<(String, String)>,
}

impl MimeTable {
    /// Parses table contents. The count line is skipped; lines with fewer
    /// than two fields are ignored.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let extension = fields.next()?;
                let mime = fields.next()?;
                Some((extension.to_string(), mime.to_string()))
            })
            .collect();

        Self { entries }
    }

    /// First exact match wins.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(ext, _)| ext == extension)
            .map(|(_, mime)| mime.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MimeResolver {
    table_path: PathBuf,
}

impl MimeResolver {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        Self {
            table_path: table_path.into(),
        }
    }

    /// Content type for `file_name`, scanning the table from disk.
    pub async fn resolve(&self, file_name: &str) -> String {
        let Some(extension) = extension_of(file_name) else {
            return FALLBACK_MIME.to_string();
        };

        match tokio::fs::read_to_string(&self.table_path).await {
            Ok(contents) => MimeTable::parse(&contents)
                .lookup(extension)
                .unwrap_or(FALLBACK_MIME)
                .to_string(),
            Err(e) => {
                warn!(
                    table = %self.table_path.display(),
                    error = %e,
                    "mime table unavailable, using {}",
                    FALLBACK_MIME
                );
                FALLBACK_MIME.to_string()
            }
        }
    }
}
