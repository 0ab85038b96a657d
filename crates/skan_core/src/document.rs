use std::path::PathBuf;

use crate::naming;

/// One source page read from the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content: String,
    pub source_dir: PathBuf,
}

impl Document {
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<String>,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            source_dir: source_dir.into(),
        }
    }

    pub fn extension(&self) -> &str {
        naming::extension_of(&self.filename)
    }

    pub fn is_html(&self) -> bool {
        self.extension() == naming::HTML_EXTENSION
    }

    pub fn is_source_listing(&self) -> bool {
        naming::is_source_listing(&self.filename)
    }
}
