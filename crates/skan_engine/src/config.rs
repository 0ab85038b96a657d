use std::path::PathBuf;

/// Subdirectory of the source directory used when no output path is given.
const DEFAULT_OUTPUT_SUBDIR: &str = "docs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SyncConfig {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let output_dir = output_dir.unwrap_or_else(|| source_dir.join(DEFAULT_OUTPUT_SUBDIR));
        Self {
            source_dir,
            output_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SyncConfig;
    use std::path::PathBuf;

    #[test]
    fn output_defaults_to_docs_under_source() {
        let config = SyncConfig::new("out", None);
        assert_eq!(config.output_dir, PathBuf::from("out").join("docs"));
    }

    #[test]
    fn explicit_output_is_kept() {
        let config = SyncConfig::new("out", Some(PathBuf::from("site")));
        assert_eq!(config.output_dir, PathBuf::from("site"));
        assert_eq!(config.source_dir, PathBuf::from("out"));
    }
}
