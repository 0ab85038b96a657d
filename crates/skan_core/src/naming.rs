//! Fixed filenames and extension rules shared by the rewriter and the sync engine.

/// Entry page produced by the documentation generator.
pub const ROOT_ENTRY: &str = "index.html";

/// Name the root entry page is stored under in the output directory.
pub const ROOT_INDEX: &str = "code_index.html";

/// Suffix identifying a per-module source-listing page.
pub const SOURCE_LISTING_SUFFIX: &str = ".js.html";

/// Suffix a converted source-listing page is stored under.
pub const MARKDOWN_SUFFIX: &str = ".js.md";

/// Name of the persisted manifest inside the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Extension of the pages the generation pass converts.
pub const HTML_EXTENSION: &str = "html";

/// Hand-authored or fixed-identity files that must never be overwritten or deleted.
pub const STANDARD_FILES: &[&str] = &[
    "_coverpage.md",
    "_navbar.md",
    "_sidebar.md",
    ".nojekyll",
    "index.html",
    "quickstart.md",
    "README.md",
    "skan.png",
    "config.md",
    "deploy.md",
    "coverpage.md",
    "custom-nav.md",
    "more-pages.md",
    "configuration.md",
    MANIFEST_FILENAME,
];

/// Link targets with these extensions are left untouched.
pub const EXCLUDED_EXTENSIONS: &[&str] = &["css", "scss", "sass", "json"];

pub fn is_standard_file(name: &str) -> bool {
    STANDARD_FILES.contains(&name)
}

pub fn is_excluded_extension(extension: &str) -> bool {
    EXCLUDED_EXTENSIONS.contains(&extension)
}

/// Substring after the last `.`; a name without a dot has an empty extension.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Whether `name` is a per-module source-listing page.
pub fn is_source_listing(name: &str) -> bool {
    name.ends_with(SOURCE_LISTING_SUFFIX)
}

/// Map a source filename to the name it is written under in the output directory.
///
/// The root entry page becomes [`ROOT_INDEX`], source listings swap their
/// [`SOURCE_LISTING_SUFFIX`] for [`MARKDOWN_SUFFIX`], everything else is kept.
pub fn output_filename(name: &str) -> String {
    if name == ROOT_ENTRY {
        return ROOT_INDEX.to_string();
    }
    match name.strip_suffix(SOURCE_LISTING_SUFFIX) {
        Some(stem) => format!("{stem}{MARKDOWN_SUFFIX}"),
        None => name.to_string(),
    }
}
