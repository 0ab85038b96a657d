use thiserror::Error;

use crate::naming::is_source_listing;

const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";
const NAV_OPEN: &str = "<nav>";
const NAV_CLOSE: &str = "</nav>";
const FENCE_LANGUAGE: &str = "javascript";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed source listing {filename}: missing `{missing}` marker")]
pub struct MalformedInputError {
    pub filename: String,
    pub missing: &'static str,
}

/// The parts of a source-listing page the markdown output is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub title: String,
    pub code: String,
    /// Navigation block of the page, if any. Not part of the markdown output.
    pub nav: Option<String>,
}

impl SourceListing {
    pub fn to_markdown(&self) -> String {
        let newline = if self.code.ends_with('\n') { "" } else { "\n" };
        format!(
            "\n## {title}\n\n```{FENCE_LANGUAGE}\n{code}{newline}```\n",
            title = self.title,
            code = self.code,
        )
    }
}

/// Pull the title, first code block and first nav block out of a listing page.
///
/// This is plain delimiter matching: only the first `<code>` and the first
/// `</code>` after it are used, so nested or repeated blocks are not supported.
pub fn parse_source_listing(
    filename: &str,
    content: &str,
) -> Result<SourceListing, MalformedInputError> {
    let title = filename.strip_suffix(".html").unwrap_or(filename).to_string();

    let code = between(content, CODE_OPEN, CODE_CLOSE).map_err(|missing| MalformedInputError {
        filename: filename.to_string(),
        missing,
    })?;
    let nav = between(content, NAV_OPEN, NAV_CLOSE).ok();

    Ok(SourceListing {
        title,
        code: code.to_string(),
        nav: nav.map(str::to_string),
    })
}

/// Convert a source-listing page to markdown; any other page is returned as is.
pub fn convert_code_to_markdown(
    filename: &str,
    content: &str,
) -> Result<String, MalformedInputError> {
    if !is_source_listing(filename) {
        return Ok(content.to_string());
    }
    Ok(parse_source_listing(filename, content)?.to_markdown())
}

fn between<'a>(
    content: &'a str,
    open: &'static str,
    close: &'static str,
) -> Result<&'a str, &'static str> {
    let start = content.find(open).ok_or(open)? + open.len();
    let len = content[start..].find(close).ok_or(close)?;
    Ok(&content[start..start + len])
}
