use crate::links::rewrite_links;
use crate::listing::{convert_code_to_markdown, MalformedInputError};
use crate::Document;

/// Full per-page transform: rewrite links, then turn source listings into markdown.
pub fn convert_document(document: &Document) -> Result<String, MalformedInputError> {
    let rewritten = rewrite_links(&document.content);
    convert_code_to_markdown(&document.filename, &rewritten)
}
