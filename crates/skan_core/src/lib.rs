//! Skan core: pure text transforms for converting generated HTML docs.
mod convert;
mod document;
mod links;
mod listing;
pub mod naming;

pub use convert::convert_document;
pub use document::Document;
pub use links::{find_link_spans, rewrite_links, rewrite_target, LinkSpan};
pub use listing::{
    convert_code_to_markdown, parse_source_listing, MalformedInputError, SourceListing,
};
