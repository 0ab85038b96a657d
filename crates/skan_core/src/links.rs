use skan_logging::skan_trace;

use crate::naming::{
    extension_of, is_excluded_extension, MARKDOWN_SUFFIX, ROOT_ENTRY, ROOT_INDEX,
    SOURCE_LISTING_SUFFIX,
};

const HREF_TOKEN: &str = "href=";
const HASH_ROUTE_PREFIX: &str = "#/";

/// A double-quoted `href` value located in an unmodified document.
///
/// `start..end` covers the value only, without the surrounding quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub target: &'a str,
}

/// Locate every `href="..."` value in `content`, in document order.
///
/// All `href=` offsets are taken from the original text up front. A match
/// that falls inside the value of an earlier link is skipped, and so is a
/// value that is not opened by a double quote right after `href=` or never
/// closed.
pub fn find_link_spans(content: &str) -> Vec<LinkSpan<'_>> {
    let offsets: Vec<usize> = content
        .match_indices(HREF_TOKEN)
        .map(|(offset, _)| offset)
        .collect();

    let mut spans = Vec::with_capacity(offsets.len());
    let mut cursor = 0;
    for offset in offsets {
        if offset < cursor {
            continue;
        }
        let after_token = offset + HREF_TOKEN.len();
        let Some(rest) = content[after_token..].strip_prefix('"') else {
            cursor = after_token;
            continue;
        };
        let start = after_token + 1;
        let Some(len) = rest.find('"') else {
            // Unterminated value: nothing after this point can be delimited.
            break;
        };
        let end = start + len;
        spans.push(LinkSpan {
            start,
            end,
            target: &content[start..end],
        });
        cursor = end;
    }
    spans
}

/// Hash-route replacement for a single link target, or `None` if the target
/// has an excluded extension and must stay as is.
pub fn rewrite_target(target: &str) -> Option<String> {
    if is_excluded_extension(extension_of(target)) {
        return None;
    }
    if target == ROOT_ENTRY {
        return Some(format!("{HASH_ROUTE_PREFIX}{ROOT_INDEX}"));
    }
    if let Some(stem) = target.strip_suffix(SOURCE_LISTING_SUFFIX) {
        return Some(format!("{HASH_ROUTE_PREFIX}{stem}{MARKDOWN_SUFFIX}"));
    }
    Some(format!("{HASH_ROUTE_PREFIX}{target}"))
}

/// Rewrite every non-excluded `href` value in `content` to its hash-route form.
///
/// Only the value text is replaced; the attribute name, quotes and all other
/// text are copied through unchanged. Applying this twice double-prefixes
/// generic links.
pub fn rewrite_links(content: &str) -> String {
    let spans = find_link_spans(content);
    let mut output = String::with_capacity(content.len() + spans.len() * HASH_ROUTE_PREFIX.len());
    let mut copied_to = 0;

    for span in spans {
        let Some(replacement) = rewrite_target(span.target) else {
            skan_trace!("Keeping excluded link target {}", span.target);
            continue;
        };
        skan_trace!("Rewriting link target {} -> {}", span.target, replacement);
        output.push_str(&content[copied_to..span.start]);
        output.push_str(&replacement);
        copied_to = span.end;
    }
    output.push_str(&content[copied_to..]);
    output
}
