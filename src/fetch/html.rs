// src/fetch/html.rs
// =============================================================================
// This module extracts raw href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever, which recovers from broken markup the way a
//   browser does instead of failing
//
// The walk over the tree is ours: a depth-first, pre-order traversal with an
// explicit stack, so deeply nested documents cannot overflow the call stack.
// Every node is visited exactly once and anchors come out in document order.
//
// Values are returned exactly as written; resolving them is the
// normalizer's job.
//
// Rust concepts:
// - std::str::from_utf8 borrows the body instead of copying it; the error
//   tells us how far the valid prefix goes
// - children().rev(): pushing children in reverse onto a Vec stack means
//   the first child is popped first, which keeps document order
// =============================================================================

use crate::error::ParseError;
use scraper::{Html, Node};

/// Returns the href of every <a> element in the document, in document order
///
/// Example:
///   body = "<a href='/docs'>Docs</a><p><a href='#top'>Top</a></p>"
///   result = ["/docs", "#top"]
pub fn extract_hrefs(body: &[u8]) -> Result<Vec<String>, ParseError> {
    let html = std::str::from_utf8(body).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;

    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        if let Node::Element(element) = node.value() {
            if element.name() == "a" {
                if let Some(href) = element.attr("href") {
                    hrefs.push(href.to_string());
                }
            }
        }

        // Reversed so the first child is popped first
        stack.extend(node.children().rev());
    }

    Ok(hrefs)
}
