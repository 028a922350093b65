//! Markdown rendering pipeline for the ezserve dev server.
//!
//! Two halves, composed by the request handler:
//!
//! - [`markdown_to_html`] converts markdown source to an HTML body
//!   fragment (tables, footnotes, heading anchors).
//! - [`rewrite_document`] parses a full page, applies the structural
//!   rewrite passes (callout extraction, link/image rewriting, param
//!   reordering, empty-paragraph pruning) and serializes it back.
//!
//! The passes operate on an arena document tree; parse once, rewrite,
//! serialize once.

mod dom;
mod markdown;
mod rewrite;
mod ser;
mod sink;

pub use dom::{Dom, NodeData, NodeId};
pub use markdown::markdown_to_html;
pub use rewrite::CALLOUT_PREFIX;
pub use ser::serialize;
pub use sink::parse_html;

/// Parse a page, apply all rewrite passes and serialize it.
///
/// `base_url` is the request's directory URL (`/` for the root page,
/// `/guide/setup/` for `guide/setup`): relative links and image sources
/// are resolved against it.
#[must_use]
pub fn rewrite_document(html: &str, base_url: &str) -> String {
    let mut dom = sink::parse_html(html);
    rewrite::apply(&mut dom, base_url);
    ser::serialize(&dom)
}
