//! Structural rewrite passes over a parsed page.
//!
//! Each pass is a standalone transformation on the [`Dom`]; the render
//! pipeline applies them in a fixed order. Passes collect the node ids
//! they operate on up front, then mutate, so traversal never observes
//! its own edits.

use crate::dom::Dom;

/// Sentinel prefix marking a quoted paragraph as a callout.
pub const CALLOUT_PREFIX: &str = "ez-";

/// List-item separator inside a callout paragraph.
const CALLOUT_ITEM_SPLIT: &str = "\n- ";

/// Apply all rewrite passes in order.
pub fn apply(dom: &mut Dom, base_url: &str) {
    extract_callouts(dom);
    rewrite_links(dom, base_url);
    rewrite_images(dom, base_url);
    reorder_params(dom);
    prune_empty_paragraphs(dom);
}

/// Rebuild callout blockquotes.
///
/// A quoted paragraph starting with the sentinel splits into a heading
/// paragraph plus a list: the first `"\n- "`-separated segment becomes a
/// paragraph in a fresh blockquote inserted before the original block,
/// remaining segments become `<li>`s of an appended `<ul>`. The original
/// paragraph is removed, and the original block too once it holds
/// nothing but whitespace.
pub fn extract_callouts(dom: &mut Dom) {
    for quote in dom.elements_by_tag("blockquote") {
        for para in dom.elements_by_tag_in(quote, "p") {
            let text = dom.text_content(para);
            if !text.starts_with(CALLOUT_PREFIX) {
                continue;
            }

            let mut segments = text.split(CALLOUT_ITEM_SPLIT);
            let title = segments.next().unwrap_or_default().to_owned();
            let items: Vec<String> = segments.map(str::to_owned).collect();

            let new_quote = dom.create_element("blockquote");
            let heading = dom.create_element("p");
            let heading_text = dom.create_text(title);
            dom.append(heading, heading_text);
            dom.append(new_quote, heading);

            if !items.is_empty() {
                let list = dom.create_element("ul");
                for item in items {
                    let li = dom.create_element("li");
                    let li_text = dom.create_text(item);
                    dom.append(li, li_text);
                    dom.append(list, li);
                }
                dom.append(new_quote, list);
            }

            dom.insert_before(quote, new_quote);
            dom.detach(para);
        }

        if dom.is_effectively_empty(quote) {
            dom.detach(quote);
        }
    }
}

/// Prefix site-root-relative link targets with the page base URL.
///
/// Targets starting with `http`, `#` or `/` are never touched.
pub fn rewrite_links(dom: &mut Dom, base_url: &str) {
    for link in dom.elements_by_tag("a") {
        let Some(href) = dom.get_attr(link, "href") else {
            continue;
        };
        if href.is_empty()
            || href.starts_with("http")
            || href.starts_with('#')
            || href.starts_with('/')
        {
            continue;
        }
        let rewritten = format!("{base_url}{href}");
        dom.set_attr(link, "href", &rewritten);
    }
}

/// Prefix relative image sources with the page base URL.
pub fn rewrite_images(dom: &mut Dom, base_url: &str) {
    for img in dom.elements_by_tag("img") {
        let Some(src) = dom.get_attr(img, "src") else {
            continue;
        };
        if src.starts_with("http") || src.starts_with('/') {
            continue;
        }
        let rewritten = format!("{base_url}{src}");
        dom.set_attr(img, "src", &rewritten);
    }
}

/// Hoist `<param>` elements out of their wrappers.
///
/// Each param moves to directly follow the contiguous run of params
/// after its parent, keeping every embed's params adjacent and ordered.
/// A run that ends the sibling list leaves the param in place.
pub fn reorder_params(dom: &mut Dom) {
    for param in dom.elements_by_tag("param") {
        let Some(parent) = dom.parent(param) else {
            continue;
        };

        let mut anchor = parent;
        let anchor = loop {
            match dom.next_sibling(anchor) {
                None => break None,
                Some(next) if dom.element_name(next) == Some("param") => anchor = next,
                Some(_) => break Some(anchor),
            }
        };

        if let Some(anchor) = anchor {
            dom.detach(param);
            dom.insert_after(anchor, param);
        }
    }
}

/// Drop paragraphs whose serialized content is empty or whitespace-only.
pub fn prune_empty_paragraphs(dom: &mut Dom) {
    for para in dom.elements_by_tag("p") {
        if dom.is_effectively_empty(para) {
            dom.detach(para);
        }
    }
}
