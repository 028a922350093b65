//! Site startup state for the ezserve dev server.
//!
//! A [`SiteContext`] bundles everything computed once at process start:
//! the parsed site configuration, the assembled page template and the
//! not-found page. Content resolution and media-type selection live
//! here too; both operate per request against the site root.

mod layout;
mod media_type;
mod resolver;

use std::path::{Path, PathBuf};

pub use ezserve_config::{ConfigError, LOCAL_COMPONENTS_URL, SiteConfig};
pub use layout::{BUNDLED_SITE_SCRIPT, CONTENT_PLACEHOLDER, PageTemplate};
pub use media_type::{ContentKind, media_type};
pub use resolver::{base_url, path_segments, resolve};

/// Layout file, relative to the site root.
const LAYOUT_PATH: &str = "_layouts/default.html";
/// Header fragment, relative to the site root.
const HEADER_PATH: &str = "_includes/header.html";
/// Footer fragment, relative to the site root.
const FOOTER_PATH: &str = "_includes/footer.html";
/// Not-found page, relative to the site root.
const NOT_FOUND_PATH: &str = "404.html";

/// Immutable per-process site state, shared by all requests.
#[derive(Debug)]
pub struct SiteContext {
    /// Site root all request paths resolve against.
    pub root: PathBuf,
    /// Parsed `_config.yml` (defaults when absent).
    pub config: SiteConfig,
    /// Assembled page template.
    pub template: PageTemplate,
    /// Body served with 404 responses; empty when no 404.html exists.
    pub not_found_page: String,
    /// Local component development mode.
    pub local_components: bool,
}

impl SiteContext {
    /// Load configuration and collaborator files from the site root and
    /// assemble the page template.
    ///
    /// Missing collaborator files degrade to empty content; a layout
    /// without content placeholder degrades to bare pages. Only an
    /// unreadable or malformed `_config.yml` is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `_config.yml` exists but cannot be loaded.
    pub fn load(root: &Path, local_components: bool) -> Result<Self, ConfigError> {
        let config = SiteConfig::load(root, local_components)?;

        let layout = match read_fragment(root, LAYOUT_PATH) {
            Some(layout) => layout,
            None => {
                tracing::warn!(path = LAYOUT_PATH, "no layout template, serving bare pages");
                CONTENT_PLACEHOLDER.to_owned()
            }
        };
        let header = read_fragment(root, HEADER_PATH).unwrap_or_default();
        let footer = read_fragment(root, FOOTER_PATH).unwrap_or_default();
        let not_found_page = read_fragment(root, NOT_FOUND_PATH).unwrap_or_default();

        let mut template = PageTemplate::assemble(&layout, &header, &footer, &config);
        if local_components {
            template.rewrite_dev_script();
        }

        Ok(Self {
            root: root.to_path_buf(),
            config,
            template,
            not_found_page,
            local_components,
        })
    }

    /// Resolve a request path against this site's root.
    #[must_use]
    pub fn resolve(&self, segments: &[String]) -> Option<(PathBuf, ContentKind)> {
        resolver::resolve(&self.root, segments)
    }
}

/// Read a collaborator file; absence is expected and yields `None`.
fn read_fragment(root: &Path, relative: &str) -> Option<String> {
    let path = root.join(relative);
    match std::fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "collaborator file not loaded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_site(root: &Path) {
        std::fs::create_dir_all(root.join("_layouts")).unwrap();
        std::fs::create_dir_all(root.join("_includes")).unwrap();
        std::fs::write(
            root.join("_layouts/default.html"),
            "<html><head>{%- seo -%}</head><body>\n{%- include header.html -%}\n{{ content }}\n{%- include footer.html -%}\n</body></html>",
        )
        .unwrap();
        std::fs::write(root.join("_includes/header.html"), "<header/>").unwrap();
        std::fs::write(root.join("_includes/footer.html"), "<footer/>").unwrap();
        std::fs::write(root.join("404.html"), "<h1>not found</h1>").unwrap();
        std::fs::write(root.join("_config.yml"), "title: Ctx Site\n").unwrap();
    }

    #[test]
    fn test_load_assembles_template() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        let context = SiteContext::load(dir.path(), false).unwrap();
        assert_eq!(context.config.title, "Ctx Site");
        assert_eq!(context.not_found_page, "<h1>not found</h1>");
        assert!(context.template.html().contains("<header/>"));
        assert!(context.template.html().contains("<title>Ctx Site</title>"));
        assert!(context.template.html().contains(CONTENT_PLACEHOLDER));
    }

    #[test]
    fn test_load_empty_site_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let context = SiteContext::load(dir.path(), false).unwrap();
        assert_eq!(context.config.title, "Juncture");
        assert_eq!(context.not_found_page, "");
        // Bare-page fallback: the template is just the placeholder.
        assert_eq!(context.template.render("<p>x</p>"), "<p>x</p>");
    }
}
