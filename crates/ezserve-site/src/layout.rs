//! Page template assembly.
//!
//! The layout file carries Jekyll-style markers: include directives for
//! the header/footer fragments, an SEO marker, and `{{ site.* }}`
//! placeholders. Assembly substitutes all of them once at startup; the
//! result is shared read-only by every render.

use std::sync::LazyLock;

use ezserve_config::{LOCAL_COMPONENTS_URL, SiteConfig};
use regex::{NoExpand, Regex};

/// Placeholder replaced per page with the rendered markdown body.
pub const CONTENT_PLACEHOLDER: &str = "{{ content }}";

/// Bundled site script reference, rewritten to the local dev server when
/// local component development is active.
pub const BUNDLED_SITE_SCRIPT: &str = "/ezsite/dist/js/index.js";

const SEO_MARKER: &str = "{%- seo -%}";

static HEADER_INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\{%-\s*include header\.html\s*-%\}").unwrap());
static FOOTER_INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\{%-\s*include footer\.html\s*-%\}").unwrap());

/// The assembled page shell, constructed once per process.
#[derive(Clone, Debug)]
pub struct PageTemplate {
    html: String,
}

impl PageTemplate {
    /// Substitute fragments, the SEO block and configuration values into
    /// a layout source. Pure: missing fragments and empty configuration
    /// values substitute as empty strings.
    #[must_use]
    pub fn assemble(layout: &str, header: &str, footer: &str, config: &SiteConfig) -> Self {
        let html = HEADER_INCLUDE_RE.replace_all(layout, NoExpand(header));
        let html = FOOTER_INCLUDE_RE.replace_all(&html, NoExpand(footer));
        let html = html
            .replace(SEO_MARKER, &seo_block(config))
            .replace("{{ site.mode }}", &config.mode)
            .replace("{{ site.github.owner }}", &config.github.owner)
            .replace("{{ site.github.repo }}", &config.github.repo)
            .replace("{{ site.github.branch }}", &config.github.branch)
            .replace("{{ site.baseurl }}", "")
            .replace("{{ site.components }}", &config.components);

        if !html.contains(CONTENT_PLACEHOLDER) {
            tracing::warn!("layout template has no content placeholder; pages render without the shell");
        }

        Self { html }
    }

    /// Insert a rendered body at the content placeholder.
    ///
    /// A template without the placeholder degrades to the body alone.
    #[must_use]
    pub fn render(&self, body: &str) -> String {
        if self.html.contains(CONTENT_PLACEHOLDER) {
            self.html.replace(CONTENT_PLACEHOLDER, body)
        } else {
            body.to_owned()
        }
    }

    /// Point bundled site script references at the local dev server.
    pub fn rewrite_dev_script(&mut self) {
        self.html = self.html.replace(BUNDLED_SITE_SCRIPT, LOCAL_COMPONENTS_URL);
    }

    /// The assembled template source.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// SEO block: title/description/canonical metadata, Open Graph tags and
/// a JSON-LD `WebSite` object.
fn seo_block(config: &SiteConfig) -> String {
    let jsonld = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "description": config.description,
        "headline": config.title,
        "name": config.title,
        "url": config.url,
    });
    let jsonld = serde_json::to_string_pretty(&jsonld).unwrap_or_default();

    format!(
        r#"
  <title>{title}</title>
  <meta property="og:title" content="{title}" />
  <meta property="og:locale" content="en_US" />
  <meta name="description" content="{description}" />
  <meta property="og:description" content="{description}" />
  <link rel="canonical" href="{url}" />
  <meta property="og:url" content="{url}" />
  <meta property="og:site_name" content="{title}" />
  <meta property="og:type" content="website" />
  <script type="application/ld+json">
  {jsonld}
  </script>
"#,
        title = config.title,
        description = config.description,
        url = config.url,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Test Site".to_owned(),
            description: "A test site".to_owned(),
            url: "https://docs.example.org".to_owned(),
            github: ezserve_config::GithubConfig {
                owner: "example".to_owned(),
                repo: "docs".to_owned(),
                branch: "main".to_owned(),
            },
            components: "/components.js".to_owned(),
            ..SiteConfig::default()
        }
    }

    const LAYOUT: &str = "<!DOCTYPE html>\n<html>\n<head>\n{%- seo -%}\n</head>\n<body data-mode=\"{{ site.mode }}\" data-repo=\"{{ site.github.owner }}/{{ site.github.repo }}@{{ site.github.branch }}\">\n  {%- include header.html -%}\n<main>{{ content }}</main>\n  {%- include footer.html -%}\n<script src=\"{{ site.baseurl }}{{ site.components }}\"></script>\n</body>\n</html>\n";

    #[test]
    fn test_assemble_substitutes_fragments() {
        let template = PageTemplate::assemble(LAYOUT, "<header>H</header>", "<footer>F</footer>", &config());
        let html = template.html();
        assert!(html.contains("<header>H</header>"));
        assert!(html.contains("<footer>F</footer>"));
        assert!(!html.contains("include header.html"));
        assert!(!html.contains("include footer.html"));
    }

    #[test]
    fn test_assemble_substitutes_config_values() {
        let template = PageTemplate::assemble(LAYOUT, "", "", &config());
        let html = template.html();
        assert!(html.contains("data-mode=\"default\""));
        assert!(html.contains("data-repo=\"example/docs@main\""));
        // site.baseurl is always empty
        assert!(html.contains("src=\"/components.js\""));
    }

    #[test]
    fn test_assemble_seo_block() {
        let template = PageTemplate::assemble(LAYOUT, "", "", &config());
        let html = template.html();
        assert!(html.contains("<title>Test Site</title>"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://docs.example.org\" />"));
        assert!(html.contains("og:site_name"));
        assert!(html.contains("\"@type\": \"WebSite\""));
        assert!(!html.contains(SEO_MARKER));
    }

    #[test]
    fn test_content_placeholder_survives_assembly() {
        let template = PageTemplate::assemble(LAYOUT, "", "", &config());
        assert!(template.html().contains(CONTENT_PLACEHOLDER));
    }

    #[test]
    fn test_render_inserts_body() {
        let template = PageTemplate::assemble(LAYOUT, "", "", &config());
        let page = template.render("<p>Body</p>");
        assert!(page.contains("<main><p>Body</p></main>"));
        assert!(!page.contains(CONTENT_PLACEHOLDER));
    }

    #[test]
    fn test_render_without_placeholder_degrades_to_body() {
        let template = PageTemplate::assemble("<html><body></body></html>", "", "", &config());
        assert_eq!(template.render("<p>Body</p>"), "<p>Body</p>");
    }

    #[test]
    fn test_fragment_with_dollar_signs_is_literal() {
        let template =
            PageTemplate::assemble(LAYOUT, "<header>$100 ${0}</header>", "", &config());
        assert!(template.html().contains("$100 ${0}"));
    }

    #[test]
    fn test_include_marker_only_matches_at_line_start() {
        let layout = "<p>inline {%- include header.html -%} stays</p>\n  {%- include header.html -%}\n{{ content }}";
        let template = PageTemplate::assemble(layout, "<header/>", "", &config());
        let html = template.html();
        assert!(html.contains("inline {%- include header.html -%} stays"));
        assert!(html.contains("<header/>"));
    }

    #[test]
    fn test_rewrite_dev_script() {
        let layout = "<script src=\"/ezsite/dist/js/index.js\"></script>{{ content }}";
        let mut template = PageTemplate::assemble(layout, "", "", &config());
        template.rewrite_dev_script();
        assert!(template.html().contains("http://localhost:5173/src/main.ts"));
        assert!(!template.html().contains(BUNDLED_SITE_SCRIPT));
    }
}
