//! Content handlers.
//!
//! One catch-all GET route: resolve the request path, read the backing
//! file, render markdown pages through the shared template, pick the
//! media type. Resolution and response assembly live in
//! [`build_response`] so the pipeline is testable without a socket.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use ezserve_renderer::{markdown_to_html, rewrite_document};
use ezserve_site::{
    BUNDLED_SITE_SCRIPT, ContentKind, LOCAL_COMPONENTS_URL, SiteContext, base_url, media_type,
    path_segments,
};

use crate::error::ServerError;
use crate::state::AppState;

/// Assembled response for a resolved (or unresolved) request path.
pub(crate) struct ContentResponse {
    pub(crate) status: StatusCode,
    pub(crate) media_type: &'static str,
    pub(crate) body: Vec<u8>,
}

/// Handle `GET /`.
pub(crate) async fn get_root(State(state): State<Arc<AppState>>) -> Result<Response, ServerError> {
    respond(&state, "")
}

/// Handle `GET /{*path}`.
pub(crate) async fn get_content(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    respond(&state, &path)
}

fn respond(state: &AppState, path: &str) -> Result<Response, ServerError> {
    let content = build_response(&state.site, path)?;
    Ok((
        content.status,
        [(header::CONTENT_TYPE, content.media_type)],
        content.body,
    )
        .into_response())
}

/// Resolve a request path and produce the full response content.
pub(crate) fn build_response(
    site: &SiteContext,
    path: &str,
) -> Result<ContentResponse, ServerError> {
    let segments = path_segments(path);

    let Some((file, kind)) = site.resolve(&segments) else {
        tracing::debug!(path, "no backing file");
        return Ok(ContentResponse {
            status: StatusCode::NOT_FOUND,
            media_type: "text/html",
            body: site.not_found_page.clone().into_bytes(),
        });
    };

    tracing::debug!(path, file = %file.display(), ?kind, "resolved");

    let body = match &kind {
        ContentKind::Binary(_) => std::fs::read(&file)?,
        ContentKind::Text(ext) => {
            let mut text = std::fs::read_to_string(&file)?;
            if site.local_components && ext == "html" {
                text = text.replace(BUNDLED_SITE_SCRIPT, LOCAL_COMPONENTS_URL);
            }
            text.into_bytes()
        }
        ContentKind::Markdown => {
            let markdown = std::fs::read_to_string(&file)?;
            let page = site.template.render(&markdown_to_html(&markdown));
            rewrite_document(&page, &base_url(&segments)).into_bytes()
        }
    };

    Ok(ContentResponse {
        status: StatusCode::OK,
        media_type: media_type(kind.extension()),
        body,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn site() -> (tempfile::TempDir, SiteContext) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("_layouts")).unwrap();
        std::fs::write(
            root.join("_layouts/default.html"),
            "<html><head>{%- seo -%}</head><body>{{ content }}</body></html>",
        )
        .unwrap();
        std::fs::write(root.join("_config.yml"), "title: Handler Site\n").unwrap();
        std::fs::write(root.join("404.html"), "<h1>gone</h1>").unwrap();
        std::fs::write(root.join("README.md"), "# Welcome\n\nSee [guide](guide).\n").unwrap();
        std::fs::create_dir_all(root.join("guide")).unwrap();
        std::fs::write(root.join("guide/setup.md"), "![d](diagram.png)\n").unwrap();
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("images/logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        std::fs::write(root.join("styles.css"), "body { margin: 0 }").unwrap();

        let context = SiteContext::load(root, false).unwrap();
        (dir, context)
    }

    #[test]
    fn test_root_renders_markdown_page() {
        let (_dir, site) = site();
        let response = build_response(&site, "").unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.media_type, "text/html");

        let html = String::from_utf8(response.body).unwrap();
        assert!(html.contains("<title>Handler Site</title>"));
        assert!(html.contains(r#"<h1 id="welcome">"#));
        assert!(!html.contains("{{ content }}"));
        // Root base URL: relative links are rooted at /
        assert!(html.contains(r#"href="/guide""#));
    }

    #[test]
    fn test_markdown_page_base_url() {
        let (_dir, site) = site();
        let response = build_response(&site, "guide/setup").unwrap();
        let html = String::from_utf8(response.body).unwrap();
        assert!(html.contains(r#"src="/guide/setup/diagram.png""#));
    }

    #[test]
    fn test_binary_file_served_verbatim() {
        let (_dir, site) = site();
        let response = build_response(&site, "images/logo.png").unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.media_type, "image/png");
        assert_eq!(response.body, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_text_file_served_verbatim() {
        let (_dir, site) = site();
        let response = build_response(&site, "styles.css").unwrap();
        assert_eq!(response.media_type, "text/css");
        assert_eq!(response.body, b"body { margin: 0 }".to_vec());
    }

    #[test]
    fn test_explicit_markdown_request_serves_source() {
        let (_dir, site) = site();
        let response = build_response(&site, "guide/setup.md").unwrap();
        assert_eq!(response.media_type, "text/markdown");
        assert_eq!(response.body, b"![d](diagram.png)\n".to_vec());
    }

    #[test]
    fn test_not_found_serves_404_page() {
        let (_dir, site) = site();
        let response = build_response(&site, "missing/page").unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.media_type, "text/html");
        assert_eq!(response.body, b"<h1>gone</h1>".to_vec());
    }

    #[test]
    fn test_dev_mode_rewrites_html_script_reference() {
        let (dir, _) = site();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();
        std::fs::write(
            dir.path().join("app/index.html"),
            "<script src=\"/ezsite/dist/js/index.js\"></script>",
        )
        .unwrap();

        let dev_site = SiteContext::load(dir.path(), true).unwrap();
        let response = build_response(&dev_site, "app").unwrap();
        let html = String::from_utf8(response.body).unwrap();
        assert!(html.contains("http://localhost:5173/src/main.ts"));

        let plain_site = SiteContext::load(dir.path(), false).unwrap();
        let response = build_response(&plain_site, "app").unwrap();
        let html = String::from_utf8(response.body).unwrap();
        assert!(html.contains("/ezsite/dist/js/index.js"));
    }
}
