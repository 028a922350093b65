//! Request-path to backing-file resolution.
//!
//! A request path either names a file literally (last segment carries an
//! extension) or is a directory-style page request resolved through the
//! markdown conventions: `<path>/README.md`, then `<path>.md`, then
//! `<path>/index.html`. The first existing candidate wins.

use std::path::{Path, PathBuf};

use crate::media_type::ContentKind;

/// Split a URL path into its non-empty segments.
#[must_use]
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Base URL used to resolve relative links in a rendered page.
///
/// `/` for the root page, otherwise the joined segments wrapped in
/// slashes (`/guide/setup/`).
#[must_use]
pub fn base_url(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Resolve a request path against the site root.
///
/// Returns `None` when no candidate exists; the caller serves the
/// not-found page. An empty segment list resolves against the root
/// README.
#[must_use]
pub fn resolve(root: &Path, segments: &[String]) -> Option<(PathBuf, ContentKind)> {
    let joined = root.join(segments.join("/"));

    // Explicit extension: a literal file lookup, no markdown fallbacks.
    if let Some(ext) = explicit_extension(segments) {
        if joined.is_file() {
            tracing::debug!(path = %joined.display(), ext, "resolved literal file");
            return Some((joined, ContentKind::from_extension(&ext)));
        }
        return None;
    }

    let readme = joined.join("README.md");
    if readme.is_file() {
        return Some((readme, ContentKind::Markdown));
    }

    let sibling = root.join(format!("{}.md", segments.join("/")));
    if sibling.is_file() {
        return Some((sibling, ContentKind::Markdown));
    }

    let index = joined.join("index.html");
    if index.is_file() {
        return Some((index, ContentKind::Text("html".to_owned())));
    }

    None
}

/// Lower-cased extension of the last segment, if it contains a dot.
fn explicit_extension(segments: &[String]) -> Option<String> {
    let last = segments.last()?;
    if last.contains('.') {
        last.rsplit('.').next().map(str::to_lowercase)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path_segments(path)
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("README.md"), "# Home\n").unwrap();
        std::fs::create_dir_all(root.join("guide")).unwrap();
        std::fs::write(root.join("guide/setup.md"), "# Setup\n").unwrap();
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("images/logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();
        std::fs::create_dir_all(root.join("app")).unwrap();
        std::fs::write(root.join("app/index.html"), "<html></html>").unwrap();
        dir
    }

    #[test]
    fn test_path_segments_drops_empties() {
        assert_eq!(segs("/guide//setup/"), vec!["guide", "setup"]);
        assert!(segs("").is_empty());
        assert!(segs("/").is_empty());
    }

    #[test]
    fn test_base_url() {
        assert_eq!(base_url(&[]), "/");
        assert_eq!(base_url(&segs("guide/setup")), "/guide/setup/");
    }

    #[test]
    fn test_empty_path_resolves_root_readme() {
        let dir = site();
        let (path, kind) = resolve(dir.path(), &[]).unwrap();
        assert_eq!(path, dir.path().join("README.md"));
        assert_eq!(kind, ContentKind::Markdown);
    }

    #[test]
    fn test_explicit_extension_literal_hit() {
        let dir = site();
        let (path, kind) = resolve(dir.path(), &segs("images/logo.png")).unwrap();
        assert_eq!(path, dir.path().join("images/logo.png"));
        assert_eq!(kind, ContentKind::Binary("png".to_owned()));
    }

    #[test]
    fn test_explicit_extension_miss_is_not_found() {
        let dir = site();
        // guide/setup.md exists, but an explicit-extension miss must not
        // fall through to markdown candidates.
        assert!(resolve(dir.path(), &segs("guide/setup.css")).is_none());
        assert!(resolve(dir.path(), &segs("missing.png")).is_none());
    }

    #[test]
    fn test_extensionless_prefers_directory_readme() {
        let dir = site();
        std::fs::create_dir_all(dir.path().join("guide/setup")).unwrap();
        std::fs::write(dir.path().join("guide/setup/README.md"), "# Dir\n").unwrap();

        let (path, kind) = resolve(dir.path(), &segs("guide/setup")).unwrap();
        assert_eq!(path, dir.path().join("guide/setup/README.md"));
        assert_eq!(kind, ContentKind::Markdown);
    }

    #[test]
    fn test_extensionless_falls_back_to_sibling_md() {
        let dir = site();
        let (path, kind) = resolve(dir.path(), &segs("guide/setup")).unwrap();
        assert_eq!(path, dir.path().join("guide/setup.md"));
        assert_eq!(kind, ContentKind::Markdown);
    }

    #[test]
    fn test_extensionless_falls_back_to_index_html() {
        let dir = site();
        let (path, kind) = resolve(dir.path(), &segs("app")).unwrap();
        assert_eq!(path, dir.path().join("app/index.html"));
        assert_eq!(kind, ContentKind::Text("html".to_owned()));
    }

    #[test]
    fn test_unresolvable_is_none() {
        let dir = site();
        assert!(resolve(dir.path(), &segs("nowhere")).is_none());
    }

    #[test]
    fn test_extension_is_lowercased() {
        let dir = site();
        std::fs::write(dir.path().join("images/PHOTO.JPG"), [0xff, 0xd8]).unwrap();
        let (_, kind) = resolve(dir.path(), &segs("images/PHOTO.JPG")).unwrap();
        assert_eq!(kind, ContentKind::Binary("jpg".to_owned()));
    }
}
