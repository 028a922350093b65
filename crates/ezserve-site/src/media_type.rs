//! Content kinds and media-type selection.
//!
//! The resolver classifies every hit into a [`ContentKind`]; the handler
//! picks the outgoing content type from the fixed extension table.

/// Extensions read as raw bytes rather than text.
const BINARY_EXTENSIONS: &[&str] = &["ico", "jpg", "jpeg", "png", "svg"];

/// How a resolved file must be read and served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// Raw bytes served verbatim.
    Binary(String),
    /// Text served verbatim.
    Text(String),
    /// Markdown source rendered into the page template.
    Markdown,
}

impl ContentKind {
    /// Classify an explicit (already lower-cased) file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        if BINARY_EXTENSIONS.contains(&ext) {
            Self::Binary(ext.to_owned())
        } else {
            Self::Text(ext.to_owned())
        }
    }

    /// The extension driving media-type selection, if any.
    ///
    /// Markdown pages have none: they always serve as `text/html`.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Binary(ext) | Self::Text(ext) => Some(ext),
            Self::Markdown => None,
        }
    }
}

/// Media type for an extension; unmapped or absent falls back to HTML.
#[must_use]
pub fn media_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("css") => "text/css",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("md") => "text/markdown",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        Some("yaml") => "application/x-yaml",
        // html, unmapped extensions, markdown pages
        _ => "text/html",
    }
}
