//! Content category detection
//!
//! Every resource is either served as text (`Content-Type: text/html`) or
//! as raw image bytes (`Content-Type: image`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Image,
}

impl ContentType {
    /// Value written in the `Content-Type` response header.
    pub fn header_value(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Image => "image",
        }
    }
}

/// Classifies a resource by the extension of its name.
///
/// Names without a dot are treated as directory/default requests. Unknown
/// extensions fall back to Html. Matching is case-sensitive.
///
/// # Examples
/// ```
/// use statik::http::mime::{classify, ContentType};
/// assert_eq!(classify("a.png"), ContentType::Image);
/// assert_eq!(classify("a"), ContentType::Html);
/// assert_eq!(classify("a.xyz"), ContentType::Html);
/// ```
pub fn classify(name: &str) -> ContentType {
    let Some(dot) = name.rfind('.') else {
        return ContentType::Html;
    };

    match &name[dot..] {
        ".html" | ".txt" | ".htm" => ContentType::Html,
        ".jpg" | ".jpeg" | ".jp3" | ".jfif" | ".png" | ".gif" | ".bmp" | ".dib" | ".tif"
        | ".tiff" | ".ico" => ContentType::Image,
        _ => ContentType::Html,
    }
}
