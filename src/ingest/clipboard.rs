//! Clipboard payload handling.
//!
//! A paste carries an image blob, plain text, or both. Blobs win; text is
//! only considered when it looks like inline SVG markup. Editors routinely
//! copy SVG fragments without the `xmlns` declaration, so the standard
//! namespace is injected before sanitizing. A lenient recovery heuristic,
//! not XML validation.

/// Standard SVG namespace injected into namespace-less markup.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// What a paste event delivers.
#[derive(Debug, Clone, Default)]
pub struct ClipboardPayload {
    /// Attached image blob: declared media type plus raw bytes.
    pub image: Option<(String, Vec<u8>)>,
    /// Plain-text content, possibly inline SVG markup.
    pub text: Option<String>,
}

impl ClipboardPayload {
    pub fn from_image(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            image: Some((media_type.into(), bytes)),
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            image: None,
            text: Some(text.into()),
        }
    }
}

/// Extract usable SVG markup from pasted text, injecting the namespace when
/// it is missing. Returns `None` for text that does not look like SVG.
pub fn svg_from_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !trimmed.starts_with("<svg") {
        return None;
    }

    if trimmed.contains("xmlns") {
        return Some(trimmed.to_string());
    }

    Some(trimmed.replacen("<svg", &format!(r#"<svg xmlns="{SVG_NAMESPACE}""#), 1))
}
