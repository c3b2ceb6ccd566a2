//! MIME type constants and detection for image payloads.
//!
//! Detection works two ways: by file extension (for ingesting from disk) and
//! by magic bytes (for clipboard blobs and bare base64 payloads that carry no
//! declared type).

// Images
pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const GIF: &str = "image/gif";
pub const WEBP: &str = "image/webp";
pub const SVG: &str = "image/svg+xml";
pub const BMP: &str = "image/bmp";
pub const ICO: &str = "image/x-icon";

// Text / binary
pub const PLAIN: &str = "text/plain;charset=US-ASCII";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess MIME type from a file extension.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext.map(str::to_ascii_lowercase).as_deref() {
        Some("svg") => SVG,
        Some("png") => PNG,
        Some("jpg" | "jpeg") => JPEG,
        Some("gif") => GIF,
        Some("webp") => WEBP,
        Some("bmp") => BMP,
        Some("ico") => ICO,
        _ => OCTET_STREAM,
    }
}

/// Sniff MIME type from leading magic bytes.
///
/// Returns `None` when the payload matches no known image signature.
pub fn from_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 4 && bytes[..4] == [0x89, 0x50, 0x4E, 0x47] {
        return Some(PNG);
    }
    if bytes.len() >= 3 && bytes[..3] == [0xFF, 0xD8, 0xFF] {
        return Some(JPEG);
    }
    if bytes.len() >= 4 && &bytes[..4] == b"GIF8" {
        return Some(GIF);
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some(WEBP);
    }
    // SVG has no binary magic; look for markup at the front
    let head = &bytes[..bytes.len().min(256)];
    if let Ok(text) = std::str::from_utf8(head) {
        let trimmed = text.trim_start();
        if trimmed.starts_with("<svg") || trimmed.starts_with("<?xml") {
            return Some(SVG);
        }
    }
    None
}

pub fn is_svg(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(SVG))
}

pub fn is_image(media_type: &str) -> bool {
    media_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// File extension for a stored asset of the given media type.
pub fn extension_for(media_type: &str) -> &'static str {
    let base = media_type.split(';').next().unwrap_or("").trim();
    match base.to_ascii_lowercase().as_str() {
        "image/svg+xml" => "svg",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}
