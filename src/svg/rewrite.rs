//! Icon rewriting: text-relative sizing and explicit color clearing.
//!
//! Icons render at the size of the surrounding text and inherit its color,
//! so the root element gets `width`/`height` of `1em` and, for single-color
//! icons, the literal paint is removed from every element (the renderer then
//! falls back to `currentColor`).

use std::io::Cursor;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::SvgError;

/// Size attributes replaced on the root element.
const TEXT_SIZE: &str = "1em";
const SIZE_ATTRS: &[&str] = &["width", "height"];
const COLOR_ATTRS: &[&str] = &["fill", "stroke", "stop-color"];

/// Rewrite an SVG document for icon use.
///
/// The root `<svg>` element is resized to `1em × 1em` (viewBox untouched).
/// When `strip_color` is given, every fill/stroke/stop-color attribute whose
/// value matches it (case-insensitively) is dropped.
pub fn rewrite_icon(xml: &str, strip_color: Option<&str>) -> Result<String, SvgError> {
    let strip = strip_color.map(|c| c.trim().to_ascii_lowercase());
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut root_seen = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SvgError::Parse(e.to_string()))?;
        match event {
            Event::Start(elem) => {
                let is_root = !root_seen && elem.local_name().as_ref() == b"svg";
                root_seen = root_seen || is_root;
                let rewritten = rewrite_element(&elem, is_root, strip.as_deref())?;
                writer
                    .write_event(Event::Start(rewritten))
                    .map_err(|e| SvgError::Write(e.to_string()))?;
            }
            Event::Empty(elem) => {
                let is_root = !root_seen && elem.local_name().as_ref() == b"svg";
                root_seen = root_seen || is_root;
                let rewritten = rewrite_element(&elem, is_root, strip.as_deref())?;
                writer
                    .write_event(Event::Empty(rewritten))
                    .map_err(|e| SvgError::Write(e.to_string()))?;
            }
            Event::Eof => break,
            other => {
                writer
                    .write_event(other)
                    .map_err(|e| SvgError::Write(e.to_string()))?;
            }
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| SvgError::Write(e.to_string()))
}

/// Rebuild one element, filtering size attributes on the root and stripped
/// colors everywhere.
fn rewrite_element(
    elem: &BytesStart<'_>,
    is_root: bool,
    strip: Option<&str>,
) -> Result<BytesStart<'static>, SvgError> {
    let name = std::str::from_utf8(elem.name().as_ref())
        .map_err(|e| SvgError::Parse(e.to_string()))?
        .to_string();
    let mut rewritten = BytesStart::new(name);

    for attr in elem.attributes().with_checks(false).flatten() {
        let Ok(key) = std::str::from_utf8(attr.key.as_ref()) else {
            continue;
        };
        let local = local_name(key);

        if is_root && SIZE_ATTRS.contains(&local) {
            continue;
        }

        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Parse(e.to_string()))?;

        if let Some(strip) = strip
            && COLOR_ATTRS.contains(&local)
            && value.trim().eq_ignore_ascii_case(strip)
        {
            continue;
        }

        rewritten.push_attribute((key, value.as_ref()));
    }

    if is_root {
        rewritten.push_attribute(("width", TEXT_SIZE));
        rewritten.push_attribute(("height", TEXT_SIZE));
    }

    Ok(rewritten)
}

/// Attribute name without any namespace prefix.
fn local_name(key: &str) -> &str {
    key.rsplit(':').next().unwrap_or(key)
}
