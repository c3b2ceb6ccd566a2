//! Color extraction from SVG markup.
//!
//! Streams the document with quick-xml and collects every paint referenced by
//! fill/stroke-like attributes into a [`ColorSet`]. Values are compared
//! case-insensitively; `currentColor` collapses to the sentinel
//! `currentcolor`. The set is transient: classification consumes it and
//! throws it away.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::SvgError;

/// Sentinel for `currentColor` paint (inherits the surrounding text color).
pub const CURRENT_COLOR: &str = "currentcolor";

/// Attributes that carry paint values.
const COLOR_ATTRS: &[&str] = &["fill", "stroke", "stop-color"];

/// Distinct colors used by an SVG document.
///
/// Keys are normalized (trimmed, lowercased); the first-seen original
/// spelling is kept so reported colors match what the author wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColorSet {
    colors: BTreeMap<String, String>,
}

impl ColorSet {
    /// Record a paint value. `none` and empty values are not colors.
    pub fn insert(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let normalized = trimmed.to_ascii_lowercase();
        if normalized == "none" {
            return;
        }
        self.colors
            .entry(normalized)
            .or_insert_with(|| trimmed.to_string());
    }

    pub fn has_current_color(&self) -> bool {
        self.colors.contains_key(CURRENT_COLOR)
    }

    /// Number of distinct colors, excluding the `currentcolor` sentinel.
    pub fn literal_count(&self) -> usize {
        self.colors.keys().filter(|k| *k != CURRENT_COLOR).count()
    }

    /// The one literal color, in its original spelling, when exactly one
    /// exists.
    pub fn single_literal(&self) -> Option<&str> {
        let mut literals = self
            .colors
            .iter()
            .filter(|(k, _)| k.as_str() != CURRENT_COLOR);
        let (_, first) = literals.next()?;
        if literals.next().is_some() {
            return None;
        }
        Some(first)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Normalized color values, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }
}

/// Collect every fill/stroke/stop-color value in the document.
pub fn extract_colors(xml: &str) -> Result<ColorSet, SvgError> {
    let mut reader = Reader::from_str(xml);
    let mut colors = ColorSet::default();

    loop {
        match reader
            .read_event()
            .map_err(|e| SvgError::Parse(e.to_string()))?
        {
            Event::Start(elem) | Event::Empty(elem) => {
                for attr in elem.attributes().with_checks(false).flatten() {
                    let local = attr.key.local_name();
                    let Ok(key) = std::str::from_utf8(local.as_ref()) else {
                        continue;
                    };
                    if !COLOR_ATTRS.contains(&key) {
                        continue;
                    }
                    if let Ok(value) = attr.unescape_value() {
                        colors.insert(&value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(colors)
}
