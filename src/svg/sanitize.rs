//! Data-URI sanitization through the SVG processor seam.
//!
//! SVG payloads are untrusted markup (scripts, event handlers, external
//! references) and go through an [`SvgProcessor`] before anything else sees
//! them. Non-SVG media types pass through unchanged, a documented gap kept on
//! purpose.
//!
//! The built-in [`UsvgProcessor`] validates the document with usvg (which
//! also yields the intrinsic aspect ratio), then emits the markup through a
//! streaming filter that drops scripting vectors. The author's markup is
//! otherwise kept verbatim; in particular `currentColor` paints survive,
//! which classification depends on. Results are memoized in a small LRU
//! keyed by content hash so repeated ingests of the same payload skip
//! reprocessing.

use std::io::Cursor;

use parking_lot::Mutex;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::core::IngestError;
use crate::datauri::{DataUri, mime};

/// A processed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSvg {
    pub xml: String,
    pub aspect_ratio: Option<f32>,
}

/// Outcome of one processor call. Failure is recoverable: the pipeline stops
/// with "no asset", it does not crash.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgProcessOutcome {
    Success(ProcessedSvg),
    Failure,
}

/// External SVG-processing collaborator: raw XML in, cleaned XML plus aspect
/// ratio out. One attempt per invocation, no retries.
#[allow(async_fn_in_trait)]
pub trait SvgProcessor {
    async fn process(&self, xml: &str) -> Result<SvgProcessOutcome, IngestError>;
}

/// A sanitized payload with the aspect ratio the processor reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub uri: DataUri,
    pub aspect_ratio: Option<f32>,
}

/// Sanitize a data URI.
///
/// SVG payloads are run through the processor and re-encoded as a fresh SVG
/// data URI; processor failure yields `Ok(None)` ("no asset"). Any other
/// media type passes through unvalidated.
pub async fn sanitize<P: SvgProcessor>(
    uri: DataUri,
    processor: &P,
) -> Result<Option<Sanitized>, IngestError> {
    if !uri.is_svg() {
        return Ok(Some(Sanitized {
            uri,
            aspect_ratio: None,
        }));
    }

    let xml = uri.text()?;
    match processor.process(xml).await? {
        SvgProcessOutcome::Success(processed) => Ok(Some(Sanitized {
            uri: DataUri::from_bytes(mime::SVG, processed.xml.into_bytes()),
            aspect_ratio: processed.aspect_ratio,
        })),
        SvgProcessOutcome::Failure => Ok(None),
    }
}

// ============================================================================
// Built-in usvg processor
// ============================================================================

/// Default number of memoized processor results.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

/// Built-in processor: usvg validation + streaming script filter.
pub struct UsvgProcessor {
    cache: Mutex<MemoCache>,
}

impl UsvgProcessor {
    pub fn new(cache_entries: usize) -> Self {
        Self {
            cache: Mutex::new(MemoCache::new(cache_entries)),
        }
    }

    /// Validate with usvg, then filter the original markup.
    ///
    /// usvg's resolved tree is not serialized back: re-serialization folds
    /// `currentColor` paints into concrete colors, which would break icon
    /// recoloring downstream. The filtered markup keeps the author's paints
    /// verbatim.
    fn process_uncached(xml: &str) -> Result<SvgProcessOutcome, IngestError> {
        let options = usvg::Options::default();
        let Ok(tree) = usvg::Tree::from_str(xml, &options) else {
            return Ok(SvgProcessOutcome::Failure);
        };

        let size = tree.size();
        let aspect_ratio = if size.height() > 0.0 {
            Some(size.width() / size.height())
        } else {
            None
        };

        Ok(SvgProcessOutcome::Success(ProcessedSvg {
            xml: filter_markup(xml)?,
            aspect_ratio,
        }))
    }
}

/// Elements removed wholesale, content included.
const BANNED_ELEMENTS: &[&[u8]] = &[b"script", b"foreignObject"];

/// Strip scripting vectors from markup already validated by usvg: banned
/// subtrees, `on*` event-handler attributes and `javascript:` hrefs.
fn filter_markup(xml: &str) -> Result<String, IngestError> {
    let filter_err = |e: &dyn std::fmt::Display| IngestError::Remote(format!("svg filter failed: {e}"));

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event().map_err(|e| filter_err(&e))? {
            Event::Start(elem) => {
                if skip_depth > 0 || is_banned(&elem) {
                    skip_depth += 1;
                    continue;
                }
                writer
                    .write_event(Event::Start(scrub_attributes(&elem)?))
                    .map_err(|e| filter_err(&e))?;
            }
            Event::Empty(elem) => {
                if skip_depth > 0 || is_banned(&elem) {
                    continue;
                }
                writer
                    .write_event(Event::Empty(scrub_attributes(&elem)?))
                    .map_err(|e| filter_err(&e))?;
            }
            Event::End(elem) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                writer
                    .write_event(Event::End(elem))
                    .map_err(|e| filter_err(&e))?;
            }
            Event::Eof => break,
            other => {
                if skip_depth == 0 {
                    writer.write_event(other).map_err(|e| filter_err(&e))?;
                }
            }
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| IngestError::Remote(format!("svg filter produced invalid utf-8: {e}")))
}

fn is_banned(elem: &BytesStart<'_>) -> bool {
    let local = elem.local_name();
    BANNED_ELEMENTS
        .iter()
        .any(|banned| local.as_ref().eq_ignore_ascii_case(banned))
}

/// Rebuild one element without event handlers or script hrefs.
fn scrub_attributes(elem: &BytesStart<'_>) -> Result<BytesStart<'static>, IngestError> {
    let name = std::str::from_utf8(elem.name().as_ref())
        .map_err(|e| IngestError::Remote(format!("svg filter failed: {e}")))?
        .to_string();
    let mut scrubbed = BytesStart::new(name);

    for attr in elem.attributes().with_checks(false).flatten() {
        let Ok(key) = std::str::from_utf8(attr.key.as_ref()) else {
            continue;
        };
        let local = key.rsplit(':').next().unwrap_or(key);
        if local.len() > 2 && local.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on")) {
            continue;
        }
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        if local.eq_ignore_ascii_case("href")
            && value.trim_start().to_ascii_lowercase().starts_with("javascript:")
        {
            continue;
        }
        scrubbed.push_attribute((key, value.as_ref()));
    }

    Ok(scrubbed)
}

impl Default for UsvgProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

impl SvgProcessor for UsvgProcessor {
    async fn process(&self, xml: &str) -> Result<SvgProcessOutcome, IngestError> {
        let key = *blake3::hash(xml.as_bytes()).as_bytes();

        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(hit);
        }

        let outcome = Self::process_uncached(xml)?;
        self.cache.lock().insert(key, outcome.clone());
        Ok(outcome)
    }
}

// ============================================================================
// Memo cache
// ============================================================================

type CacheKey = [u8; 32];

/// Tiny move-to-front LRU. Bounded: stale entries age out instead of
/// accumulating for the process lifetime.
struct MemoCache {
    cap: usize,
    entries: Vec<(CacheKey, SvgProcessOutcome)>,
}

impl MemoCache {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: Vec::new(),
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<SvgProcessOutcome> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(idx);
        let outcome = entry.1.clone();
        self.entries.insert(0, entry);
        Some(outcome)
    }

    fn insert(&mut self, key: CacheKey, outcome: SvgProcessOutcome) {
        if self.cap == 0 {
            return;
        }
        self.entries.retain(|(k, _)| k != &key);
        self.entries.insert(0, (key, outcome));
        self.entries.truncate(self.cap);
    }
}
