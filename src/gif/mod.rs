//! Animated-GIF detection over raw payload bytes.
//!
//! Walks the fixed-layout front of a GIF stream: 6-byte header, 7-byte
//! Logical Screen Descriptor, optional Global Color Table, then the first
//! extension block. A Graphics Control Extension with a non-zero delay time
//! means the image animates.
//!
//! Truncated input is a hard error, never a silent `false`; callers only
//! reach this code for payloads already declared as GIF.

use thiserror::Error;

/// GIF signature + version ("GIF87a" / "GIF89a").
const HEADER_LEN: usize = 6;
/// Logical Screen Descriptor: width, height, packed flags, bg index, ratio.
const LOGICAL_SCREEN_DESC_LEN: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GifError {
    #[error("GIF data truncated (wanted {wanted} bytes at offset {offset})")]
    Truncated { offset: usize, wanted: usize },
}

/// Bounds-checked reader over fixed-width fields.
struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn u8(&mut self) -> Result<u8, GifError> {
        let byte = *self.bytes.get(self.pos).ok_or(GifError::Truncated {
            offset: self.pos,
            wanted: 1,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn u16_le(&mut self) -> Result<u16, GifError> {
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }
}

/// Check whether a GIF payload contains an animation.
///
/// Reads the packed flags byte of the Logical Screen Descriptor, skips the
/// Global Color Table when present (`3 * 2^(n+1)` bytes), then inspects the
/// first extension block and returns true iff its delay-time field is
/// non-zero.
///
/// NOTE: the extension introducer/label test uses bitwise masks
/// (`& 0x21` / `& 0xf9`), not equality, so some non-extension bytes also
/// match. Downstream behavior depends on this exact comparison; see
/// DESIGN.md before tightening it.
pub fn is_animated_gif(bytes: &[u8]) -> Result<bool, GifError> {
    let mut cursor = ByteCursor::new(bytes);

    // Packed flags byte sits 3 bytes before the end of the LSD
    cursor.seek(HEADER_LEN + LOGICAL_SCREEN_DESC_LEN - 3);
    let packed = cursor.u8()?;

    cursor.seek(HEADER_LEN + LOGICAL_SCREEN_DESC_LEN);
    if packed & 0x80 != 0 {
        let table_len = 3 * (1usize << ((packed & 0b111) + 1));
        cursor.skip(table_len);
    }

    let introducer = cursor.u8()?;
    let label = cursor.u8()?;
    if introducer & 0x21 != 0 && label & 0xf9 != 0 {
        // Skip block size + packed byte to reach the delay field
        cursor.skip(2);
        let delay = cursor.u16_le()?;
        return Ok(delay > 0);
    }

    Ok(false)
}
