//! `data:` URI parsing and serialization.
//!
//! Every pipeline stage speaks data URIs: ingestion normalizes files and
//! clipboard payloads into one, sanitization and classification rewrite the
//! payload, and the store decodes it back to a binary blob. Serialization
//! always uses base64; parsing also accepts percent-encoded text payloads.

use std::fmt;
use std::str::Utf8Error;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use thiserror::Error;

pub mod mime;

/// Errors produced while parsing or reading a `data:` URI.
#[derive(Debug, Error)]
pub enum DataUriError {
    #[error("not a data URI (missing `data:` scheme)")]
    MissingScheme,

    #[error("malformed data URI (missing `,` separator)")]
    MissingSeparator,

    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8 text")]
    NotText(#[from] Utf8Error),
}

/// A decoded `data:` URI: a media type plus raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    media_type: String,
    data: Vec<u8>,
}

impl DataUri {
    /// Wrap raw bytes with the given media type.
    pub fn from_bytes(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Parse a `data:<mime>[;base64],<payload>` string.
    ///
    /// Media type parameters (e.g. `;charset=utf-8`) are kept as part of the
    /// media type; only the trailing `;base64` marker is consumed.
    pub fn parse(input: &str) -> Result<Self, DataUriError> {
        let rest = input.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (head, payload) = rest.split_once(',').ok_or(DataUriError::MissingSeparator)?;

        let (media_type, is_base64) = match head.strip_suffix(";base64") {
            Some(mt) => (mt, true),
            None => (head, false),
        };

        let data = if is_base64 {
            STANDARD.decode(payload.trim())?
        } else {
            percent_decode_str(payload).collect()
        };

        Ok(Self {
            media_type: if media_type.is_empty() {
                mime::PLAIN.to_string()
            } else {
                media_type.to_string()
            },
            data,
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decoded payload length in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Payload as UTF-8 text (SVG XML, mostly).
    pub fn text(&self) -> Result<&str, DataUriError> {
        Ok(std::str::from_utf8(&self.data)?)
    }

    pub fn is_svg(&self) -> bool {
        mime::is_svg(&self.media_type)
    }

    pub fn is_gif(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(mime::GIF)
    }

    pub fn is_image(&self) -> bool {
        mime::is_image(&self.media_type)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.data)
        )
    }
}
