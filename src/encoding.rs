/*!
 * Encoding detection for XML files of unknown origin
 *
 * Three pieces feed the reader's fallback loop: the encoding named in the
 * XML declaration, the byte-order mark at the start of the file, and the
 * mapping from encoding names to strict decoders.
 */

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Encodings tried, in order, after any declared encoding
pub const FALLBACK_ENCODINGS: [&str; 8] = [
    "utf-8",
    "utf-8-sig",
    "latin1",
    "iso-8859-1",
    "cp1252",
    "utf-16",
    "utf-16-le",
    "utf-16-be",
];

static ENCODING_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)encoding\s*=\s*["']([^"']*)["']"#)
        .expect("encoding declaration pattern is valid")
});

/// Read the encoding named in the XML declaration on the first line of `path`
///
/// Only the first line is read. Bytes outside the ASCII range are dropped
/// before matching, so this never fails on undecodable input. Returns the
/// declared name lower-cased, or `None` when there is no declaration or the
/// file cannot be read.
pub fn detect_declared_encoding(path: &Path) -> Option<String> {
    match read_first_line(path) {
        Ok(line) => declared_encoding(&line),
        Err(e) => {
            warn!("Failed to detect encoding of {}: {}", path.display(), e);
            None
        }
    }
}

fn read_first_line(path: &Path) -> io::Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(line)
}

/// Extract the declared encoding from the raw bytes of a declaration line
pub fn declared_encoding(line: &[u8]) -> Option<String> {
    let ascii: String = line
        .iter()
        .copied()
        .filter(u8::is_ascii)
        .map(char::from)
        .collect();

    ENCODING_DECLARATION
        .captures(&ascii)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Candidate list for one file: the declared encoding first, then the fallbacks
pub fn candidate_encodings(declared: Option<&str>) -> Vec<String> {
    declared
        .into_iter()
        .chain(FALLBACK_ENCODINGS.iter().copied())
        .map(str::to_string)
        .collect()
}

/// A byte-order mark found at the start of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bom {
    /// Encoding name reported for the attempt
    pub name: &'static str,
    /// Decoder for the bytes after the mark
    pub codec: Codec,
    /// Length of the mark in bytes
    pub len: usize,
}

/// Look for a UTF-8 or UTF-16 byte-order mark at the start of `bytes`
pub fn sniff_bom(bytes: &[u8]) -> Option<Bom> {
    let (encoding, len) = Encoding::for_bom(bytes)?;
    let name = if encoding == UTF_8 {
        "utf-8-sig"
    } else if encoding == UTF_16LE {
        "utf-16-le"
    } else {
        "utf-16-be"
    };

    Some(Bom {
        name,
        codec: Codec::Labelled(encoding),
        len,
    })
}

/// Strict decoder behind an encoding name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// UTF-8 with an optional leading byte-order mark removed
    Utf8Sig,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    /// 7-bit ASCII, any byte above 0x7F is an error
    Ascii,
    /// UTF-16 whose byte order comes from a byte-order mark, little-endian without one
    Utf16,
    /// Any encoding from the WHATWG registry, decoded without BOM sniffing
    Labelled(&'static Encoding),
}

impl Codec {
    /// Resolve an encoding name, accepting the common aliases of each encoding
    ///
    /// Returns `None` for names no decoder is known for.
    pub fn for_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");

        let codec = match normalized.as_str() {
            "utf-8-sig" | "utf8-sig" => Self::Utf8Sig,
            "utf-8" | "utf8" | "u8" => Self::Labelled(UTF_8),
            "latin1" | "latin-1" | "latin" | "l1" | "iso-8859-1" | "iso8859-1" | "8859"
            | "cp819" => Self::Latin1,
            "ascii" | "us-ascii" | "646" => Self::Ascii,
            "utf-16" | "utf16" | "u16" => Self::Utf16,
            "utf-16-le" | "utf-16le" => Self::Labelled(UTF_16LE),
            "utf-16-be" | "utf-16be" => Self::Labelled(UTF_16BE),
            other => Self::Labelled(Encoding::for_label(other.as_bytes())?),
        };

        Some(codec)
    }

    /// Decode all of `bytes`, or `None` if any sequence is malformed
    ///
    /// Never substitutes replacement characters.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                decode_strict(UTF_8, body)
            }
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
            Self::Ascii => {
                if encoding_rs::mem::is_ascii(bytes) {
                    Some(encoding_rs::mem::decode_latin1(bytes).into_owned())
                } else {
                    None
                }
            }
            Self::Utf16 => match Encoding::for_bom(bytes) {
                Some((encoding, len)) if encoding != UTF_8 => decode_strict(encoding, &bytes[len..]),
                _ => decode_strict(UTF_16LE, bytes),
            },
            Self::Labelled(encoding) => decode_strict(*encoding, bytes),
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}
