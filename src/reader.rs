/*!
 * Reading XML files whose encoding is not known up front
 *
 * Every candidate encoding gets its own full read of the file. The first
 * candidate whose output is well-formed XML wins; nothing partial ever
 * leaves this module.
 */

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::encoding::{candidate_encodings, detect_declared_encoding, sniff_bom, Codec};
use crate::types::DecodedXml;

/// Why a single decode attempt was rejected
#[derive(Error, Debug)]
pub enum AttemptError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No decoder is known for the encoding name
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The bytes are not valid in the encoding
    #[error("content is not valid {0}")]
    Malformed(String),

    /// The decoded text is not well-formed XML
    #[error("decoded text is not well-formed XML: {0}")]
    NotWellFormed(#[from] WellFormedError),
}

/// Decode `path` with the first candidate encoding that yields well-formed XML
///
/// Candidates are the encoding from the XML declaration (if any) followed by
/// the fixed fallback list. A byte-order mark overrides the encoding of every
/// attempt. Returns `None` once all candidates are exhausted.
pub fn read_xml(path: &Path) -> Option<DecodedXml> {
    let declared = detect_declared_encoding(path);
    let candidates = candidate_encodings(declared.as_deref());

    for candidate in &candidates {
        match try_decode(path, candidate) {
            Ok(decoded) => {
                debug!("Decoded {} as {}", path.display(), decoded.encoding);
                return Some(decoded);
            }
            Err(e) => debug!("Attempt {} failed for {}: {}", candidate, path.display(), e),
        }
    }

    warn!("Could not decode file {}", path.display());
    None
}

/// One attempt: fresh read, BOM override, strict decode, validation
fn try_decode(path: &Path, candidate: &str) -> std::result::Result<DecodedXml, AttemptError> {
    let bytes = fs::read(path)?;

    let (name, codec, body) = match sniff_bom(&bytes) {
        Some(bom) => (bom.name, bom.codec, &bytes[bom.len..]),
        None => {
            let codec = Codec::for_name(candidate)
                .ok_or_else(|| AttemptError::UnknownEncoding(candidate.to_string()))?;
            (candidate, codec, &bytes[..])
        }
    };

    let text = codec
        .decode(body)
        .ok_or_else(|| AttemptError::Malformed(name.to_string()))?;

    check_document(&text)?;

    Ok(DecodedXml {
        text,
        encoding: name.to_string(),
    })
}

/// Why a decoded text is not a well-formed document
#[derive(Error, Debug)]
pub enum WellFormedError {
    /// Syntax error reported by the XML reader
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    /// Attribute error reported by the XML reader
    #[error("{0}")]
    Attribute(#[from] AttrError),

    /// A rule of the XML grammar the reader does not enforce
    #[error("{0}")]
    Violation(String),
}

/// Check whether `text` is a well-formed XML document
///
/// Parser errors of any kind yield `false`.
pub fn is_well_formed(text: &str) -> bool {
    match check_document(text) {
        Ok(()) => true,
        Err(e) => {
            debug!("XML validation failed: {}", e);
            false
        }
    }
}

fn require(cond: bool, message: &str) -> std::result::Result<(), WellFormedError> {
    if cond {
        Ok(())
    } else {
        Err(WellFormedError::Violation(message.to_string()))
    }
}

/// Walk the whole document, rejecting anything a conforming parser would
///
/// quick-xml is lenient about names, attribute layout, declarations and
/// document structure, so those rules are checked here.
pub fn check_document(text: &str) -> std::result::Result<(), WellFormedError> {
    if let Some(c) = text.chars().find(|&c| !is_xml_char(c)) {
        return Err(WellFormedError::Violation(format!(
            "character U+{:04X} is not allowed in XML",
            c as u32
        )));
    }

    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.check_end_names = true;
    config.check_comments = true;

    let mut depth = 0usize;
    let mut roots = 0usize;
    let mut doctypes = 0usize;
    let mut first = true;

    loop {
        let event = reader.read_event()?;
        let at_start = std::mem::replace(&mut first, false);

        match event {
            Event::Decl(_) => {
                require(
                    at_start && text.starts_with("<?xml"),
                    "XML declaration not at the start of the document",
                )?;
            }
            Event::DocType(_) => {
                doctypes += 1;
                require(
                    roots == 0 && doctypes == 1,
                    "DOCTYPE must precede the document element",
                )?;
            }
            Event::Start(e) => {
                open_root(&mut roots, depth)?;
                check_start(&e)?;
                depth += 1;
            }
            Event::Empty(e) => {
                open_root(&mut roots, depth)?;
                check_start(&e)?;
            }
            Event::End(e) => {
                require(depth > 0, "end tag without a start tag")?;
                let name = e.name();
                let name = name.as_ref();
                let len = name.len() - name.iter().rev().take_while(|b| b.is_ascii_whitespace()).count();
                check_name(&name[..len])?;
                depth -= 1;
            }
            Event::Text(e) => {
                require(
                    !e.windows(3).any(|w| w == b"]]>"),
                    "']]>' is not allowed in character data",
                )?;
                let content = e.unescape()?;
                require(
                    depth > 0 || content.trim().is_empty(),
                    "text outside the document element",
                )?;
            }
            Event::CData(_) => {
                require(depth > 0, "CDATA outside the document element")?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    require(roots == 1, "no document element")?;
    require(depth == 0, "unclosed element at end of document")?;
    Ok(())
}

fn open_root(roots: &mut usize, depth: usize) -> std::result::Result<(), WellFormedError> {
    if depth == 0 {
        *roots += 1;
        require(*roots == 1, "content after the document element")?;
    }
    Ok(())
}

/// Element name, attribute layout, and attribute values of a start or empty tag
fn check_start(e: &BytesStart) -> std::result::Result<(), WellFormedError> {
    check_name(e.name().as_ref())?;
    check_attribute_layout(e.attributes_raw())?;

    for attr in e.attributes() {
        let attr = attr?;
        check_name(attr.key.as_ref())?;
        require(
            !attr.value.contains(&b'<'),
            "'<' is not allowed in attribute values",
        )?;
        attr.unescape_value()?;
    }
    Ok(())
}

/// Every attribute must be preceded by whitespace and be `name = "value"`
fn check_attribute_layout(raw: &[u8]) -> std::result::Result<(), WellFormedError> {
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < raw.len() && raw[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == raw.len() {
            return Ok(());
        }
        require(pos > ws_start, "attributes must be separated by whitespace")?;

        while pos < raw.len() && raw[pos] != b'=' && !raw[pos].is_ascii_whitespace() {
            pos += 1;
        }
        while pos < raw.len() && raw[pos].is_ascii_whitespace() {
            pos += 1;
        }
        require(pos < raw.len() && raw[pos] == b'=', "attribute without a value")?;
        pos += 1;
        while pos < raw.len() && raw[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let quote = raw.get(pos).copied();
        require(
            matches!(quote, Some(b'"') | Some(b'\'')),
            "attribute value must be quoted",
        )?;
        pos += 1;
        while pos < raw.len() && Some(raw[pos]) != quote {
            pos += 1;
        }
        require(pos < raw.len(), "unterminated attribute value")?;
        pos += 1;
    }
}

/// The `Name` production, with at most one colon separating non-empty parts
fn check_name(name: &[u8]) -> std::result::Result<(), WellFormedError> {
    let name = std::str::from_utf8(name)
        .map_err(|_| WellFormedError::Violation("name is not valid UTF-8".to_string()))?;

    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) => is_name_start_char(c) && chars.all(is_name_char),
        None => false,
    };
    let qualified = match name.split_once(':') {
        Some((prefix, local)) => !prefix.is_empty() && !local.is_empty() && !local.contains(':'),
        None => true,
    };

    if valid && qualified {
        Ok(())
    } else {
        Err(WellFormedError::Violation(format!("invalid name '{}'", name)))
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// The `Char` production of XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}
