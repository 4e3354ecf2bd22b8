/*!
 * Core types and data structures for classname-scan
 */

use std::path::PathBuf;

/// Text decoded from an XML file, already checked to be well-formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedXml {
    /// Decoded document text
    pub text: String,
    /// Name of the encoding that produced `text`
    pub encoding: String,
}

/// Markers found in the `ClassName` elements of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMatches {
    /// Matched markers with their representative `ClassName` value, in marker order
    pub found: Vec<(String, String)>,
    /// Markers that no `ClassName` value contains
    pub missing: Vec<String>,
}

impl TagMatches {
    /// Representative value recorded for `marker`, if it matched
    pub fn representative(&self, marker: &str) -> Option<&str> {
        self.found
            .iter()
            .find(|(m, _)| m == marker)
            .map(|(_, value)| value.as_str())
    }
}

/// What happened to a single target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Decoded and scanned
    Scanned {
        /// Encoding used to decode the file
        encoding: String,
        /// Marker results
        matches: TagMatches,
    },
    /// No candidate encoding produced well-formed XML
    Unreadable,
    /// Decoded, but walking the `ClassName` elements failed
    ParseFailed {
        /// Encoding used to decode the file
        encoding: String,
        /// Underlying error message
        message: String,
    },
}

/// Per-file entry of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path of the target file
    pub path: PathBuf,
    /// Processing result
    pub outcome: FileOutcome,
}

/// Counters accumulated over one traversal run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Number of target files found
    pub files_processed: usize,
    /// Distinct markers found per file, summed over files
    pub tags_found: usize,
    /// Files that could not be decoded into well-formed XML
    pub files_with_errors: usize,
    /// Per-file outcomes in traversal order
    pub files: Vec<FileReport>,
}
