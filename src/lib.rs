/*!
 * classname-scan - find marker substrings in `<ClassName>` elements
 *
 * This library walks a directory tree for XML files of a given name, decodes
 * each one with the first encoding that yields well-formed XML, and reports
 * which markers occur inside `ClassName` element text.
 */

pub mod config;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod report;
pub mod scanner;
pub mod tags;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::Config;
pub use error::{Result, ScanError};
pub use reader::{is_well_formed, read_xml};
pub use report::{ReportFormat, Reporter};
pub use scanner::Scanner;
pub use tags::scan_class_names;
pub use types::{DecodedXml, FileOutcome, FileReport, ScanStatistics, TagMatches};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
