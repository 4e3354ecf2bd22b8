/*!
 * Configuration handling for classname-scan
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::report::ReportFormat;

/// File name searched for when none is given
pub const DEFAULT_TARGET_FILE: &str = "config.xml";

/// Marker searched for when none is given
pub const DEFAULT_MARKER: &str = "WSCompImpl";

/// Command-line arguments for classname-scan
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "classname-scan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Report marker substrings found in <ClassName> elements of config.xml files",
    long_about = "Recursively finds XML files by name, decodes each one with whatever encoding yields well-formed XML, and reports which markers occur inside <ClassName> element text."
)]
pub struct Args {
    /// Root directory to scan
    #[clap(env = "CLASSNAME_SCAN_ROOT", default_value = ".")]
    pub root: String,

    /// Name of the files to inspect (matched case-insensitively)
    #[clap(long = "file", env = "CLASSNAME_SCAN_FILE", default_value = DEFAULT_TARGET_FILE)]
    pub target_file: String,

    /// Comma-separated list of markers to look for in <ClassName> text
    #[clap(
        long = "marker",
        env = "CLASSNAME_SCAN_MARKERS",
        value_delimiter = ',',
        default_value = DEFAULT_MARKER
    )]
    pub markers: Vec<String>,

    /// Comma-separated list of file or directory name patterns to skip
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Summary format
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub format: ReportFormat,

    /// Log every decode attempt
    #[clap(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to scan
    pub root_dir: PathBuf,

    /// File name to look for
    pub target_file: String,

    /// Markers to search for, in reporting order
    pub markers: Vec<String>,

    /// Name patterns to skip during traversal
    pub ignore_patterns: Vec<String>,

    /// Summary format
    pub format: ReportFormat,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            root_dir: PathBuf::from(args.root),
            target_file: args.target_file,
            markers: args
                .markers
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            ignore_patterns: args.ignore_patterns,
            format: args.format,
        }
    }

    /// Configuration with the default file name and marker
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            target_file: DEFAULT_TARGET_FILE.to_string(),
            markers: vec![DEFAULT_MARKER.to_string()],
            ignore_patterns: Vec::new(),
            format: ReportFormat::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.root_dir.exists(),
            PathNotFound,
            "Invalid root path: {}",
            self.root_dir.display()
        );
        crate::ensure!(
            self.root_dir.is_dir(),
            Config,
            "Invalid root path (not a directory): {}",
            self.root_dir.display()
        );
        crate::ensure!(
            !self.target_file.trim().is_empty(),
            InvalidArgument,
            "Target file name must not be empty"
        );
        crate::ensure!(
            !self.markers.is_empty(),
            InvalidArgument,
            "At least one marker is required"
        );

        Ok(())
    }
}
