/*!
 * Reporting functionality for classname-scan
 *
 * The summary is either a handful of log lines or, for interactive use,
 * a pair of tables rendered with the tabled library.
 */

use clap::ValueEnum;
use log::info;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{FileOutcome, ScanStatistics};

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Summary counters as log lines
    Log,
    /// Per-file results and counters as console tables
    Table,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::Log
    }
}

/// Report generator for scan results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Summary lines for the log format
    pub fn summary_lines(&self, stats: &ScanStatistics) -> Vec<String> {
        vec![
            "=== STATISTICS ===".to_string(),
            format!("Total files processed: {}", stats.files_processed),
            format!("Total tags found: {}", stats.tags_found),
            format!("Files with errors: {}", stats.files_with_errors),
        ]
    }

    /// Generate the table report
    pub fn generate_table_report(&self, stats: &ScanStatistics) -> String {
        let files_table = self.create_files_table(stats);
        let summary_table = self.create_summary_table(stats);

        format!(
            "📋  PROCESSED FILES\n{}\n\n✅  SCAN COMPLETE\n{}",
            files_table, summary_table
        )
    }

    /// Emit the report
    pub fn print_report(&self, stats: &ScanStatistics) {
        match self.format {
            ReportFormat::Log => {
                info!("");
                for line in self.summary_lines(stats) {
                    info!("{}", line);
                }
            }
            ReportFormat::Table => println!("\n{}", self.generate_table_report(stats)),
        }
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, stats: &ScanStatistics) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: usize,
        }

        let rows = vec![
            SummaryRow {
                key: "📄 Files Processed",
                value: stats.files_processed,
            },
            SummaryRow {
                key: "🏷️ Tags Found",
                value: stats.tags_found,
            },
            SummaryRow {
                key: "❌ Files With Errors",
                value: stats.files_with_errors,
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // One row per target file, in traversal order
    fn create_files_table(&self, stats: &ScanStatistics) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Encoding")]
            encoding: String,

            #[tabled(rename = "Markers")]
            markers: String,
        }

        let rows: Vec<FileRow> = stats
            .files
            .iter()
            .map(|report| {
                let (encoding, markers) = match &report.outcome {
                    FileOutcome::Scanned { encoding, matches } => {
                        let found: Vec<String> = matches
                            .found
                            .iter()
                            .map(|(marker, value)| format!("{}: {}", marker, value))
                            .collect();
                        let markers = if found.is_empty() {
                            "-".to_string()
                        } else {
                            found.join("\n")
                        };
                        (encoding.clone(), markers)
                    }
                    FileOutcome::ParseFailed { encoding, message } => {
                        (encoding.clone(), format!("parse error: {}", message))
                    }
                    FileOutcome::Unreadable => ("-".to_string(), "could not decode".to_string()),
                };

                FileRow {
                    path: crate::utils::truncate_path(&report.path.display().to_string(), 60),
                    encoding,
                    markers,
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }
}
