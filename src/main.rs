/*!
 * Command-line interface for classname-scan
 */

use std::io::{self, Write};

use chrono::Local;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use log::{error, info, LevelFilter};

use classname_scan::config::{Args, Config};
use classname_scan::report::Reporter;
use classname_scan::scanner::Scanner;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    init_logger(&args);

    let config = Config::from_args(args);

    info!("Starting scan...");

    let scanner = Scanner::new(config.clone());
    let stats = match scanner.scan() {
        Ok(stats) => stats,
        Err(e) => {
            error!("Fatal error during processing: {}", e);
            return Err(e.into());
        }
    };

    Reporter::new(config.format).print_report(&stats);
    info!("Processing completed successfully!");

    Ok(())
}

/// Console logger: `<timestamp> - <LEVEL> - <message>`, `RUST_LOG` wins over flags
fn init_logger(args: &Args) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .init();
}
