//! Headless Hex Dump Tool
//!
//! Renders a binary file as hex-dump text on stdout, using the same library
//! path an embedding editor would. Useful for testing and for quick
//! inspection from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Dump a file with the default format
//! hexview-dump firmware.bin
//!
//! # Four-byte little-endian groups, upper case, no ASCII column
//! hexview-dump --nibbles 8 --little-endian --uppercase --no-ascii firmware.bin
//!
//! # Decimal groups, 8 bytes per line
//! hexview-dump --radix 10 --width 8 firmware.bin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hexview::app::Settings;
use hexview::session::Session;

/// Command-line arguments
struct Args {
    /// File to dump
    file: Option<PathBuf>,
    /// Settings overridden by flags
    settings: Settings,
    /// Show help
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            file: None,
            settings: Settings::load_or_default(),
            help: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            }
            "-n" | "--nibbles" => {
                i += 1;
                if i < argv.len() {
                    args.settings.nibbles = argv[i].parse().unwrap_or(args.settings.nibbles);
                }
            }
            "-r" | "--radix" => {
                i += 1;
                if i < argv.len() {
                    args.settings.radix = argv[i].parse().unwrap_or(args.settings.radix);
                }
            }
            "-w" | "--width" => {
                i += 1;
                if i < argv.len() {
                    args.settings.width = argv[i].parse().unwrap_or(args.settings.width);
                }
            }
            "-l" | "--limit" => {
                i += 1;
                if i < argv.len() {
                    args.settings.size_display =
                        argv[i].parse().unwrap_or(args.settings.size_display);
                }
            }
            "-e" | "--little-endian" => {
                args.settings.little_endian = true;
            }
            "-u" | "--uppercase" => {
                args.settings.uppercase = true;
            }
            "--no-ascii" => {
                args.settings.show_ascii = false;
            }
            "--no-address" => {
                args.settings.show_address = false;
            }
            "--no-header" => {
                args.settings.show_offset = false;
            }
            other => {
                args.file = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    args
}

fn print_help() {
    println!("hexview-dump - render a binary file as hex-dump text");
    println!();
    println!("Usage: hexview-dump [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -n, --nibbles N       Hex digits per group: 2, 4, 8 or 16 (default 2)");
    println!("  -r, --radix N         Group numeral radix: 2, 8, 10 or 16 (default 16)");
    println!("  -w, --width N         Bytes per line (default 16)");
    println!("  -l, --limit N         Cap rendered content at N bytes");
    println!("  -e, --little-endian   Reverse byte order within groups");
    println!("  -u, --uppercase       Upper-case digits");
    println!("      --no-ascii        Hide the ASCII column");
    println!("      --no-address      Hide the address gutter");
    println!("      --no-header       Hide the column-index header");
    println!("  -h, --help            Show this help");
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    let Some(file) = args.file else {
        eprintln!("error: no input file");
        print_help();
        return ExitCode::FAILURE;
    };

    let mut session = Session::new(&args.settings);
    match session.render(&file) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "dump failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
