//! Scroll packer CLI.

use chrono::Local;
use scrollpackc::{pack, report};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" => {
            println!("scrollpack {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            let mut verbose = false;
            let mut path: Option<&str> = None;
            for arg in args.iter().skip(1) {
                if arg == "--verbose" || arg == "-v" {
                    verbose = true;
                } else if !arg.starts_with('-') && path.is_none() {
                    path = Some(arg.as_str());
                }
            }

            let Some(path) = path else {
                eprintln!("error: missing scroll description file");
                eprintln!("Usage: scrollpack <scroll.json> [--verbose]");
                std::process::exit(1);
            };

            init_tracing(verbose);

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            match pack(path, &timestamp) {
                Ok(listing) => print!("{listing}"),
                Err(error) => {
                    report(path, &error);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// `--verbose` forces debug-level events; otherwise `RUST_LOG` decides.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("Scroll packer (mosaic-font scroll text to C/Assembler data)");
    println!();
    println!("Usage: scrollpack <scroll.json> [options]");
    println!();
    println!("Commands:");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --verbose, -v        Log the scan and extraction steps to stderr");
    println!();
    println!("The generated listing is written to stdout; redirect it into the");
    println!("source file of your build:");
    println!();
    println!("  scrollpack scroll.json > scroll_data.c");
    println!("  scrollpack scroll.json > scroll_data.s");
}
