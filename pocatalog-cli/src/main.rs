mod stats;
mod view;

use clap::{Parser, Subcommand};
use pocatalog::{Catalog, ParseOptions, parser};

use crate::stats::print_stats;
use crate::view::print_view;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a PO file and report diagnostics.
    Check {
        /// The PO file to check
        input: String,

        /// Parse entry blocks across parallel workers
        #[arg(long)]
        parallel: bool,

        /// Collect all diagnostics instead of stopping at the first error
        #[arg(long)]
        keep_going: bool,

        /// Drop obsolete (#~) entries instead of storing them
        #[arg(long)]
        ignore_obsolete: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// View the entries of a PO file.
    View {
        /// The PO file to view
        input: String,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,
    },

    /// Show summary statistics for a PO file.
    Stats {
        /// The PO file to analyze
        input: String,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_or_exit(input: &str, options: &ParseOptions) -> Catalog {
    match parser::load(input, options) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    match args.commands {
        Commands::Check {
            input,
            parallel,
            keep_going,
            ignore_obsolete,
            debug,
        } => {
            init_tracing(debug);
            let options = ParseOptions::new()
                .with_debug(debug)
                .with_parallel(parallel)
                .with_abort_on_invalid(!keep_going)
                .with_ignore_obsolete(ignore_obsolete)
                .with_print_diagnostics(false);
            match parser::load_into(&input, &options, Catalog::new()) {
                Ok((catalog, diagnostics)) => {
                    for diagnostic in &diagnostics {
                        eprintln!("{diagnostic}");
                    }
                    println!(
                        "{}: {} messages, {} obsolete, {} errors",
                        input,
                        catalog.messages.len(),
                        catalog.obsolete.len(),
                        diagnostics.len()
                    );
                    if !diagnostics.is_empty() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::View { input, full } => {
            let catalog = load_or_exit(&input, &ParseOptions::default());
            print_view(&catalog, full);
        }
        Commands::Stats { input, json } => {
            let catalog = load_or_exit(&input, &ParseOptions::default());
            print_stats(&catalog, json);
        }
    }
}
