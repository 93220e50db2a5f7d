mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use amcalc_core::AmCalcError;
use commands::amortization::LoanArgs;

/// Fixed-payment loan amortization
#[derive(Parser)]
#[command(
    name = "amcalc",
    version,
    about = "Fixed-payment loan amortization schedules",
    long_about = "Computes the level periodic payment and the full payment-by-payment \
                  schedule for a fixed-rate loan. Inputs come from flags, a JSON file \
                  (--input) or JSON piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine activity to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full amortization: payment, totals, summary and schedule
    Amortize(LoanArgs),
    /// Payment-by-payment schedule only (use --output csv to export)
    Schedule(LoanArgs),
    /// Periodic payment only
    Payment(LoanArgs),
    /// Check loan parameters and list every problem found
    Validate(LoanArgs),
    /// List supported payment frequencies
    Frequencies,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Validate(args) => commands::amortization::run_validate(args),
        Commands::Frequencies => commands::amortization::run_frequencies(),
        Commands::Version => {
            println!("amcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<AmCalcError>() {
                Some(AmCalcError::ValidationFailed(errors)) => {
                    eprintln!("{}: invalid loan parameters", "error".red().bold());
                    for err in errors {
                        eprintln!("  - {}: {}", err.field.yellow(), err.message);
                    }
                }
                _ => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
