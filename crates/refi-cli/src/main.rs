mod commands;
mod input;
mod output;
mod report;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{PaymentArgs, ScheduleArgs};
use commands::refinance::RefinanceArgs;

/// Loan amortization and refinance comparison
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Loan amortization and refinance comparison",
    long_about = "Computes fixed-rate loan amortization schedules with extra principal \
                  payments, and compares an original loan against a refinance of its \
                  balance, including an apples-to-apples payment adjustment and the \
                  month the refinancing fee breaks even."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed monthly payment for a loan
    Payment(PaymentArgs),
    /// Month-by-month amortization schedule with optional extra payments
    Schedule(ScheduleArgs),
    /// Compare an original loan against refinancing its balance
    Refinance(RefinanceArgs),
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

fn init_tracing(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        format!("refi_core={level},refi={level}").into()
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Refinance(args) => commands::refinance::run_refinance(args),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
