use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use refi_core::refinance::{self, RefinanceSettings};

use crate::input;
use crate::report;

/// Arguments for the original-versus-refinance comparison
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to settings file (.yaml, .yml or .json)
    #[arg(long)]
    pub input: Option<String>,

    /// Also write a timestamped text report into this directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let settings: RefinanceSettings = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <settings.yaml> or stdin required for refinance analysis".into());
    };

    let result = refinance::analyze_refinance(&settings)?;

    if let Some(ref dir) = args.report_dir {
        let path = report::write_report(dir, &result.result)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(serde_json::to_value(result)?)
}
