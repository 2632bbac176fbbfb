use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let args = datesort::cli::parse();
    datesort::app::run(args)
}
