use super::CalibrationOperation;
use clap::Parser;

/// command line tool for calibrating mode constants of an external simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CalibrationApp {
    #[command(subcommand)]
    pub op: CalibrationOperation,
}
