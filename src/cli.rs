use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "speedtracker", version)]
#[command(about = "Analyze your network speed and performance over time.")]
pub struct Args {
    /// Quiet mode: only changes the session banner; per-cycle reports are still shown
    #[arg(short, long)]
    pub quiet: bool,

    /// Interval (seconds) between measurements [default: 15]
    #[arg(
        short,
        long,
        visible_alias = "int",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: Option<u64>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
