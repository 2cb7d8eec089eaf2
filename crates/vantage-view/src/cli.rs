use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vantage-view")]
#[command(about = "Vantage camera manipulation tools")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a pointer script and print the resulting view state.
    Replay(ReplayArgs),
    /// Frame a bounding sphere and print the resulting view state.
    Fit(FitArgs),
    /// Print the matrices and angles derived from a view state.
    Matrices(MatricesArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    #[arg(long)]
    pub script: PathBuf,
    /// JSON file with manipulation settings.
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Scene bound as cx,cy,cz,radius.
    #[arg(long)]
    pub bound: Option<String>,
    /// Starting view state tokens.
    #[arg(long)]
    pub view: Option<String>,
}

#[derive(Args)]
pub struct FitArgs {
    #[arg(long)]
    pub bound: String,
    #[arg(long)]
    pub view: Option<String>,
}

#[derive(Args)]
pub struct MatricesArgs {
    #[arg(long)]
    pub bound: Option<String>,
    #[arg(long)]
    pub view: Option<String>,
    #[arg(long)]
    pub json: bool,
}
