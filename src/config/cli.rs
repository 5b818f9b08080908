use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "market-digest")]
#[command(about = "Posts a daily market report with AI commentary to a chat webhook")]
pub struct CliConfig {
    /// Path to TOML configuration file (defaults to ./market-digest.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print the message instead of posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Run even on weekends
    #[arg(long)]
    pub force: bool,
}

impl CliConfig {
    pub fn run_options(&self) -> crate::app::RunOptions {
        crate::app::RunOptions {
            dry_run: self.dry_run,
            force: self.force,
        }
    }
}
