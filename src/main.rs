use clap::Parser;
use market_digest::utils::logger;
use market_digest::{CliConfig, EnvSecrets, ReportConfig, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting market-digest");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match ReportConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match market_digest::run(config, cli.run_options(), &EnvSecrets, chrono::Utc::now()).await {
        Ok(RunOutcome::Skipped { date }) => {
            println!("Today ({}) is weekend. Skipping.", date);
        }
        Ok(RunOutcome::Completed(summary)) => {
            if !summary.missing.is_empty() {
                tracing::warn!("Report sent without: {}", summary.missing.join(", "));
            }
            tracing::info!(
                "✅ Report with {} quotes delivered to {}",
                summary.quote_count,
                summary.destination
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
