use crate::adapters::{ConsolePublisher, DiscordWebhook, OpenAiCommentary, YahooChartProvider};
use crate::config::{Credentials, ReportConfig, SecretSource};
use crate::core::engine::ReportEngine;
use crate::core::pipeline::MarketReportPipeline;
use crate::domain::model::{RunOutcome, RunSummary};
use crate::domain::ports::Publisher;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print instead of posting; the webhook secret becomes optional.
    pub dry_run: bool,
    /// Ignore the business-day gate.
    pub force: bool,
}

/// One scheduled run: gate, secrets, fetch, commentary, publish.
///
/// The calendar gate runs before secrets are read, so a weekend run succeeds
/// even where no credentials are configured.
pub async fn run(
    config: ReportConfig,
    options: RunOptions,
    secrets: &impl SecretSource,
    now: DateTime<Utc>,
) -> Result<RunOutcome> {
    config.validate()?;
    let calendar = config.calendar()?;

    if config.schedule.business_days_only && !options.force && !calendar.is_business_day(now) {
        let date = calendar.today(now);
        tracing::info!(
            "Today ({}) is a weekend in {}. Skipping.",
            date,
            calendar.timezone()
        );
        return Ok(RunOutcome::Skipped { date });
    }

    let credentials = Credentials::resolve(secrets, !options.dry_run)?;
    let quotes = YahooChartProvider::new(config.source.clone())?;
    let commentary =
        OpenAiCommentary::new(config.commentary.clone(), credentials.api_key.clone(), calendar)?;

    let summary = match credentials.webhook_url {
        Some(url) if !options.dry_run => {
            let publisher = DiscordWebhook::new(url, &config.publish)?;
            execute(quotes, commentary, publisher, config, now).await?
        }
        _ => {
            tracing::info!("🔍 DRY RUN MODE - message will be printed, not posted");
            execute(quotes, commentary, ConsolePublisher, config, now).await?
        }
    };

    Ok(RunOutcome::Completed(summary))
}

async fn execute<P: Publisher>(
    quotes: YahooChartProvider,
    commentary: OpenAiCommentary,
    publisher: P,
    config: ReportConfig,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let pipeline = MarketReportPipeline::new(quotes, commentary, publisher, config)?;
    ReportEngine::new(pipeline).run_at(now).await
}
