use crate::config::toml_config::ReportConfig;
use crate::core::fetcher;
use crate::domain::model::{Delivery, MarketSnapshot, Report};
use crate::domain::ports::{CommentaryGenerator, Pipeline, Publisher, QuoteProvider};
use crate::domain::services::calendar::BusinessCalendar;
use crate::domain::services::message::{commentary_summary, render_message};
use crate::utils::error::{DigestError, Result};
use chrono::{DateTime, Utc};

/// Fetch → commentary/assembly → publish, wired to concrete collaborators.
pub struct MarketReportPipeline<Q: QuoteProvider, G: CommentaryGenerator, P: Publisher> {
    pub(crate) quotes: Q,
    pub(crate) commentary: G,
    pub(crate) publisher: P,
    pub(crate) config: ReportConfig,
    pub(crate) calendar: BusinessCalendar,
}

impl<Q: QuoteProvider, G: CommentaryGenerator, P: Publisher> MarketReportPipeline<Q, G, P> {
    pub fn new(quotes: Q, commentary: G, publisher: P, config: ReportConfig) -> Result<Self> {
        let calendar = config.calendar()?;
        Ok(Self {
            quotes,
            commentary,
            publisher,
            config,
            calendar,
        })
    }
}

#[async_trait::async_trait]
impl<Q: QuoteProvider, G: CommentaryGenerator, P: Publisher> Pipeline
    for MarketReportPipeline<Q, G, P>
{
    async fn extract(&self) -> Result<MarketSnapshot> {
        tracing::info!(
            "📡 Fetching {} symbols from {}",
            self.config.symbol_count(),
            self.config.source.endpoint
        );
        let snapshot =
            fetcher::fetch_snapshot(&self.quotes, &self.config.categories, &self.config.source)
                .await;

        if snapshot.quote_count() == 0 {
            return Err(DigestError::NoMarketData {
                failed: snapshot.missing,
            });
        }

        Ok(snapshot)
    }

    async fn transform(&self, snapshot: MarketSnapshot, now: DateTime<Utc>) -> Result<Report> {
        let summary = commentary_summary(&snapshot.sections);

        tracing::info!("🤖 Generating commentary");
        let (commentary, commentary_fallback) = match self.commentary.generate(&summary, now).await
        {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::error!("Error generating commentary: {}", e);
                (self.config.commentary.fallback.clone(), true)
            }
        };

        Ok(Report {
            date_label: self.calendar.report_date_label(now),
            sections: snapshot.sections,
            commentary,
            commentary_fallback,
            missing: snapshot.missing,
        })
    }

    async fn load(&self, report: &Report) -> Result<Delivery> {
        let message = render_message(report, &self.config.message, &self.config.format);
        tracing::info!("Message to send:\n{}", message);

        let destination = self.publisher.publish(&message).await?;
        tracing::info!("📨 Delivered report to {}", destination);

        Ok(Delivery {
            destination,
            message,
        })
    }
}
