use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs every stage once. A stage error stops the run before later stages start.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        tracing::info!("Starting market report run...");

        // Extract
        let snapshot = self.pipeline.extract().await?;
        tracing::info!("Successfully fetched {} items", snapshot.quote_count());
        let quote_count = snapshot.quote_count();

        // Transform
        let report = self.pipeline.transform(snapshot, now).await?;

        // Load
        let delivery = self.pipeline.load(&report).await?;

        Ok(RunSummary {
            quote_count,
            missing: report.missing,
            commentary_fallback: report.commentary_fallback,
            destination: delivery.destination,
            message: delivery.message,
        })
    }
}
