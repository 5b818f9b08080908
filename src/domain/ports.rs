use crate::domain::model::{Bar, Delivery, MarketSnapshot, Report};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait QuoteProvider: Send + Sync {
    /// Trailing daily bars for `symbol`, oldest first.
    fn daily_bars(&self, symbol: &str)
        -> impl std::future::Future<Output = Result<Vec<Bar>>> + Send;
}

pub trait CommentaryGenerator: Send + Sync {
    fn generate(
        &self,
        summary: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait Publisher: Send + Sync {
    /// Delivers the message and returns a description of where it went.
    fn publish(&self, message: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<MarketSnapshot>;
    async fn transform(&self, snapshot: MarketSnapshot, now: DateTime<Utc>) -> Result<Report>;
    async fn load(&self, report: &Report) -> Result<Delivery>;
}
