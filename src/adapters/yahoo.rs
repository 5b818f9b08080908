use crate::config::toml_config::SourceConfig;
use crate::domain::model::Bar;
use crate::domain::ports::QuoteProvider;
use crate::utils::error::{DigestError, Result};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Daily bars from the Yahoo Finance v8 chart endpoint.
pub struct YahooChartProvider {
    client: Client,
    config: SourceConfig,
}

impl YahooChartProvider {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let invalid = |reason: String| DigestError::InvalidConfigValueError {
            field: "source.endpoint".to_string(),
            value: self.config.endpoint.clone(),
            reason,
        };

        let mut url = Url::parse(&self.config.endpoint).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", &self.config.range)
            .append_pair("interval", &self.config.interval);
        Ok(url)
    }
}

impl QuoteProvider for YahooChartProvider {
    async fn daily_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
        let url = self.chart_url(symbol)?;
        tracing::debug!("Requesting chart data: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Chart response for {}: {} ({} bytes)", symbol, status, body.len());

        if !status.is_success() {
            // Yahoo 在 404 時仍會回傳 chart.error 說明
            let message = serde_json::from_str::<ChartEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.chart.error)
                .map(|e| format!("HTTP {}: {}", status, e))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(DigestError::ProviderError {
                symbol: symbol.to_string(),
                message,
            });
        }

        let envelope: ChartEnvelope = serde_json::from_str(&body)?;
        envelope.into_bars(symbol)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description, self.code)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartEnvelope {
    /// Rows without a close price are dropped.
    fn into_bars(self, symbol: &str) -> Result<Vec<Bar>> {
        if let Some(error) = self.chart.error {
            return Err(DigestError::ProviderError {
                symbol: symbol.to_string(),
                message: error.to_string(),
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DigestError::ProviderError {
                symbol: symbol.to_string(),
                message: "empty chart result".to_string(),
            })?;

        let series = result.indicators.quote.into_iter().next().unwrap_or_default();
        let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let bars = result
            .timestamp
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let close = at(&series.close, i)?;
                Some(Bar {
                    timestamp: DateTime::from_timestamp(ts, 0)?,
                    open: at(&series.open, i),
                    high: at(&series.high, i),
                    low: at(&series.low, i),
                    close,
                    volume: series.volume.get(i).copied().flatten(),
                })
            })
            .collect();

        Ok(bars)
    }
}
