use crate::utils::error::{DigestError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV row as returned by the quote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Which price serves as the comparison price for the day-over-day change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviousClosePolicy {
    /// Close of the bar before the latest one; fewer than two bars rejects the symbol.
    #[default]
    PriorClose,
    /// Same as `PriorClose`, but a lone bar falls back to its own open.
    SameDayOpen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub prev_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub verified: bool,
}

impl Quote {
    /// Builds a validated quote from the trailing bars of a symbol.
    ///
    /// Bars are expected oldest first. Both prices must be strictly positive.
    pub fn from_bars(
        symbol: &str,
        name: &str,
        bars: &[Bar],
        policy: PreviousClosePolicy,
    ) -> Result<Self> {
        let (latest, prev_close) = match (bars, policy) {
            ([.., prev, latest], _) => (latest, prev.close),
            ([only], PreviousClosePolicy::SameDayOpen) => {
                let open = only.open.ok_or_else(|| DigestError::ValidationError {
                    message: format!("{}: single bar has no open price to compare", symbol),
                })?;
                (only, open)
            }
            _ => {
                return Err(DigestError::ValidationError {
                    message: format!(
                        "{}: insufficient history ({} bars, need 2)",
                        symbol,
                        bars.len()
                    ),
                })
            }
        };

        let price = latest.close;
        if !(price > 0.0 && prev_close > 0.0) {
            return Err(DigestError::ValidationError {
                message: format!(
                    "{}: invalid price (latest {}, previous {})",
                    symbol, price, prev_close
                ),
            });
        }

        let change = price - prev_close;
        Ok(Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            prev_close,
            change,
            change_pct: percent_change(change, prev_close),
            timestamp: Some(latest.timestamp),
            verified: true,
        })
    }
}

/// `change / previous * 100`, zero when the previous price is zero.
pub fn percent_change(change: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        change / previous * 100.0
    }
}

/// Five-bucket classification of a percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    StrongUp,
    Up,
    Flat,
    Down,
    Warning,
}

impl Trend {
    pub fn from_change_pct(change_pct: f64) -> Self {
        if change_pct >= 1.0 {
            Trend::StrongUp
        } else if change_pct >= 0.3 {
            Trend::Up
        } else if change_pct > -0.3 {
            Trend::Flat
        } else if change_pct > -1.0 {
            Trend::Down
        } else {
            Trend::Warning
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Trend::StrongUp => "🚀",
            Trend::Up => "📈",
            Trend::Flat => "➡️",
            Trend::Down => "📉",
            Trend::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketSection {
    pub key: String,
    pub title: String,
    pub icon: Option<String>,
    pub quotes: Vec<Quote>,
}

/// Everything the fetch stage produced, including what it had to give up on.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub sections: Vec<MarketSection>,
    pub missing: Vec<String>,
}

impl MarketSnapshot {
    pub fn quote_count(&self) -> usize {
        self.sections.iter().map(|s| s.quotes.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub date_label: String,
    pub sections: Vec<MarketSection>,
    pub commentary: String,
    pub commentary_fallback: bool,
    pub missing: Vec<String>,
}

/// The rendered message and where it was delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub destination: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Today is not a business day in the configured time zone.
    Skipped { date: chrono::NaiveDate },
    Completed(RunSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub quote_count: usize,
    pub missing: Vec<String>,
    pub commentary_fallback: bool,
    pub destination: String,
    pub message: String,
}
