use crate::config::toml_config::{CategoryConfig, SourceConfig};
use crate::domain::model::{MarketSection, MarketSnapshot, PreviousClosePolicy, Quote};
use crate::domain::ports::QuoteProvider;

#[derive(Debug)]
pub enum FetchResult {
    Available(Quote),
    Unavailable { attempts: u32, last_error: String },
}

/// Fetches one symbol, retrying fetch and validation failures alike without delay.
pub async fn fetch_quote<Q: QuoteProvider>(
    provider: &Q,
    symbol: &str,
    name: &str,
    max_attempts: u32,
    policy: PreviousClosePolicy,
) -> FetchResult {
    let max_attempts = max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        let outcome = match provider.daily_bars(symbol).await {
            Ok(bars) => Quote::from_bars(symbol, name, &bars, policy),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(quote) => {
                tracing::debug!(
                    "✅ {} ({}) = {} ({:+.2}%) on attempt {}",
                    name,
                    symbol,
                    quote.price,
                    quote.change_pct,
                    attempt
                );
                return FetchResult::Available(quote);
            }
            Err(e) => {
                tracing::warn!(
                    "Fetching {} failed (attempt {}/{}): {}",
                    symbol,
                    attempt,
                    max_attempts,
                    e
                );
                last_error = e.to_string();
            }
        }
    }

    FetchResult::Unavailable {
        attempts: max_attempts,
        last_error,
    }
}

/// Fetches every configured symbol in order, one at a time.
pub async fn fetch_snapshot<Q: QuoteProvider>(
    provider: &Q,
    categories: &[CategoryConfig],
    source: &SourceConfig,
) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::default();

    for category in categories {
        let mut section = MarketSection {
            key: category.key.clone(),
            title: category.title.clone(),
            icon: category.icon.clone(),
            quotes: Vec::with_capacity(category.symbols.len()),
        };

        for entry in &category.symbols {
            match fetch_quote(
                provider,
                &entry.symbol,
                &entry.name,
                source.max_attempts,
                source.previous_close,
            )
            .await
            {
                FetchResult::Available(quote) => section.quotes.push(quote),
                FetchResult::Unavailable {
                    attempts,
                    last_error,
                } => {
                    tracing::error!(
                        "❌ Giving up on {} ({}) after {} attempts: {}",
                        entry.name,
                        entry.symbol,
                        attempts,
                        last_error
                    );
                    snapshot
                        .missing
                        .push(format!("{}({})", entry.name, entry.symbol));
                }
            }
        }

        snapshot.sections.push(section);
    }

    if !snapshot.missing.is_empty() {
        tracing::warn!("Failed to fetch: {}", snapshot.missing.join(", "));
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SymbolConfig;
    use crate::domain::model::Bar;
    use crate::utils::error::{DigestError, Result};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a scripted sequence of responses per symbol; the last one repeats.
    struct ScriptedProvider {
        scripts: HashMap<String, Vec<Option<Vec<f64>>>>,
        calls: Mutex<HashMap<String, usize>>,
        total: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(scripts: &[(&str, Vec<Option<Vec<f64>>>)]) -> Self {
            Self {
                scripts: scripts
                    .iter()
                    .map(|(s, script)| (s.to_string(), script.clone()))
                    .collect(),
                calls: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
            }
        }

        fn calls_for(&self, symbol: &str) -> usize {
            self.calls.lock().unwrap().get(symbol).copied().unwrap_or(0)
        }
    }

    impl QuoteProvider for ScriptedProvider {
        async fn daily_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
            self.total.fetch_add(1, Ordering::SeqCst);
            let call = {
                let mut calls = self.calls.lock().unwrap();
                let counter = calls.entry(symbol.to_string()).or_insert(0);
                *counter += 1;
                *counter - 1
            };
            let script = self.scripts.get(symbol).cloned().unwrap_or_default();
            let step = script.get(call).or(script.last()).cloned().flatten();
            match step {
                Some(closes) => Ok(closes
                    .into_iter()
                    .enumerate()
                    .map(|(i, close)| Bar {
                        timestamp: Utc.with_ymd_and_hms(2026, 10, 13 + i as u32, 0, 0, 0).unwrap(),
                        open: None,
                        high: None,
                        low: None,
                        close,
                        volume: None,
                    })
                    .collect()),
                None => Err(DigestError::ProviderError {
                    symbol: symbol.to_string(),
                    message: "connection reset".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_succeeds_first_try() {
        let provider = ScriptedProvider::new(&[("A", vec![Some(vec![100.0, 101.5])])]);
        let result = fetch_quote(&provider, "A", "Alpha", 3, PreviousClosePolicy::PriorClose).await;

        assert!(matches!(result, FetchResult::Available(ref q) if (q.change_pct - 1.5).abs() < 1e-9));
        assert_eq!(provider.calls_for("A"), 1);
    }

    #[tokio::test]
    async fn test_fetch_retries_transient_then_validation_failure() {
        let provider = ScriptedProvider::new(&[(
            "A",
            vec![None, Some(vec![101.0]), Some(vec![100.0, 99.0])],
        )]);
        let result = fetch_quote(&provider, "A", "Alpha", 3, PreviousClosePolicy::PriorClose).await;

        assert!(matches!(result, FetchResult::Available(ref q) if q.price == 99.0));
        assert_eq!(provider.calls_for("A"), 3);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_max_attempts() {
        let provider = ScriptedProvider::new(&[("A", vec![Some(vec![0.0, 10.0])])]);
        let result = fetch_quote(&provider, "A", "Alpha", 3, PreviousClosePolicy::PriorClose).await;

        match result {
            FetchResult::Unavailable {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("invalid price"));
            }
            other => panic!("expected unavailable, got {:?}", other),
        }
        assert_eq!(provider.calls_for("A"), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_fails_fast() {
        let provider = ScriptedProvider::new(&[("A", vec![None, Some(vec![1.0, 2.0])])]);
        let result = fetch_quote(&provider, "A", "Alpha", 1, PreviousClosePolicy::PriorClose).await;

        assert!(matches!(result, FetchResult::Unavailable { attempts: 1, .. }));
        assert_eq!(provider.calls_for("A"), 1);
    }

    #[tokio::test]
    async fn test_snapshot_tolerates_partial_results() {
        let provider = ScriptedProvider::new(&[
            ("A", vec![Some(vec![100.0, 101.0])]),
            ("B", vec![None]),
            ("C", vec![Some(vec![50.0, 49.0])]),
        ]);
        let categories = vec![
            CategoryConfig {
                key: "one".to_string(),
                title: "One".to_string(),
                icon: None,
                symbols: vec![
                    SymbolConfig {
                        symbol: "A".to_string(),
                        name: "Alpha".to_string(),
                    },
                    SymbolConfig {
                        symbol: "B".to_string(),
                        name: "Beta".to_string(),
                    },
                ],
            },
            CategoryConfig {
                key: "two".to_string(),
                title: "Two".to_string(),
                icon: None,
                symbols: vec![SymbolConfig {
                    symbol: "C".to_string(),
                    name: "Gamma".to_string(),
                }],
            },
        ];

        let snapshot = fetch_snapshot(&provider, &categories, &SourceConfig::default()).await;

        assert_eq!(snapshot.quote_count(), 2);
        assert_eq!(snapshot.missing, vec!["Beta(B)".to_string()]);
        assert_eq!(snapshot.sections.len(), 2);
        assert_eq!(snapshot.sections[0].quotes[0].name, "Alpha");
        assert_eq!(snapshot.sections[1].quotes[0].name, "Gamma");
        assert_eq!(provider.calls_for("B"), 3);
        assert_eq!(provider.total.load(Ordering::SeqCst), 5);
    }
}
