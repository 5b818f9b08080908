use crate::domain::model::{Quote, Trend};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub min: f64,
    pub decimals: usize,
}

/// Number formatting rules for report lines.
///
/// Tiers are checked in order and the first one whose `min` the price reaches
/// wins. Prices below every tier use `default_decimals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatPolicy {
    pub price_tiers: Vec<PriceTier>,
    pub default_decimals: usize,
    /// Display-name fragments that mark a currency pair.
    pub currency_markers: Vec<String>,
    pub currency_suffix: String,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self {
            price_tiers: vec![
                PriceTier {
                    min: 10_000.0,
                    decimals: 0,
                },
                PriceTier {
                    min: 100.0,
                    decimals: 0,
                },
            ],
            default_decimals: 2,
            currency_markers: vec!["ドル円".to_string()],
            currency_suffix: "円".to_string(),
        }
    }
}

impl FormatPolicy {
    /// 只依顯示名稱判斷
    pub fn is_currency_pair(&self, name: &str) -> bool {
        self.currency_markers
            .iter()
            .any(|marker| !marker.is_empty() && name.contains(marker.as_str()))
    }

    pub fn format_price(&self, price: f64, name: &str) -> String {
        if self.is_currency_pair(name) {
            return format!("{:.2} {}", price, self.currency_suffix);
        }

        let decimals = self
            .price_tiers
            .iter()
            .find(|tier| price >= tier.min)
            .map(|tier| tier.decimals)
            .unwrap_or(self.default_decimals);

        format_with_separators(price, decimals)
    }

    /// `┃ {name}　{price}（{+pct}%）{glyph}`
    pub fn format_quote_line(&self, quote: &Quote) -> String {
        format!(
            "┃ {}　{}（{}%）{}",
            quote.name,
            self.format_price(quote.price, &quote.name),
            signed_percent(quote.change_pct),
            Trend::from_change_pct(quote.change_pct).glyph()
        )
    }
}

/// Two decimals with an explicit `+` for non-negative values.
pub fn signed_percent(change_pct: f64) -> String {
    // -0.0 與 0.0 都顯示為 +0.00
    let change_pct = if change_pct == 0.0 { 0.0 } else { change_pct };
    if change_pct >= 0.0 {
        format!("+{:.2}", change_pct)
    } else {
        format!("{:.2}", change_pct)
    }
}

pub fn format_with_separators(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    grouped.push_str(sign);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(name: &str, price: f64, change_pct: f64) -> Quote {
        Quote {
            symbol: "SYM".to_string(),
            name: name.to_string(),
            price,
            prev_close: price,
            change: 0.0,
            change_pct,
            timestamp: None,
            verified: true,
        }
    }

    #[test]
    fn test_format_with_separators() {
        assert_eq!(format_with_separators(38123.456, 0), "38,123");
        assert_eq!(format_with_separators(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_with_separators(999.0, 0), "999");
        assert_eq!(format_with_separators(1000.0, 0), "1,000");
        assert_eq!(format_with_separators(12.3456, 2), "12.35");
        assert_eq!(format_with_separators(-4321.5, 1), "-4,321.5");
        assert_eq!(format_with_separators(0.0, 2), "0.00");
    }

    #[test]
    fn test_price_tiers() {
        let policy = FormatPolicy::default();
        assert_eq!(policy.format_price(38456.78, "日経平均"), "38,457");
        assert_eq!(policy.format_price(5678.9, "S&P 500"), "5,679");
        assert_eq!(policy.format_price(100.0, "ETF"), "100");
        assert_eq!(policy.format_price(99.999, "ETF"), "100.00");
        assert_eq!(policy.format_price(27.5, "ETF"), "27.50");
    }

    #[test]
    fn test_currency_pair_formatting() {
        let policy = FormatPolicy::default();
        assert!(policy.is_currency_pair("ドル円"));
        assert!(!policy.is_currency_pair("日経平均"));
        assert_eq!(policy.format_price(151.234, "ドル円"), "151.23 円");
        assert_eq!(policy.format_price(15123.4, "ドル円"), "15123.40 円");
    }

    #[test]
    fn test_non_yen_pair_gets_no_yen_suffix() {
        let policy = FormatPolicy::default();
        assert!(!policy.is_currency_pair("ユーロドル"));
        assert_eq!(policy.format_price(1.0834, "ユーロドル"), "1.08");

        let eur = Quote {
            symbol: "EURUSD=X".to_string(),
            ..quote("ユーロドル", 1.0834, 0.1)
        };
        assert_eq!(policy.format_quote_line(&eur), "┃ ユーロドル　1.08（+0.10%）➡️");
    }

    #[test]
    fn test_custom_tiers() {
        let policy = FormatPolicy {
            price_tiers: vec![PriceTier {
                min: 1_000.0,
                decimals: 0,
            }],
            default_decimals: 2,
            ..FormatPolicy::default()
        };
        assert_eq!(policy.format_price(1500.25, "X"), "1,500");
        assert_eq!(policy.format_price(500.25, "X"), "500.25");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(1.5), "+1.50");
        assert_eq!(signed_percent(0.0), "+0.00");
        assert_eq!(signed_percent(-0.0), "+0.00");
        assert_eq!(signed_percent(-0.294), "-0.29");
        assert_eq!(signed_percent(-0.001), "-0.00");
    }

    #[test]
    fn test_format_quote_line() {
        let policy = FormatPolicy::default();
        assert_eq!(
            policy.format_quote_line(&quote("日経平均", 38456.78, 1.234)),
            "┃ 日経平均　38,457（+1.23%）🚀"
        );
        assert_eq!(
            policy.format_quote_line(&quote("ドル円", 151.234, -0.45)),
            "┃ ドル円　151.23 円（-0.45%）📉"
        );
        assert_eq!(
            policy.format_quote_line(&quote("TOPIX", 27.5, -1.0)),
            "┃ TOPIX　27.50（-1.00%）⚠️"
        );
    }

    #[test]
    fn test_format_quote_line_is_idempotent() {
        let policy = FormatPolicy::default();
        let q = quote("NASDAQ", 17890.123, 0.31);
        let first = policy.format_quote_line(&q);
        let second = policy.format_quote_line(&q);
        assert_eq!(first, second);
        assert_eq!(first, "┃ NASDAQ　17,890（+0.31%）📈");
    }
}
