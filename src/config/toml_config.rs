use crate::domain::model::PreviousClosePolicy;
use crate::domain::services::calendar::BusinessCalendar;
use crate::domain::services::formatter::FormatPolicy;
use crate::domain::services::message::MessageTemplate;
use crate::utils::error::{DigestError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "market-digest.toml";

/// Every constant the report run depends on, loaded once at start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub schedule: ScheduleConfig,
    pub source: SourceConfig,
    pub format: FormatPolicy,
    pub commentary: CommentaryConfig,
    pub publish: PublishConfig,
    pub message: MessageTemplate,
    pub categories: Vec<CategoryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub timezone: String,
    /// When false the run never skips weekends.
    pub business_days_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub range: String,
    pub interval: String,
    /// Total attempts per symbol, without delay between them.
    pub max_attempts: u32,
    pub timeout_seconds: u64,
    pub previous_close: PreviousClosePolicy,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub fallback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub timeout_seconds: u64,
    /// Longer messages are still sent, with a warning.
    pub max_message_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub key: String,
    pub title: String,
    pub icon: Option<String>,
    pub symbols: Vec<SymbolConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub symbol: String,
    pub name: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tokyo".to_string(),
            business_days_only: true,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            range: "5d".to_string(),
            interval: "1d".to_string(),
            max_attempts: 3,
            timeout_seconds: 15,
            previous_close: PreviousClosePolicy::PriorClose,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 400,
            temperature: 0.5,
            timeout_seconds: 60,
            fallback: "本日の分析を生成できませんでした。".to_string(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_message_chars: 2000,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            source: SourceConfig::default(),
            format: FormatPolicy::default(),
            commentary: CommentaryConfig::default(),
            publish: PublishConfig::default(),
            message: MessageTemplate::default(),
            categories: default_categories(),
        }
    }
}

fn category(key: &str, title: &str, icon: &str, symbols: &[(&str, &str)]) -> CategoryConfig {
    CategoryConfig {
        key: key.to_string(),
        title: title.to_string(),
        icon: Some(icon.to_string()),
        symbols: symbols
            .iter()
            .map(|(symbol, name)| SymbolConfig {
                symbol: symbol.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category(
            "japan",
            "日本市場",
            "🇯🇵",
            &[("^N225", "日経平均"), ("1306.T", "TOPIX")],
        ),
        category(
            "us",
            "米国市場（前日）",
            "🇺🇸",
            &[("^GSPC", "S&P 500"), ("^IXIC", "NASDAQ"), ("^DJI", "ダウ")],
        ),
        category("fx", "為替", "💱", &[("USDJPY=X", "ドル円")]),
    ]
}

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| DigestError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DigestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path must exist; otherwise the default file is used when present,
    /// and the built-in defaults when it is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// 替換環境變數 (例如 ${API_BASE})，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DigestError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn calendar(&self) -> Result<BusinessCalendar> {
        let tz = validation::validate_timezone("schedule.timezone", &self.schedule.timezone)?;
        Ok(BusinessCalendar::new(tz))
    }

    pub fn symbol_count(&self) -> usize {
        self.categories.iter().map(|c| c.symbols.len()).sum()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_timezone("schedule.timezone", &self.schedule.timezone)?;

        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_non_empty_string("source.range", &self.source.range)?;
        validation::validate_non_empty_string("source.interval", &self.source.interval)?;
        validation::validate_positive_number(
            "source.max_attempts",
            u64::from(self.source.max_attempts),
            1,
        )?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds, 1)?;

        validation::validate_url("commentary.endpoint", &self.commentary.endpoint)?;
        validation::validate_non_empty_string("commentary.model", &self.commentary.model)?;
        validation::validate_positive_number(
            "commentary.max_tokens",
            u64::from(self.commentary.max_tokens),
            1,
        )?;
        validation::validate_range("commentary.temperature", self.commentary.temperature, 0.0, 2.0)?;
        validation::validate_non_empty_string("commentary.fallback", &self.commentary.fallback)?;

        validation::validate_positive_number(
            "publish.timeout_seconds",
            self.publish.timeout_seconds,
            1,
        )?;

        let mut previous = f64::INFINITY;
        for tier in &self.format.price_tiers {
            if !(tier.min < previous) {
                return Err(DigestError::InvalidConfigValueError {
                    field: "format.price_tiers".to_string(),
                    value: tier.min.to_string(),
                    reason: "Tiers must be listed from the highest threshold down".to_string(),
                });
            }
            previous = tier.min;
        }

        if self.symbol_count() == 0 {
            return Err(DigestError::ConfigValidationError {
                field: "categories".to_string(),
                message: "At least one symbol must be configured".to_string(),
            });
        }
        for category in &self.categories {
            validation::validate_non_empty_string("categories.key", &category.key)?;
            for symbol in &category.symbols {
                validation::validate_non_empty_string("categories.symbols.symbol", &symbol.symbol)?;
                validation::validate_non_empty_string("categories.symbols.name", &symbol.name)?;
            }
        }

        Ok(())
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
