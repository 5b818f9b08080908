use crate::utils::error::{DigestError, Result};
use crate::utils::validation::validate_url;
use std::collections::HashMap;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Where secrets are looked up. The process environment in production.
pub trait SecretSource {
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl SecretSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Clone)]
pub struct Credentials {
    /// Absent only for dry runs.
    pub webhook_url: Option<String>,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<redacted>"))
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn resolve(source: &impl SecretSource, require_webhook: bool) -> Result<Self> {
        let webhook_url = match required(source, WEBHOOK_URL_VAR) {
            Ok(url) => {
                validate_url(WEBHOOK_URL_VAR, &url).map_err(redact_value)?;
                Some(url)
            }
            Err(e) if require_webhook => return Err(e),
            Err(_) => None,
        };
        let api_key = required(source, API_KEY_VAR)?;

        Ok(Self {
            webhook_url,
            api_key,
        })
    }
}

/// 密鑰值不可回顯到 stderr 或日誌
fn redact_value(err: DigestError) -> DigestError {
    match err {
        DigestError::InvalidConfigValueError { field, reason, .. } => {
            DigestError::InvalidConfigValueError {
                field,
                value: "<redacted>".to_string(),
                reason,
            }
        }
        other => other,
    }
}

fn required(source: &impl SecretSource, key: &str) -> Result<String> {
    source
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| DigestError::MissingConfigError {
            field: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_all_present() {
        let source = secrets(&[
            (WEBHOOK_URL_VAR, "https://discord.com/api/webhooks/1/abc"),
            (API_KEY_VAR, "sk-test"),
        ]);
        let credentials = Credentials::resolve(&source, true).unwrap();
        assert_eq!(
            credentials.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(credentials.api_key, "sk-test");
    }

    #[test]
    fn test_missing_webhook_is_fatal_unless_dry_run() {
        let source = secrets(&[(API_KEY_VAR, "sk-test")]);
        let err = Credentials::resolve(&source, true).unwrap_err();
        assert!(
            matches!(err, DigestError::MissingConfigError { ref field } if field == WEBHOOK_URL_VAR)
        );

        let dry = Credentials::resolve(&source, false).unwrap();
        assert!(dry.webhook_url.is_none());
    }

    #[test]
    fn test_missing_or_blank_api_key() {
        let source = secrets(&[(WEBHOOK_URL_VAR, "https://example.com/hook"), (API_KEY_VAR, "  ")]);
        let err = Credentials::resolve(&source, true).unwrap_err();
        assert!(matches!(err, DigestError::MissingConfigError { ref field } if field == API_KEY_VAR));
    }

    #[test]
    fn test_malformed_webhook_url() {
        let source = secrets(&[(WEBHOOK_URL_VAR, "not a url"), (API_KEY_VAR, "sk-test")]);
        assert!(matches!(
            Credentials::resolve(&source, true),
            Err(DigestError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_malformed_webhook_url_is_not_echoed() {
        let source = secrets(&[
            (WEBHOOK_URL_VAR, "ftp://discord.com/api/webhooks/42/SECRETTOKEN"),
            (API_KEY_VAR, "sk-test"),
        ]);
        let err = Credentials::resolve(&source, true).unwrap_err();

        match &err {
            DigestError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, WEBHOOK_URL_VAR);
                assert_eq!(value, "<redacted>");
            }
            other => panic!("expected InvalidConfigValueError, got {:?}", other),
        }
        assert!(!err.to_string().contains("SECRETTOKEN"));
        assert!(!err.user_friendly_message().contains("SECRETTOKEN"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials {
            webhook_url: Some("https://example.com/hook/secret".to_string()),
            api_key: "sk-secret".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(!printed.contains("secret"));
    }
}
