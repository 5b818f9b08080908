use crate::config::toml_config::CommentaryConfig;
use crate::domain::ports::CommentaryGenerator;
use crate::domain::services::calendar::BusinessCalendar;
use crate::utils::error::{DigestError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "あなたは日本株投資コミュニティ向けに毎朝の市況解説を担当する専業投資家です。初心者から上級者まで参考になる、正確で簡潔な分析を提供します。";

fn user_prompt(summary: &str, date_label: &str) -> String {
    format!(
        "あなたは経験豊富な専業投資家です。以下の市況データを分析し、今日のポイントを作成してください。

【本日】{date_label}

【市況データ】
{summary}

【出力ルール】
1. 3〜4行で簡潔にまとめる
2. 数値データに基づいた客観的な分析のみ
3. 「〜が予想されます」「〜かもしれません」など推測は控えめに
4. 初心者にもわかりやすい表現を使う
5. 絵文字は使わない
6. 最後に「🎯 注目：」で今日注目すべき1点を挙げる

【禁止事項】
- 具体的な銘柄の推奨
- 売買の指示
- 根拠のない予測"
    )
}

/// Commentary from an OpenAI-compatible chat completions endpoint.
pub struct OpenAiCommentary {
    client: Client,
    config: CommentaryConfig,
    api_key: String,
    calendar: BusinessCalendar,
}

impl OpenAiCommentary {
    pub fn new(config: CommentaryConfig, api_key: String, calendar: BusinessCalendar) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
            calendar,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl CommentaryGenerator for OpenAiCommentary {
    async fn generate(&self, summary: &str, now: DateTime<Utc>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(user_prompt(summary, &self.calendar.long_date_label(now))),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::debug!("Requesting commentary from model {}", self.config.model);
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::CommentaryError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| DigestError::CommentaryError {
                message: "response contained no text".to_string(),
            })
    }
}
