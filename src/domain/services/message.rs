use crate::domain::model::{MarketSection, Report};
use crate::domain::services::formatter::{signed_percent, FormatPolicy};
use serde::{Deserialize, Serialize};

pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━━";

/// Fixed decorative text around the report body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplate {
    pub greeting: String,
    /// `{date}` is replaced with the localized date label.
    pub title: String,
    pub commentary_heading: String,
    pub closing: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            greeting: "☀️ おはようございます！".to_string(),
            title: "📊 **{date}の市況レポート**".to_string(),
            commentary_heading: "💡 **今日のポイント**".to_string(),
            closing: "良い一日を！🍀".to_string(),
        }
    }
}

/// Renders the chat message body. Sections without quotes are left out.
pub fn render_message(report: &Report, template: &MessageTemplate, policy: &FormatPolicy) -> String {
    let mut lines = vec![
        template.greeting.clone(),
        template.title.replace("{date}", &report.date_label),
        String::new(),
        SEPARATOR.to_string(),
    ];

    for section in report.sections.iter().filter(|s| !s.quotes.is_empty()) {
        lines.push(String::new());
        lines.push(section_header(section));
        lines.extend(section.quotes.iter().map(|q| policy.format_quote_line(q)));
    }

    lines.push(String::new());
    lines.push(SEPARATOR.to_string());
    lines.push(String::new());
    lines.push(template.commentary_heading.clone());
    lines.push(String::new());
    lines.push(report.commentary.clone());
    lines.push(String::new());
    lines.push(SEPARATOR.to_string());
    lines.push(template.closing.clone());

    lines.join("\n")
}

fn section_header(section: &MarketSection) -> String {
    match section.icon.as_deref() {
        Some(icon) if !icon.is_empty() => format!("{} **{}**", icon, section.title),
        _ => format!("**{}**", section.title),
    }
}

/// Compact numeric summary handed to the commentary generator, one quote per line.
pub fn commentary_summary(sections: &[MarketSection]) -> String {
    sections
        .iter()
        .flat_map(|s| s.quotes.iter())
        .map(|q| format!("- {}: {:.2} ({}%)", q.name, q.price, signed_percent(q.change_pct)))
        .collect::<Vec<_>>()
        .join("\n")
}
