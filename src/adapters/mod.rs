// Adapters layer: concrete implementations for external systems (quote provider, text generation, webhook).

pub mod console;
pub mod discord;
pub mod openai;
pub mod yahoo;

pub use console::ConsolePublisher;
pub use discord::DiscordWebhook;
pub use openai::OpenAiCommentary;
pub use yahoo::YahooChartProvider;
