pub mod engine;
pub mod fetcher;
pub mod pipeline;

pub use crate::domain::model::{MarketSnapshot, Report};
pub use crate::domain::ports::{CommentaryGenerator, Pipeline, Publisher, QuoteProvider};
pub use crate::utils::error::Result;
