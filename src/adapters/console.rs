use crate::domain::ports::Publisher;
use crate::utils::error::Result;
use std::io::Write;

/// Dry-run publisher: writes the message to stdout instead of posting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePublisher;

impl Publisher for ConsolePublisher {
    async fn publish(&self, message: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", message)?;
        writeln!(stdout, "{}", "-".repeat(40))?;
        Ok("stdout (dry run)".to_string())
    }
}
