#[cfg(feature = "cli")]
pub mod cli;
pub mod credentials;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use credentials::{Credentials, EnvSecrets, SecretSource};
pub use toml_config::ReportConfig;
