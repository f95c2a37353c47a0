//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A countdown timer with a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in seconds to set at startup
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
    pub duration: Option<i64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
