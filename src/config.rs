//! Configuration and CLI argument handling

use std::time::Duration;
use anyhow::Context;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "exam-clock")]
#[command(about = "Countdown timers, progress caching and alerts for timed mock exams")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default exam duration in minutes
    #[arg(short, long, default_value = "180")]
    pub duration: u64,

    /// Hours cached exam progress stays valid
    #[arg(long, default_value = "24")]
    pub progress_ttl_hours: u32,

    /// Minutes between sweeps of stale cached progress
    #[arg(long, default_value = "30")]
    pub sweep_interval_minutes: u64,

    /// Minutes a stopped or expired timer is kept before it is forgotten
    #[arg(long, default_value = "60")]
    pub timer_retention_minutes: u64,

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

    /// Period of the housekeeping sweep, at least one minute
    pub fn sweep_interval(&self) -> anyhow::Result<Duration> {
        minutes("sweep interval", self.sweep_interval_minutes.max(1))
    }

    /// How long idle timers are retained
    pub fn timer_retention(&self) -> anyhow::Result<Duration> {
        minutes("timer retention", self.timer_retention_minutes)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

fn minutes(name: &str, value: u64) -> anyhow::Result<Duration> {
    value
        .checked_mul(60)
        .map(Duration::from_secs)
        .with_context(|| format!("{} of {} minutes is too large", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["exam-clock"]).unwrap();
        assert_eq!(config.duration, 180);
        assert_eq!(config.progress_ttl_hours, 24);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "exam-clock", "--port", "9000", "--host", "127.0.0.1", "-d", "90", "-v",
        ])
        .unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.duration, 90);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_sweep_interval_minimum_and_overflow() {
        let config = Config::try_parse_from(["exam-clock", "--sweep-interval-minutes", "0"]).unwrap();
        assert_eq!(config.sweep_interval().unwrap(), Duration::from_secs(60));

        let huge = u64::MAX.to_string();
        let config =
            Config::try_parse_from(["exam-clock", "--sweep-interval-minutes", huge.as_str()]).unwrap();
        assert!(config.sweep_interval().is_err());

        let config =
            Config::try_parse_from(["exam-clock", "--timer-retention-minutes", huge.as_str()]).unwrap();
        assert!(config.timer_retention().is_err());
    }

    #[test]
    fn test_timer_retention_default() {
        let config = Config::try_parse_from(["exam-clock"]).unwrap();
        assert_eq!(config.timer_retention().unwrap(), Duration::from_secs(3600));
    }
}
