//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        pairs = config.pairs.len(),
        cash_margin = %config.engine.cash_margin,
        poll_seconds = config.cadence.poll_seconds,
        max_attempts = config.retry.max_attempts,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
    // Pair catalogue validation
    anyhow::ensure!(
        !config.pairs.is_empty(),
        "At least one instrument pair must be configured"
    );
    for (i, pair) in config.pairs.iter().enumerate() {
        anyhow::ensure!(
            !pair.ordinary.is_empty(),
            "Pair {} ({}) has empty ordinary ticker",
            i,
            pair.name
        );
        anyhow::ensure!(
            !pair.preferred.is_empty(),
            "Pair {} ({}) has empty preferred ticker",
            i,
            pair.name
        );
        anyhow::ensure!(
            pair.ordinary != pair.preferred,
            "Pair {} ({}) uses the same ticker for both legs",
            i,
            pair.name
        );
    }

    // Engine validation
    anyhow::ensure!(
        config.engine.cash_margin > Decimal::ZERO && config.engine.cash_margin <= Decimal::ONE,
        "cash_margin must be in (0, 1], got {}",
        config.engine.cash_margin
    );

    // Schedule validation: parse errors and inverted windows surface here
    config
        .schedule
        .to_schedule()
        .context("Invalid trading schedule")?;

    // Cadence validation
    anyhow::ensure!(
        config.cadence.poll_seconds > 0,
        "poll_seconds must be positive"
    );
    anyhow::ensure!(
        config.cadence.closed_backoff_seconds > 0,
        "closed_backoff_seconds must be positive"
    );

    // Retry validation
    anyhow::ensure!(
        config.retry.max_attempts > 0,
        "retry max_attempts must be positive"
    );

    // API validation
    anyhow::ensure!(
        !config.api.base_url.is_empty(),
        "Brokerage API base URL must not be empty"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
            [bot]
            name = "pairspread"

            [api]
            base_url = "https://invest.example.com/api/v1"

            [[pairs]]
            name = "Sberbank"
            ordinary = "SBER"
            preferred = "SBERP"

            [engine]
            cash_margin = 0.98

            [schedule]
            sessions = [
                { open = "10:00", close = "18:45" },
                { open = "19:00", close = "23:59" },
            ]

            [cadence]
            poll_seconds = 30

            [retry]
            max_attempts = 100
        "#
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_parses_and_validates() {
        let config: AppConfig = toml::from_str(sample_toml()).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.cadence.closed_backoff_seconds, 300);
        assert_eq!(config.retry.backoff_seconds, 10);
        assert_eq!(config.bot.log_level, "info");
    }

    #[test]
    fn test_duplicate_leg_ticker_rejected() {
        let toml = sample_toml().replace("preferred = \"SBERP\"", "preferred = \"SBER\"");
        let config: AppConfig = toml::from_str(&toml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_inverted_session_rejected() {
        let toml = sample_toml().replace("{ open = \"10:00\", close = \"18:45\" }", "{ open = \"18:45\", close = \"10:00\" }");
        let config: AppConfig = toml::from_str(&toml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_cash_margin_bounds() {
        let toml = sample_toml().replace("cash_margin = 0.98", "cash_margin = 1.5");
        let config: AppConfig = toml::from_str(&toml).unwrap();
        assert!(validate_config(&config).is_err());
    }
}
