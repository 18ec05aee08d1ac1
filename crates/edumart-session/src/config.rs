//! # Session Configuration
//!
//! Configuration loaded once at session bootstrap.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`EDUMART_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session configuration.
///
/// Most fields have sensible defaults for development. Production
/// deployments should configure these properly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Path to the SQLite session database.
    pub storage_path: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Route the UI should navigate to after a successful points checkout.
    pub purchased_courses_route: String,

    /// Delay before that navigation, in milliseconds.
    /// Long enough for the success notification to be seen.
    pub redirect_delay_ms: u64,
}

impl Default for SessionConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Storage: `./edumart-session.db`
    /// - Currency: USD ($), 2 decimals
    /// - Redirect: `/dashboard/my-courses` after 1500 ms
    fn default() -> Self {
        SessionConfig {
            storage_path: "./edumart-session.db".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            purchased_courses_route: "/dashboard/my-courses".to_string(),
            redirect_delay_ms: 1500,
        }
    }
}

impl SessionConfig {
    /// Creates a SessionConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `EDUMART_STORAGE_PATH`: Override the session database path
    /// - `EDUMART_CURRENCY_SYMBOL`: Override the currency symbol
    /// - `EDUMART_REDIRECT_DELAY_MS`: Override the post-checkout delay
    pub fn from_env() -> Self {
        let mut config = SessionConfig::default();

        if let Ok(path) = std::env::var("EDUMART_STORAGE_PATH") {
            config.storage_path = path;
        }

        if let Ok(symbol) = std::env::var("EDUMART_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(delay_str) = std::env::var("EDUMART_REDIRECT_DELAY_MS") {
            if let Ok(delay) = delay_str.parse::<u64>() {
                config.redirect_delay_ms = delay;
            }
        }

        config
    }

    /// The post-checkout redirect delay as a `Duration`.
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = SessionConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}
