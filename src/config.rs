//! Dashboard configuration loaded from environment variables.
//!
//! - `BACKEND_URL` - sales backend base URL (default: `https://zapateria-back.vercel.app`)
//! - `DASHBOARD_CURRENCY` - ISO-4217 code used for money amounts (default: `COP`)
//! - `DASHBOARD_LOCALE` - locale tag used for separators (default: `es-CO`)
//! - `PORT` - listen port (default: `8080`)
//! - `BACKEND_TIMEOUT_SECS` - per-request timeout, `0` disables it (default: `30`)
//! - `DASHBOARD_PRODUCT_PANELS` - product panels kept before the oldest is dropped (default: `64`)
//! - `RUST_LOG` - log filter (default: `info`)

use std::{env, time::Duration};

pub const DEFAULT_BACKEND_URL: &str = "https://zapateria-back.vercel.app";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PRODUCT_PANELS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyConfig {
    pub currency: String,
    pub locale: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            currency: "COP".to_string(),
            locale: "es-CO".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub backend_base: String,
    pub currency: CurrencyConfig,
    pub port: u16,
    pub request_timeout: Option<Duration>,
    pub product_panels: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_base: DEFAULT_BACKEND_URL.to_string(),
            currency: CurrencyConfig::default(),
            port: DEFAULT_PORT,
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            product_panels: DEFAULT_PRODUCT_PANELS,
        }
    }
}

impl DashboardConfig {
    /// Reads the process environment, honoring a local `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves every setting through `lookup`, falling back to defaults for
    /// missing, blank or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();

        let backend_base = value("BACKEND_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.backend_base);

        let currency = CurrencyConfig {
            currency: value("DASHBOARD_CURRENCY").unwrap_or(defaults.currency.currency),
            locale: value("DASHBOARD_LOCALE").unwrap_or(defaults.currency.locale),
        };

        let port = value("PORT")
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let request_timeout = match value("BACKEND_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        let product_panels = value("DASHBOARD_PRODUCT_PANELS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.product_panels);

        Self {
            backend_base,
            currency,
            port,
            request_timeout,
            product_panels,
        }
    }
}
