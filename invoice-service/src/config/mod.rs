//! Configuration module for invoice-service.

use rust_decimal::Decimal;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct InvoiceConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Absent when no record store is configured; renders then report unavailable.
    pub database: Option<DatabaseConfig>,
    pub tax: TaxConfig,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxConfig {
    /// GST percentage for `gst` invoices that record neither an amount nor a rate.
    pub default_gst_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_gst_rate: Decimal::from(18),
        }
    }
}

/// Formatting conventions and the shop's letterhead.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationConfig {
    pub currency_symbol: String,
    /// chrono format string.
    pub date_format: String,
    pub placeholder: String,
    pub shop_name: String,
    pub shop_tagline: String,
    pub shop_phone: String,
    pub shop_email: String,
    pub terms: Vec<String>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            placeholder: "N/A".to_string(),
            shop_name: "OM MURUGAN AUTO WORKS".to_string(),
            shop_tagline: "Complete Auto Care Solutions".to_string(),
            shop_phone: "+91 98765 43210".to_string(),
            shop_email: "info@ommurugan.com".to_string(),
            terms: vec![
                "Payment is due within 30 days".to_string(),
                "All services carry warranty as per terms".to_string(),
                "Vehicle will be released only after payment".to_string(),
            ],
        }
    }
}

impl InvoiceConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Some(DatabaseConfig {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            }),
            _ => None,
        };

        let tax = match env::var("INVOICE_DEFAULT_GST_RATE") {
            Ok(raw) => TaxConfig {
                default_gst_rate: parse_rate(&raw)?,
            },
            Err(_) => TaxConfig::default(),
        };

        let defaults = PresentationConfig::default();
        let presentation = PresentationConfig {
            currency_symbol: env::var("INVOICE_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            date_format: env::var("INVOICE_DATE_FORMAT").unwrap_or(defaults.date_format),
            placeholder: env::var("INVOICE_PLACEHOLDER").unwrap_or(defaults.placeholder),
            shop_name: env::var("SHOP_NAME").unwrap_or(defaults.shop_name),
            shop_tagline: env::var("SHOP_TAGLINE").unwrap_or(defaults.shop_tagline),
            shop_phone: env::var("SHOP_PHONE").unwrap_or(defaults.shop_phone),
            shop_email: env::var("SHOP_EMAIL").unwrap_or(defaults.shop_email),
            terms: env::var("INVOICE_TERMS")
                .map(|raw| parse_terms(&raw))
                .unwrap_or(defaults.terms),
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "invoice-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database,
            tax,
            presentation,
        })
    }
}

fn parse_rate(raw: &str) -> Result<Decimal, AppError> {
    let rate = Decimal::from_str(raw.trim()).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("INVOICE_DEFAULT_GST_RATE is not a number: {}", e))
    })?;
    if rate.is_sign_negative() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "INVOICE_DEFAULT_GST_RATE must not be negative"
        )));
    }
    Ok(rate)
}

/// `|`-separated terms, blanks dropped.
fn parse_terms(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate(" 12.5 ").unwrap(), Decimal::new(125, 1));
        assert!(parse_rate("-1").is_err());
        assert!(parse_rate("eighteen").is_err());
    }

    #[test]
    fn test_parse_terms() {
        assert_eq!(
            parse_terms("Pay in 7 days | | No warranty on used parts"),
            vec!["Pay in 7 days", "No warranty on used parts"]
        );
    }
}
