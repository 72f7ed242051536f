//! Store settings
//!
//! Branding and behaviour a store owner configures once: display name,
//! the `WhatsApp` number orders are sent to, the currency, the optional tax
//! rate and the base URL for tracking links. Loaded from a YAML file.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::PricingPolicy;

/// Errors that can occur while loading store settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Tax rate outside the closed range [0, 1]
    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(f64),
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    name: String,
    whatsapp_number: String,
    currency: String,
    #[serde(default)]
    tax_rate: Option<f64>,
    tracking_base_url: String,
}

/// A store's settings and branding.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Store display name
    pub name: String,

    /// `WhatsApp` number orders are handed off to
    pub whatsapp_number: String,

    /// Store currency
    pub currency: &'static Currency,

    /// Optional tax rate applied to the pre-delivery subtotal
    pub tax_rate: Option<Percentage>,

    /// Base URL tracking tokens are appended to
    pub tracking_base_url: String,
}

impl StoreSettings {
    /// Parse settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if the YAML is malformed, the currency
    /// code is unknown, or the tax rate is out of range.
    pub fn from_yaml(contents: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_norway::from_str(contents)?;

        let currency = iso::find(&raw.currency)
            .ok_or_else(|| SettingsError::UnknownCurrency(raw.currency.clone()))?;

        let tax_rate = match raw.tax_rate {
            None => None,
            Some(rate) if (0.0..=1.0).contains(&rate) => Some(Percentage::from(rate)),
            Some(rate) => return Err(SettingsError::InvalidTaxRate(rate)),
        };

        Ok(StoreSettings {
            name: raw.name,
            whatsapp_number: raw.whatsapp_number,
            currency,
            tax_rate,
            tracking_base_url: raw.tracking_base_url,
        })
    }

    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// The pricing policy this store runs with.
    #[must_use]
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy { tax: self.tax_rate }
    }

    /// The public tracking URL for a token.
    #[must_use]
    pub fn tracking_url(&self, token: &str) -> String {
        let base = self.tracking_base_url.trim_end_matches('/');

        format!("{base}/{token}")
    }
}
