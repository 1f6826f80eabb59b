//! Externally supplied thresholds for the calculation engine.

use std::path::Path;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CurrencyKind;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML could not be parsed.
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its accepted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Length of a currency's validity after its triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityPeriod {
    /// A number of calendar days.
    Days(u32),
    /// A number of calendar months, clamped to the end of shorter months.
    Months(u32),
}

impl ValidityPeriod {
    /// `date` plus this period, or `None` past the representable range.
    pub fn add_to(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            ValidityPeriod::Days(n) => date.checked_add_days(Days::new(u64::from(n))),
            ValidityPeriod::Months(n) => date.checked_add_months(Months::new(n)),
        }
    }

    fn is_zero(self) -> bool {
        matches!(self, ValidityPeriod::Days(0) | ValidityPeriod::Months(0))
    }
}

/// Validity period per currency kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyValidity {
    /// Licence validity.
    pub licence: ValidityPeriod,
    /// Type rating validity.
    pub type_rating: ValidityPeriod,
    /// Line check validity.
    pub line_check: ValidityPeriod,
    /// Medical validity.
    pub medical: ValidityPeriod,
    /// First custom slot validity.
    pub custom1: ValidityPeriod,
    /// Second custom slot validity.
    pub custom2: ValidityPeriod,
}

impl Default for CurrencyValidity {
    fn default() -> Self {
        Self {
            licence: ValidityPeriod::Months(60),
            type_rating: ValidityPeriod::Months(12),
            line_check: ValidityPeriod::Months(12),
            medical: ValidityPeriod::Months(12),
            custom1: ValidityPeriod::Months(12),
            custom2: ValidityPeriod::Months(12),
        }
    }
}

impl CurrencyValidity {
    /// Period configured for `kind`.
    pub fn period(&self, kind: CurrencyKind) -> ValidityPeriod {
        match kind {
            CurrencyKind::Licence => self.licence,
            CurrencyKind::TypeRating => self.type_rating,
            CurrencyKind::LineCheck => self.line_check,
            CurrencyKind::Medical => self.medical,
            CurrencyKind::Custom1 => self.custom1,
            CurrencyKind::Custom2 => self.custom2,
        }
    }
}

/// Take-off and landing recency requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeoffLandingRule {
    /// Look-back window in days.
    pub window_days: u32,
    /// Take-offs and landings required inside the window.
    pub required: u32,
}

impl Default for TakeoffLandingRule {
    fn default() -> Self {
        Self {
            window_days: 90,
            required: 3,
        }
    }
}

/// Thresholds consumed by the calculation engine and database service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// Solar elevation in degrees below which a minute counts as night.
    pub night_angle_deg: f64,
    /// Days before expiry at which a currency is flagged as expiring soon.
    pub currency_warning_days: u32,
    /// Validity periods per currency kind.
    pub validity: CurrencyValidity,
    /// Take-off and landing recency requirement.
    pub takeoff_landing: TakeoffLandingRule,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            night_angle_deg: -6.0,
            currency_warning_days: 30,
            validity: CurrencyValidity::default(),
            takeoff_landing: TakeoffLandingRule::default(),
        }
    }
}

impl LogbookConfig {
    /// Parses and validates a TOML document; absent keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.night_angle_deg.is_finite() || !(-18.0..=0.0).contains(&self.night_angle_deg) {
            return Err(ConfigError::Invalid(format!(
                "night_angle_deg must be within [-18, 0], got {}",
                self.night_angle_deg
            )));
        }
        let v = &self.validity;
        for (name, period) in [
            ("licence", v.licence),
            ("type_rating", v.type_rating),
            ("line_check", v.line_check),
            ("medical", v.medical),
            ("custom1", v.custom1),
            ("custom2", v.custom2),
        ] {
            if period.is_zero() {
                return Err(ConfigError::Invalid(format!("validity.{name} must not be zero")));
            }
        }
        if self.takeoff_landing.window_days == 0 || self.takeoff_landing.required == 0 {
            return Err(ConfigError::Invalid(
                "takeoff_landing window and required count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
