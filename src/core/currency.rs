use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AppError;

/// Currencies accepted by PayU
///
/// Every code is transmitted in minor units (1/100), see [`crate::core::amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    BGN,
    CHF,
    CZK,
    DKK,
    EUR,
    GBP,
    HRK,
    HUF,
    NOK,
    PLN,
    RON,
    RUB,
    SEK,
    UAH,
    USD,
}

impl Currency {
    pub const ALL: [Currency; 15] = [
        Currency::BGN,
        Currency::CHF,
        Currency::CZK,
        Currency::DKK,
        Currency::EUR,
        Currency::GBP,
        Currency::HRK,
        Currency::HUF,
        Currency::NOK,
        Currency::PLN,
        Currency::RON,
        Currency::RUB,
        Currency::SEK,
        Currency::UAH,
        Currency::USD,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BGN => "BGN",
            Currency::CHF => "CHF",
            Currency::CZK => "CZK",
            Currency::DKK => "DKK",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::HRK => "HRK",
            Currency::HUF => "HUF",
            Currency::NOK => "NOK",
            Currency::PLN => "PLN",
            Currency::RON => "RON",
            Currency::RUB => "RUB",
            Currency::SEK => "SEK",
            Currency::UAH => "UAH",
            Currency::USD => "USD",
        }
    }

    /// Caller-facing decimal scale. PayU counts every currency in hundredths.
    pub fn scale(&self) -> u32 {
        2
    }

    /// Validates that a decimal value fits the currency's scale and is not negative
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), AppError> {
        if amount.normalize().scale() > self.scale() {
            return Err(AppError::validation(format!(
                "{} amounts must have at most {} decimal places, got {}",
                self,
                self.scale(),
                amount
            )));
        }

        if amount < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "{} amount cannot be negative",
                self
            )));
        }

        Ok(())
    }

    /// Formats an amount for display with the correct decimal places
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{} {:.2}", self, amount)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| AppError::configuration(format!("Unsupported currency: {}", s)))
    }
}

impl TryFrom<&str> for Currency {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Currency {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
