use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of allowed VAT rates.
///
/// French VAT bands: 0%, reduced 5.5%, intermediate 10%, standard 20%.
/// Every consumer matches exhaustively; there is no escape hatch for an
/// arbitrary percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatRate {
    Zero,
    Reduced,
    Intermediate,
    Standard,
}

impl VatRate {
    pub const ALL: [VatRate; 4] = [
        VatRate::Zero,
        VatRate::Reduced,
        VatRate::Intermediate,
        VatRate::Standard,
    ];

    /// Exact percentage value of this rate.
    pub fn percent(&self) -> Decimal {
        match self {
            VatRate::Zero => Decimal::ZERO,
            VatRate::Reduced => Decimal::new(55, 1),
            VatRate::Intermediate => Decimal::new(10, 0),
            VatRate::Standard => Decimal::new(20, 0),
        }
    }

    /// Display label, e.g. "5.5%".
    pub fn label(&self) -> &'static str {
        match self {
            VatRate::Zero => "0%",
            VatRate::Reduced => "5.5%",
            VatRate::Intermediate => "10%",
            VatRate::Standard => "20%",
        }
    }

    /// Stable identifier, used as the persisted form.
    pub fn code(&self) -> &'static str {
        match self {
            VatRate::Zero => "ZERO",
            VatRate::Reduced => "REDUCED",
            VatRate::Intermediate => "INTERMEDIATE",
            VatRate::Standard => "STANDARD",
        }
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VatRate {
    type Err = String;

    /// Accepts the stable code or the percentage value ("5.5", "5.5%").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ZERO" | "0" | "0%" => Ok(VatRate::Zero),
            "REDUCED" | "5.5" | "5.5%" => Ok(VatRate::Reduced),
            "INTERMEDIATE" | "10" | "10%" => Ok(VatRate::Intermediate),
            "STANDARD" | "20" | "20%" => Ok(VatRate::Standard),
            _ => Err(format!(
                "unknown VAT rate '{}', expected one of 0%, 5.5%, 10%, 20%",
                s
            )),
        }
    }
}
