use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, ValidationErrors, VatRate};

/// A single billable entry on an invoice.
///
/// Amounts are pure functions of the stored fields, recomputed on every
/// access and never rounded; results carry full computed precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: i64,

    /// Owning invoice; 0 while the line is unattached
    pub invoice_id: i64,

    pub description: String,

    /// Always >= 1
    pub quantity: i64,

    /// Price before tax, always > 0
    pub unit_price: Decimal,

    pub vat_rate: VatRate,
}

impl InvoiceLine {
    /// Create a new line with validation
    pub fn new(
        description: String,
        quantity: i64,
        unit_price: Decimal,
        vat_rate: VatRate,
    ) -> AppResult<Self> {
        Self::validate(&description, quantity, unit_price).into_result()?;

        Ok(Self {
            id: 0,
            invoice_id: 0,
            description,
            quantity,
            unit_price,
            vat_rate,
        })
    }

    /// Collect every field violation; the VAT rate is already closed by
    /// its type, callers parsing an external rate string report that
    /// failure under the `vat_rate` key themselves.
    pub fn validate(description: &str, quantity: i64, unit_price: Decimal) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if description.trim().is_empty() {
            errors.add("description", "description must not be empty");
        }

        if quantity < 1 {
            errors.add("quantity", "quantity must be at least 1");
        }

        if unit_price <= Decimal::ZERO {
            errors.add("unit_price", "unit price must be greater than 0");
        }

        errors
    }

    /// Amount before tax: quantity x unit price
    pub fn amount_excl_tax(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// VAT amount: amount before tax x (rate / 100)
    pub fn vat_amount(&self) -> Decimal {
        self.amount_excl_tax() * self.vat_rate.percent() / Decimal::ONE_HUNDRED
    }

    /// Tax-included amount: amount before tax + VAT
    pub fn amount_incl_tax(&self) -> Decimal {
        self.amount_excl_tax() + self.vat_amount()
    }
}
