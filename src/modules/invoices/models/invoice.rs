use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice_line::InvoiceLine;
use crate::modules::clients::models::Client;

/// An invoice bound to exactly one client.
///
/// The invoice owns its lines exclusively; the client relation is a
/// plain id, reverse lookups are queries by that id, never stored
/// back-pointers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,

    pub date: NaiveDate,

    pub client_id: i64,

    /// Lines in insertion order
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    /// Append a line and stamp its owning-invoice reference.
    pub fn add_line(&mut self, mut line: InvoiceLine) {
        line.invoice_id = self.id;
        self.lines.push(line);
    }

    /// Remove a line by identity, clearing its owning-invoice reference.
    pub fn remove_line(&mut self, line_id: i64) -> Option<InvoiceLine> {
        let position = self.lines.iter().position(|line| line.id == line_id)?;
        let mut line = self.lines.remove(position);
        line.invoice_id = 0;
        Some(line)
    }

    /// Total before tax: sum of line amounts in insertion order
    pub fn total_excl_tax(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::amount_excl_tax).sum()
    }

    /// Total VAT: sum of line VAT amounts
    pub fn total_vat(&self) -> Decimal {
        self.lines.iter().map(InvoiceLine::vat_amount).sum()
    }

    /// Tax-included total
    pub fn total_incl_tax(&self) -> Decimal {
        self.total_excl_tax() + self.total_vat()
    }
}

/// Request body for creating and updating invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub client_id: i64,
    pub date: NaiveDate,
}

/// Request body for adding a line to an invoice.
///
/// The VAT rate arrives as a string and is checked against the closed
/// set explicitly, so an unknown rate surfaces as a field-level
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLinePayload {
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub vat_rate: String,
}

/// Invoice representation returned by every read: lines and client are
/// always fully resolved, totals are immediately usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub client: Client,
    pub lines: Vec<InvoiceLineResponse>,
    pub total_excl_tax: String,
    pub total_vat: String,
    pub total_incl_tax: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineResponse {
    pub id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: String,
    pub vat_rate: String,
    pub vat_rate_label: String,
    pub amount_excl_tax: String,
    pub vat_amount: String,
    pub amount_incl_tax: String,
}
