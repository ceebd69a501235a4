use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{AppError, AppResult, VatRate};
use crate::modules::clients::models::Client;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::invoices::models::{
    AddLinePayload, Invoice, InvoiceLine, InvoiceLineResponse, InvoiceResponse,
};
use crate::modules::invoices::repositories::InvoiceRepository;

/// Service for invoice business logic.
///
/// Every read returns the invoice with its full line collection and its
/// client resolved, so derived totals and client display fields are
/// immediately usable.
pub struct InvoiceService {
    invoice_repo: Arc<dyn InvoiceRepository>,
    client_repo: Arc<dyn ClientRepository>,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: Arc<dyn InvoiceRepository>,
        client_repo: Arc<dyn ClientRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            client_repo,
        }
    }

    /// List all invoices
    pub async fn list(&self) -> AppResult<Vec<InvoiceResponse>> {
        let invoices = self.invoice_repo.list().await?;
        self.to_responses(invoices).await
    }

    /// Get an invoice by id. Absence is not an error.
    pub async fn get(&self, id: i64) -> AppResult<Option<InvoiceResponse>> {
        let Some(invoice) = self.invoice_repo.find_by_id(id).await? else {
            return Ok(None);
        };

        let client = self.resolve_client(&invoice).await?;
        Ok(Some(to_response(invoice, client)))
    }

    /// List the invoices of one client; empty when the client has none
    /// or does not exist.
    pub async fn list_for_client(&self, client_id: i64) -> AppResult<Vec<InvoiceResponse>> {
        let invoices = self.invoice_repo.find_by_client(client_id).await?;
        self.to_responses(invoices).await
    }

    /// Create a new invoice bound to an existing client, with an empty
    /// line collection.
    pub async fn create(&self, client_id: i64, date: NaiveDate) -> AppResult<InvoiceResponse> {
        let client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("client {} not found", client_id)))?;

        let invoice = self.invoice_repo.insert(client_id, date).await?;

        tracing::info!(invoice_id = invoice.id, client_id, "invoice created");

        Ok(to_response(invoice, client))
    }

    /// Add a line to an existing invoice and return the updated
    /// aggregate.
    pub async fn add_line(
        &self,
        invoice_id: i64,
        payload: AddLinePayload,
    ) -> AppResult<InvoiceResponse> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice {} not found", invoice_id)))?;

        // Field checks and the closed-set rate check are collected into
        // one validation outcome.
        let mut errors =
            InvoiceLine::validate(&payload.description, payload.quantity, payload.unit_price);
        let vat_rate = match payload.vat_rate.parse::<VatRate>() {
            Ok(rate) => Some(rate),
            Err(message) => {
                errors.add("vat_rate", message);
                None
            }
        };
        errors.into_result()?;

        let Some(vat_rate) = vat_rate else {
            // Unreachable: a missing rate was recorded above.
            return Err(AppError::internal("VAT rate missing after validation"));
        };

        let mut line = InvoiceLine::new(
            payload.description,
            payload.quantity,
            payload.unit_price,
            vat_rate,
        )?;
        line.invoice_id = invoice.id;

        let stored = self.invoice_repo.insert_line(&line).await?;
        invoice.add_line(stored);

        let client = self.resolve_client(&invoice).await?;
        Ok(to_response(invoice, client))
    }

    /// Reassign an invoice's date and client. Existing lines are
    /// untouched.
    pub async fn update(
        &self,
        id: i64,
        client_id: i64,
        date: NaiveDate,
    ) -> AppResult<InvoiceResponse> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice {} not found", id)))?;

        let client = self
            .client_repo
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("client {} not found", client_id)))?;

        self.invoice_repo.update(id, client_id, date).await?;

        invoice.client_id = client_id;
        invoice.date = date;

        Ok(to_response(invoice, client))
    }

    /// Delete an invoice and, by cascade, all of its lines.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.invoice_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("invoice {} not found", id)));
        }

        self.invoice_repo.delete(id).await?;

        tracing::info!(invoice_id = id, "invoice deleted");

        Ok(())
    }

    /// The foreign key guarantees the client row exists; a miss here is
    /// a corrupt store, not a caller error.
    async fn resolve_client(&self, invoice: &Invoice) -> AppResult<Client> {
        self.client_repo
            .find_by_id(invoice.client_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "invoice {} references missing client {}",
                    invoice.id, invoice.client_id
                ))
            })
    }

    async fn to_responses(&self, invoices: Vec<Invoice>) -> AppResult<Vec<InvoiceResponse>> {
        let mut responses = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let client = self.resolve_client(&invoice).await?;
            responses.push(to_response(invoice, client));
        }
        Ok(responses)
    }
}

/// Convert an invoice and its resolved client to the response DTO
fn to_response(invoice: Invoice, client: Client) -> InvoiceResponse {
    InvoiceResponse {
        id: invoice.id,
        date: invoice.date,
        client,
        total_excl_tax: invoice.total_excl_tax().to_string(),
        total_vat: invoice.total_vat().to_string(),
        total_incl_tax: invoice.total_incl_tax().to_string(),
        lines: invoice
            .lines
            .iter()
            .map(|line| InvoiceLineResponse {
                id: line.id,
                description: line.description.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price.to_string(),
                vat_rate: line.vat_rate.code().to_string(),
                vat_rate_label: line.vat_rate.label().to_string(),
                amount_excl_tax: line.amount_excl_tax().to_string(),
                vat_amount: line.vat_amount().to_string(),
                amount_incl_tax: line.amount_incl_tax().to_string(),
            })
            .collect(),
    }
}
