use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};

use crate::core::{AppError, AppResult, VatRate};
use crate::modules::invoices::models::{Invoice, InvoiceLine};

/// Persistence gateway for invoices and their lines
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// All invoices, each with its full line collection
    async fn list(&self) -> AppResult<Vec<Invoice>>;

    /// One invoice with its lines in insertion order
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>>;

    async fn find_by_client(&self, client_id: i64) -> AppResult<Vec<Invoice>>;

    async fn insert(&self, client_id: i64, date: NaiveDate) -> AppResult<Invoice>;

    /// Persist a line already attached to an invoice; returns the
    /// stored line with its assigned id.
    async fn insert_line(&self, line: &InvoiceLine) -> AppResult<InvoiceLine>;

    async fn update(&self, id: i64, client_id: i64, date: NaiveDate) -> AppResult<()>;

    /// Deletes the invoice; its lines go with it through the schema's
    /// cascade rule.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// SQLite-backed invoice repository
pub struct SqliteInvoiceRepository {
    pool: SqlitePool,
}

impl SqliteInvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_lines(&self, invoice_id: i64) -> AppResult<Vec<InvoiceLine>> {
        let rows = sqlx::query_as::<_, InvoiceLineRow>(
            "SELECT id, invoice_id, description, quantity, unit_price, vat_rate \
             FROM invoice_lines WHERE invoice_id = ? ORDER BY id",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceLineRow::into_line).collect()
    }

    async fn attach_lines(&self, rows: Vec<InvoiceRow>) -> AppResult<Vec<Invoice>> {
        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.find_lines(row.id).await?;
            invoices.push(row.into_invoice(lines));
        }
        Ok(invoices)
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    async fn list(&self) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, date, client_id FROM invoices",
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_lines(rows).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, date, client_id FROM invoices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = self.find_lines(row.id).await?;
        Ok(Some(row.into_invoice(lines)))
    }

    async fn find_by_client(&self, client_id: i64) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, date, client_id FROM invoices WHERE client_id = ?",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_lines(rows).await
    }

    async fn insert(&self, client_id: i64, date: NaiveDate) -> AppResult<Invoice> {
        let result = sqlx::query("INSERT INTO invoices (date, client_id) VALUES (?, ?)")
            .bind(date)
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(Invoice {
            id: result.last_insert_rowid(),
            date,
            client_id,
            lines: Vec::new(),
        })
    }

    async fn insert_line(&self, line: &InvoiceLine) -> AppResult<InvoiceLine> {
        let result = sqlx::query(
            "INSERT INTO invoice_lines (invoice_id, description, quantity, unit_price, vat_rate) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(line.invoice_id)
        .bind(&line.description)
        .bind(line.quantity)
        .bind(line.unit_price.to_string())
        .bind(line.vat_rate.code())
        .execute(&self.pool)
        .await?;

        Ok(InvoiceLine {
            id: result.last_insert_rowid(),
            ..line.clone()
        })
    }

    async fn update(&self, id: i64, client_id: i64, date: NaiveDate) -> AppResult<()> {
        sqlx::query("UPDATE invoices SET date = ?, client_id = ? WHERE id = ?")
            .bind(date)
            .bind(client_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(FromRow)]
struct InvoiceRow {
    id: i64,
    date: NaiveDate,
    client_id: i64,
}

impl InvoiceRow {
    fn into_invoice(self, lines: Vec<InvoiceLine>) -> Invoice {
        Invoice {
            id: self.id,
            date: self.date,
            client_id: self.client_id,
            lines,
        }
    }
}

/// SQLite has no decimal type; amounts and rates round-trip through
/// TEXT columns and are decoded here.
#[derive(FromRow)]
struct InvoiceLineRow {
    id: i64,
    invoice_id: i64,
    description: String,
    quantity: i64,
    unit_price: String,
    vat_rate: String,
}

impl InvoiceLineRow {
    fn into_line(self) -> AppResult<InvoiceLine> {
        let unit_price = Decimal::from_str(&self.unit_price).map_err(|e| {
            AppError::internal(format!(
                "stored unit price '{}' is not a decimal: {}",
                self.unit_price, e
            ))
        })?;

        let vat_rate = self.vat_rate.parse::<VatRate>().map_err(AppError::Internal)?;

        Ok(InvoiceLine {
            id: self.id,
            invoice_id: self.invoice_id,
            description: self.description,
            quantity: self.quantity,
            unit_price,
            vat_rate,
        })
    }
}
