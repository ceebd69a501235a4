// Invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Invoice, InvoiceLine, InvoiceResponse};
pub use repositories::{InvoiceRepository, SqliteInvoiceRepository};
pub use services::InvoiceService;
