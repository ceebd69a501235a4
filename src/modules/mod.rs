pub mod clients;
pub mod invoices;
