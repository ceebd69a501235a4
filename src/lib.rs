//! Facturation — client and invoice management service
//!
//! This library provides the domain model and services for a billing
//! application: clients with uniqueness guarantees on email and SIRET,
//! invoices with line items, and exact-decimal HT / TVA / TTC amounts
//! under the closed set of French VAT rates.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::clients;
pub use modules::invoices;
