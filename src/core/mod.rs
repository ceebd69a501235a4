pub mod error;
pub mod vat;

pub use error::{AppError, AppResult, ValidationErrors};
pub use vat::VatRate;
