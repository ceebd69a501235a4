mod invoice;
mod invoice_line;

pub use invoice::{
    AddLinePayload, Invoice, InvoiceLineResponse, InvoicePayload, InvoiceResponse,
};
pub use invoice_line::InvoiceLine;
