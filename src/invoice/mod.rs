//! Invoices and the form for creating them.
//!
//! The new invoice page prefills its numbering fields from the most recently
//! created invoice, which is also exposed as a small JSON endpoint.

mod core;
mod create_endpoint;
mod form_page;
mod prev_endpoint;

pub use core::{Invoice, NewInvoice, create_invoice, create_invoice_table};
pub use create_endpoint::{CreateInvoiceState, create_invoice_endpoint};
pub use form_page::{NewInvoicePageState, get_new_invoice_page};
pub use prev_endpoint::{PrevInvoiceState, get_prev_invoice_endpoint};
