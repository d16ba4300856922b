//! Financial transaction records and the company summary endpoint.
//!
//! A record is one income or expense entry. It belongs to a company, or to an
//! employee, or stands alone with a free-text "self" label. The summary
//! endpoint aggregates a company's published records into display-ready
//! summaries and running totals.

mod core;
mod query;
mod summary;
mod summary_endpoint;

pub use core::{Record, RecordBuilder, RecordType, create_record_table};
pub use summary_endpoint::{CompanySummaryState, get_company_summary_endpoint};
