//! Services module for invoice-service.

pub mod calculator;
pub mod database;
pub mod line_items;
pub mod metrics;
pub mod normalizer;
pub mod presentation;
pub mod renderer;
pub mod source;

pub use calculator::TotalsCalculator;
pub use database::Database;
pub use line_items::resolve_rows;
pub use metrics::{get_metrics, init_metrics};
pub use presentation::PresentationAdapter;
pub use renderer::{ComputedInvoice, InvoiceEngine, InvoiceRenderer};
pub use source::{InMemorySource, InvoiceRecords, RecordSource};
