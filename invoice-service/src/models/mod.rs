//! Domain models for invoice-service.

mod customer;
mod document;
mod invoice;
mod line_item;
mod raw_record;
mod totals;
mod vehicle;

pub use customer::Customer;
pub use document::{
    DisplayRow, DocumentSection, InvoiceDocument, PrintLayout, RenderedInvoice, SectionKind,
    Surface,
};
pub use invoice::{
    DiscountSpec, ExtraCharge, GstSpec, Invoice, InvoiceKind, InvoiceStatus, TaxTreatment,
};
pub use line_item::{BillableRow, LineItem, RowOrigin};
pub use raw_record::RawRecord;
pub use totals::{DiscountResolution, TaxBreakdown, Totals};
pub use vehicle::{Vehicle, VehicleCategory};
