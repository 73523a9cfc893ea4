//! Invoice model for invoice-service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItem;

/// Invoice kind. GST invoices split tax into CGST and SGST halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceKind {
    Gst,
    NonGst,
}

impl InvoiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceKind::Gst => "gst",
            InvoiceKind::NonGst => "non-gst",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceKind::Gst => "GST Invoice",
            InvoiceKind::NonGst => "Non-GST Invoice",
        }
    }

    /// Accepts the spellings seen across schema versions.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gst" => Some(InvoiceKind::Gst),
            "non-gst" | "non_gst" | "nongst" | "non gst" => Some(InvoiceKind::NonGst),
            _ => None,
        }
    }
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "pending" | "unpaid" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" | "canceled" | "void" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Named fee outside the line items and labor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub name: Option<String>,
    pub amount: Decimal,
}

/// Invoice-level discount as recorded. Both fields may be present in old
/// rows; the percentage takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountSpec {
    pub percentage: Option<Decimal>,
    pub amount: Option<Decimal>,
}

impl DiscountSpec {
    pub fn percentage(value: Decimal) -> Self {
        Self {
            percentage: Some(value),
            amount: None,
        }
    }

    pub fn amount(value: Decimal) -> Self {
        Self {
            percentage: None,
            amount: Some(value),
        }
    }

    pub fn is_recorded(&self) -> bool {
        self.percentage.is_some() || self.amount.is_some()
    }
}

/// GST figures recorded on a `gst` invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GstSpec {
    /// Stored total GST amount.
    pub amount: Option<Decimal>,
    /// GST rate as a percentage (18 means 18%).
    pub rate: Option<Decimal>,
    pub cgst: Option<Decimal>,
    pub sgst: Option<Decimal>,
}

/// How tax is applied to the taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxTreatment {
    /// Stored flat amount, passed through unchanged.
    Flat { amount: Option<Decimal> },
    Gst(GstSpec),
}

/// Normalized invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub created_on: NaiveDate,
    pub due_on: Option<NaiveDate>,
    pub kind: InvoiceKind,
    pub status: Option<InvoiceStatus>,
    pub items: Vec<LineItem>,
    pub labor_charge: Option<Decimal>,
    pub extra_charges: Vec<ExtraCharge>,
    pub discount: DiscountSpec,
    /// Flat tax for non-GST invoices.
    pub flat_tax: Option<Decimal>,
    pub gst: GstSpec,
    pub notes: Option<String>,
    pub kilometers: Option<u64>,
}

impl Invoice {
    pub fn tax_treatment(&self) -> TaxTreatment {
        match self.kind {
            InvoiceKind::Gst => TaxTreatment::Gst(self.gst.clone()),
            InvoiceKind::NonGst => TaxTreatment::Flat {
                amount: self.flat_tax,
            },
        }
    }
}
