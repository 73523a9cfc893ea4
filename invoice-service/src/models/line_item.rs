//! Line item and billable row models for invoice-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line item on an invoice.
///
/// Any total stored alongside the item upstream is kept only for drift
/// detection; the billable amount is always [`LineItem::line_total`].
/// Amount arithmetic is checked: `None` means the row overflows a decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: Option<String>,
    /// Free-form classification such as `service` or `part`.
    pub item_type: Option<String>,
    /// HSN/SAC classification code.
    pub hsn_sac_code: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub discount: Option<Decimal>,
    pub stored_total: Option<Decimal>,
}

impl LineItem {
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)?
            .checked_sub(self.discount.unwrap_or(Decimal::ZERO))
    }
}

/// Where a billable row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowOrigin {
    Item { index: usize },
    Labor,
    ExtraCharge { index: usize },
}

impl RowOrigin {
    /// Record path of `attribute` on the row's source, used in error messages.
    pub fn field(&self, attribute: &str) -> String {
        match self {
            RowOrigin::Item { index } => format!("items[{}].{}", index, attribute),
            RowOrigin::Labor => "labor_charges".to_string(),
            RowOrigin::ExtraCharge { index } => format!("extra_charges[{}].amount", index),
        }
    }
}

/// One entry of the item table, after labor and extra charges are expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillableRow {
    pub origin: RowOrigin,
    pub description: Option<String>,
    pub item_type: Option<String>,
    pub hsn_sac_code: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

impl BillableRow {
    /// Quantity times unit price, less the row discount.
    pub fn line_total(&self) -> Option<Decimal> {
        self.gross()?.checked_sub(self.discount)
    }

    pub fn gross(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}
