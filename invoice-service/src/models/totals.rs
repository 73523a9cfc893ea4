//! Derived invoice totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which recorded discount field produced the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountResolution {
    /// Nothing recorded; no discount row is shown.
    NotRecorded,
    Percentage { percentage: Decimal },
    Amount { amount: Decimal },
    /// Both were recorded; the percentage was applied and the amount ignored.
    PercentageOverAmount {
        percentage: Decimal,
        ignored_amount: Decimal,
    },
}

impl DiscountResolution {
    pub fn is_recorded(&self) -> bool {
        !matches!(self, DiscountResolution::NotRecorded)
    }

    /// Percentage actually applied, if any.
    pub fn applied_percentage(&self) -> Option<Decimal> {
        match self {
            DiscountResolution::Percentage { percentage }
            | DiscountResolution::PercentageOverAmount { percentage, .. } => Some(*percentage),
            _ => None,
        }
    }
}

/// Tax applied on top of the taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxBreakdown {
    Flat {
        amount: Decimal,
    },
    /// Always an equal split; `cgst + sgst` is the billed GST.
    Gst {
        rate: Option<Decimal>,
        cgst: Decimal,
        sgst: Decimal,
    },
}

impl TaxBreakdown {
    pub fn total(&self) -> Decimal {
        match self {
            TaxBreakdown::Flat { amount } => *amount,
            TaxBreakdown::Gst { cgst, sgst, .. } => cgst + sgst,
        }
    }
}

/// Totals for one invoice. Every amount is rounded to two decimal places,
/// except that the GST halves of a stored odd-paise total carry half a
/// paisa each. `grand_total == taxable_base + tax.total()` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub discount_resolution: DiscountResolution,
    pub taxable_base: Decimal,
    pub tax: TaxBreakdown,
    pub grand_total: Decimal,
}
