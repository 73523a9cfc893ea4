//! Tax and totals calculation.
//!
//! Line totals are summed at full precision; rounding to two decimal places
//! happens once, when each figure of [`Totals`] is produced. Because the
//! taxable base and grand total are derived from already-rounded figures,
//! `taxable_base == subtotal - discount` and
//! `grand_total == taxable_base + tax.total()` hold exactly.
//!
//! All amount arithmetic is checked; an overflow is reported as an invalid
//! amount on the row or field that caused it.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::TaxConfig;
use crate::error::BillingError;
use crate::models::{
    BillableRow, DiscountResolution, DiscountSpec, GstSpec, Invoice, RowOrigin, TaxBreakdown,
    TaxTreatment, Totals,
};
use crate::services::line_items::resolve_rows;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWO: Decimal = Decimal::TWO;

/// Round to paise, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Totals calculator.
#[derive(Debug, Clone, Default)]
pub struct TotalsCalculator {
    config: TaxConfig,
}

impl TotalsCalculator {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    /// Resolve an invoice's rows and compute its totals.
    ///
    /// Invoice-level amounts are validated first: a negative labor charge
    /// or extra charge would otherwise be dropped by the resolver instead
    /// of rejected.
    pub fn compute_invoice(&self, invoice: &Invoice) -> Result<(Vec<BillableRow>, Totals), BillingError> {
        if let Some(labor) = invoice.labor_charge {
            require_non_negative(labor, || RowOrigin::Labor.field("amount"))?;
        }
        for (index, charge) in invoice.extra_charges.iter().enumerate() {
            require_non_negative(charge.amount, || {
                RowOrigin::ExtraCharge { index }.field("amount")
            })?;
        }

        let rows = resolve_rows(invoice);
        let totals = self.compute(&rows, &invoice.discount, &invoice.tax_treatment())?;
        Ok((rows, totals))
    }

    /// Compute totals for resolved rows. Row order does not affect the result.
    pub fn compute(
        &self,
        rows: &[BillableRow],
        discount: &DiscountSpec,
        tax: &TaxTreatment,
    ) -> Result<Totals, BillingError> {
        let mut subtotal = Decimal::ZERO;
        for row in rows {
            let line_total = validate_row(row)?;
            subtotal = subtotal
                .checked_add(line_total)
                .ok_or_else(|| BillingError::invalid("subtotal", line_total))?;
        }
        let subtotal = round_money(subtotal);

        let (discount, discount_resolution) = resolve_discount(subtotal, discount)?;
        let taxable_base = subtotal - discount;
        let tax = match tax {
            TaxTreatment::Flat { amount } => flat_tax(*amount)?,
            TaxTreatment::Gst(gst) => self.gst_tax(taxable_base, gst)?,
        };
        let grand_total = taxable_base
            .checked_add(tax.total())
            .ok_or_else(|| BillingError::invalid("grand_total", tax.total()))?;

        Ok(Totals {
            subtotal,
            discount,
            discount_resolution,
            taxable_base,
            tax,
            grand_total,
        })
    }

    /// Equal CGST/SGST halves.
    ///
    /// A stored GST figure is billed as recorded: its halves are exact and
    /// may carry half a paisa when the stored total has an odd number of
    /// paise. A GST derived from a rate is split first and each half rounded,
    /// so the total is always twice a whole-paise half.
    fn gst_tax(&self, taxable_base: Decimal, gst: &GstSpec) -> Result<TaxBreakdown, BillingError> {
        for (name, value) in [
            ("total_gst_amount", gst.amount),
            ("gst_rate", gst.rate),
            ("cgst_amount", gst.cgst),
            ("sgst_amount", gst.sgst),
        ] {
            if let Some(value) = value {
                require_non_negative(value, || name.to_string())?;
            }
        }

        let stored_total = match (gst.amount, gst.cgst, gst.sgst) {
            (Some(amount), _, _) => Some(amount),
            (None, None, None) => None,
            (None, cgst, sgst) => {
                let cgst = cgst.unwrap_or(Decimal::ZERO);
                let sgst = sgst.unwrap_or(Decimal::ZERO);
                if cgst != sgst {
                    tracing::warn!(
                        cgst = %cgst,
                        sgst = %sgst,
                        "Stored CGST and SGST differ; re-splitting their sum equally"
                    );
                }
                Some(
                    cgst.checked_add(sgst)
                        .ok_or_else(|| BillingError::invalid("sgst_amount", sgst))?,
                )
            }
        };

        let (rate, half) = match stored_total {
            Some(total) => {
                let total = round_money(total);
                let half = total / TWO;
                if half != round_money(half) {
                    tracing::debug!(
                        total_gst = %total,
                        "Stored GST has an odd number of paise; CGST and SGST carry half a paisa"
                    );
                }
                (gst.rate, half)
            }
            None => {
                let rate = gst.rate.unwrap_or(self.config.default_gst_rate);
                let half = taxable_base
                    .checked_mul(rate)
                    .map(|tax| round_money(tax / HUNDRED / TWO))
                    .ok_or_else(|| BillingError::invalid("gst_rate", rate))?;
                (Some(rate), half)
            }
        };

        Ok(TaxBreakdown::Gst {
            rate,
            cgst: half,
            sgst: half,
        })
    }
}

fn require_non_negative(value: Decimal, field: impl FnOnce() -> String) -> Result<(), BillingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BillingError::invalid(field(), value));
    }
    Ok(())
}

/// Validate a row and return its line total.
fn validate_row(row: &BillableRow) -> Result<Decimal, BillingError> {
    if row.quantity < 0 {
        return Err(BillingError::invalid(row.origin.field("quantity"), row.quantity));
    }
    require_non_negative(row.unit_price, || row.origin.field("unit_price"))?;
    require_non_negative(row.discount, || row.origin.field("discount_amount"))?;
    let gross = row.gross().ok_or_else(|| {
        BillingError::invalid(
            row.origin.field("unit_price"),
            format!("{} x {}", row.quantity, row.unit_price),
        )
    })?;
    if row.discount > gross {
        return Err(BillingError::invalid(
            row.origin.field("discount_amount"),
            row.discount,
        ));
    }
    Ok(gross - row.discount)
}

/// Percentage wins over an absolute amount; the result is clamped to
/// `[0, subtotal]`.
fn resolve_discount(
    subtotal: Decimal,
    spec: &DiscountSpec,
) -> Result<(Decimal, DiscountResolution), BillingError> {
    let (raw, resolution) = match (spec.percentage, spec.amount) {
        (Some(percentage), ignored) => {
            let resolution = match ignored {
                Some(ignored_amount) => {
                    tracing::warn!(
                        percentage = %percentage,
                        ignored_amount = %ignored_amount,
                        "Both discount percentage and amount recorded; applying percentage"
                    );
                    DiscountResolution::PercentageOverAmount {
                        percentage,
                        ignored_amount,
                    }
                }
                None => DiscountResolution::Percentage { percentage },
            };
            let raw = subtotal
                .checked_mul(percentage)
                .ok_or_else(|| BillingError::invalid("discount_percentage", percentage))?;
            (raw / HUNDRED, resolution)
        }
        (None, Some(amount)) => (amount, DiscountResolution::Amount { amount }),
        (None, None) => (Decimal::ZERO, DiscountResolution::NotRecorded),
    };

    let raw = round_money(raw);
    let clamped = raw.max(Decimal::ZERO).min(subtotal);
    if clamped != raw {
        tracing::warn!(
            discount = %raw,
            clamped_discount = %clamped,
            subtotal = %subtotal,
            "Discount outside [0, subtotal]; clamped"
        );
    }
    Ok((clamped, resolution))
}

fn flat_tax(amount: Option<Decimal>) -> Result<TaxBreakdown, BillingError> {
    let amount = amount.unwrap_or(Decimal::ZERO);
    require_non_negative(amount, || "tax_amount".to_string())?;
    Ok(TaxBreakdown::Flat {
        amount: round_money(amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(round_money(dec("0.124")), dec("0.12"));
        assert_eq!(round_money(dec("90.005")), dec("90.01"));
    }

    #[test]
    fn test_discount_clamped_to_subtotal() {
        let (discount, _) = resolve_discount(dec("100"), &DiscountSpec::amount(dec("250"))).unwrap();
        assert_eq!(discount, dec("100"));

        let (discount, _) =
            resolve_discount(dec("100"), &DiscountSpec::percentage(dec("150"))).unwrap();
        assert_eq!(discount, dec("100"));
    }

    #[test]
    fn test_negative_discount_clamped_to_zero() {
        let (discount, resolution) =
            resolve_discount(dec("100"), &DiscountSpec::amount(dec("-20"))).unwrap();
        assert_eq!(discount, Decimal::ZERO);
        assert!(resolution.is_recorded());
    }

    #[test]
    fn test_no_discount_recorded() {
        let (discount, resolution) =
            resolve_discount(dec("100"), &DiscountSpec::default()).unwrap();
        assert_eq!(discount, Decimal::ZERO);
        assert_eq!(resolution, DiscountResolution::NotRecorded);
    }

    #[test]
    fn test_negative_zero_is_not_negative() {
        assert!(require_non_negative(dec("-0.00"), || "x".to_string()).is_ok());
    }

    #[test]
    fn test_discount_percentage_overflow_is_invalid() {
        let err = resolve_discount(Decimal::MAX, &DiscountSpec::percentage(dec("50"))).unwrap_err();
        assert_eq!(err, BillingError::invalid("discount_percentage", dec("50")));
    }
}
