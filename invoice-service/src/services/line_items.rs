//! Line-item resolver: expands an invoice into the rows of its item table.

use rust_decimal::Decimal;

use crate::models::{BillableRow, Invoice, RowOrigin};

pub const LABOR_DESCRIPTION: &str = "Labor Charges";
pub const EXTRA_CHARGE_DESCRIPTION: &str = "Extra Charge";

/// Rows in billing order: line items as recorded, then labor when positive,
/// then each positive extra charge.
///
/// Zero-quantity items are kept so that a malformed upstream row stays
/// visible on the bill. Labor and extra-charge rows have quantity 1 and no
/// discount.
pub fn resolve_rows(invoice: &Invoice) -> Vec<BillableRow> {
    let mut rows = Vec::with_capacity(invoice.items.len() + invoice.extra_charges.len() + 1);

    rows.extend(invoice.items.iter().enumerate().map(|(index, item)| {
        if let (Some(stored), Some(computed)) = (item.stored_total, item.line_total()) {
            if stored != computed {
                tracing::warn!(
                    invoice_number = %invoice.invoice_number,
                    item_index = index,
                    stored_total = %stored,
                    computed_total = %computed,
                    "Stored line total differs from recomputed total; using recomputed"
                );
            }
        }
        BillableRow {
            origin: RowOrigin::Item { index },
            description: item.description.clone(),
            item_type: item.item_type.clone(),
            hsn_sac_code: item.hsn_sac_code.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount.unwrap_or(Decimal::ZERO),
        }
    }));

    if let Some(labor) = invoice.labor_charge.filter(|l| *l > Decimal::ZERO) {
        rows.push(synthetic_row(RowOrigin::Labor, LABOR_DESCRIPTION, labor));
    }

    for (index, charge) in invoice.extra_charges.iter().enumerate() {
        if charge.amount > Decimal::ZERO {
            let name = charge.name.as_deref().unwrap_or(EXTRA_CHARGE_DESCRIPTION);
            rows.push(synthetic_row(
                RowOrigin::ExtraCharge { index },
                name,
                charge.amount,
            ));
        }
    }

    rows
}

fn synthetic_row(origin: RowOrigin, description: &str, amount: Decimal) -> BillableRow {
    BillableRow {
        origin,
        description: Some(description.to_string()),
        item_type: None,
        hsn_sac_code: None,
        quantity: 1,
        unit_price: amount,
        discount: Decimal::ZERO,
    }
}
