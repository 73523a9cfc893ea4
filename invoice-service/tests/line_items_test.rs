//! Line-item resolver integration tests for invoice-service.

mod common;

use common::{dec, empty_invoice, extra_charge, line_item};
use invoice_service::models::{ExtraCharge, InvoiceKind, RowOrigin};
use invoice_service::services::line_items::{
    resolve_rows, EXTRA_CHARGE_DESCRIPTION, LABOR_DESCRIPTION,
};
use rust_decimal::Decimal;

#[test]
fn rows_follow_billing_order() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.items = vec![line_item(1, "100", None), line_item(2, "50", Some("10"))];
    invoice.labor_charge = Some(dec("200"));
    invoice.extra_charges = vec![extra_charge("Towing", "300")];

    let rows = resolve_rows(&invoice);

    let origins: Vec<_> = rows.iter().map(|r| r.origin).collect();
    assert_eq!(
        origins,
        vec![
            RowOrigin::Item { index: 0 },
            RowOrigin::Item { index: 1 },
            RowOrigin::Labor,
            RowOrigin::ExtraCharge { index: 0 },
        ]
    );
    assert_eq!(rows[1].line_total(), Some(dec("90")));
}

#[test]
fn labor_row_is_synthetic() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.labor_charge = Some(dec("350.50"));

    let rows = resolve_rows(&invoice);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description.as_deref(), Some(LABOR_DESCRIPTION));
    assert_eq!(rows[0].quantity, 1);
    assert_eq!(rows[0].unit_price, dec("350.50"));
    assert_eq!(rows[0].discount, Decimal::ZERO);
    assert_eq!(rows[0].line_total(), Some(dec("350.50")));
}

#[test]
fn zero_labor_and_zero_extra_charges_are_omitted() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.labor_charge = Some(Decimal::ZERO);
    invoice.extra_charges = vec![extra_charge("Free wash", "0")];

    assert!(resolve_rows(&invoice).is_empty());
}

#[test]
fn zero_quantity_items_are_kept() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.items = vec![line_item(0, "500", None)];

    let rows = resolve_rows(&invoice);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].line_total(), Some(Decimal::ZERO));
}

#[test]
fn unnamed_extra_charge_uses_default_description() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.extra_charges = vec![ExtraCharge {
        name: None,
        amount: dec("75"),
    }];

    let rows = resolve_rows(&invoice);

    assert_eq!(rows[0].description.as_deref(), Some(EXTRA_CHARGE_DESCRIPTION));
    assert_eq!(rows[0].origin.field("amount"), "extra_charges[0].amount");
}

#[test]
fn stored_total_does_not_override_recomputed_total() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    let mut item = line_item(2, "100", None);
    item.stored_total = Some(dec("9999"));
    invoice.items = vec![item];

    let rows = resolve_rows(&invoice);

    assert_eq!(rows[0].line_total(), Some(dec("200")));
}

#[test]
fn overflowing_row_has_no_line_total() {
    let mut invoice = empty_invoice(InvoiceKind::NonGst);
    invoice.items = vec![line_item(1_000_000_000_000_000_000, "1000000000000", None)];

    let rows = resolve_rows(&invoice);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].gross(), None);
    assert_eq!(rows[0].line_total(), None);
}
