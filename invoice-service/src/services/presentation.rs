//! Presentation adapter: the only place numbers and dates become text.
//!
//! Both the preview and the print surface consume [`InvoiceDocument`]
//! as-is, so they show byte-identical values for the same invoice.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::PresentationConfig;
use crate::models::{
    BillableRow, Customer, DisplayRow, DocumentSection, Invoice, InvoiceDocument, SectionKind,
    TaxBreakdown, Totals, Vehicle,
};
use crate::services::calculator::round_money;

pub const ITEM_COLUMNS: [&str; 6] = ["Description", "HSN/SAC Code", "Qty", "Rate", "Discount", "Amount"];

/// Builds display documents from computed invoices.
#[derive(Debug, Clone, Default)]
pub struct PresentationAdapter {
    config: PresentationConfig,
}

impl PresentationAdapter {
    pub fn new(config: PresentationConfig) -> Self {
        Self { config }
    }

    /// Lay out an invoice from the rows and totals computed for it.
    pub fn build(
        &self,
        invoice: &Invoice,
        customer: &Customer,
        vehicle: &Vehicle,
        rows: &[BillableRow],
        totals: &Totals,
    ) -> InvoiceDocument {
        InvoiceDocument {
            invoice_number: invoice.invoice_number.clone(),
            sections: vec![
                self.header(),
                self.bill_to(invoice, customer),
                self.vehicle_details(invoice, vehicle),
                self.items(rows),
                self.totals(totals),
                self.notes(invoice),
                self.terms(),
            ],
        }
    }

    /// Currency symbol, two decimals, no grouping: `₹1080.00`.
    pub fn money(&self, amount: Decimal) -> String {
        let mut rounded = round_money(amount);
        rounded.rescale(2);
        format!("{}{}", self.config.currency_symbol, rounded)
    }

    pub fn date(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => d.format(&self.config.date_format).to_string(),
            None => self.config.placeholder.clone(),
        }
    }

    fn or_placeholder(&self, value: Option<&str>) -> String {
        value
            .map(str::to_string)
            .unwrap_or_else(|| self.config.placeholder.clone())
    }

    fn header(&self) -> DocumentSection {
        DocumentSection {
            kind: SectionKind::Header,
            title: self.config.shop_name.clone(),
            rows: vec![
                line(&self.config.shop_tagline),
                line(&format!(
                    "Phone: {} | Email: {}",
                    self.config.shop_phone, self.config.shop_email
                )),
            ],
        }
    }

    fn bill_to(&self, invoice: &Invoice, customer: &Customer) -> DocumentSection {
        DocumentSection {
            kind: SectionKind::BillTo,
            title: "BILL TO".to_string(),
            rows: vec![
                field("Name", &customer.name),
                field("Phone", &customer.phone),
                field("Email", &self.or_placeholder(customer.email.as_deref())),
                field("GST No", &self.or_placeholder(customer.gst_number.as_deref())),
                field("Invoice No", &invoice.invoice_number),
                field("Date", &self.date(Some(invoice.created_on))),
                field("Due Date", &self.date(invoice.due_on)),
                field("Invoice Type", invoice.kind.label()),
                field("Status", &self.or_placeholder(invoice.status.map(|s| s.label()))),
            ],
        }
    }

    fn vehicle_details(&self, invoice: &Invoice, vehicle: &Vehicle) -> DocumentSection {
        let kilometers = invoice
            .kilometers
            .map(|km| format!("{} km", group_indian(km)));
        DocumentSection {
            kind: SectionKind::VehicleDetails,
            title: "VEHICLE DETAILS".to_string(),
            rows: vec![
                field("Vehicle", &vehicle.display_name()),
                field("Registration", &vehicle.registration),
                field("Type", &self.or_placeholder(vehicle.category.map(|c| c.label()))),
                field("Kilometers", &self.or_placeholder(kilometers.as_deref())),
            ],
        }
    }

    fn items(&self, rows: &[BillableRow]) -> DocumentSection {
        let mut display = Vec::with_capacity(rows.len() + 1);
        display.push(DisplayRow::TableHeader {
            cells: ITEM_COLUMNS.iter().map(|c| c.to_string()).collect(),
        });
        display.extend(rows.iter().map(|row| {
            let description = self.or_placeholder(row.description.as_deref());
            let description = match &row.item_type {
                Some(kind) => format!("{} ({})", description, kind.to_lowercase()),
                None => description,
            };
            DisplayRow::TableRow {
                cells: vec![
                    description,
                    self.or_placeholder(row.hsn_sac_code.as_deref()),
                    row.quantity.to_string(),
                    self.money(row.unit_price),
                    self.money(row.discount),
                    row.line_total()
                        .map(|total| self.money(total))
                        .unwrap_or_else(|| self.config.placeholder.clone()),
                ],
            }
        }));
        DocumentSection {
            kind: SectionKind::Items,
            title: "ITEMS".to_string(),
            rows: display,
        }
    }

    fn totals(&self, totals: &Totals) -> DocumentSection {
        let mut rows = vec![field("Subtotal", &self.money(totals.subtotal))];

        if totals.discount_resolution.is_recorded() {
            let label = match totals.discount_resolution.applied_percentage() {
                Some(pct) => format!("Discount ({}%)", percent(pct)),
                None => "Discount".to_string(),
            };
            rows.push(field(&label, &format!("-{}", self.money(totals.discount))));
        }

        rows.push(field("Taxable Amount", &self.money(totals.taxable_base)));

        match totals.tax {
            TaxBreakdown::Flat { amount } => rows.push(field("Tax", &self.money(amount))),
            TaxBreakdown::Gst { rate, cgst, sgst } => {
                let half_rate = rate.map(|r| format!(" ({}%)", percent(r / Decimal::TWO)));
                let suffix = half_rate.unwrap_or_default();
                rows.push(field(&format!("CGST{}", suffix), &self.money(cgst)));
                rows.push(field(&format!("SGST{}", suffix), &self.money(sgst)));
                rows.push(field("Total GST", &self.money(totals.tax.total())));
            }
        }

        rows.push(field("Total Amount", &self.money(totals.grand_total)));

        DocumentSection {
            kind: SectionKind::Totals,
            title: "TOTALS".to_string(),
            rows,
        }
    }

    fn notes(&self, invoice: &Invoice) -> DocumentSection {
        DocumentSection {
            kind: SectionKind::Notes,
            title: "NOTES".to_string(),
            rows: vec![line(&self.or_placeholder(invoice.notes.as_deref()))],
        }
    }

    fn terms(&self) -> DocumentSection {
        let mut rows: Vec<DisplayRow> = self
            .config
            .terms
            .iter()
            .map(|t| line(&format!("• {}", t)))
            .collect();
        rows.push(line("Authorized Signature"));
        rows.push(line(&self.config.shop_name));
        DocumentSection {
            kind: SectionKind::Terms,
            title: "TERMS & CONDITIONS".to_string(),
            rows,
        }
    }
}

fn field(label: &str, value: &str) -> DisplayRow {
    DisplayRow::Field {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn line(text: &str) -> DisplayRow {
    DisplayRow::Line {
        text: text.to_string(),
    }
}

/// Percentage without trailing zeros: `10`, `12.5`.
fn percent(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Indian digit grouping: last three digits, then pairs (`1,23,456`).
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1000), "1,000");
        assert_eq!(group_indian(45210), "45,210");
        assert_eq!(group_indian(123456), "1,23,456");
        assert_eq!(group_indian(12345678), "1,23,45,678");
    }

    #[test]
    fn test_money_always_two_decimals() {
        let adapter = PresentationAdapter::default();
        assert_eq!(adapter.money(Decimal::from(1080)), "₹1080.00");
        assert_eq!(adapter.money(Decimal::new(125, 1)), "₹12.50");
        assert_eq!(adapter.money(Decimal::new(90005, 3)), "₹90.01");
        assert_eq!(adapter.money(Decimal::ZERO), "₹0.00");
    }

    #[test]
    fn test_date_and_placeholder() {
        let adapter = PresentationAdapter::default();
        assert_eq!(adapter.date(NaiveDate::from_ymd_opt(2024, 3, 5)), "05/03/2024");
        assert_eq!(adapter.date(None), "N/A");
    }

    #[test]
    fn test_percent_strips_trailing_zeros() {
        assert_eq!(percent(Decimal::new(1000, 2)), "10");
        assert_eq!(percent(Decimal::new(125, 1)), "12.5");
        assert_eq!(percent(Decimal::from(9)), "9");
    }
}
