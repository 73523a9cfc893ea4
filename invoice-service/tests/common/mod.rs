//! Test helper module for invoice-service integration tests.
//!
//! Provides raw-record fixtures in the field spellings seen upstream and
//! ready-made normalized invoices for calculator tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use invoice_service::config::{InvoiceConfig, PresentationConfig, TaxConfig};
use invoice_service::models::{
    DiscountSpec, ExtraCharge, GstSpec, Invoice, InvoiceKind, LineItem, RawRecord,
};
use invoice_service::services::{InMemorySource, InvoiceRecords};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

pub const TEST_INVOICE_ID: &str = "33333333-3333-3333-3333-333333333333";
pub const TEST_CUSTOMER_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const TEST_VEHICLE_ID: &str = "44444444-4444-4444-4444-444444444444";

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("Invalid decimal literal")
}

pub fn invoice_id() -> Uuid {
    Uuid::parse_str(TEST_INVOICE_ID).unwrap()
}

/// Customer row in the current snake_case schema.
pub fn customer_record() -> RawRecord {
    RawRecord::from(json!({
        "id": TEST_CUSTOMER_ID,
        "name": "Ravi Kumar",
        "phone": "+91 90000 12345",
        "email": "ravi@example.com",
        "gst_number": null
    }))
}

/// Vehicle row in the current snake_case schema.
pub fn vehicle_record() -> RawRecord {
    RawRecord::from(json!({
        "id": TEST_VEHICLE_ID,
        "make": "Maruti",
        "model": "Swift",
        "vehicle_number": "TN 01 AB 1234",
        "vehicle_type": "car"
    }))
}

/// Minimal invoice row of the given kind with no items or charges.
pub fn invoice_record(kind: &str) -> RawRecord {
    RawRecord::from(json!({
        "id": TEST_INVOICE_ID,
        "invoice_number": "INV-2024-0042",
        "created_at": "2024-03-05T10:15:00Z",
        "due_date": "2024-04-04",
        "invoice_type": kind,
        "customer_id": TEST_CUSTOMER_ID,
        "vehicle_id": TEST_VEHICLE_ID
    }))
}

pub fn item_record(name: &str, quantity: i64, unit_price: &str) -> RawRecord {
    RawRecord::from(json!({
        "name": name,
        "item_type": "service",
        "quantity": quantity,
        "unit_price": unit_price,
        "discount_amount": 0
    }))
}

pub fn with_fields(record: RawRecord, fields: serde_json::Value) -> RawRecord {
    let mut merged = serde_json::to_value(record).expect("Failed to serialize record");
    if let (Some(target), serde_json::Value::Object(extra)) = (merged.as_object_mut(), fields) {
        target.extend(extra);
    }
    RawRecord::from(merged)
}

/// Non-GST: 2 x 500.00, labor 200.00, 10% discount.
pub fn scenario_a_records() -> InvoiceRecords {
    InvoiceRecords {
        invoice: with_fields(
            invoice_record("non-gst"),
            json!({ "labor_charges": 200, "discount_percentage": 10 }),
        ),
        customer: customer_record(),
        vehicle: vehicle_record(),
        items: vec![item_record("Brake pad replacement", 2, "500.00")],
    }
}

/// GST: 1 x 1000.00 with a stored GST amount of 180.00.
pub fn scenario_b_records() -> InvoiceRecords {
    InvoiceRecords {
        invoice: with_fields(invoice_record("gst"), json!({ "total_gst_amount": 180 })),
        customer: customer_record(),
        vehicle: vehicle_record(),
        items: vec![item_record("Full service", 1, "1000.00")],
    }
}

pub fn source_with(records: InvoiceRecords) -> InMemorySource {
    InMemorySource::new().with_invoice(invoice_id(), records)
}

pub fn line_item(quantity: i64, unit_price: &str, discount: Option<&str>) -> LineItem {
    LineItem {
        description: Some("Part".to_string()),
        item_type: Some("part".to_string()),
        hsn_sac_code: None,
        quantity,
        unit_price: dec(unit_price),
        discount: discount.map(dec),
        stored_total: None,
    }
}

pub fn extra_charge(name: &str, amount: &str) -> ExtraCharge {
    ExtraCharge {
        name: Some(name.to_string()),
        amount: dec(amount),
    }
}

/// Normalized invoice with no items, charges, discount or tax.
pub fn empty_invoice(kind: InvoiceKind) -> Invoice {
    Invoice {
        invoice_number: "INV-TEST".to_string(),
        created_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        due_on: None,
        kind,
        status: None,
        items: Vec::new(),
        labor_charge: None,
        extra_charges: Vec::new(),
        discount: DiscountSpec::default(),
        flat_tax: None,
        gst: GstSpec::default(),
        notes: None,
        kilometers: None,
    }
}

/// Service configuration with defaults and no database.
pub fn test_config() -> InvoiceConfig {
    InvoiceConfig {
        common: service_core::config::Config::default(),
        service_name: "invoice-service".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: None,
        tax: TaxConfig::default(),
        presentation: PresentationConfig::default(),
    }
}
