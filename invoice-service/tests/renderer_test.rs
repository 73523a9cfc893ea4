//! Invoice renderer integration tests for invoice-service.

mod common;

use async_trait::async_trait;
use common::{invoice_id, scenario_a_records, scenario_b_records, source_with};
use invoice_service::models::{RawRecord, SectionKind, Surface};
use invoice_service::services::{
    InMemorySource, InvoiceEngine, InvoiceRecords, InvoiceRenderer, RecordSource,
};
use serde_json::json;
use service_core::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

fn renderer(source: impl RecordSource + 'static) -> InvoiceRenderer {
    InvoiceRenderer::new(Arc::new(source), InvoiceEngine::default())
}

/// Source whose backend is down.
struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    async fn fetch_invoice(&self, _invoice_id: Uuid) -> Result<Option<InvoiceRecords>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }
}

#[tokio::test]
async fn renders_preview_from_source() {
    let renderer = renderer(source_with(scenario_a_records()));

    let rendered = renderer
        .render(invoice_id(), Surface::Preview)
        .await
        .expect("Failed to render");

    assert_eq!(rendered.surface, Surface::Preview);
    assert_eq!(rendered.layout, None);
    assert_eq!(rendered.document.invoice_number, "INV-2024-0042");
    let totals = rendered.document.section(SectionKind::Totals).unwrap();
    assert_eq!(totals.field("Total Amount"), Some("₹1080.00"));
}

#[tokio::test]
async fn preview_and_print_show_identical_values() {
    let renderer = renderer(source_with(scenario_b_records()));

    let preview = renderer.render(invoice_id(), Surface::Preview).await.unwrap();
    let print = renderer.render(invoice_id(), Surface::Print).await.unwrap();

    assert_eq!(preview.document, print.document);
    assert!(print.layout.is_some());
}

#[tokio::test]
async fn unknown_invoice_is_not_found() {
    let renderer = renderer(InMemorySource::new());

    let err = renderer
        .render(Uuid::new_v4(), Surface::Preview)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn customer_without_name_is_unprocessable() {
    let mut records = scenario_a_records();
    records.customer = RawRecord::from(json!({ "phone": "98765" }));
    let renderer = renderer(source_with(records));

    let err = renderer
        .render(invoice_id(), Surface::Print)
        .await
        .unwrap_err();

    match err {
        AppError::Unprocessable(e) => assert_eq!(e.to_string(), "cannot render: missing name"),
        other => panic!("Expected Unprocessable, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_amount_is_unprocessable() {
    let mut records = scenario_a_records();
    records.invoice = common::with_fields(records.invoice, json!({ "labor_charges": -5 }));
    let renderer = renderer(source_with(records));

    let err = renderer
        .render(invoice_id(), Surface::Preview)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unprocessable(_)));
    assert_eq!(err.kind(), "unprocessable");
}

#[tokio::test]
async fn source_failure_is_propagated() {
    let renderer = renderer(FailingSource);

    let err = renderer
        .render(invoice_id(), Surface::Preview)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DatabaseError(_)));
}

#[test]
fn engine_compute_matches_rendered_totals() {
    let engine = InvoiceEngine::default();
    let records = scenario_a_records();

    let computed = engine.compute(&records).unwrap();
    let document = engine.document(&computed);

    assert_eq!(computed.customer.name, "Ravi Kumar");
    assert_eq!(computed.rows.len(), 2);
    let items = document.section(SectionKind::Items).unwrap();
    assert_eq!(items.rows.len(), computed.rows.len() + 1);
    assert_eq!(computed.totals.grand_total.to_string(), "1080.00");
    assert_eq!(
        document.section(SectionKind::Totals).unwrap().field("Total Amount"),
        Some("₹1080.00")
    );
}
