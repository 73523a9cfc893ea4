//! Invoice rendering: fetch, normalize, compute, present.
//!
//! Each render works on a fresh snapshot of the records and keeps nothing
//! between calls. Any normalization or amount error aborts the whole render;
//! no partially computed bill is ever returned.

use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{PresentationConfig, TaxConfig};
use crate::error::BillingError;
use crate::models::{
    BillableRow, Customer, DiscountResolution, Invoice, InvoiceDocument, RenderedInvoice, Surface,
    Totals, Vehicle,
};
use crate::services::calculator::TotalsCalculator;
use crate::services::metrics::{
    DISCOUNT_PRECEDENCE_TOTAL, RENDERS_TOTAL, RENDER_DURATION, RENDER_ERRORS_TOTAL,
};
use crate::services::normalizer::{normalize_customer, normalize_invoice, normalize_vehicle};
use crate::services::presentation::PresentationAdapter;
use crate::services::source::{InvoiceRecords, RecordSource};

/// Normalized inputs, resolved rows and computed totals for one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedInvoice {
    pub invoice: Invoice,
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub rows: Vec<BillableRow>,
    pub totals: Totals,
}

/// Pure pipeline from raw records to a display document.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEngine {
    calculator: TotalsCalculator,
    adapter: PresentationAdapter,
}

impl InvoiceEngine {
    pub fn new(tax: TaxConfig, presentation: PresentationConfig) -> Self {
        Self {
            calculator: TotalsCalculator::new(tax),
            adapter: PresentationAdapter::new(presentation),
        }
    }

    pub fn compute(&self, records: &InvoiceRecords) -> Result<ComputedInvoice, BillingError> {
        let customer = normalize_customer(&records.customer)?;
        let vehicle = normalize_vehicle(&records.vehicle)?;
        let invoice = normalize_invoice(&records.invoice, &records.items)?;
        let (rows, totals) = self.calculator.compute_invoice(&invoice)?;
        Ok(ComputedInvoice {
            invoice,
            customer,
            vehicle,
            rows,
            totals,
        })
    }

    pub fn document(&self, computed: &ComputedInvoice) -> InvoiceDocument {
        self.adapter.build(
            &computed.invoice,
            &computed.customer,
            &computed.vehicle,
            &computed.rows,
            &computed.totals,
        )
    }

    pub fn render(&self, records: &InvoiceRecords) -> Result<InvoiceDocument, BillingError> {
        let computed = self.compute(records)?;
        Ok(self.document(&computed))
    }
}

/// Renders invoices from a record source for a given surface.
#[derive(Clone)]
pub struct InvoiceRenderer {
    source: Arc<dyn RecordSource>,
    engine: InvoiceEngine,
}

impl InvoiceRenderer {
    pub fn new(source: Arc<dyn RecordSource>, engine: InvoiceEngine) -> Self {
        Self { source, engine }
    }

    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id, surface = surface.as_str()))]
    pub async fn render(
        &self,
        invoice_id: Uuid,
        surface: Surface,
    ) -> Result<RenderedInvoice, AppError> {
        let timer = RENDER_DURATION
            .with_label_values(&[surface.as_str()])
            .start_timer();

        let result = self.render_inner(invoice_id, surface).await;

        timer.observe_duration();

        if let Err(e) = &result {
            RENDER_ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
            tracing::warn!(error = %e, "Invoice render failed");
        }
        result
    }

    async fn render_inner(
        &self,
        invoice_id: Uuid,
        surface: Surface,
    ) -> Result<RenderedInvoice, AppError> {
        let records = self
            .source
            .fetch_invoice(invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

        let computed = self.engine.compute(&records)?;

        if matches!(
            computed.totals.discount_resolution,
            DiscountResolution::PercentageOverAmount { .. }
        ) {
            DISCOUNT_PRECEDENCE_TOTAL.inc();
        }
        RENDERS_TOTAL
            .with_label_values(&[surface.as_str(), computed.invoice.kind.as_str()])
            .inc();

        info!(
            invoice_number = %computed.invoice.invoice_number,
            grand_total = %computed.totals.grand_total,
            "Invoice rendered"
        );

        Ok(RenderedInvoice::new(surface, self.engine.document(&computed)))
    }
}
