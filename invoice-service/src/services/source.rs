//! Record sources: where raw invoice rows come from.

use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::RawRecord;

/// Every raw row needed to render one invoice, as fetched in a single pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceRecords {
    pub invoice: RawRecord,
    pub customer: RawRecord,
    pub vehicle: RawRecord,
    /// Line-item rows; may be empty when items are embedded in `invoice`.
    pub items: Vec<RawRecord>,
}

/// Fetches the raw rows behind an invoice.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// `Ok(None)` when no invoice has this id.
    async fn fetch_invoice(&self, invoice_id: Uuid) -> Result<Option<InvoiceRecords>, AppError>;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Fixed set of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    invoices: HashMap<Uuid, InvoiceRecords>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoice(mut self, invoice_id: Uuid, records: InvoiceRecords) -> Self {
        self.invoices.insert(invoice_id, records);
        self
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_invoice(&self, invoice_id: Uuid) -> Result<Option<InvoiceRecords>, AppError> {
        Ok(self.invoices.get(&invoice_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_lookup() {
        let id = Uuid::new_v4();
        let records = InvoiceRecords {
            invoice: RawRecord::from(json!({ "invoice_number": "INV-7" })),
            ..Default::default()
        };
        let source = InMemorySource::new().with_invoice(id, records.clone());

        let found = tokio_test::block_on(source.fetch_invoice(id)).unwrap();
        assert_eq!(found, Some(records));

        let missing = tokio_test::block_on(source.fetch_invoice(Uuid::new_v4())).unwrap();
        assert!(missing.is_none());
        assert!(tokio_test::block_on(source.health_check()).is_ok());
    }
}
