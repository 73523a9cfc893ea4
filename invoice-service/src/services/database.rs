//! PostgreSQL record source for invoice-service.
//!
//! Rows are read as `jsonb` so that every column, whatever its historical
//! name, reaches the normalizer untouched.

use async_trait::async_trait;
use serde_json::Value;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::RawRecord;
use crate::services::metrics::SOURCE_FETCH_DURATION;
use crate::services::normalizer::{aliases, linked_id};
use crate::services::source::{InvoiceRecords, RecordSource};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    async fn fetch_row(
        &self,
        operation: &str,
        sql: &str,
        id: Uuid,
    ) -> Result<Option<RawRecord>, AppError> {
        let timer = SOURCE_FETCH_DURATION
            .with_label_values(&[operation])
            .start_timer();

        let row = sqlx::query_scalar::<_, Value>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to {}: {}", operation, e)))?;

        timer.observe_duration();

        Ok(row.map(RawRecord::from))
    }

    async fn fetch_items(&self, invoice_id: Uuid) -> Result<Vec<RawRecord>, AppError> {
        let timer = SOURCE_FETCH_DURATION
            .with_label_values(&["get_invoice_items"])
            .start_timer();

        let rows = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT to_jsonb(ii)
            FROM invoice_items ii
            WHERE ii.invoice_id = $1
            ORDER BY ii.created_at, ii.id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice items: {}", e))
        })?;

        timer.observe_duration();

        Ok(rows.into_iter().map(RawRecord::from).collect())
    }
}

#[async_trait]
impl RecordSource for Database {
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    async fn fetch_invoice(&self, invoice_id: Uuid) -> Result<Option<InvoiceRecords>, AppError> {
        let Some(invoice) = self
            .fetch_row(
                "get_invoice",
                "SELECT to_jsonb(i) FROM invoices i WHERE i.id = $1",
                invoice_id,
            )
            .await?
        else {
            return Ok(None);
        };

        let customer_id = linked_id(&invoice, &aliases::INVOICE_CUSTOMER_ID)?;
        let vehicle_id = linked_id(&invoice, &aliases::INVOICE_VEHICLE_ID)?;

        let customer = self
            .fetch_row(
                "get_customer",
                "SELECT to_jsonb(c) FROM customers c WHERE c.id = $1",
                customer_id,
            )
            .await?
            .ok_or_else(|| {
                AppError::Unprocessable(anyhow::anyhow!(
                    "Invoice references missing customer {}",
                    customer_id
                ))
            })?;

        let vehicle = self
            .fetch_row(
                "get_vehicle",
                "SELECT to_jsonb(v) FROM vehicles v WHERE v.id = $1",
                vehicle_id,
            )
            .await?
            .ok_or_else(|| {
                AppError::Unprocessable(anyhow::anyhow!(
                    "Invoice references missing vehicle {}",
                    vehicle_id
                ))
            })?;

        let items = self.fetch_items(invoice_id).await?;

        Ok(Some(InvoiceRecords {
            invoice,
            customer,
            vehicle,
            items,
        }))
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
