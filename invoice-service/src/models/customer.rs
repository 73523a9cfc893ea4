//! Customer model for invoice-service.

use serde::{Deserialize, Serialize};

/// Customer billed on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// GSTIN of a registered business customer.
    pub gst_number: Option<String>,
}
