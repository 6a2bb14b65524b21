// Catalog service entity: one offered typing service with its two-part price.
//
// The service fee is the business's own component; the government fee is a
// pass-through charge collected on behalf of a third party. Fee fields are
// snapshotted into document line items at creation time and never re-derived,
// so a later price change does not rewrite history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{money, AppError, Result};

/// A service offered by the typing office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique service ID (UUID)
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    /// Display name shown on documents
    pub name: String,

    /// Catalog grouping (e.g. visas, licensing, attestation)
    pub category: String,

    /// Fee retained by the business
    pub service_fee: Decimal,

    /// Pass-through government fee
    pub govt_fee: Decimal,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Create a new catalog service with validation
    pub fn new(
        name: String,
        category: String,
        service_fee: Decimal,
        govt_fee: Decimal,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Service name cannot be empty"));
        }
        money::require_non_negative("Service fee", service_fee)?;
        money::require_non_negative("Government fee", govt_fee)?;

        Ok(Self {
            id: Some(Uuid::new_v4().to_string()),
            name,
            category,
            service_fee,
            govt_fee,
            created_at: Some(Utc::now()),
        })
    }

    /// Combined per-unit price of this service
    pub fn total_fee(&self) -> Decimal {
        self.service_fee + self.govt_fee
    }
}
