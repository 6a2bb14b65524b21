// Line item: a copy of a service's fee fields frozen at document-creation
// time. Historical documents keep the fees they were sold at even if the
// catalog price changes later.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, Result};
use crate::modules::catalog::models::Service;
use crate::modules::documents::models::Beneficiary;

/// One service line on a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    #[serde(skip_deserializing)]
    pub document_id: Option<String>,

    /// Originating catalog service, if still known
    pub service_id: Option<String>,

    /// Display name shown on the document
    pub description: String,

    /// Fee retained by the business, snapshotted
    pub service_fee: Decimal,

    /// Pass-through government fee, snapshotted
    pub govt_fee: Decimal,

    /// Line price; equals service_fee + govt_fee unless explicitly overridden
    pub price: Decimal,

    /// Set only by `with_price_override`
    #[serde(default)]
    pub price_overridden: bool,

    /// Beneficiary annotation for combined multi-beneficiary documents
    pub beneficiary_name: Option<String>,

    pub beneficiary_id_number: Option<String>,
}

impl LineItem {
    /// Snapshot a catalog service into a line item
    pub fn from_service(service: &Service) -> Self {
        Self {
            id: None,
            document_id: None,
            service_id: service.id.clone(),
            description: service.name.clone(),
            service_fee: service.service_fee,
            govt_fee: service.govt_fee,
            price: service.service_fee + service.govt_fee,
            price_overridden: false,
            beneficiary_name: None,
            beneficiary_id_number: None,
        }
    }

    /// Snapshot a service for one beneficiary of a combined document,
    /// annotating the displayed name with the beneficiary
    pub fn for_beneficiary(service: &Service, beneficiary: &Beneficiary) -> Self {
        let mut item = Self::from_service(service);
        item.description = format!("{} - {}", service.name, beneficiary.name);
        item.beneficiary_name = Some(beneficiary.name.clone());
        item.beneficiary_id_number = beneficiary.id_number.clone();
        item
    }

    /// Replace the line price with an operator-entered amount.
    ///
    /// This is a data-entry exception, not a normal path: the override is
    /// recorded on the item and logged so the discrepancy stays visible.
    pub fn with_price_override(mut self, price: Decimal) -> Result<Self> {
        money::require_non_negative("Override price", price)?;

        let fee_sum = self.service_fee + self.govt_fee;
        if price != fee_sum {
            tracing::warn!(
                description = %self.description,
                fee_sum = %fee_sum,
                override_price = %price,
                "Line price overridden away from fee sum"
            );
        }

        self.price = price;
        self.price_overridden = true;
        Ok(self)
    }
}
