use rust_decimal::Decimal;
use serde::Deserialize;

use crate::modules::documents::models::{
    CustomerInfo, DocumentKind, DocumentStatus, PaymentMethod,
};

/// Request body for POST /api/documents
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub kind: DocumentKind,
    pub customer: CustomerInfo,
    pub beneficiary: BeneficiaryRequest,
    pub service_ids: Vec<String>,
    pub payment: Option<PaymentRequest>,
    pub wallet_card_id: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Beneficiary selection as it arrives from the terminal
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BeneficiaryRequest {
    /// The beneficiary is the paying customer
    SameAsCustomer,

    /// One explicitly named beneficiary
    Named {
        name: String,
        id_number: Option<String>,
    },

    /// Bulk entry, one "name, id-number" line per person. `combined`
    /// selects one aggregated document instead of one document per person.
    Multiple { bulk_input: String, combined: bool },
}

/// Payment input for invoice and work-order settlement
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub amount_tendered: Option<Decimal>,
}

/// Request body for PATCH status endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DocumentStatus,
}

/// Request body for POST /api/work-orders/{id}/invoice
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateInvoiceRequest {
    pub payment: Option<PaymentRequest>,
    pub wallet_card_id: Option<String>,
}
