// Document model: Quotation, Work Order, and Invoice share one shape and
// differ by kind and status lifecycle.
//
// A document is constructed by the builder, persisted once, and immutable
// afterwards except for status transitions and the one-time attachment of a
// generated invoice id onto its originating work order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::documents::models::{FeeTotals, LineItem, PaymentOutcome};

/// Document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    WorkOrder,
    Invoice,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Quotation => write!(f, "quotation"),
            DocumentKind::WorkOrder => write!(f, "work_order"),
            DocumentKind::Invoice => write!(f, "invoice"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quotation" => Ok(DocumentKind::Quotation),
            "work_order" => Ok(DocumentKind::WorkOrder),
            "invoice" => Ok(DocumentKind::Invoice),
            _ => Err(format!("Invalid document kind: {}", s)),
        }
    }
}

/// Document status lifecycle.
///
/// Settlement fixes the initial status (Paid, Pending, or Quotation). An
/// invoice may later move Pending -> Paid; a work order moves between its
/// operator stages and must reach Completed before an invoice can be
/// generated from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Quotation,
    Pending,
    Paid,
    InProgress,
    WaitingDocs,
    Completed,
}

impl DocumentStatus {
    /// Stages an operator may freely set on a work order
    pub fn is_work_order_stage(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Pending
                | DocumentStatus::InProgress
                | DocumentStatus::WaitingDocs
                | DocumentStatus::Completed
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Quotation => write!(f, "quotation"),
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Paid => write!(f, "paid"),
            DocumentStatus::InProgress => write!(f, "in_progress"),
            DocumentStatus::WaitingDocs => write!(f, "waiting_docs"),
            DocumentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quotation" => Ok(DocumentStatus::Quotation),
            "pending" => Ok(DocumentStatus::Pending),
            "paid" => Ok(DocumentStatus::Paid),
            "in_progress" => Ok(DocumentStatus::InProgress),
            "waiting_docs" => Ok(DocumentStatus::WaitingDocs),
            "completed" => Ok(DocumentStatus::Completed),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

/// Customer identity snapshotted onto a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
}

/// A Quotation, Work Order, or Invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Assigned by the repository on create
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub kind: DocumentKind,

    pub status: DocumentStatus,

    pub reference_number: Option<String>,

    pub customer: CustomerInfo,

    /// Single-beneficiary documents
    pub beneficiary_name: Option<String>,
    pub beneficiary_id_number: Option<String>,

    /// Combined multi-beneficiary documents
    pub beneficiary_label: Option<String>,

    pub items: Vec<LineItem>,

    pub totals: FeeTotals,

    pub payment: PaymentOutcome,

    /// Wallet card funding the government fees, if any
    pub wallet_card_id: Option<String>,

    /// Deduction applied for this document, if any
    pub wallet_deduction_id: Option<String>,

    /// Invoice generated from this work order (one-time attachment)
    pub linked_invoice_id: Option<String>,

    pub notes: Option<String>,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Validate a status transition for this document's kind.
    ///
    /// Invoices only settle: Pending -> Paid, with no fee recompute. Work
    /// order stages are operator-driven and not strictly ordered. Quotations
    /// never change status.
    pub fn validate_status_update(&self, new_status: DocumentStatus) -> Result<()> {
        match self.kind {
            DocumentKind::Invoice => {
                if self.status == DocumentStatus::Pending && new_status == DocumentStatus::Paid {
                    Ok(())
                } else {
                    Err(AppError::validation(format!(
                        "Invalid invoice status transition from {} to {}",
                        self.status, new_status
                    )))
                }
            }
            DocumentKind::WorkOrder => {
                if new_status.is_work_order_stage() {
                    Ok(())
                } else {
                    Err(AppError::validation(format!(
                        "{} is not a work order stage",
                        new_status
                    )))
                }
            }
            DocumentKind::Quotation => Err(AppError::validation(
                "Quotations do not change status".to_string(),
            )),
        }
    }

    /// Whether invoice generation is allowed from this document
    pub fn ready_for_invoice(&self) -> bool {
        self.kind == DocumentKind::WorkOrder && self.status == DocumentStatus::Completed
    }
}
