// Document service: the orchestration seam between the catalog, the fee
// calculator, the payment resolver, the wallet ledger, and document storage.
//
// Ordering contract: for any single document a wallet deduction strictly
// precedes persistence. A ledger failure aborts before anything is saved; a
// persistence failure after a successful deduction is the one partial-
// failure window and is surfaced as its own error kind so the operator
// knows the card was already charged.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::catalog::repositories::CatalogRepository;
use crate::modules::documents::models::{
    Beneficiary, BeneficiaryRequest, CreateDocumentRequest, Document, DocumentKind,
    DocumentStatus, GenerateInvoiceRequest, LineItem, PaymentMethod,
};
use crate::modules::documents::repositories::DocumentRepository;
use crate::modules::documents::services::document_builder::{BeneficiaryPlan, DocumentBuilder};
use crate::modules::documents::services::fee_calculator::FeeCalculator;
use crate::modules::documents::services::payment_resolver::PaymentResolver;
use crate::modules::wallet::services::WalletLedger;

/// Result of a create call: one document, or the bulk report for
/// separate-mode creation
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateOutcome {
    Single(Document),
    Bulk(BulkCreateReport),
}

/// Accounting for sequential separate-mode creation. Creation stops at the
/// first failure; documents already created stay created.
#[derive(Debug, Serialize)]
pub struct BulkCreateReport {
    pub requested: usize,
    pub created: usize,
    pub failure: Option<BulkFailure>,
}

#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub index: usize,
    pub beneficiary: String,
    pub kind: String,
    pub message: String,
    /// True when a wallet deduction for this document already went through
    pub card_charged: bool,
}

pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    catalog: Arc<dyn CatalogRepository>,
    ledger: Arc<WalletLedger>,
}

impl DocumentService {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        catalog: Arc<dyn CatalogRepository>,
        ledger: Arc<WalletLedger>,
    ) -> Self {
        Self {
            documents,
            catalog,
            ledger,
        }
    }

    /// Create a quotation, work order, or invoice (one document or a
    /// separate-mode batch) from a terminal request.
    pub async fn create(&self, request: CreateDocumentRequest) -> Result<CreateOutcome> {
        let plan = Self::beneficiary_plan(&request)?;

        let catalog_services = self
            .catalog
            .find_services_by_ids(&request.service_ids)
            .await?;
        let services = FeeCalculator::resolve_services(&request.service_ids, catalog_services)?;

        let mut drafts = DocumentBuilder::build(
            request.kind,
            request.customer,
            plan,
            &services,
            request.payment,
            request.wallet_card_id,
            request.reference_number,
            request.notes,
        )?;

        if drafts.len() == 1 {
            let document = self.persist_draft(drafts.remove(0)).await?;
            return Ok(CreateOutcome::Single(document));
        }

        Ok(CreateOutcome::Bulk(self.persist_batch(drafts).await))
    }

    pub async fn get(&self, id: &str) -> Result<Document> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document '{}' not found", id)))
    }

    pub async fn list(
        &self,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>> {
        self.documents.list(kind, limit, offset).await
    }

    /// Settle a pending invoice. The only allowed transition is
    /// Pending -> Paid; fees are never recomputed.
    pub async fn update_invoice_status(&self, id: &str, status: DocumentStatus) -> Result<()> {
        let document = self.get(id).await?;

        if document.kind != DocumentKind::Invoice {
            return Err(AppError::validation(format!(
                "Document '{}' is not an invoice",
                id
            )));
        }
        document.validate_status_update(status)?;

        self.documents.update_status(id, status).await?;
        info!(document_id = id, status = %status, "Invoice settled");

        Ok(())
    }

    /// Move a work order between its operator stages
    pub async fn update_work_order(&self, id: &str, status: DocumentStatus) -> Result<()> {
        let document = self.get(id).await?;

        if document.kind != DocumentKind::WorkOrder {
            return Err(AppError::validation(format!(
                "Document '{}' is not a work order",
                id
            )));
        }
        document.validate_status_update(status)?;

        self.documents.update_status(id, status).await?;
        info!(document_id = id, status = %status, "Work order stage updated");

        Ok(())
    }

    /// Generate the invoice for a completed work order.
    ///
    /// Idempotent: a work order that already carries a linked invoice id
    /// short-circuits to returning that invoice, never creating a second.
    pub async fn generate_invoice(
        &self,
        work_order_id: &str,
        request: GenerateInvoiceRequest,
    ) -> Result<Document> {
        let work_order = self.get(work_order_id).await?;

        if work_order.kind != DocumentKind::WorkOrder {
            return Err(AppError::validation(format!(
                "Document '{}' is not a work order",
                work_order_id
            )));
        }

        if let Some(existing_id) = &work_order.linked_invoice_id {
            info!(
                work_order_id = work_order_id,
                invoice_id = %existing_id,
                "Work order already invoiced; returning existing invoice"
            );
            return self.get(existing_id).await;
        }

        if !work_order.ready_for_invoice() {
            return Err(AppError::validation(format!(
                "Work order '{}' must be completed before invoicing, current stage: {}",
                work_order_id, work_order.status
            )));
        }

        let draft = Self::invoice_draft_from(&work_order, &request);
        let invoice = self.persist_draft(draft).await?;
        let invoice_id = invoice
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Persisted invoice is missing an id"))?;

        self.documents
            .link_invoice(work_order_id, &invoice_id)
            .await
            .map_err(|e| {
                AppError::persistence(format!(
                    "Invoice '{}' was created but could not be attached to work order '{}': {}",
                    invoice_id, work_order_id, e
                ))
            })?;

        info!(
            work_order_id = work_order_id,
            invoice_id = %invoice_id,
            "Invoice generated from work order"
        );

        Ok(invoice)
    }

    // Deduction strictly precedes persistence. On a ledger failure nothing
    // has been saved; on a persistence failure after a deduction the error
    // carries the deduction id.
    async fn persist_draft(&self, mut draft: Document) -> Result<Document> {
        let deduction_id = match Self::govt_fee_to_deduct(&draft) {
            Some((card_id, amount)) => {
                let memo = match &draft.reference_number {
                    Some(reference) => format!("Government fees for {} {}", draft.kind, reference),
                    None => format!("Government fees for {} ({})", draft.kind, draft.customer.name),
                };

                let record = self.ledger.deduct(&card_id, amount, None, &memo).await?;
                draft.wallet_deduction_id = Some(record.id.clone());
                Some(record.id)
            }
            None => None,
        };

        match self.documents.create(&draft).await {
            Ok(document) => Ok(document),
            Err(e) => match deduction_id {
                Some(deduction_id) => {
                    warn!(
                        deduction_id = %deduction_id,
                        "Document persistence failed after wallet deduction"
                    );
                    Err(AppError::CardChargedNotSaved {
                        deduction_id,
                        message: e.to_string(),
                    })
                }
                None => Err(e),
            },
        }
    }

    // Sequential, beneficiary-list order, stop on first failure. No rollback
    // of documents already created.
    async fn persist_batch(&self, drafts: Vec<Document>) -> BulkCreateReport {
        let requested = drafts.len();
        let mut created = 0usize;

        for (index, draft) in drafts.into_iter().enumerate() {
            let beneficiary = draft
                .beneficiary_name
                .clone()
                .unwrap_or_else(|| format!("beneficiary {}", index + 1));

            match self.persist_draft(draft).await {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!(
                        index = index,
                        created = created,
                        error = %e,
                        "Separate-mode creation stopped on failure"
                    );
                    return BulkCreateReport {
                        requested,
                        created,
                        failure: Some(BulkFailure {
                            index,
                            beneficiary,
                            kind: e.kind().to_string(),
                            message: e.to_string(),
                            card_charged: matches!(e, AppError::CardChargedNotSaved { .. }),
                        }),
                    };
                }
            }
        }

        BulkCreateReport {
            requested,
            created,
            failure: None,
        }
    }

    fn beneficiary_plan(request: &CreateDocumentRequest) -> Result<BeneficiaryPlan> {
        match &request.beneficiary {
            BeneficiaryRequest::SameAsCustomer => Ok(BeneficiaryPlan::SameAsCustomer),
            BeneficiaryRequest::Named { name, id_number } => Ok(BeneficiaryPlan::Named(
                Beneficiary::new(name.clone(), id_number.clone())?,
            )),
            BeneficiaryRequest::Multiple {
                bulk_input,
                combined,
            } => {
                let beneficiaries = Beneficiary::parse_bulk(bulk_input);
                if beneficiaries.is_empty() {
                    return Err(AppError::validation(
                        "No valid beneficiaries found in bulk input",
                    ));
                }

                Ok(if *combined {
                    BeneficiaryPlan::Combined(beneficiaries)
                } else {
                    BeneficiaryPlan::Separate(beneficiaries)
                })
            }
        }
    }

    // A card funds government fees only, and only on invoices
    fn govt_fee_to_deduct(draft: &Document) -> Option<(String, Decimal)> {
        if draft.kind != DocumentKind::Invoice {
            return None;
        }
        let card_id = draft.wallet_card_id.clone()?;
        if draft.totals.govt_fee <= Decimal::ZERO {
            return None;
        }

        Some((card_id, draft.totals.govt_fee))
    }

    fn invoice_draft_from(work_order: &Document, request: &GenerateInvoiceRequest) -> Document {
        // No payment input means the invoice is raised on account
        let payment = match request.payment {
            Some(p) => PaymentResolver::resolve(work_order.totals.total, p.method, p.amount_tendered),
            None => PaymentResolver::resolve(work_order.totals.total, PaymentMethod::Credit, None),
        };

        let items = work_order
            .items
            .iter()
            .map(|item| LineItem {
                id: None,
                document_id: None,
                ..item.clone()
            })
            .collect();

        Document {
            id: None,
            kind: DocumentKind::Invoice,
            status: payment.status,
            reference_number: work_order.reference_number.clone(),
            customer: work_order.customer.clone(),
            beneficiary_name: work_order.beneficiary_name.clone(),
            beneficiary_id_number: work_order.beneficiary_id_number.clone(),
            beneficiary_label: work_order.beneficiary_label.clone(),
            items,
            totals: work_order.totals,
            payment,
            wallet_card_id: request.wallet_card_id.clone(),
            wallet_deduction_id: None,
            linked_invoice_id: None,
            notes: work_order.notes.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}
