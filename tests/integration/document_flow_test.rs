// End-to-end document flows against in-memory repositories:
// deduction strictly before persistence, abort on ledger failure,
// the partial-failure window, separate-mode accounting, and the
// idempotent work-order -> invoice link.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;
use uuid::Uuid;

use typedesk::core::{AppError, Result};
use typedesk::modules::catalog::models::{Customer, Service};
use typedesk::modules::catalog::repositories::CatalogRepository;
use typedesk::modules::documents::models::{
    BeneficiaryRequest, CreateDocumentRequest, CustomerInfo, Document, DocumentKind,
    DocumentStatus, GenerateInvoiceRequest, PaymentMethod, PaymentRequest,
};
use typedesk::modules::documents::repositories::DocumentRepository;
use typedesk::modules::documents::services::{CreateOutcome, DocumentService};
use typedesk::modules::wallet::models::{CardStatus, DeductionRecord, WalletCard};
use typedesk::modules::wallet::repositories::WalletRepository;
use typedesk::modules::wallet::services::WalletLedger;

// ---------------------------------------------------------------------------
// In-memory repositories

struct MemoryCatalog {
    services: Vec<Service>,
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.services.clone())
    }

    async fn find_services_by_ids(&self, ids: &[String]) -> Result<Vec<Service>> {
        Ok(self
            .services
            .iter()
            .filter(|s| s.id.as_ref().map(|id| ids.contains(id)).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(Vec::new())
    }

    async fn create_customer(&self, customer: &Customer) -> Result<Customer> {
        Ok(customer.clone())
    }
}

#[derive(Default)]
struct MemoryDocuments {
    documents: Mutex<HashMap<String, Document>>,
    /// When set, creates fail once this many documents exist
    fail_after: Mutex<Option<usize>>,
}

impl MemoryDocuments {
    async fn fail_after(&self, count: usize) {
        *self.fail_after.lock().await = Some(count);
    }

    async fn count_of_kind(&self, kind: DocumentKind) -> usize {
        self.documents
            .lock()
            .await
            .values()
            .filter(|d| d.kind == kind)
            .count()
    }

    async fn total_count(&self) -> usize {
        self.documents.lock().await.len()
    }
}

#[async_trait]
impl DocumentRepository for MemoryDocuments {
    async fn create(&self, document: &Document) -> Result<Document> {
        let mut documents = self.documents.lock().await;

        if let Some(limit) = *self.fail_after.lock().await {
            if documents.len() >= limit {
                return Err(AppError::persistence("simulated storage outage"));
            }
        }

        let id = Uuid::new_v4().to_string();
        let mut created = document.clone();
        created.id = Some(id.clone());
        created.created_at = Some(chrono::Utc::now());
        created.updated_at = created.created_at;

        documents.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.documents.lock().await.get(id).cloned())
    }

    async fn list(
        &self,
        kind: Option<DocumentKind>,
        _limit: i64,
        _offset: i64,
    ) -> Result<Vec<Document>> {
        Ok(self
            .documents
            .lock()
            .await
            .values()
            .filter(|d| kind.map(|k| d.kind == k).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: &str, status: DocumentStatus) -> Result<()> {
        let mut documents = self.documents.lock().await;
        let document = documents
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Document '{}' not found", id)))?;

        document.status = status;
        Ok(())
    }

    async fn link_invoice(&self, work_order_id: &str, invoice_id: &str) -> Result<()> {
        let mut documents = self.documents.lock().await;
        let document = documents.get_mut(work_order_id).ok_or_else(|| {
            AppError::not_found(format!("Document '{}' not found", work_order_id))
        })?;

        if document.linked_invoice_id.is_some() {
            return Err(AppError::validation("Work order already has an invoice"));
        }

        document.linked_invoice_id = Some(invoice_id.to_string());
        Ok(())
    }
}

struct MemoryWallet {
    cards: Mutex<HashMap<String, WalletCard>>,
    deductions: Mutex<Vec<DeductionRecord>>,
}

impl MemoryWallet {
    fn with_card(id: &str, balance: Decimal) -> Self {
        let card = WalletCard {
            id: Some(id.to_string()),
            card_name: "Immigration portal".to_string(),
            card_type: "prepaid".to_string(),
            balance,
            status: CardStatus::Active,
            created_at: None,
            updated_at: None,
        };

        let mut cards = HashMap::new();
        cards.insert(id.to_string(), card);

        Self {
            cards: Mutex::new(cards),
            deductions: Mutex::new(Vec::new()),
        }
    }

    async fn balance(&self, id: &str) -> Decimal {
        self.cards.lock().await.get(id).unwrap().balance
    }

    async fn deduction_count(&self) -> usize {
        self.deductions.lock().await.len()
    }
}

#[async_trait]
impl WalletRepository for MemoryWallet {
    async fn find_by_id(&self, card_id: &str) -> Result<Option<WalletCard>> {
        Ok(self.cards.lock().await.get(card_id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<WalletCard>> {
        Ok(self.cards.lock().await.values().cloned().collect())
    }

    async fn apply_deduction(&self, record: &DeductionRecord) -> Result<bool> {
        let mut cards = self.cards.lock().await;

        let Some(card) = cards.get_mut(&record.card_id) else {
            return Ok(false);
        };
        if card.status != CardStatus::Active || card.balance < record.amount {
            return Ok(false);
        }

        card.balance -= record.amount;
        self.deductions.lock().await.push(record.clone());

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Fixture

struct Fixture {
    service: DocumentService,
    documents: Arc<MemoryDocuments>,
    wallet: Arc<MemoryWallet>,
    service_ids: Vec<String>,
}

/// Catalog with the reference services ({100, 150} and {70, 300}) and one
/// active card holding `card_balance`.
fn fixture(card_balance: Decimal) -> Fixture {
    let services = vec![
        Service::new(
            "Visa renewal".to_string(),
            "visas".to_string(),
            dec!(100),
            dec!(150),
        )
        .unwrap(),
        Service::new(
            "Emirates ID".to_string(),
            "licensing".to_string(),
            dec!(70),
            dec!(300),
        )
        .unwrap(),
    ];
    let service_ids: Vec<String> = services.iter().map(|s| s.id.clone().unwrap()).collect();

    let documents = Arc::new(MemoryDocuments::default());
    let wallet = Arc::new(MemoryWallet::with_card("card-1", card_balance));
    let catalog = Arc::new(MemoryCatalog { services });

    let ledger = Arc::new(WalletLedger::new(wallet.clone()));
    let service = DocumentService::new(documents.clone(), catalog, ledger);

    Fixture {
        service,
        documents,
        wallet,
        service_ids,
    }
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Fatima Hassan".to_string(),
        mobile: "0501234567".to_string(),
        email: None,
    }
}

fn invoice_request(fx: &Fixture, wallet_card_id: Option<String>) -> CreateDocumentRequest {
    CreateDocumentRequest {
        kind: DocumentKind::Invoice,
        customer: customer(),
        beneficiary: BeneficiaryRequest::SameAsCustomer,
        service_ids: fx.service_ids.clone(),
        payment: Some(PaymentRequest {
            method: PaymentMethod::Cash,
            amount_tendered: Some(dec!(700)),
        }),
        wallet_card_id,
        reference_number: Some("TD-2024-001".to_string()),
        notes: None,
    }
}

fn single(outcome: CreateOutcome) -> Document {
    match outcome {
        CreateOutcome::Single(document) => document,
        CreateOutcome::Bulk(report) => panic!("expected one document, got bulk: {:?}", report),
    }
}

// ---------------------------------------------------------------------------
// Flows

#[tokio::test]
async fn test_card_funded_invoice_deducts_then_persists() {
    let fx = fixture(dec!(1000));

    let outcome = fx
        .service
        .create(invoice_request(&fx, Some("card-1".to_string())))
        .await
        .unwrap();
    let invoice = single(outcome);

    // Government fee (450) came off the card; cash change covers the rest
    assert_eq!(fx.wallet.balance("card-1").await, dec!(550));
    assert_eq!(fx.wallet.deduction_count().await, 1);
    assert!(invoice.wallet_deduction_id.is_some());
    assert_eq!(invoice.totals.total, dec!(620));
    assert_eq!(invoice.payment.change, dec!(80));
    assert_eq!(invoice.status, DocumentStatus::Paid);
    assert_eq!(fx.documents.total_count().await, 1);
}

#[tokio::test]
async fn test_insufficient_balance_aborts_before_persistence() {
    // Card holds 200, government fees due are 450
    let fx = fixture(dec!(200));

    let err = fx
        .service
        .create(invoice_request(&fx, Some("card-1".to_string())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "insufficient_balance");
    assert_eq!(fx.documents.total_count().await, 0);
    assert_eq!(fx.wallet.balance("card-1").await, dec!(200));
    assert_eq!(fx.wallet.deduction_count().await, 0);
}

#[tokio::test]
async fn test_persistence_failure_after_deduction_is_distinct() {
    let fx = fixture(dec!(1000));
    fx.documents.fail_after(0).await;

    let err = fx
        .service
        .create(invoice_request(&fx, Some("card-1".to_string())))
        .await
        .unwrap_err();

    // The card was charged; the error says so and names the deduction
    assert_eq!(err.kind(), "card_charged_not_saved");
    assert_eq!(fx.wallet.balance("card-1").await, dec!(550));
    assert_eq!(fx.documents.total_count().await, 0);

    match err {
        AppError::CardChargedNotSaved { deduction_id, .. } => assert!(!deduction_id.is_empty()),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_invoice_without_card_never_touches_ledger() {
    let fx = fixture(dec!(1000));

    let outcome = fx.service.create(invoice_request(&fx, None)).await.unwrap();
    let invoice = single(outcome);

    assert_eq!(fx.wallet.balance("card-1").await, dec!(1000));
    assert_eq!(fx.wallet.deduction_count().await, 0);
    assert!(invoice.wallet_deduction_id.is_none());
}

#[tokio::test]
async fn test_work_order_with_card_never_touches_ledger() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, Some("card-1".to_string()));
    request.kind = DocumentKind::WorkOrder;

    let outcome = fx.service.create(request).await.unwrap();
    let work_order = single(outcome);

    assert_eq!(work_order.kind, DocumentKind::WorkOrder);
    assert_eq!(fx.wallet.balance("card-1").await, dec!(1000));
    assert!(work_order.wallet_card_id.is_none());
}

#[tokio::test]
async fn test_separate_mode_reports_successes_before_failure() {
    let fx = fixture(dec!(1000));
    // First create succeeds, the second hits the outage
    fx.documents.fail_after(1).await;

    let request = CreateDocumentRequest {
        kind: DocumentKind::Invoice,
        customer: customer(),
        beneficiary: BeneficiaryRequest::Multiple {
            bulk_input: "Ali Khan, 101\nSara Ahmed, 102\nOmar Saleh, 103".to_string(),
            combined: false,
        },
        service_ids: fx.service_ids.clone(),
        payment: None,
        wallet_card_id: None,
        reference_number: None,
        notes: None,
    };

    let outcome = fx.service.create(request).await.unwrap();
    let report = match outcome {
        CreateOutcome::Bulk(report) => report,
        CreateOutcome::Single(_) => panic!("expected bulk outcome"),
    };

    assert_eq!(report.requested, 3);
    assert_eq!(report.created, 1);
    let failure = report.failure.expect("failure should be reported");
    assert_eq!(failure.index, 1);
    assert_eq!(failure.beneficiary, "Sara Ahmed");
    assert!(!failure.card_charged);

    // The document already created stays created
    assert_eq!(fx.documents.total_count().await, 1);
}

#[tokio::test]
async fn test_combined_mode_creates_one_document() {
    let fx = fixture(dec!(2000));

    let request = CreateDocumentRequest {
        kind: DocumentKind::Invoice,
        customer: customer(),
        beneficiary: BeneficiaryRequest::Multiple {
            bulk_input: "Ali Khan\nSara Ahmed\nOmar Saleh".to_string(),
            combined: true,
        },
        service_ids: fx.service_ids.clone(),
        payment: None,
        wallet_card_id: Some("card-1".to_string()),
        reference_number: None,
        notes: None,
    };

    let invoice = single(fx.service.create(request).await.unwrap());

    assert_eq!(invoice.items.len(), 6);
    assert_eq!(invoice.totals.total, dec!(1860));
    // Whole combined government fee (3 x 450) funded from the card
    assert_eq!(fx.wallet.balance("card-1").await, dec!(650));
    assert_eq!(fx.documents.total_count().await, 1);
}

#[tokio::test]
async fn test_invoice_settlement_pending_to_paid_only() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, None);
    request.payment = Some(PaymentRequest {
        method: PaymentMethod::Credit,
        amount_tendered: None,
    });

    let invoice = single(fx.service.create(request).await.unwrap());
    let id = invoice.id.clone().unwrap();
    assert_eq!(invoice.status, DocumentStatus::Pending);

    fx.service
        .update_invoice_status(&id, DocumentStatus::Paid)
        .await
        .unwrap();
    assert_eq!(
        fx.service.get(&id).await.unwrap().status,
        DocumentStatus::Paid
    );

    // Paid is terminal
    let err = fx
        .service
        .update_invoice_status(&id, DocumentStatus::Paid)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_generate_invoice_is_idempotent() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, None);
    request.kind = DocumentKind::WorkOrder;
    request.payment = Some(PaymentRequest {
        method: PaymentMethod::Credit,
        amount_tendered: None,
    });

    let work_order = single(fx.service.create(request).await.unwrap());
    let wo_id = work_order.id.clone().unwrap();

    fx.service
        .update_work_order(&wo_id, DocumentStatus::Completed)
        .await
        .unwrap();

    let generate = GenerateInvoiceRequest {
        payment: Some(PaymentRequest {
            method: PaymentMethod::Cash,
            amount_tendered: None,
        }),
        wallet_card_id: None,
    };

    let first = fx
        .service
        .generate_invoice(&wo_id, generate.clone())
        .await
        .unwrap();
    let second = fx
        .service
        .generate_invoice(&wo_id, generate)
        .await
        .unwrap();

    // Same invoice both times, never a duplicate
    assert_eq!(first.id, second.id);
    assert_eq!(fx.documents.count_of_kind(DocumentKind::Invoice).await, 1);

    // The work order carries the one-time link
    let work_order = fx.service.get(&wo_id).await.unwrap();
    assert_eq!(work_order.linked_invoice_id, first.id);

    // The generated invoice keeps the work order's totals
    assert_eq!(first.totals.total, dec!(620));
    assert_eq!(first.status, DocumentStatus::Paid);
}

#[tokio::test]
async fn test_generate_invoice_requires_completed_stage() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, None);
    request.kind = DocumentKind::WorkOrder;
    request.payment = Some(PaymentRequest {
        method: PaymentMethod::Credit,
        amount_tendered: None,
    });

    let work_order = single(fx.service.create(request).await.unwrap());
    let wo_id = work_order.id.clone().unwrap();

    let err = fx
        .service
        .generate_invoice(
            &wo_id,
            GenerateInvoiceRequest {
                payment: None,
                wallet_card_id: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert_eq!(fx.documents.count_of_kind(DocumentKind::Invoice).await, 0);
}

#[tokio::test]
async fn test_work_order_stages_move_freely() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, None);
    request.kind = DocumentKind::WorkOrder;
    request.payment = Some(PaymentRequest {
        method: PaymentMethod::Credit,
        amount_tendered: None,
    });

    let work_order = single(fx.service.create(request).await.unwrap());
    let wo_id = work_order.id.clone().unwrap();

    for stage in [
        DocumentStatus::InProgress,
        DocumentStatus::WaitingDocs,
        DocumentStatus::InProgress,
        DocumentStatus::Completed,
    ] {
        fx.service.update_work_order(&wo_id, stage).await.unwrap();
        assert_eq!(fx.service.get(&wo_id).await.unwrap().status, stage);
    }
}

#[tokio::test]
async fn test_quotation_persists_with_fixed_outcome() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, Some("card-1".to_string()));
    request.kind = DocumentKind::Quotation;

    let quotation = single(fx.service.create(request).await.unwrap());

    assert_eq!(quotation.kind, DocumentKind::Quotation);
    assert_eq!(quotation.status, DocumentStatus::Quotation);
    assert_eq!(quotation.payment.amount_received, dec!(0));
    // A quotation never touches the ledger even with a card selected
    assert_eq!(fx.wallet.balance("card-1").await, dec!(1000));
}

#[tokio::test]
async fn test_unknown_service_id_rejected_before_any_side_effect() {
    let fx = fixture(dec!(1000));

    let mut request = invoice_request(&fx, Some("card-1".to_string()));
    request.service_ids.push("ghost-service".to_string());

    let err = fx.service.create(request).await.unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert_eq!(fx.documents.total_count().await, 0);
    assert_eq!(fx.wallet.balance("card-1").await, dec!(1000));
}
