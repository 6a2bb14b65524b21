// Document builder: assembles draft documents from the customer, the
// beneficiary selection, the resolved services, and the settlement input.
// Pure assembly; persistence and wallet deductions happen in the document
// service, after the drafts exist.

use crate::core::{AppError, Result};
use crate::modules::catalog::models::Service;
use crate::modules::documents::models::{
    Beneficiary, CustomerInfo, Document, DocumentKind, LineItem, PaymentMethod, PaymentRequest,
};
use crate::modules::documents::services::fee_calculator::FeeCalculator;
use crate::modules::documents::services::payment_resolver::PaymentResolver;

/// How the beneficiary selection maps onto documents
#[derive(Debug, Clone)]
pub enum BeneficiaryPlan {
    /// One document; the beneficiary is the paying customer
    SameAsCustomer,

    /// One document with an explicitly named beneficiary
    Named(Beneficiary),

    /// One combined document: every beneficiary gets every selected
    /// service as an annotated line item
    Combined(Vec<Beneficiary>),

    /// One independent document per beneficiary at per-person totals
    Separate(Vec<Beneficiary>),
}

pub struct DocumentBuilder;

impl DocumentBuilder {
    /// Build one or more draft documents. Drafts have no id or timestamps;
    /// the repository assigns those on create.
    pub fn build(
        kind: DocumentKind,
        customer: CustomerInfo,
        plan: BeneficiaryPlan,
        services: &[Service],
        payment: Option<PaymentRequest>,
        wallet_card_id: Option<String>,
        reference_number: Option<String>,
        notes: Option<String>,
    ) -> Result<Vec<Document>> {
        if customer.name.trim().is_empty() {
            return Err(AppError::validation("Customer name is required"));
        }
        if services.is_empty() {
            return Err(AppError::validation(
                "At least one service must be selected",
            ));
        }

        // Only invoices ever fund government fees from a wallet card
        let wallet_card_id = wallet_card_id.filter(|_| kind == DocumentKind::Invoice);

        let drafts = match plan {
            BeneficiaryPlan::SameAsCustomer => {
                let beneficiary = Beneficiary::new(customer.name.clone(), None)?;
                vec![Self::single_draft(
                    kind,
                    customer,
                    beneficiary,
                    services,
                    payment,
                    wallet_card_id,
                    reference_number,
                    notes,
                )]
            }
            BeneficiaryPlan::Named(beneficiary) => vec![Self::single_draft(
                kind,
                customer,
                beneficiary,
                services,
                payment,
                wallet_card_id,
                reference_number,
                notes,
            )],
            BeneficiaryPlan::Combined(beneficiaries) => {
                if beneficiaries.is_empty() {
                    return Err(AppError::validation(
                        "A combined document needs at least one beneficiary",
                    ));
                }
                vec![Self::combined_draft(
                    kind,
                    customer,
                    beneficiaries,
                    services,
                    payment,
                    wallet_card_id,
                    reference_number,
                    notes,
                )]
            }
            BeneficiaryPlan::Separate(beneficiaries) => {
                if beneficiaries.is_empty() {
                    return Err(AppError::validation(
                        "Separate documents need at least one beneficiary",
                    ));
                }
                Self::separate_drafts(
                    kind,
                    customer,
                    beneficiaries,
                    services,
                    payment,
                    wallet_card_id,
                    reference_number,
                    notes,
                )
            }
        };

        Ok(drafts)
    }

    fn settle(
        kind: DocumentKind,
        total: rust_decimal::Decimal,
        payment: Option<PaymentRequest>,
    ) -> crate::modules::documents::models::PaymentOutcome {
        if kind == DocumentKind::Quotation {
            return PaymentResolver::quotation_outcome();
        }

        // No payment input means the sale is on account
        let payment = payment.unwrap_or(PaymentRequest {
            method: PaymentMethod::Credit,
            amount_tendered: None,
        });

        PaymentResolver::resolve(total, payment.method, payment.amount_tendered)
    }

    #[allow(clippy::too_many_arguments)]
    fn single_draft(
        kind: DocumentKind,
        customer: CustomerInfo,
        beneficiary: Beneficiary,
        services: &[Service],
        payment: Option<PaymentRequest>,
        wallet_card_id: Option<String>,
        reference_number: Option<String>,
        notes: Option<String>,
    ) -> Document {
        let totals = FeeCalculator::compute_totals(services, 1);
        let outcome = Self::settle(kind, totals.total, payment);

        Document {
            id: None,
            kind,
            status: outcome.status,
            reference_number,
            customer,
            beneficiary_name: Some(beneficiary.name),
            beneficiary_id_number: beneficiary.id_number,
            beneficiary_label: None,
            items: services.iter().map(LineItem::from_service).collect(),
            totals,
            payment: outcome,
            wallet_card_id,
            wallet_deduction_id: None,
            linked_invoice_id: None,
            notes,
            created_at: None,
            updated_at: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn combined_draft(
        kind: DocumentKind,
        customer: CustomerInfo,
        beneficiaries: Vec<Beneficiary>,
        services: &[Service],
        payment: Option<PaymentRequest>,
        wallet_card_id: Option<String>,
        reference_number: Option<String>,
        notes: Option<String>,
    ) -> Document {
        let totals = FeeCalculator::compute_totals(services, beneficiaries.len() as u32);
        let outcome = Self::settle(kind, totals.total, payment);

        let items: Vec<LineItem> = beneficiaries
            .iter()
            .flat_map(|beneficiary| {
                services
                    .iter()
                    .map(move |service| LineItem::for_beneficiary(service, beneficiary))
            })
            .collect();

        let label = beneficiaries
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Document {
            id: None,
            kind,
            status: outcome.status,
            reference_number,
            customer,
            beneficiary_name: None,
            beneficiary_id_number: None,
            beneficiary_label: Some(label),
            items,
            totals,
            payment: outcome,
            wallet_card_id,
            wallet_deduction_id: None,
            linked_invoice_id: None,
            notes,
            created_at: None,
            updated_at: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn separate_drafts(
        kind: DocumentKind,
        customer: CustomerInfo,
        beneficiaries: Vec<Beneficiary>,
        services: &[Service],
        payment: Option<PaymentRequest>,
        wallet_card_id: Option<String>,
        reference_number: Option<String>,
        notes: Option<String>,
    ) -> Vec<Document> {
        // A tendered amount is meaningless spread over N documents; each
        // document settles at its own per-person total.
        let payment = payment.map(|p| PaymentRequest {
            method: p.method,
            amount_tendered: None,
        });

        beneficiaries
            .into_iter()
            .enumerate()
            .map(|(index, beneficiary)| {
                let reference = reference_number
                    .as_ref()
                    .map(|r| format!("{}-{}", r, index + 1));

                Self::single_draft(
                    kind,
                    customer.clone(),
                    beneficiary,
                    services,
                    payment,
                    wallet_card_id.clone(),
                    reference,
                    notes.clone(),
                )
            })
            .collect()
    }
}
