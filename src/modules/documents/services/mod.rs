pub mod document_builder;
pub mod document_service;
pub mod fee_calculator;
pub mod payment_resolver;

pub use document_builder::{BeneficiaryPlan, DocumentBuilder};
pub use document_service::{BulkCreateReport, BulkFailure, CreateOutcome, DocumentService};
pub use fee_calculator::FeeCalculator;
pub use payment_resolver::PaymentResolver;
