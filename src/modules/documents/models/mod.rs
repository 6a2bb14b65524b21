pub mod beneficiary;
pub mod document;
pub mod fee_totals;
pub mod line_item;
pub mod payment;
pub mod requests;

pub use beneficiary::Beneficiary;
pub use document::{CustomerInfo, Document, DocumentKind, DocumentStatus};
pub use fee_totals::FeeTotals;
pub use line_item::LineItem;
pub use payment::{PaymentMethod, PaymentOutcome};
pub use requests::{
    BeneficiaryRequest, CreateDocumentRequest, GenerateInvoiceRequest, PaymentRequest,
    UpdateStatusRequest,
};
