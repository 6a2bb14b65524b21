use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the customer settles a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    /// Deferred settlement; always leaves the document Pending
    Credit,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Credit => write!(f, "credit"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "credit" => Ok(PaymentMethod::Credit),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// Settlement result attached to a document at creation time.
///
/// Invariant: `change = max(0, amount_received - total)`, and a Credit
/// method always pairs with a Pending status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub status: super::document::DocumentStatus,
    pub method: PaymentMethod,
    pub amount_received: Decimal,
    pub change: Decimal,
}
