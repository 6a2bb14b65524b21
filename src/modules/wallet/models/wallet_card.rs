// Wallet card: a prepaid balance usable to cover government fees instead of
// cash. The balance never goes negative; the ledger is its only mutator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Card lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::Active => write!(f, "active"),
            CardStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for CardStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(CardStatus::Active),
            "inactive" => Ok(CardStatus::Inactive),
            _ => Err(format!("Invalid card status: {}", s)),
        }
    }
}

/// A prepaid wallet card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletCard {
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub card_name: String,

    /// Issuer or channel (e.g. the government portal the card belongs to)
    pub card_type: String,

    pub balance: Decimal,

    pub status: CardStatus,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One applied deduction against a wallet card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionRecord {
    pub id: String,

    pub card_id: String,

    pub amount: Decimal,

    /// Document the deduction funded, when known at deduction time
    pub reference_document_id: Option<String>,

    pub memo: String,

    pub created_at: DateTime<Utc>,
}

impl DeductionRecord {
    pub fn new(
        card_id: String,
        amount: Decimal,
        reference_document_id: Option<String>,
        memo: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            card_id,
            amount,
            reference_document_id,
            memo,
            created_at: Utc::now(),
        }
    }
}
