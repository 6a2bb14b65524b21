// Wallet ledger: the only mutator of card balances.
//
// A deduction is all-or-nothing. The repository applies the balance check
// and the decrement as one guarded update; when that matches no row the
// ledger re-reads the card purely to tell the operator which precondition
// failed. Nothing was mutated on that path.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::wallet::models::{CardStatus, DeductionRecord, WalletCard};
use crate::modules::wallet::repositories::WalletRepository;

pub struct WalletLedger {
    repo: Arc<dyn WalletRepository>,
}

impl WalletLedger {
    pub fn new(repo: Arc<dyn WalletRepository>) -> Self {
        Self { repo }
    }

    /// Deduct `amount` from a card, recording why.
    ///
    /// Preconditions: the card exists, is active, and holds at least
    /// `amount`. Any violation fails with the specific error kind and
    /// performs no mutation; callers abort document creation on failure.
    pub async fn deduct(
        &self,
        card_id: &str,
        amount: Decimal,
        reference_document_id: Option<&str>,
        memo: &str,
    ) -> Result<DeductionRecord> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Deduction amount must be positive, got: {}",
                amount
            )));
        }

        let record = DeductionRecord::new(
            card_id.to_string(),
            amount,
            reference_document_id.map(|s| s.to_string()),
            memo.to_string(),
        );

        if self.repo.apply_deduction(&record).await? {
            info!(
                card_id = card_id,
                deduction_id = %record.id,
                amount = %amount,
                "Wallet deduction applied"
            );
            return Ok(record);
        }

        // The guarded update matched nothing; classify the refusal.
        match self.repo.find_by_id(card_id).await? {
            None => Err(AppError::CardNotFound(card_id.to_string())),
            Some(WalletCard {
                status: CardStatus::Inactive,
                ..
            }) => Err(AppError::CardInactive(card_id.to_string())),
            Some(card) => Err(AppError::InsufficientBalance {
                card_id: card_id.to_string(),
                balance: card.balance,
                requested: amount,
            }),
        }
    }

    /// Active cards available at the terminal
    pub async fn active_cards(&self) -> Result<Vec<WalletCard>> {
        self.repo.list_active().await
    }
}
