// Wallet card storage. The deduction path is a guarded decrement: the
// balance check and the write are one conditional UPDATE, and the deduction
// record lands in the same transaction. Two near-simultaneous deductions
// cannot both pass a stale balance check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::wallet::models::{CardStatus, DeductionRecord, WalletCard};

#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn find_by_id(&self, card_id: &str) -> Result<Option<WalletCard>>;

    async fn list_active(&self) -> Result<Vec<WalletCard>>;

    /// Atomically decrement the card balance and persist the deduction
    /// record. Returns false, with no mutation at all, when the guarded
    /// update matches no row (missing card, inactive card, or a balance
    /// below the amount).
    async fn apply_deduction(&self, record: &DeductionRecord) -> Result<bool>;
}

/// MySQL-backed wallet repository
pub struct MySqlWalletRepository {
    pool: MySqlPool,
}

impl MySqlWalletRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepository for MySqlWalletRepository {
    async fn find_by_id(&self, card_id: &str) -> Result<Option<WalletCard>> {
        let row: Option<WalletCardRow> = sqlx::query_as(
            r#"
            SELECT id, card_name, card_type, balance, status, created_at, updated_at
            FROM wallet_cards
            WHERE id = ?
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to fetch wallet card: {}", e)))?;

        row.map(WalletCardRow::into_card).transpose()
    }

    async fn list_active(&self) -> Result<Vec<WalletCard>> {
        let rows: Vec<WalletCardRow> = sqlx::query_as(
            r#"
            SELECT id, card_name, card_type, balance, status, created_at, updated_at
            FROM wallet_cards
            WHERE status = 'active'
            ORDER BY card_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to list wallet cards: {}", e)))?;

        rows.into_iter().map(WalletCardRow::into_card).collect()
    }

    async fn apply_deduction(&self, record: &DeductionRecord) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to start transaction: {}", e)))?;

        let updated = sqlx::query(
            r#"
            UPDATE wallet_cards
            SET balance = balance - ?, updated_at = NOW()
            WHERE id = ? AND status = 'active' AND balance >= ?
            "#,
        )
        .bind(record.amount)
        .bind(&record.card_id)
        .bind(record.amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to debit wallet card: {}", e)))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| AppError::persistence(format!("Failed to rollback: {}", e)))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO wallet_deductions (
                id, card_id, amount, reference_document_id, memo, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.card_id)
        .bind(record.amount)
        .bind(&record.reference_document_id)
        .bind(&record.memo)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to record deduction: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to commit deduction: {}", e)))?;

        Ok(true)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WalletCardRow {
    id: String,
    card_name: String,
    card_type: String,
    balance: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WalletCardRow {
    fn into_card(self) -> Result<WalletCard> {
        let status = CardStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid card status in database: {}", e)))?;

        Ok(WalletCard {
            id: Some(self.id),
            card_name: self.card_name,
            card_type: self.card_type,
            balance: self.balance,
            status,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}
