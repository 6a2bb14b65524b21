// Document storage. A document and its line items are written in one
// transaction; the repository assigns the server id and timestamps and
// returns the canonical form.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::documents::models::{
    CustomerInfo, Document, DocumentKind, DocumentStatus, FeeTotals, LineItem, PaymentMethod,
    PaymentOutcome,
};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a draft and return it with the assigned id and timestamps
    async fn create(&self, document: &Document) -> Result<Document>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>>;

    async fn list(
        &self,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>>;

    async fn update_status(&self, id: &str, status: DocumentStatus) -> Result<()>;

    /// One-time attachment of a generated invoice onto its work order
    async fn link_invoice(&self, work_order_id: &str, invoice_id: &str) -> Result<()>;
}

/// MySQL-backed document repository
pub struct MySqlDocumentRepository {
    pool: MySqlPool,
}

impl MySqlDocumentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_items(&self, document_id: &str) -> Result<Vec<LineItem>> {
        let rows: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT id, document_id, service_id, description, service_fee, govt_fee,
                   price, price_overridden, beneficiary_name, beneficiary_id_number
            FROM document_items
            WHERE document_id = ?
            ORDER BY position
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to fetch line items: {}", e)))?;

        Ok(rows.into_iter().map(LineItemRow::into_line_item).collect())
    }
}

#[async_trait]
impl DocumentRepository for MySqlDocumentRepository {
    async fn create(&self, document: &Document) -> Result<Document> {
        let id = document
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, kind, status, reference_number,
                customer_name, customer_mobile, customer_email,
                beneficiary_name, beneficiary_id_number, beneficiary_label,
                beneficiary_count, service_fee_total, govt_fee_total, total,
                per_person_total, payment_method, amount_received, change_due,
                wallet_card_id, wallet_deduction_id, linked_invoice_id, notes,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(document.kind.to_string())
        .bind(document.status.to_string())
        .bind(&document.reference_number)
        .bind(&document.customer.name)
        .bind(&document.customer.mobile)
        .bind(&document.customer.email)
        .bind(&document.beneficiary_name)
        .bind(&document.beneficiary_id_number)
        .bind(&document.beneficiary_label)
        .bind(document.totals.beneficiary_count)
        .bind(document.totals.service_fee)
        .bind(document.totals.govt_fee)
        .bind(document.totals.total)
        .bind(document.totals.per_person_total)
        .bind(document.payment.method.to_string())
        .bind(document.payment.amount_received)
        .bind(document.payment.change)
        .bind(&document.wallet_card_id)
        .bind(&document.wallet_deduction_id)
        .bind(&document.linked_invoice_id)
        .bind(&document.notes)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to create document: {}", e)))?;

        for (position, item) in document.items.iter().enumerate() {
            let item_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO document_items (
                    id, document_id, position, service_id, description,
                    service_fee, govt_fee, price, price_overridden,
                    beneficiary_name, beneficiary_id_number
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item_id)
            .bind(&id)
            .bind(position as i64)
            .bind(&item.service_id)
            .bind(&item.description)
            .bind(item.service_fee)
            .bind(item.govt_fee)
            .bind(item.price)
            .bind(item.price_overridden)
            .bind(&item.beneficiary_name)
            .bind(&item.beneficiary_id_number)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence(format!("Failed to create line item: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persistence(format!("Failed to commit document: {}", e)))?;

        let mut created = document.clone();
        created.id = Some(id);
        created.created_at = Some(now);
        created.updated_at = Some(now);

        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, kind, status, reference_number,
                   customer_name, customer_mobile, customer_email,
                   beneficiary_name, beneficiary_id_number, beneficiary_label,
                   beneficiary_count, service_fee_total, govt_fee_total, total,
                   per_person_total, payment_method, amount_received, change_due,
                   wallet_card_id, wallet_deduction_id, linked_invoice_id, notes,
                   created_at, updated_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to fetch document: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.fetch_items(id).await?;

        Ok(Some(row.into_document(items)?))
    }

    async fn list(
        &self,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows: Vec<DocumentRow> = match kind {
            Some(kind) => {
                sqlx::query_as(
                    r#"
                    SELECT id, kind, status, reference_number,
                           customer_name, customer_mobile, customer_email,
                           beneficiary_name, beneficiary_id_number, beneficiary_label,
                           beneficiary_count, service_fee_total, govt_fee_total, total,
                           per_person_total, payment_method, amount_received, change_due,
                           wallet_card_id, wallet_deduction_id, linked_invoice_id, notes,
                           created_at, updated_at
                    FROM documents
                    WHERE kind = ?
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(kind.to_string())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, kind, status, reference_number,
                           customer_name, customer_mobile, customer_email,
                           beneficiary_name, beneficiary_id_number, beneficiary_label,
                           beneficiary_count, service_fee_total, govt_fee_total, total,
                           per_person_total, payment_method, amount_received, change_due,
                           wallet_card_id, wallet_deduction_id, linked_invoice_id, notes,
                           created_at, updated_at
                    FROM documents
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::persistence(format!("Failed to list documents: {}", e)))?;

        // List views skip line items for performance
        rows.into_iter().map(|row| row.into_document(vec![])).collect()
    }

    async fn update_status(&self, id: &str, status: DocumentStatus) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(status.to_string())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to update document status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn link_invoice(&self, work_order_id: &str, invoice_id: &str) -> Result<()> {
        // The NULL guard makes the attachment one-time at the storage level
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET linked_invoice_id = ?, updated_at = NOW()
            WHERE id = ? AND kind = 'work_order' AND linked_invoice_id IS NULL
            "#,
        )
        .bind(invoice_id)
        .bind(work_order_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to link invoice: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::validation(format!(
                "Work order '{}' does not exist or already has an invoice",
                work_order_id
            )));
        }

        Ok(())
    }
}

// Row structs: the single place storage spellings become canonical fields.

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    kind: String,
    status: String,
    reference_number: Option<String>,
    customer_name: String,
    customer_mobile: String,
    customer_email: Option<String>,
    beneficiary_name: Option<String>,
    beneficiary_id_number: Option<String>,
    beneficiary_label: Option<String>,
    beneficiary_count: u32,
    service_fee_total: Decimal,
    govt_fee_total: Decimal,
    total: Decimal,
    per_person_total: Decimal,
    payment_method: String,
    amount_received: Decimal,
    change_due: Decimal,
    wallet_card_id: Option<String>,
    wallet_deduction_id: Option<String>,
    linked_invoice_id: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, items: Vec<LineItem>) -> Result<Document> {
        let kind = DocumentKind::from_str(&self.kind)
            .map_err(|e| AppError::internal(format!("Invalid kind in database: {}", e)))?;
        let status = DocumentStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;
        let method = PaymentMethod::from_str(&self.payment_method)
            .map_err(|e| AppError::internal(format!("Invalid payment method in database: {}", e)))?;

        Ok(Document {
            id: Some(self.id),
            kind,
            status,
            reference_number: self.reference_number,
            customer: CustomerInfo {
                name: self.customer_name,
                mobile: self.customer_mobile,
                email: self.customer_email,
            },
            beneficiary_name: self.beneficiary_name,
            beneficiary_id_number: self.beneficiary_id_number,
            beneficiary_label: self.beneficiary_label,
            items,
            totals: FeeTotals {
                service_fee: self.service_fee_total,
                govt_fee: self.govt_fee_total,
                total: self.total,
                per_person_total: self.per_person_total,
                beneficiary_count: self.beneficiary_count,
            },
            payment: PaymentOutcome {
                status,
                method,
                amount_received: self.amount_received,
                change: self.change_due,
            },
            wallet_card_id: self.wallet_card_id,
            wallet_deduction_id: self.wallet_deduction_id,
            linked_invoice_id: self.linked_invoice_id,
            notes: self.notes,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    document_id: String,
    service_id: Option<String>,
    description: String,
    service_fee: Decimal,
    govt_fee: Decimal,
    price: Decimal,
    price_overridden: bool,
    beneficiary_name: Option<String>,
    beneficiary_id_number: Option<String>,
}

impl LineItemRow {
    fn into_line_item(self) -> LineItem {
        LineItem {
            id: Some(self.id),
            document_id: Some(self.document_id),
            service_id: self.service_id,
            description: self.description,
            service_fee: self.service_fee,
            govt_fee: self.govt_fee,
            price: self.price,
            price_overridden: self.price_overridden,
            beneficiary_name: self.beneficiary_name,
            beneficiary_id_number: self.beneficiary_id_number,
        }
    }
}
