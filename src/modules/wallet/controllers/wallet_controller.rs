use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::wallet::services::WalletLedger;

#[derive(Debug, Deserialize)]
pub struct DeductionRequest {
    pub amount: Decimal,
    pub memo: String,
    pub reference_document_id: Option<String>,
}

/// List active wallet cards
/// GET /api/wallet-cards
pub async fn list_active_cards(
    ledger: web::Data<Arc<WalletLedger>>,
) -> Result<HttpResponse, AppError> {
    let cards = ledger.active_cards().await?;

    Ok(HttpResponse::Ok().json(cards))
}

/// Apply a manual deduction to a card (fees collected outside a document)
/// POST /api/wallet-cards/{id}/deductions
pub async fn create_deduction(
    ledger: web::Data<Arc<WalletLedger>>,
    path: web::Path<String>,
    request: web::Json<DeductionRequest>,
) -> Result<HttpResponse, AppError> {
    let card_id = path.into_inner();
    let request = request.into_inner();

    let record = ledger
        .deduct(
            &card_id,
            request.amount,
            request.reference_document_id.as_deref(),
            &request.memo,
        )
        .await?;

    Ok(HttpResponse::Created().json(record))
}

/// Configure wallet routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/wallet-cards").route(web::get().to(list_active_cards)))
        .service(
            web::resource("/wallet-cards/{id}/deductions")
                .route(web::post().to(create_deduction)),
        );
}
