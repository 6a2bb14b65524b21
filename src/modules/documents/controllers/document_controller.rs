use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::documents::models::{
    CreateDocumentRequest, DocumentKind, GenerateInvoiceRequest, UpdateStatusRequest,
};
use crate::modules::documents::services::{CreateOutcome, DocumentService};

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub kind: Option<DocumentKind>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create a quotation, work order, or invoice
/// POST /api/documents
pub async fn create_document(
    service: web::Data<Arc<DocumentService>>,
    request: web::Json<CreateDocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = service.create(request.into_inner()).await?;

    match outcome {
        CreateOutcome::Single(document) => Ok(HttpResponse::Created().json(document)),
        CreateOutcome::Bulk(report) => Ok(HttpResponse::Created().json(report)),
    }
}

/// Get a document by ID
/// GET /api/documents/{id}
pub async fn get_document(
    service: web::Data<Arc<DocumentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = service.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(document))
}

/// List documents
/// GET /api/documents
pub async fn list_documents(
    service: web::Data<Arc<DocumentService>>,
    query: web::Query<ListDocumentsQuery>,
) -> Result<HttpResponse, AppError> {
    let documents = service
        .list(query.kind, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(documents))
}

/// Settle a pending invoice
/// PATCH /api/invoices/{id}/status
pub async fn update_invoice_status(
    service: web::Data<Arc<DocumentService>>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    service.update_invoice_status(&id, request.status).await?;

    let document = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Update a work order stage
/// PATCH /api/work-orders/{id}
pub async fn update_work_order(
    service: web::Data<Arc<DocumentService>>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    service.update_work_order(&id, request.status).await?;

    let document = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Generate (or fetch the already-generated) invoice for a work order
/// POST /api/work-orders/{id}/invoice
pub async fn generate_invoice(
    service: web::Data<Arc<DocumentService>>,
    path: web::Path<String>,
    request: web::Json<GenerateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .generate_invoice(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/documents")
            .route(web::post().to(create_document))
            .route(web::get().to(list_documents)),
    )
    .service(web::resource("/documents/{id}").route(web::get().to(get_document)))
    .service(
        web::resource("/invoices/{id}/status").route(web::patch().to(update_invoice_status)),
    )
    .service(web::resource("/work-orders/{id}").route(web::patch().to(update_work_order)))
    .service(web::resource("/work-orders/{id}/invoice").route(web::post().to(generate_invoice)));
}
