use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::catalog::models::Customer;
use crate::modules::catalog::repositories::CatalogRepository;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
}

/// List the service catalog
/// GET /api/services
pub async fn list_services(
    catalog: web::Data<Arc<dyn CatalogRepository>>,
) -> Result<HttpResponse, AppError> {
    let services = catalog.list_services().await?;

    Ok(HttpResponse::Ok().json(services))
}

/// List customers
/// GET /api/customers
pub async fn list_customers(
    catalog: web::Data<Arc<dyn CatalogRepository>>,
) -> Result<HttpResponse, AppError> {
    let customers = catalog.list_customers().await?;

    Ok(HttpResponse::Ok().json(customers))
}

/// Create a customer
/// POST /api/customers
pub async fn create_customer(
    catalog: web::Data<Arc<dyn CatalogRepository>>,
    request: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let customer = Customer::new(request.name, request.mobile, request.email)?;
    let created = catalog.create_customer(&customer).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/services").route(web::get().to(list_services)))
        .service(
            web::resource("/customers")
                .route(web::get().to(list_customers))
                .route(web::post().to(create_customer)),
        );
}
