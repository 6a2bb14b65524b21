// Catalog store: read access to services and customers, plus customer
// creation. The catalog is an external collaborator to the document engine;
// the engine only ever reads service fees from here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::{Customer, Service};

/// Read-mostly access to the service and customer catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Fetch the services matching the given ids. Missing ids are simply
    /// absent from the result; callers decide how to treat them.
    async fn find_services_by_ids(&self, ids: &[String]) -> Result<Vec<Service>>;

    async fn list_customers(&self) -> Result<Vec<Customer>>;

    async fn create_customer(&self, customer: &Customer) -> Result<Customer>;
}

/// MySQL-backed catalog repository
pub struct MySqlCatalogRepository {
    pool: MySqlPool,
}

impl MySqlCatalogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for MySqlCatalogRepository {
    async fn list_services(&self) -> Result<Vec<Service>> {
        let rows: Vec<ServiceRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, service_fee, govt_fee, created_at
            FROM services
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to list services: {}", e)))?;

        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn find_services_by_ids(&self, ids: &[String]) -> Result<Vec<Service>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // sqlx has no array binding for MySQL; build the placeholder list.
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, category, service_fee, govt_fee, created_at \
             FROM services WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, ServiceRow>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence(format!("Failed to fetch services: {}", e)))?;

        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, name, mobile, email, created_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to list customers: {}", e)))?;

        Ok(rows.into_iter().map(CustomerRow::into_customer).collect())
    }

    async fn create_customer(&self, customer: &Customer) -> Result<Customer> {
        let id = customer
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = customer.created_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, mobile, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to create customer: {}", e)))?;

        let mut created = customer.clone();
        created.id = Some(id);
        created.created_at = Some(created_at);

        Ok(created)
    }
}

// Row structs are the normalization boundary: everything past this point
// carries the canonical field names regardless of how the storage spells them.

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    category: String,
    service_fee: Decimal,
    govt_fee: Decimal,
    created_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            id: Some(self.id),
            name: self.name,
            category: self.category,
            service_fee: self.service_fee,
            govt_fee: self.govt_fee,
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    mobile: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Customer {
        Customer {
            id: Some(self.id),
            name: self.name,
            mobile: self.mobile,
            email: self.email,
            created_at: Some(self.created_at),
        }
    }
}
