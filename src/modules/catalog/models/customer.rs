use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A paying customer of the typing office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    pub name: String,

    pub mobile: String,

    pub email: Option<String>,

    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Create a new customer with validation
    pub fn new(name: String, mobile: String, email: Option<String>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }

        if mobile.trim().is_empty() {
            return Err(AppError::validation("Customer mobile cannot be empty"));
        }

        Ok(Self {
            id: Some(Uuid::new_v4().to_string()),
            name,
            mobile,
            email,
            created_at: Some(Utc::now()),
        })
    }
}
