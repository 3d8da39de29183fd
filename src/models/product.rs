//! Product Model
//!
//! Catalog product data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::{FieldValue, Searchable};

/// A catalog product
///
/// Prices are stored in integer cents to avoid floating-point money math.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique identifier for the product
    pub id: Uuid,

    /// Product name (unique within the catalog)
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Unit price in cents
    pub price_cents: i64,

    /// Units currently in stock
    pub quantity: i32,

    /// Timestamp when the product was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the product was last modified
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Product {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "description" => self
                .description
                .as_ref()
                .map(|text| FieldValue::Text(text.clone())),
            "price_cents" => Some(FieldValue::Int(self.price_cents)),
            "quantity" => Some(FieldValue::Int(i64::from(self.quantity))),
            "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            "updated_at" => Some(FieldValue::Timestamp(self.updated_at)),
            _ => None,
        }
    }
}
