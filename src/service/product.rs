//! Product Service Implementation
//!
//! Core business logic for catalog product management.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    product::Product,
    requests::{CreateProductRequest, UpdateProductRequest},
};
use crate::search::{
    RawSearchQuery, SearchConfig, SearchDefaults, SearchResult, SearchStore, SortDirection,
    SqlSearcher,
};
use crate::utils::error::{AppError, AppResult};

/// Select list shared by every product query; matches `Product`
const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, quantity, created_at, updated_at";

/// Search allow-lists and defaults for the products table
pub const PRODUCT_SEARCH: SearchConfig = SearchConfig {
    sortable_fields: &["name", "price_cents", "quantity", "created_at", "updated_at"],
    filterable_fields: &["name", "description"],
    defaults: SearchDefaults {
        page: 1,
        page_size: 15,
        sort_field: "created_at",
        sort_direction: SortDirection::Desc,
        filter_field: "name",
    },
};

/// Custom error types for the product service
#[derive(Error, Debug)]
pub enum ProductServiceError {
    /// Product with the specified identifier was not found
    #[error("Product not found")]
    ProductNotFound,

    /// Attempted to create a product with a name that already exists
    #[error("Product name already exists")]
    NameAlreadyExists,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<ProductServiceError> for AppError {
    fn from(err: ProductServiceError) -> Self {
        match err {
            ProductServiceError::ProductNotFound => {
                AppError::NotFound("Product not found".to_string())
            }
            ProductServiceError::NameAlreadyExists => {
                AppError::Conflict("Product name already exists".to_string())
            }
            ProductServiceError::ValidationError(msg) => AppError::Validation(msg),
            ProductServiceError::DatabaseError(e) => AppError::Database(e),
        }
    }
}

/// Result type for product service operations
pub type ProductServiceResult<T> = Result<T, ProductServiceError>;

/// Core product service providing CRUD operations and search
#[derive(Clone)]
pub struct ProductService {
    /// Database connection pool
    pool: PgPool,

    /// Search adapter over the products table
    searcher: SqlSearcher<Product>,
}

impl ProductService {
    /// Creates a new ProductService instance with the provided connection pool
    pub fn new(pool: PgPool) -> Self {
        let searcher = SqlSearcher::new(pool.clone(), "products", PRODUCT_COLUMNS);
        Self { pool, searcher }
    }

    /// Creates a new catalog product
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> ProductServiceResult<Product> {
        request.validate().map_err(|e| {
            ProductServiceError::ValidationError(format!("Invalid product data: {}", e))
        })?;

        let sql = format!(
            "INSERT INTO products (name, description, price_cents, quantity) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(request.name.trim())
            .bind(request.description.as_deref())
            .bind(request.price_cents)
            .bind(request.quantity)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?;

        Ok(product)
    }

    /// Retrieves a product by its unique ID
    pub async fn get_product(&self, product_id: Uuid) -> ProductServiceResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let product: Product = sqlx::query_as(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ProductServiceError::ProductNotFound)?;

        Ok(product)
    }

    /// Updates an existing product.
    ///
    /// Only fields present in the request change; absent fields keep their
    /// current values.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> ProductServiceResult<Product> {
        request.validate().map_err(|e| {
            ProductServiceError::ValidationError(format!("Invalid update data: {}", e))
        })?;

        let sql = format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price_cents = COALESCE($4, price_cents), \
                 quantity = COALESCE($5, quantity), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(product_id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(request.description.as_deref())
            .bind(request.price_cents)
            .bind(request.quantity)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?
            .ok_or(ProductServiceError::ProductNotFound)?;

        Ok(product)
    }

    /// Deletes a product, returning the removed record
    pub async fn delete_product(&self, product_id: Uuid) -> ProductServiceResult<Product> {
        let sql = format!(
            "DELETE FROM products WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ProductServiceError::ProductNotFound)?;

        Ok(product)
    }

    /// Search products with pagination, sorting, and filtering.
    ///
    /// Raw input is normalized against [`PRODUCT_SEARCH`]; invalid
    /// parameters degrade to the configured defaults rather than failing.
    pub async fn search_products(
        &self,
        raw: &RawSearchQuery,
    ) -> AppResult<SearchResult<Product>> {
        let query = PRODUCT_SEARCH.normalize(raw);
        self.searcher.search(&query).await
    }

    /// Map a unique-constraint violation on the name column to a conflict
    fn map_unique_violation(e: sqlx::Error) -> ProductServiceError {
        match e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("products_name_key") => {
                ProductServiceError::NameAlreadyExists
            }
            other => ProductServiceError::DatabaseError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_to_app_error() {
        let err: AppError = ProductServiceError::ProductNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = ProductServiceError::NameAlreadyExists.into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = ProductServiceError::ValidationError("bad".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_default_product_search_descriptor() {
        let query = PRODUCT_SEARCH.default_descriptor();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 15);
        assert_eq!(query.sort_field, "created_at");
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(query.filter_field, "name");
        assert!(!query.is_filtered());
    }

    #[test]
    fn test_price_is_sortable_but_not_filterable() {
        assert!(PRODUCT_SEARCH.sortable_fields.contains(&"price_cents"));
        assert!(!PRODUCT_SEARCH.filterable_fields.contains(&"price_cents"));
    }
}
