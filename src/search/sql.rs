//! SQL Result Assembler
//!
//! Translates a query descriptor into a pair of PostgreSQL statements: one
//! page query (`ILIKE` filter, `ORDER BY`, `LIMIT`/`OFFSET`) and one count
//! query sharing the `WHERE` clause. The two statements run back to back
//! without a transaction, so `total` and `items` can drift minutely under
//! concurrent writes; that best-effort consistency is accepted.
//!
//! Sort and filter identifiers are spliced into the statement text. That is
//! safe only because descriptors come from the normalizer, whose allow-lists
//! contain literal column names; raw client input never reaches this module
//! as an identifier.

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::utils::error::AppResult;

use super::query::QueryDescriptor;
use super::result::SearchResult;
use super::SearchStore;

/// Search adapter for one PostgreSQL table
#[derive(Debug, Clone)]
pub struct SqlSearcher<T> {
    pool: PgPool,
    table: &'static str,
    columns: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> SqlSearcher<T> {
    /// Create a searcher over `table`, selecting `columns` for each row.
    ///
    /// `columns` is the literal select list and must match the fields of
    /// `T`'s `FromRow` implementation.
    pub fn new(pool: PgPool, table: &'static str, columns: &'static str) -> Self {
        Self {
            pool,
            table,
            columns,
            _record: PhantomData,
        }
    }
}

impl<T> SearchStore<T> for SqlSearcher<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    async fn search(&self, query: &QueryDescriptor) -> AppResult<SearchResult<T>> {
        let count_sql = count_sql(self.table, query);
        let page_sql = page_sql(self.table, self.columns, query);

        let (total, items): (i64, Vec<T>) = if query.is_filtered() {
            let pattern = like_pattern(&query.filter_value);
            let total = sqlx::query_scalar(&count_sql)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;
            let items = sqlx::query_as(&page_sql)
                .bind(&pattern)
                .bind(query.limit() as i64)
                .bind(query.offset() as i64)
                .fetch_all(&self.pool)
                .await?;
            (total, items)
        } else {
            let total = sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await?;
            let items = sqlx::query_as(&page_sql)
                .bind(query.limit() as i64)
                .bind(query.offset() as i64)
                .fetch_all(&self.pool)
                .await?;
            (total, items)
        };

        Ok(SearchResult::new(items, total.max(0) as u64, query.clone()))
    }
}

/// Build the page statement for a descriptor
fn page_sql(table: &str, columns: &str, query: &QueryDescriptor) -> String {
    if query.is_filtered() {
        format!(
            "SELECT {} FROM {} WHERE {} ILIKE $1 ORDER BY {} {} LIMIT $2 OFFSET $3",
            columns,
            table,
            query.filter_field,
            query.sort_field,
            query.sort_direction.as_sql(),
        )
    } else {
        format!(
            "SELECT {} FROM {} ORDER BY {} {} LIMIT $1 OFFSET $2",
            columns,
            table,
            query.sort_field,
            query.sort_direction.as_sql(),
        )
    }
}

/// Build the count statement for a descriptor
fn count_sql(table: &str, query: &QueryDescriptor) -> String {
    if query.is_filtered() {
        format!("SELECT COUNT(*) FROM {} WHERE {} ILIKE $1", table, query.filter_field)
    } else {
        format!("SELECT COUNT(*) FROM {}", table)
    }
}

/// Wrap a filter value in `%` wildcards, escaping LIKE metacharacters so the
/// value matches as a literal substring
fn like_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{RawSearchQuery, SearchConfig, SearchDefaults, SortDirection};

    const CONFIG: SearchConfig = SearchConfig {
        sortable_fields: &["name", "created_at"],
        filterable_fields: &["name", "description"],
        defaults: SearchDefaults {
            page: 1,
            page_size: 15,
            sort_field: "created_at",
            sort_direction: SortDirection::Desc,
            filter_field: "name",
        },
    };

    #[test]
    fn test_page_sql_without_filter() {
        let query = CONFIG.normalize(&RawSearchQuery::default());
        assert_eq!(
            page_sql("products", "id, name", &query),
            "SELECT id, name FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(
            count_sql("products", &query),
            "SELECT COUNT(*) FROM products"
        );
    }

    #[test]
    fn test_page_sql_with_filter() {
        let query = CONFIG.normalize(&RawSearchQuery {
            sort_field: Some("name".to_string()),
            sort_direction: Some("asc".to_string()),
            filter_field: Some("description".to_string()),
            filter_value: Some("bolt".to_string()),
            ..RawSearchQuery::default()
        });

        assert_eq!(
            page_sql("products", "id, name", &query),
            "SELECT id, name FROM products WHERE description ILIKE $1 \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            count_sql("products", &query),
            "SELECT COUNT(*) FROM products WHERE description ILIKE $1"
        );
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("bolt"), "%bolt%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
