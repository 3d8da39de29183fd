//! In-Memory Result Assembler
//!
//! Applies filter, sort, and pagination to an in-process collection. Every
//! call rescans the full collection, so this backend is only suitable for
//! small datasets such as fixtures and tests; the SQL backend covers
//! production tables. Field access is data-driven through [`Searchable`]
//! rather than per-resource subclassing.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::utils::error::AppResult;

use super::query::{QueryDescriptor, SortDirection};
use super::result::SearchResult;
use super::SearchStore;

/// A single field's value, as exposed for filtering and sorting
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Text rendering used for substring filtering
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Timestamp(value) => value.to_rfc3339(),
        }
    }

    /// Total order over field values.
    ///
    /// Values of the same kind compare by their natural ordering; numeric
    /// kinds compare cross-kind through f64. Remaining mixed kinds order by
    /// kind so the comparison stays total.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

/// Record types that expose named fields to the search pipeline.
///
/// Implementations list exactly the fields named in the resource's
/// [`SearchConfig`](super::query::SearchConfig) allow-lists; unknown names
/// return `None`.
pub trait Searchable {
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Filter, sort, and paginate a slice of records.
///
/// Strictly ordered: filter first (case-insensitive substring on the
/// filter field's text rendering, empty value passes everything), then a
/// stable sort on the sort field, then the page slice. Records that do not
/// expose the sort field compare equal, so with no sortable values the
/// filtered order is preserved. A page past the end yields an empty `items`
/// list, never an error.
pub fn search_slice<T>(records: &[T], query: &QueryDescriptor) -> SearchResult<T>
where
    T: Searchable + Clone,
{
    let needle = query.filter_value.to_lowercase();

    let mut matched: Vec<T> = records
        .iter()
        .filter(|record| {
            if needle.is_empty() {
                return true;
            }
            record
                .field(&query.filter_field)
                .map(|value| value.render().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        let ordering = match (a.field(&query.sort_field), b.field(&query.sort_field)) {
            (Some(left), Some(right)) => left.compare(&right),
            _ => Ordering::Equal,
        };
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total = matched.len() as u64;
    let start = query.offset() as usize;
    let items = if start >= matched.len() {
        Vec::new()
    } else {
        let end = (start + query.limit() as usize).min(matched.len());
        matched[start..end].to_vec()
    };

    SearchResult::new(items, total, query.clone())
}

/// Searchable in-process record store.
///
/// Backs tests and single-process demos; provides no cross-request
/// concurrency protection beyond the lock around the record list.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn insert(&self, record: T) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> SearchStore<T> for MemoryStore<T>
where
    T: Searchable + Clone + Send + Sync,
{
    async fn search(&self, query: &QueryDescriptor) -> AppResult<SearchResult<T>> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(search_slice(&records, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{RawSearchQuery, SearchConfig, SearchDefaults};
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: String,
        quantity: i64,
        created_at: DateTime<Utc>,
    }

    impl Item {
        fn new(name: &str, quantity: i64, year: i32) -> Self {
            Self {
                name: name.to_string(),
                quantity,
                created_at: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            }
        }
    }

    impl Searchable for Item {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.clone())),
                "quantity" => Some(FieldValue::Int(self.quantity)),
                "created_at" => Some(FieldValue::Timestamp(self.created_at)),
                _ => None,
            }
        }
    }

    const CONFIG: SearchConfig = SearchConfig {
        sortable_fields: &["name", "quantity", "created_at"],
        filterable_fields: &["name"],
        defaults: SearchDefaults {
            page: 1,
            page_size: 15,
            sort_field: "created_at",
            sort_direction: SortDirection::Desc,
            filter_field: "name",
        },
    };

    fn descriptor(entries: &[(&str, &str)]) -> QueryDescriptor {
        let mut raw = RawSearchQuery::default();
        for (key, value) in entries {
            match *key {
                "page" => raw.page = Some(value.to_string()),
                "page_size" => raw.page_size = Some(value.to_string()),
                "sort_field" => raw.sort_field = Some(value.to_string()),
                "sort_direction" => raw.sort_direction = Some(value.to_string()),
                "filter_field" => raw.filter_field = Some(value.to_string()),
                "filter_value" => raw.filter_value = Some(value.to_string()),
                other => panic!("unknown key {}", other),
            }
        }
        CONFIG.normalize(&raw)
    }

    fn names(result: &SearchResult<Item>) -> Vec<&str> {
        result.items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn test_default_descriptor_sorts_newest_first() {
        let records = vec![
            Item::new("A", 1, 2025),
            Item::new("D", 2, 2019),
            Item::new("C", 3, 2024),
            Item::new("B", 4, 2020),
        ];

        let result = search_slice(&records, &descriptor(&[]));

        assert_eq!(names(&result), vec!["A", "C", "B", "D"]);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let records = vec![Item::new("EXAMPLE", 1, 2024)];
        let result = search_slice(&records, &descriptor(&[("filter_value", "ampl")]));
        assert_eq!(result.total, 1);

        let records = vec![
            Item::new("AB", 1, 2024),
            Item::new("BC", 2, 2024),
            Item::new("CA", 3, 2024),
        ];
        let result = search_slice(
            &records,
            &descriptor(&[("filter_value", "c"), ("sort_field", "quantity"), ("sort_direction", "asc")]),
        );
        assert_eq!(names(&result), vec!["BC", "CA"]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let records = vec![Item::new("A", 1, 2024), Item::new("B", 2, 2023)];
        let result = search_slice(&records, &descriptor(&[("filter_value", "")]));
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_partial_last_page() {
        let records: Vec<Item> = (0..20)
            .map(|i| Item::new(&format!("item-{:02}", i), i, 2024))
            .collect();

        let result = search_slice(
            &records,
            &descriptor(&[("page", "3"), ("page_size", "7")]),
        );

        assert_eq!(result.items.len(), 6); // 20 - 2*7
        assert_eq!(result.total, 20);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let records = vec![Item::new("A", 1, 2024)];
        let result = search_slice(&records, &descriptor(&[("page", "99")]));
        assert!(result.items.is_empty());
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_pages_cover_the_filtered_set_exactly_once() {
        let records: Vec<Item> = (0..23)
            .map(|i| Item::new(&format!("n{:02}", i), i, 2024))
            .collect();

        let first = search_slice(
            &records,
            &descriptor(&[("page", "1"), ("page_size", "5"), ("sort_field", "quantity"), ("sort_direction", "asc")]),
        );
        let mut seen: Vec<i64> = Vec::new();
        for page in 1..=first.total_pages() {
            let result = search_slice(
                &records,
                &descriptor(&[
                    ("page", &page.to_string()),
                    ("page_size", "5"),
                    ("sort_field", "quantity"),
                    ("sort_direction", "asc"),
                ]),
            );
            seen.extend(result.items.iter().map(|item| item.quantity));
        }

        let expected: Vec<i64> = (0..23).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_missing_sort_field_preserves_order() {
        let records = vec![
            Item::new("B", 2, 2024),
            Item::new("A", 1, 2023),
            Item::new("C", 3, 2025),
        ];

        let mut query = descriptor(&[]);
        query.sort_field = "nonexistent".to_string();

        let result = search_slice(&records, &query);
        assert_eq!(names(&result), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_directions() {
        let records = vec![
            Item::new("B", 2, 2024),
            Item::new("A", 1, 2023),
            Item::new("C", 3, 2025),
        ];

        let asc = search_slice(
            &records,
            &descriptor(&[("sort_field", "name"), ("sort_direction", "asc")]),
        );
        assert_eq!(names(&asc), vec!["A", "B", "C"]);

        let desc = search_slice(
            &records,
            &descriptor(&[("sort_field", "name"), ("sort_direction", "desc")]),
        );
        assert_eq!(names(&desc), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_field_value_comparisons() {
        assert_eq!(
            FieldValue::Int(2).compare(&FieldValue::Int(10)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Int(3).compare(&FieldValue::Float(2.5)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Text("a".into()).compare(&FieldValue::Text("a".into())),
            Ordering::Equal
        );
    }

    #[tokio::test]
    async fn test_memory_store_search() {
        let store = MemoryStore::from_records(vec![
            Item::new("bolt", 5, 2024),
            Item::new("washer", 9, 2023),
        ]);
        store.insert(Item::new("nut", 2, 2025));
        assert_eq!(store.len(), 3);

        let result = store
            .search(&descriptor(&[("filter_value", "bolt")]))
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(names(&result), vec!["bolt"]);
    }
}
