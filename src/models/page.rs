use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Paging and search parameters for a list endpoint.
///
/// `page_index` is zero-based like the table state; the backend's `page`
/// query parameter is one-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page_index: usize,
    pub page_size: usize,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
            search: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Query pairs in wire form: `page`, `limit`, and `search` when present.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", (self.page_index + 1).to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// One page of rows plus the server-side total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        page_count(self.total, page_size)
    }

    /// Slice an in-memory collection the way the server would.
    pub fn from_slice(all: Vec<T>, page_index: usize, page_size: usize) -> Self {
        let total = all.len();
        let page_size = page_size.max(1);
        let start = page_index.saturating_mul(page_size).min(total);
        let items = all.into_iter().skip(start).take(page_size).collect();
        Self { items, total }
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size)
}

/// Every list shape the backend is known to return.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Wrapped {
        data: Vec<T>,
        #[serde(default, alias = "count", alias = "totalCount")]
        total: Option<usize>,
    },
    Nested {
        data: NestedList<T>,
    },
    Bare(Vec<T>),
}

#[derive(Deserialize)]
struct NestedList<T> {
    #[serde(alias = "items", alias = "orders", alias = "prescriptions")]
    data: Vec<T>,
    #[serde(default, alias = "count", alias = "totalCount")]
    total: Option<usize>,
}

/// Normalize a list response into a `Page`.
///
/// Rows are decoded one by one; a row that does not fit `T` is logged and
/// skipped so the rest of the page still shows. A missing total falls back
/// to the number of rows kept.
pub fn decode_list<T: DeserializeOwned>(value: serde_json::Value) -> Result<Page<T>, serde_json::Error> {
    let (rows, total) = match serde_json::from_value::<ListEnvelope<serde_json::Value>>(value)? {
        ListEnvelope::Wrapped { data, total } => (data, total),
        ListEnvelope::Nested { data } => (data.data, data.total),
        ListEnvelope::Bare(rows) => (rows, None),
    };

    let received = rows.len();
    let items: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping undecodable row");
                None
            }
        })
        .collect();
    if items.len() < received {
        tracing::warn!(received, kept = items.len(), "List response had undecodable rows");
    }

    Ok(Page {
        total: total.unwrap_or(items.len()),
        items,
    })
}

/// Single-item responses come either bare or wrapped in `{data: ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

pub fn decode_item<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, serde_json::Error> {
    Ok(match serde_json::from_value::<ItemEnvelope<T>>(value)? {
        ItemEnvelope::Wrapped { data } => data,
        ItemEnvelope::Bare(item) => item,
    })
}
