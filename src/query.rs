//! Search-store query descriptors
//!
//! Pure data transformation from CRUD intent to the store's JSON query
//! DSL; nothing here touches the network. Reads use two shapes:
//!
//! - by-id lookup: `term` on the record's `id` field
//! - list-all: `bool` / `must` wrapping an `exists` on `id`

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryBuildError>;

/// Query descriptor construction failed.
///
/// Only serialization of a term value can fail here; hitting this
/// indicates a programming defect, not a runtime condition.
#[derive(Debug, Error)]
pub enum QueryBuildError {
    #[error("failed to serialize query descriptor: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A composable query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Exact-match filter on a single field.
    Term { field: String, value: Value },
    /// Matches documents where the field is present.
    Exists { field: String },
    /// Conjunction of sub-queries.
    Bool { must: Vec<Query> },
}

impl Query {
    /// Exact-match filter: `field == value`.
    pub fn term<V: Serialize>(field: impl Into<String>, value: V) -> QueryResult<Self> {
        Ok(Self::Term {
            field: field.into(),
            value: serde_json::to_value(value)?,
        })
    }

    /// Field-presence filter.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists {
            field: field.into(),
        }
    }

    /// Conjunction of the given queries.
    pub fn bool_must(must: impl IntoIterator<Item = Query>) -> Self {
        Self::Bool {
            must: must.into_iter().collect(),
        }
    }

    /// Renders the descriptor as store-DSL JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Query::Term { field, value } => {
                let mut term = Map::new();
                term.insert(field.clone(), value.clone());
                wrap("term", Value::Object(term))
            }
            Query::Exists { field } => {
                let mut exists = Map::new();
                exists.insert("field".to_string(), Value::String(field.clone()));
                wrap("exists", Value::Object(exists))
            }
            Query::Bool { must } => {
                let clauses: Vec<Value> = must.iter().map(Query::to_value).collect();
                let mut body = Map::new();
                body.insert("must".to_string(), Value::Array(clauses));
                wrap("bool", Value::Object(body))
            }
        }
    }
}

/// A complete search request body: query plus result window.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBody {
    query: Query,
    from: usize,
    size: usize,
}

impl SearchBody {
    pub fn new(query: Query, from: usize, size: usize) -> Self {
        Self { query, from, size }
    }

    /// Renders the full request body.
    pub fn to_value(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_value());
        body.insert("from".to_string(), Value::from(self.from));
        body.insert("size".to_string(), Value::from(self.size));
        Value::Object(body)
    }
}

fn wrap(kind: &str, inner: Value) -> Value {
    let mut outer = Map::new();
    outer.insert(kind.to_string(), inner);
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn term_query_shape() {
        let query = Query::term("id", "42").expect("build term");
        assert_eq!(query.to_value(), json!({"term": {"id": "42"}}));
    }

    #[test]
    fn exists_query_shape() {
        let query = Query::exists("id");
        assert_eq!(query.to_value(), json!({"exists": {"field": "id"}}));
    }

    #[test]
    fn bool_must_wraps_clauses() {
        let query = Query::bool_must([Query::exists("id")]);
        assert_eq!(
            query.to_value(),
            json!({"bool": {"must": [{"exists": {"field": "id"}}]}})
        );
    }

    #[test]
    fn bool_must_conjunction_of_term_and_exists() {
        let query = Query::bool_must([
            Query::term("name", "metchee").expect("build term"),
            Query::exists("address"),
        ]);
        assert_eq!(
            query.to_value(),
            json!({"bool": {"must": [
                {"term": {"name": "metchee"}},
                {"exists": {"field": "address"}}
            ]}})
        );
    }

    #[test]
    fn search_body_carries_window() {
        let body = SearchBody::new(Query::exists("id"), 5, 20).to_value();
        assert_eq!(
            body,
            json!({
                "query": {"exists": {"field": "id"}},
                "from": 5,
                "size": 20
            })
        );
    }

    #[test]
    fn term_accepts_numeric_values() {
        let query = Query::term("dob", 1600000000_i64).expect("build term");
        assert_eq!(query.to_value(), json!({"term": {"dob": 1600000000_i64}}));
    }
}
