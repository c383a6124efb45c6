//! Typed decoding of search responses
//!
//! Hits are decoded per-record: a document whose `_source` does not match
//! the target shape is logged and skipped, so one malformed record never
//! fails the whole result set. An empty result decodes to an empty Vec.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Top-level search response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    hits: HitsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

/// A single search hit: document key plus raw source document.
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl SearchResponse {
    /// Number of hits returned in this page.
    pub fn len(&self) -> usize {
        self.hits.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// Decodes every hit's `_source` into `T`, skipping malformed records.
    pub fn decode_each<T: DeserializeOwned>(self) -> Vec<T> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| match serde_json::from_value(hit.source) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        target: "rosterdb::store",
                        doc_id = %hit.id,
                        error = %err,
                        "skipping malformed document in result set"
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::User;

    use super::*;

    fn response_from(value: serde_json::Value) -> SearchResponse {
        serde_json::from_value(value).expect("decode search envelope")
    }

    #[test]
    fn decodes_well_formed_hits() {
        let response = response_from(json!({
            "took": 3,
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_id": "1", "_source": {
                        "id": "1", "name": "metchee", "dob": 100,
                        "address": "Kent Ridge", "description": "default user info",
                        "ctime": 100
                    }},
                    {"_id": "2", "_source": {
                        "id": "2", "name": "metchee 2", "dob": 200,
                        "address": "Kent Ridge 2", "description": "default user info 2",
                        "ctime": 200
                    }}
                ]
            }
        }));

        let users: Vec<User> = response.decode_each();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "metchee");
        assert_eq!(users[1].id, "2");
    }

    #[test]
    fn malformed_hit_is_skipped_not_fatal() {
        let response = response_from(json!({
            "hits": {
                "hits": [
                    {"_id": "1", "_source": {"name": 42}},
                    {"_id": "2", "_source": {
                        "id": "2", "name": "metchee", "dob": 100,
                        "address": "Kent Ridge", "description": "default user info",
                        "ctime": 100
                    }}
                ]
            }
        }));

        let users: Vec<User> = response.decode_each();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "2");
    }

    #[test]
    fn empty_result_set_decodes_to_empty_vec() {
        let response = response_from(json!({"hits": {"hits": []}}));
        assert!(response.is_empty());
        let users: Vec<User> = response.decode_each();
        assert!(users.is_empty());
    }

    #[test]
    fn missing_hits_envelope_decodes_to_empty_vec() {
        let response = response_from(json!({"took": 1}));
        assert_eq!(response.len(), 0);
        let users: Vec<User> = response.decode_each();
        assert!(users.is_empty());
    }
}
