use crate::sanitize::sanitize;
use crate::{Result, Vector};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub type UserId = String;

/// An embedding row as read from storage, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEmbeddingRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub vector: serde_json::Value,
}

impl RawEmbeddingRecord {
    pub fn new(user_id: impl Into<UserId>, vector: serde_json::Value) -> Self {
        Self {
            user_id: user_id.into(),
            vector,
        }
    }

    pub fn sanitize(&self, expected_dim: usize) -> Result<EmbeddingRecord> {
        let vector = sanitize(&self.vector, expected_dim)?;
        Ok(EmbeddingRecord {
            user_id: self.user_id.clone(),
            vector,
        })
    }
}

/// A user's embedding, fitted to the configured dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub user_id: UserId,
    pub vector: Vector,
}

impl EmbeddingRecord {
    pub fn new(user_id: impl Into<UserId>, vector: Vector) -> Self {
        Self {
            user_id: user_id.into(),
            vector,
        }
    }
}

/// Sanitize a batch of raw rows, dropping the ones with no usable data.
///
/// Input order is preserved for the rows that survive.
pub fn sanitize_records(raw: &[RawEmbeddingRecord], expected_dim: usize) -> Vec<EmbeddingRecord> {
    raw.iter()
        .filter_map(|row| match row.sanitize(expected_dim) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(user_id = %row.user_id, "dropping embedding: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_records_drops_invalid_rows() {
        let raw = vec![
            RawEmbeddingRecord::new("a", json!([1.0, 0.0])),
            RawEmbeddingRecord::new("b", json!("garbage")),
            RawEmbeddingRecord::new("c", json!("{0,1}")),
            RawEmbeddingRecord::new("d", json!(null)),
        ];
        let cleaned = sanitize_records(&raw, 2);
        let ids: Vec<&str> = cleaned.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(cleaned[1].vector.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_raw_record_missing_vector_deserializes() {
        let row: RawEmbeddingRecord = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert!(row.vector.is_null());
        assert!(row.sanitize(4).is_err());
    }
}
