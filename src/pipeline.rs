//! End-to-end entry points the request layer calls
//!
//! Each takes an already-loaded snapshot of rows, runs the core computation and
//! hands back a result for the caller to persist or render.

use asteria_core::{compute_clusters, sanitize_records, ClusterSnapshot, EngineConfig, RawEmbeddingRecord, Result};
use asteria_similarity::{Candidate, MatchQuery, MatchRanker, MatchesResponse};
use tracing::{debug, info};

/// Sanitize raw embedding rows and cluster the survivors.
///
/// Rows with no usable data are dropped first, so the single-user shortcut only
/// ever sees a valid vector. Fails with `EmptyInputSet` when nothing survives.
pub fn cluster_embeddings(raw: &[RawEmbeddingRecord], config: &EngineConfig) -> Result<ClusterSnapshot> {
    config.validate()?;
    let records = sanitize_records(raw, config.embed_dim);
    info!(
        rows = raw.len(),
        valid = records.len(),
        "sanitized embeddings"
    );
    compute_clusters(&records, &config.kmeans_options())
}

/// Rank candidates for the query user, with the result cap clamped by config.
pub fn rank_matches(
    query: &MatchQuery,
    candidates: Vec<Candidate>,
    requested_limit: Option<usize>,
    config: &EngineConfig,
) -> MatchesResponse {
    let limit = config.clamp_limit(requested_limit);
    let candidates_count = candidates.len();
    let ranker = MatchRanker::new(config.max_shared);
    let ranked = ranker.rank(query, candidates, limit);
    debug!(limit, candidates_count, "matches ranked");
    MatchesResponse::from_ranked(ranked, candidates_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteria_core::{Error, Vector};
    use serde_json::json;

    fn small_config() -> EngineConfig {
        EngineConfig { embed_dim: 3, k: 2, ..Default::default() }
    }

    #[test]
    fn test_single_shortcut_applies_after_sanitization() {
        // Two rows, only one usable: the survivor becomes cluster 0
        let raw = vec![
            RawEmbeddingRecord::new("bad", json!("nope")),
            RawEmbeddingRecord::new("good", json!([0.0, 2.0])),
        ];
        let snapshot = cluster_embeddings(&raw, &small_config()).unwrap();
        assert_eq!(snapshot.centroids.len(), 1);
        assert_eq!(snapshot.centroids[0].vector.as_slice(), &[0.0, 2.0, 0.0]);
        assert_eq!(snapshot.assignments.len(), 1);
        assert_eq!(snapshot.assignments[0].similarity, 1.0);
    }

    #[test]
    fn test_lone_invalid_row_is_empty_input() {
        let raw = vec![RawEmbeddingRecord::new("bad", json!(["n/a", "x"]))];
        assert!(matches!(
            cluster_embeddings(&raw, &small_config()),
            Err(Error::EmptyInputSet)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let raw = vec![RawEmbeddingRecord::new("a", json!([1.0]))];
        let config = EngineConfig { embed_dim: 0, ..Default::default() };
        assert!(matches!(cluster_embeddings(&raw, &config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rank_matches_clamps_limit() {
        let query = MatchQuery {
            user_id: "q".to_string(),
            vector: Some(Vector::new(vec![1.0, 0.0, 0.0])),
            attributes: vec![],
        };
        let candidates: Vec<Candidate> = (0..80)
            .map(|i| Candidate {
                user_id: format!("u{:02}", i),
                vector: Some(Vector::new(vec![1.0, i as f64, 0.0])),
                ..Default::default()
            })
            .collect();

        let response = rank_matches(&query, candidates.clone(), Some(1000), &small_config());
        assert_eq!(response.matches.len(), 50);
        assert_eq!(response.matches[0].user_id, "u00");

        let response = rank_matches(&query, candidates, None, &small_config());
        assert_eq!(response.matches.len(), 20);
        assert_eq!(response.stats.unwrap().candidates_count, 80);
    }
}
