//! Ranker for match candidates
//!
//! Scores every candidate against the query user and returns a capped,
//! deterministically ordered list with display-ready scores.

use crate::distance::{cosine, jaccard, top_shared};
use crate::score::ScoreBucket;
use asteria_core::{UserId, Vector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

pub const DEFAULT_MAX_SHARED: usize = 3;

/// The user matches are computed for
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    pub user_id: UserId,
    pub vector: Option<Vector>,
    pub attributes: Vec<String>,
}

/// A user that may be matched with the query
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub user_id: UserId,
    pub vector: Option<Vector>,
    /// Interest tags, used for shared-interest display and as fallback signal
    pub attributes: Vec<String>,
    /// Opaque display data passed through to the result
    pub display: Value,
}

/// Which signal produced a candidate's similarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilaritySource {
    Embedding,
    Interests,
}

/// A scored candidate, before the raw similarity is hidden
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub candidate: Candidate,
    /// Ranking key: non-negative cosine, or Jaccard on fallback
    pub similarity: f64,
    pub source: SimilaritySource,
    pub bucket: ScoreBucket,
    pub shared: Vec<String>,
}

impl RankedMatch {
    pub fn id(&self) -> &str {
        &self.candidate.user_id
    }
}

/// Ranks candidates by similarity to a query user
#[derive(Debug, Clone)]
pub struct MatchRanker {
    max_shared: usize,
}

impl Default for MatchRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SHARED)
    }
}

impl MatchRanker {
    /// Create a ranker reporting at most `max_shared` shared interests per match
    pub fn new(max_shared: usize) -> Self {
        Self { max_shared }
    }

    /// Similarity between the query and one candidate.
    ///
    /// Uses cosine clamped at zero when both sides have an embedding, otherwise
    /// falls back to Jaccard over interests for this pair only.
    pub fn similarity(&self, query: &MatchQuery, candidate: &Candidate) -> (f64, SimilaritySource) {
        match (&query.vector, &candidate.vector) {
            (Some(q), Some(c)) => (cosine(q, c).max(0.0), SimilaritySource::Embedding),
            _ => (
                jaccard(&query.attributes, &candidate.attributes),
                SimilaritySource::Interests,
            ),
        }
    }

    /// Score and order candidates, keeping the best `limit`.
    ///
    /// The query user is skipped if present in `candidates`. Results are sorted by
    /// similarity descending, ties by ascending user id. `limit` is taken as
    /// given; callers clamp it beforehand.
    pub fn rank(&self, query: &MatchQuery, candidates: Vec<Candidate>, limit: usize) -> Vec<RankedMatch> {
        let total = candidates.len();
        let mut results: Vec<RankedMatch> = candidates
            .into_iter()
            .filter(|c| c.user_id != query.user_id)
            .map(|candidate| {
                let (similarity, source) = self.similarity(query, &candidate);
                let shared = top_shared(&query.attributes, &candidate.attributes, self.max_shared);
                RankedMatch {
                    bucket: ScoreBucket::from_similarity(similarity),
                    candidate,
                    similarity,
                    source,
                    shared,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.candidate.user_id.cmp(&b.candidate.user_id))
        });
        results.truncate(limit);

        debug!(
            query = %query.user_id,
            candidates = total,
            returned = results.len(),
            "ranked matches"
        );
        results
    }
}
