//! Externally visible match results
//!
//! The raw similarity used for ordering stays internal; callers only see the
//! percent, stars and shared interests.

use crate::rerank::{RankedMatch, SimilaritySource};
use serde::Serialize;
use serde_json::Value;

/// One match as presented to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub user_id: String,
    /// Display fields, passed through from the candidate
    #[serde(skip_serializing_if = "Value::is_null")]
    pub display: Value,
    pub shared_interests: Vec<String>,
    pub score_percent: u32,
    pub stars: u32,
}

impl MatchCandidate {
    pub fn from_ranked(ranked: RankedMatch) -> Self {
        Self {
            user_id: ranked.candidate.user_id,
            display: ranked.candidate.display,
            shared_interests: ranked.shared,
            score_percent: ranked.bucket.percent,
            stars: ranked.bucket.stars,
        }
    }

    pub fn from_ranked_list(ranked_list: Vec<RankedMatch>) -> Vec<Self> {
        ranked_list.into_iter().map(Self::from_ranked).collect()
    }
}

/// Summary of one ranking pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchStats {
    /// Candidates considered, before exclusions and the limit
    pub candidates_count: usize,
    pub results_count: usize,
    pub best_percent: Option<u32>,
    /// Returned matches scored by embedding
    pub by_embedding: usize,
    /// Returned matches scored by interest overlap
    pub by_interests: usize,
}

impl MatchStats {
    /// Compute stats from ranked results (assumed sorted best first)
    pub fn compute(results: &[RankedMatch], candidates_count: usize) -> Self {
        let by_embedding = results
            .iter()
            .filter(|r| r.source == SimilaritySource::Embedding)
            .count();
        Self {
            candidates_count,
            results_count: results.len(),
            best_percent: results.first().map(|r| r.bucket.percent),
            by_embedding,
            by_interests: results.len() - by_embedding,
        }
    }
}

/// Response body for a matches request
#[derive(Debug, Clone, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MatchStats>,
}

impl MatchesResponse {
    pub fn new(matches: Vec<MatchCandidate>) -> Self {
        Self { matches, stats: None }
    }

    /// Build a response with stats from ranked results
    pub fn from_ranked(ranked_list: Vec<RankedMatch>, candidates_count: usize) -> Self {
        let stats = MatchStats::compute(&ranked_list, candidates_count);
        Self {
            matches: MatchCandidate::from_ranked_list(ranked_list),
            stats: Some(stats),
        }
    }
}
