//! # Asteria Similarity
//!
//! Match scoring and ranking between users.
//!
//! ## Features
//!
//! - **Embedding similarity**: cosine, clamped at zero for ranking
//! - **Interest fallback**: case-insensitive Jaccard when either side lacks an embedding
//! - **Score buckets**: percent in [10, 100] and 1-5 stars
//! - **Shared interests**: up to three common tags per match
//!
//! ## Example
//!
//! ```rust
//! use asteria_core::Vector;
//! use asteria_similarity::{Candidate, MatchCandidate, MatchQuery, MatchRanker};
//!
//! let query = MatchQuery {
//!     user_id: "ana".to_string(),
//!     vector: Some(Vector::new(vec![1.0, 0.0])),
//!     attributes: vec!["chess".to_string()],
//! };
//! let candidates = vec![Candidate {
//!     user_id: "bo".to_string(),
//!     vector: Some(Vector::new(vec![1.0, 0.0])),
//!     attributes: vec!["chess".to_string(), "art".to_string()],
//!     display: serde_json::Value::Null,
//! }];
//!
//! let ranked = MatchRanker::default().rank(&query, candidates, 20);
//! let matches = MatchCandidate::from_ranked_list(ranked);
//! assert_eq!(matches[0].score_percent, 100);
//! assert_eq!(matches[0].shared_interests, vec!["chess"]);
//! ```

pub mod distance;
pub mod score;
pub mod rerank;
pub mod explain;

pub use distance::{cosine, jaccard, top_shared};
pub use score::ScoreBucket;
pub use rerank::{Candidate, MatchQuery, MatchRanker, RankedMatch, SimilaritySource, DEFAULT_MAX_SHARED};
pub use explain::{MatchCandidate, MatchStats, MatchesResponse};
