//! # Asteria
//!
//! Embedding clustering and match ranking for a social-matching app.
//!
//! Given one embedding per user, Asteria partitions users into a bounded number
//! of clusters with deterministic seeded k-means, and ranks candidate matches for
//! a user with percent and star scores plus shared interests.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! asteria --data-dir ./data cluster --user ana
//! asteria --data-dir ./data matches --user ana --limit 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use asteria::prelude::*;
//! use serde_json::json;
//!
//! let config = EngineConfig { embed_dim: 3, k: 2, ..Default::default() };
//! let raw = vec![
//!     RawEmbeddingRecord::new("ana", json!([1.0, 0.0, 0.0])),
//!     RawEmbeddingRecord::new("bo", json!([0.9, 0.1, 0.0])),
//!     RawEmbeddingRecord::new("cy", json!([0.0, 0.0, 1.0])),
//! ];
//! let snapshot = cluster_embeddings(&raw, &config).unwrap();
//! assert_eq!(snapshot.assignments.len(), 3);
//! ```
//!
//! ## Crate Structure
//!
//! - `asteria-core` - Vectors, sanitization, seeded k-means, cluster assignment
//! - `asteria-similarity` - Match scoring and ranking
//! - `asteria-storage` - JSON file tables standing in for the database

pub mod pipeline;

pub use asteria_core::{
    Vector, EmbeddingRecord, RawEmbeddingRecord,
    KMeansOptions, ClusterSnapshot, ClusterAssignment, Centroid,
    EngineConfig, Error, Result,
};
pub use asteria_similarity::{
    Candidate, MatchQuery, MatchRanker, MatchCandidate, MatchesResponse, ScoreBucket,
};
pub use asteria_storage::FileStore;
pub use pipeline::{cluster_embeddings, rank_matches};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Vector, EmbeddingRecord, RawEmbeddingRecord,
        KMeansOptions, ClusterSnapshot, ClusterAssignment, Centroid,
        EngineConfig, Error, Result,
        Candidate, MatchQuery, MatchRanker, MatchCandidate, MatchesResponse, ScoreBucket,
        FileStore,
        cluster_embeddings, rank_matches,
    };
}
