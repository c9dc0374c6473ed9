//! # Asteria Core
//!
//! Core library for Asteria's embedding clustering.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Vector`] - Fixed-dimension embedding with cosine similarity
//! - [`sanitize`] - Validation boundary turning raw JSON into vectors
//! - [`Mulberry32`] - Bit-reproducible seeded generator
//! - [`kmeans`] - Seeded k-means over cosine similarity
//! - [`compute_clusters`] - Centroid table and per-user assignments
//!
//! ## Example
//!
//! ```rust
//! use asteria_core::{compute_clusters, sanitize_records, KMeansOptions, RawEmbeddingRecord};
//! use serde_json::json;
//!
//! let raw = vec![
//!     RawEmbeddingRecord::new("ana", json!([1.0, 0.0, 0.0])),
//!     RawEmbeddingRecord::new("bo", json!("[0.0, 1.0, 0.0]")),
//!     RawEmbeddingRecord::new("cy", json!("not a vector")),
//! ];
//! let records = sanitize_records(&raw, 3);
//! assert_eq!(records.len(), 2);
//!
//! let options = KMeansOptions { k: 2, ..Default::default() };
//! let snapshot = compute_clusters(&records, &options).unwrap();
//! assert_eq!(snapshot.centroids.len(), 2);
//! ```

pub mod vector;
pub mod error;
pub mod sanitize;
pub mod rng;
pub mod record;
pub mod kmeans;
pub mod clustering;
pub mod config;

pub use vector::Vector;
pub use error::{Error, Result};
pub use sanitize::{sanitize, sanitize_values, parse_vector_str, mean_pool};
pub use rng::Mulberry32;
pub use record::{EmbeddingRecord, RawEmbeddingRecord, UserId, sanitize_records};
pub use kmeans::{kmeans, nearest_centroid, KMeansOptions, KMeansResult};
pub use clustering::{compute_clusters, assign_user, Centroid, ClusterAssignment, ClusterSnapshot};
pub use config::EngineConfig;
