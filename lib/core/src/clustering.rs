//! Cluster computation over user embeddings
//!
//! Wraps [`kmeans`] with user identity: takes sanitized [`EmbeddingRecord`]s and
//! produces the centroid table and per-user assignments the persistence layer stores.

use crate::kmeans::{kmeans, nearest_centroid, KMeansOptions};
use crate::record::{EmbeddingRecord, UserId};
use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub cluster_id: usize,
    pub vector: Vector,
}

/// A user's cluster, derived from the current centroids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub user_id: UserId,
    pub cluster_id: usize,
    /// Cosine similarity to the assigned centroid, in [-1, 1]
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub centroids: Vec<Centroid>,
    pub assignments: Vec<ClusterAssignment>,
    pub iterations: usize,
}

impl ClusterSnapshot {
    pub fn assignment_for(&self, user_id: &str) -> Option<&ClusterAssignment> {
        self.assignments.iter().find(|a| a.user_id == user_id)
    }

    pub fn centroid_vectors(&self) -> Vec<Vector> {
        self.centroids.iter().map(|c| c.vector.clone()).collect()
    }

    /// Number of users assigned to each cluster, indexed by cluster id
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for a in &self.assignments {
            if let Some(size) = sizes.get_mut(a.cluster_id) {
                *size += 1;
            }
        }
        sizes
    }
}

/// Cluster the given records and assign every user to its nearest final centroid.
///
/// A lone record short-circuits k-means: it becomes cluster 0 with similarity 1.0.
/// Records must already be sanitized; an empty slice is an error.
pub fn compute_clusters(records: &[EmbeddingRecord], options: &KMeansOptions) -> Result<ClusterSnapshot> {
    match records {
        [] => Err(Error::EmptyInputSet),
        [only] => {
            debug!(user_id = %only.user_id, "single embedding, skipping k-means");
            Ok(ClusterSnapshot {
                centroids: vec![Centroid {
                    cluster_id: 0,
                    vector: only.vector.clone(),
                }],
                assignments: vec![ClusterAssignment {
                    user_id: only.user_id.clone(),
                    cluster_id: 0,
                    similarity: 1.0,
                }],
                iterations: 0,
            })
        }
        _ => {
            let vectors: Vec<Vector> = records.iter().map(|r| r.vector.clone()).collect();
            let result = kmeans(&vectors, options)?;

            let assignments = records
                .iter()
                .map(|record| assign_user(record, &result.centroids))
                .collect::<Result<Vec<_>>>()?;

            let centroids = result
                .centroids
                .into_iter()
                .enumerate()
                .map(|(cluster_id, vector)| Centroid { cluster_id, vector })
                .collect();

            Ok(ClusterSnapshot {
                centroids,
                assignments,
                iterations: result.iterations,
            })
        }
    }
}

/// Assign one user against an existing centroid set without re-clustering.
pub fn assign_user(record: &EmbeddingRecord, centroids: &[Vector]) -> Result<ClusterAssignment> {
    if let Some(bad) = centroids.iter().find(|c| c.dim() != record.vector.dim()) {
        return Err(Error::DimensionMismatch {
            expected: record.vector.dim(),
            actual: bad.dim(),
        });
    }
    let (cluster_id, similarity) =
        nearest_centroid(&record.vector, centroids).ok_or(Error::EmptyInputSet)?;
    Ok(ClusterAssignment {
        user_id: record.user_id.clone(),
        cluster_id,
        similarity,
    })
}
