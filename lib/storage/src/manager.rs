use anyhow::{Context, Result};
use asteria_core::{sanitize, ClusterSnapshot, RawEmbeddingRecord, Vector};
use asteria_similarity::{Candidate, MatchQuery};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::snapshot::{ClusterRow, EmbeddingRow, ProfileRow, UserClusterRow};

const EMBEDDINGS_TABLE: &str = "embeddings.json";
const PROFILES_TABLE: &str = "profiles.json";
const CLUSTERS_TABLE: &str = "clusters.json";
const USER_CLUSTERS_TABLE: &str = "user_clusters.json";

/// JSON tables under a data directory.
///
/// Every write replaces the whole file atomically; concurrent writers get
/// last-write-wins.
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data directory {:?}", data_dir))?;
        Ok(Self { data_dir })
    }

    /// All embedding rows, unvalidated
    pub fn load_embeddings(&self) -> Result<Vec<RawEmbeddingRecord>> {
        let rows: Vec<EmbeddingRow> = self.read_table(EMBEDDINGS_TABLE)?;
        Ok(rows
            .into_iter()
            .map(|row| RawEmbeddingRecord::new(row.user_id, row.vector))
            .collect())
    }

    /// Insert or replace a user's embedding
    pub fn upsert_embedding(&self, user_id: &str, vector: &Vector, source: &str) -> Result<()> {
        let mut rows: Vec<EmbeddingRow> = self.read_table(EMBEDDINGS_TABLE)?;
        let row = EmbeddingRow {
            user_id: user_id.to_string(),
            source: Some(source.to_string()),
            vector: serde_json::to_value(vector)?,
            updated_at: Some(now()),
        };
        match rows.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        self.write_table(EMBEDDINGS_TABLE, &rows)
    }

    pub fn load_profiles(&self) -> Result<Vec<ProfileRow>> {
        self.read_table(PROFILES_TABLE)
    }

    pub fn save_profiles(&self, profiles: &[ProfileRow]) -> Result<()> {
        self.write_table(PROFILES_TABLE, profiles)
    }

    pub fn load_clusters(&self) -> Result<Vec<ClusterRow>> {
        self.read_table(CLUSTERS_TABLE)
    }

    pub fn load_assignments(&self) -> Result<Vec<UserClusterRow>> {
        self.read_table(USER_CLUSTERS_TABLE)
    }

    /// Persist a clustering run: the centroid table is replaced, assignments are
    /// upserted by user.
    pub fn save_clusters(&self, snapshot: &ClusterSnapshot) -> Result<()> {
        let created_at = now();

        let clusters: Vec<ClusterRow> = snapshot
            .centroids
            .iter()
            .map(|c| ClusterRow {
                cluster_id: c.cluster_id,
                centroid: c.vector.as_slice().to_vec(),
                created_at: created_at.clone(),
            })
            .collect();
        self.write_table(CLUSTERS_TABLE, &clusters)?;

        let mut assignments = self.load_assignments()?;
        for a in &snapshot.assignments {
            let row = UserClusterRow {
                user_id: a.user_id.clone(),
                cluster_id: a.cluster_id,
                similarity: a.similarity,
                created_at: created_at.clone(),
            };
            match assignments.iter_mut().find(|r| r.user_id == a.user_id) {
                Some(existing) => *existing = row,
                None => assignments.push(row),
            }
        }
        self.write_table(USER_CLUSTERS_TABLE, &assignments)?;

        debug!(
            clusters = clusters.len(),
            assignments = snapshot.assignments.len(),
            "saved cluster snapshot"
        );
        Ok(())
    }

    /// Sanitized embeddings keyed by user; invalid rows are skipped
    pub fn load_vectors(&self, expected_dim: usize) -> Result<HashMap<String, Vector>> {
        let mut vectors = HashMap::new();
        for row in self.load_embeddings()? {
            match sanitize(&row.vector, expected_dim) {
                Ok(v) => {
                    vectors.insert(row.user_id, v);
                }
                Err(e) => warn!(user_id = %row.user_id, "skipping embedding: {}", e),
            }
        }
        Ok(vectors)
    }

    /// Everything a match request needs from one read of each table: the query
    /// user's embedding (if valid) and interests, plus every profile joined with
    /// its sanitized embedding.
    pub fn load_match_inputs(&self, user_id: &str, expected_dim: usize) -> Result<(MatchQuery, Vec<Candidate>)> {
        let mut vectors = self.load_vectors(expected_dim)?;
        let profiles = self.load_profiles()?;

        let query = MatchQuery {
            user_id: user_id.to_string(),
            vector: vectors.get(user_id).cloned(),
            attributes: profiles
                .iter()
                .find(|p| p.id == user_id)
                .map(ProfileRow::interests)
                .unwrap_or_default(),
        };

        let candidates = profiles
            .into_iter()
            .map(|p| Candidate {
                vector: vectors.remove(&p.id),
                attributes: p.interests(),
                display: p.display(),
                user_id: p.id,
            })
            .collect();

        Ok((query, candidates))
    }

    fn read_table<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&path).with_context(|| format!("reading {:?}", path))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing {:?}", path))
    }

    fn write_table<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<()> {
        let path = self.data_dir.join(name);
        let data = serde_json::to_vec_pretty(rows)?;
        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .with_context(|| format!("writing {:?}", path))?;
        Ok(())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
