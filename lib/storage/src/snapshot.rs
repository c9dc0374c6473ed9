// Row types for the JSON tables kept under the data directory
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRow {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Stored as written; validated on read
    #[serde(default)]
    pub vector: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub star_color: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
}

impl ProfileRow {
    pub fn interests(&self) -> Vec<String> {
        self.interests.clone().unwrap_or_default()
    }

    /// Fields shown next to a match
    pub fn display(&self) -> serde_json::Value {
        serde_json::json!({
            "full_name": self.full_name.clone().unwrap_or_default(),
            "avatar_url": self.avatar_url,
            "star_color": self.star_color,
            "interests": self.interests(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRow {
    pub cluster_id: usize,
    pub centroid: Vec<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClusterRow {
    pub user_id: String,
    pub cluster_id: usize,
    pub similarity: f64,
    pub created_at: String,
}
