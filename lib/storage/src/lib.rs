pub mod manager;
pub mod snapshot;

pub use manager::FileStore;
pub use snapshot::{ClusterRow, EmbeddingRow, ProfileRow, UserClusterRow};
