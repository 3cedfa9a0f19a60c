//! Hybrid index core
//!
//! The corpus is represented twice: as a vector space (`VectorIndex`, cosine
//! nearest-neighbor over skill embeddings) and as a relationship graph
//! (`RelationshipGraph`, typed weighted edges derived from shared metadata).
//! The `SnapshotTracker` fingerprints indexed content so `IndexingEngine`
//! can reconcile both representations incrementally against corpus changes.

pub mod engine;
pub mod graph;
pub mod lock;
pub mod snapshot;
pub mod vector;

pub use engine::{IndexStats, IndexingEngine};
pub use graph::{EdgeKind, RelationshipGraph};
pub use lock::IndexLock;
pub use snapshot::SnapshotTracker;
pub use vector::VectorIndex;
