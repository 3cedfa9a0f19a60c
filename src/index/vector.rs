//! In-memory vector index for cosine nearest-neighbor search

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{Result, SksError};

/// One indexed embedding. Owned exclusively by the `VectorIndex`; exactly one
/// entry per current skill id.
#[derive(Debug, Clone)]
pub struct VectorEntry {
    pub embedding: Vec<f32>,
    pub fingerprint: String,
}

/// Vector store mapping skill ids to embeddings.
///
/// Query ordering is deterministic: similarity descending, ties broken by
/// ascending skill id.
pub struct VectorIndex {
    entries: BTreeMap<String, VectorEntry>,
    dims: usize,
}

impl VectorIndex {
    pub fn new(dims: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            dims,
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate in-memory footprint of the stored embeddings, in bytes.
    pub fn size_bytes(&self) -> usize {
        self.entries.len() * self.dims * std::mem::size_of::<f32>()
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.entries.contains_key(skill_id)
    }

    /// Insert or replace the entry for `skill_id`.
    pub fn upsert(
        &mut self,
        skill_id: impl Into<String>,
        embedding: Vec<f32>,
        fingerprint: impl Into<String>,
    ) -> Result<()> {
        if embedding.len() != self.dims {
            return Err(SksError::DimensionMismatch {
                expected: self.dims,
                actual: embedding.len(),
            });
        }
        self.entries.insert(
            skill_id.into(),
            VectorEntry {
                embedding,
                fingerprint: fingerprint.into(),
            },
        );
        Ok(())
    }

    /// Remove the entry for `skill_id`. No-op if absent.
    pub fn remove(&mut self, skill_id: &str) {
        self.entries.remove(skill_id);
    }

    /// Up to `k` nearest entries by cosine similarity.
    pub fn query(&self, embedding: &[f32], k: usize) -> Vec<(String, f32)> {
        if embedding.len() != self.dims || k == 0 {
            return Vec::new();
        }

        let mut scores: Vec<(String, f32)> = self
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), cosine_similarity(embedding, &entry.embedding)))
            .collect();

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scores.truncate(k);
        scores
    }
}

/// Cosine similarity; defined as 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
