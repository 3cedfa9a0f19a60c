//! Indexing engine
//!
//! Drives full/incremental reindexing, keeps the vector index and the
//! relationship graph in sync with the corpus, and answers hybrid search and
//! graph-only queries.
//!
//! Concurrency model: many readers, one writer. `search`/`related`/`stats`
//! take read locks and may run concurrently; `reindex_all` is serialized by
//! an internal guard and mutates the three index structures as a unit.
//! Readers may observe a skill indexed mid-pass with only one side updated;
//! two reindex passes never interleave within a process (`IndexLock` covers
//! cross-process exclusion for the CLI).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SksError};
use crate::index::graph::RelationshipGraph;
use crate::index::snapshot::SnapshotTracker;
use crate::index::vector::VectorIndex;
use crate::search::cache::EmbeddingCache;
use crate::search::embeddings::Embedder;
use crate::search::filters::SearchFilters;
use crate::search::scorer::{
    self, GRAPH_PROXIMITY_HOPS, MAX_SEARCH_LIMIT, MatchType, ScoredSkill, SearchQuery,
    VECTOR_CANDIDATE_FACTOR, WeightPreset,
};
use crate::skills::manager::SkillSource;
use crate::skills::model::Skill;

/// Point-in-time index statistics. Recomputed on demand, not authoritative
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_skills: usize,
    pub vector_store_size: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub last_indexed_at: Option<String>,
}

pub struct IndexingEngine {
    skills: Arc<dyn SkillSource>,
    embedder: Arc<dyn Embedder>,
    vector: RwLock<VectorIndex>,
    graph: RwLock<RelationshipGraph>,
    tracker: Mutex<SnapshotTracker>,
    /// Current corpus snapshot by id, refreshed on every reindex.
    catalog: RwLock<BTreeMap<String, Skill>>,
    query_cache: EmbeddingCache,
    reindex_guard: Mutex<()>,
    embed_timeout: Duration,
}

impl IndexingEngine {
    pub fn new(
        skills: Arc<dyn SkillSource>,
        embedder: Arc<dyn Embedder>,
        tracker: SnapshotTracker,
        embed_timeout: Duration,
    ) -> Self {
        let dims = embedder.dims();
        Self {
            skills,
            embedder,
            vector: RwLock::new(VectorIndex::new(dims)),
            graph: RwLock::new(RelationshipGraph::new()),
            tracker: Mutex::new(tracker),
            catalog: RwLock::new(BTreeMap::new()),
            query_cache: EmbeddingCache::default(),
            reindex_guard: Mutex::new(()),
            embed_timeout,
        }
    }

    pub fn skill_source(&self) -> &dyn SkillSource {
        self.skills.as_ref()
    }

    /// Reconcile both indexes with the current corpus.
    ///
    /// Unchanged skills (by fingerprint) skip re-embedding unless `force` is
    /// set or the skill is missing from either index. A failed embedding
    /// skips that skill only; an unreadable corpus aborts the whole call
    /// with `IndexingFailed` and no stats.
    pub fn reindex_all(&self, force: bool) -> Result<IndexStats> {
        let _guard = self.reindex_guard.lock();

        let corpus = self
            .skills
            .discover_skills()
            .map_err(|e| SksError::IndexingFailed(e.to_string()))?;

        // Duplicate ids replace, never duplicate: last discovery wins.
        let mut by_id: BTreeMap<String, Skill> = BTreeMap::new();
        for skill in corpus {
            if by_id.insert(skill.id.clone(), skill).is_some() {
                warn!("duplicate skill id during discovery, keeping last");
            }
        }

        *self.catalog.write() = by_id.clone();

        // Partition into unchanged fast-path and skills needing (re)indexing.
        let mut pending: Vec<(Skill, String)> = Vec::new();
        let mut unchanged = 0usize;
        {
            let tracker = self.tracker.lock();
            let vector = self.vector.read();
            let graph = self.graph.read();
            for skill in by_id.values() {
                let fingerprint = SnapshotTracker::fingerprint_of(skill);
                let needs_work = force
                    || tracker.has_changed(&skill.id, &fingerprint)?
                    || !vector.contains(&skill.id)
                    || !graph.contains(&skill.id);
                if needs_work {
                    pending.push((skill.clone(), fingerprint));
                } else {
                    unchanged += 1;
                }
            }
        }
        debug!(
            pending = pending.len(),
            unchanged, "reindex pass partitioned"
        );

        // Embed the batch in parallel; each call is individually bounded by
        // the per-skill timeout so one slow provider call cannot stall the
        // whole pass.
        let embedded: Vec<(Skill, String, Result<Vec<f32>>)> = pending
            .into_par_iter()
            .map(|(skill, fingerprint)| {
                let text = skill.embedding_text();
                let result =
                    embed_with_timeout(Arc::clone(&self.embedder), text, self.embed_timeout);
                (skill, fingerprint, result)
            })
            .collect();

        // Apply sequentially: each skill lands in the vector index, the
        // graph, and the tracker before the next is touched, so cancelling
        // between skills leaves a consistent prefix.
        let mut indexed = 0usize;
        let mut failed = 0usize;
        for (skill, fingerprint, embedding) in embedded {
            let embedding = match embedding {
                Ok(e) if e.len() == self.embedder.dims() => e,
                Ok(e) => {
                    warn!(
                        skill = %skill.id,
                        "embedding provider returned {} dims, expected {}; skipping",
                        e.len(),
                        self.embedder.dims()
                    );
                    failed += 1;
                    continue;
                }
                Err(err) => {
                    warn!(skill = %skill.id, "embedding failed, skipping: {err}");
                    failed += 1;
                    continue;
                }
            };

            self.vector
                .write()
                .upsert(skill.id.as_str(), embedding, fingerprint.as_str())?;
            self.graph.write().upsert_node(&skill);
            self.tracker
                .lock()
                .record(&skill.id, &fingerprint, Utc::now())?;
            indexed += 1;
        }

        // Deletions: every tracked id absent from the corpus leaves all
        // three structures.
        let current_ids: BTreeSet<String> = by_id.keys().cloned().collect();
        let stale = self.tracker.lock().stale_ids(&current_ids)?;
        for id in &stale {
            self.vector.write().remove(id);
            self.graph.write().remove_node(id);
            self.tracker.lock().remove(id)?;
        }

        info!(
            indexed,
            unchanged,
            failed,
            removed = stale.len(),
            "reindex complete"
        );
        self.stats()
    }

    /// Hybrid search: vector phase, graph-proximity phase, weighted fusion.
    pub fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
        preset: WeightPreset,
        filters: &SearchFilters,
    ) -> Result<Vec<ScoredSkill>> {
        let k = limit.min(MAX_SEARCH_LIMIT);
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.query_embedding(query)?;

        // Vector phase: over-fetch so filtering still leaves k candidates.
        let candidates = self.vector.read().query(&embedding, k * VECTOR_CANDIDATE_FACTOR);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Graph phase: each candidate's proximity is its strongest
        // connection to any *other* candidate, normalized by the strongest
        // signal in the set.
        let candidate_ids: BTreeSet<&str> =
            candidates.iter().map(|(id, _)| id.as_str()).collect();
        let raw_graph: Vec<f32> = {
            let graph = self.graph.read();
            candidates
                .iter()
                .map(|(id, _)| {
                    graph
                        .neighbors(id, GRAPH_PROXIMITY_HOPS)
                        .into_iter()
                        .filter(|(other, _)| {
                            other != id && candidate_ids.contains(other.as_str())
                        })
                        .map(|(_, weight)| weight)
                        .fold(0.0f32, f32::max)
                })
                .collect()
        };
        let graph_scores = scorer::normalize_graph_scores(&raw_graph);

        let normalized = preset.weights().normalized();
        let match_type = MatchType::for_weights(normalized);

        let catalog = self.catalog.read();
        let mut results: Vec<ScoredSkill> = candidates
            .iter()
            .zip(graph_scores.iter())
            .filter_map(|((id, similarity), graph_score)| {
                // A candidate missing from the catalog was removed mid-pass;
                // drop it rather than fabricate a result.
                let skill = catalog.get(id)?;
                if !filters.matches(skill) {
                    return None;
                }
                Some(ScoredSkill {
                    skill: skill.clone(),
                    score: scorer::fuse(*similarity, *graph_score, normalized),
                    match_type,
                })
            })
            .collect();

        scorer::sort_scored(&mut results);
        results.truncate(k);
        Ok(results)
    }

    /// Graph-only neighborhood of a skill, ranked by cumulative edge weight.
    pub fn related(&self, skill_id: &str, max_hops: usize) -> Result<Vec<ScoredSkill>> {
        let catalog = self.catalog.read();
        if !catalog.contains_key(skill_id) {
            return Err(SksError::SkillNotFound(skill_id.to_string()));
        }

        let neighbors = self.graph.read().neighbors(skill_id, max_hops);
        let results = neighbors
            .into_iter()
            .filter_map(|(id, weight)| {
                let skill = catalog.get(&id)?;
                Some(ScoredSkill {
                    skill: skill.clone(),
                    score: weight.min(1.0),
                    match_type: MatchType::Graph,
                })
            })
            .collect();
        Ok(results)
    }

    pub fn stats(&self) -> Result<IndexStats> {
        let tracker = self.tracker.lock();
        Ok(IndexStats {
            total_skills: tracker.len()?,
            vector_store_size: self.vector.read().size_bytes(),
            graph_nodes: self.graph.read().node_count(),
            graph_edges: self.graph.read().edge_count(),
            last_indexed_at: tracker.last_indexed_at()?,
        })
    }

    fn query_embedding(&self, query: &SearchQuery) -> Result<Vec<f32>> {
        match query {
            SearchQuery::Embedding(embedding) => {
                if embedding.len() != self.embedder.dims() {
                    return Err(SksError::DimensionMismatch {
                        expected: self.embedder.dims(),
                        actual: embedding.len(),
                    });
                }
                Ok(embedding.clone())
            }
            SearchQuery::Text(text) => {
                if let Some(cached) = self.query_cache.get(text) {
                    return Ok(cached);
                }
                let embedding = self.embedder.embed(text)?;
                self.query_cache.put(text.clone(), embedding.clone());
                Ok(embedding)
            }
        }
    }
}

/// Run one embedding call on a worker thread, bounded by `timeout`.
///
/// The provider call itself cannot be interrupted; on timeout the worker is
/// abandoned and its eventual result dropped.
fn embed_with_timeout(
    embedder: Arc<dyn Embedder>,
    text: String,
    timeout: Duration,
) -> Result<Vec<f32>> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    std::thread::spawn(move || {
        let _ = tx.send(embedder.embed(&text));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(SksError::EmbeddingFailed(format!(
            "embedding timed out after {}s",
            timeout.as_secs()
        ))),
    }
}
