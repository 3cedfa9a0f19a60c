//! Corpus snapshot tracking
//!
//! Maps skill id to a content fingerprint and last-indexed timestamp so the
//! indexing engine can skip unchanged skills and detect deletions. Backed by
//! SQLite; the fingerprint itself is a pure function of the skill's
//! indexable content, not a security primitive.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::skills::model::Skill;

/// Field separator inside the fingerprint preimage. Prevents adjacent fields
/// from colliding ("ab"+"c" vs "a"+"bc").
const FIELD_SEP: u8 = 0x1f;

pub struct SnapshotTracker {
    conn: Connection,
}

impl SnapshotTracker {
    /// Open (creating if needed) the tracker database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory tracker, used by tests and ephemeral runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS snapshots (
                skill_id    TEXT PRIMARY KEY,
                fingerprint TEXT NOT NULL,
                indexed_at  TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Deterministic hash over a skill's indexable content.
    ///
    /// Text fields are NFC-normalized first so equivalent Unicode encodings
    /// fingerprint identically.
    pub fn fingerprint_of(skill: &Skill) -> String {
        let mut hasher = Sha256::new();
        let mut field = |text: &str| {
            let normalized: String = text.nfc().collect();
            hasher.update(normalized.as_bytes());
            hasher.update([FIELD_SEP]);
        };

        field(&skill.name);
        field(&skill.description);
        field(&skill.instructions);
        for tag in &skill.tags {
            field(tag);
        }
        field(&skill.category);
        for dep in &skill.dependencies {
            field(dep);
        }
        for rel in &skill.related {
            field(rel);
        }
        field(&skill.version);

        hex::encode(hasher.finalize())
    }

    /// True if the skill is untracked or its fingerprint differs.
    pub fn has_changed(&self, skill_id: &str, fingerprint: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT fingerprint FROM snapshots WHERE skill_id = ?")?;
        let mut rows = stmt.query(params![skill_id])?;
        match rows.next()? {
            Some(row) => {
                let recorded: String = row.get(0)?;
                Ok(recorded != fingerprint)
            }
            None => Ok(true),
        }
    }

    pub fn record(
        &self,
        skill_id: &str,
        fingerprint: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO snapshots (skill_id, fingerprint, indexed_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(skill_id) DO UPDATE SET
                fingerprint = excluded.fingerprint,
                indexed_at = excluded.indexed_at",
            params![skill_id, fingerprint, timestamp.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Tracked ids no longer present in `current_ids` (removal candidates).
    pub fn stale_ids(&self, current_ids: &BTreeSet<String>) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT skill_id FROM snapshots ORDER BY skill_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut stale = Vec::new();
        for row in rows {
            let id = row?;
            if !current_ids.contains(&id) {
                stale.push(id);
            }
        }
        Ok(stale)
    }

    pub fn remove(&self, skill_id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM snapshots WHERE skill_id = ?", params![skill_id])?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Most recent indexed_at timestamp, if anything was ever indexed.
    pub fn last_indexed_at(&self) -> Result<Option<String>> {
        let result: Option<String> = self.conn.query_row(
            "SELECT MAX(indexed_at) FROM snapshots",
            [],
            |row| row.get(0),
        )?;
        Ok(result)
    }
}
