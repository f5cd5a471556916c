// 🗄️ Snapshot Store - lossless copy of the whole directory in SQLite
//
// The flat files only keep scalar identity fields. A snapshot keeps
// everything: ledgers, payments made, faculty records and the course catalog.
// It is a separate, versioned schema and never replaces the flat-file layout.
//
// Each snapshot is append-only and written in a single SQL transaction.
// A SHA-256 digest over the stored payloads is checked on restore.

use crate::directory::UserDirectory;
use crate::entities::{CourseCatalog, Identity};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    /// Stable identity of the snapshot (UUID v4)
    pub snapshot_id: String,

    pub taken_at: DateTime<Utc>,
    pub identity_count: usize,

    /// Hex SHA-256 over catalog JSON followed by each identity payload
    pub digest: String,
}

fn compute_digest<'a>(catalog_json: &str, payloads: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(catalog_json.as_bytes());
    for payload in payloads {
        hasher.update(payload.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open snapshot database {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        setup_schema(&conn)?;
        Ok(SnapshotStore { conn })
    }

    /// Store the full directory as a new snapshot
    pub fn save(&mut self, directory: &UserDirectory) -> Result<SnapshotInfo> {
        let catalog_json = serde_json::to_string(directory.catalog())?;
        let payloads = directory
            .identities()
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;

        let info = SnapshotInfo {
            snapshot_id: uuid::Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            identity_count: payloads.len(),
            digest: compute_digest(&catalog_json, payloads.iter().map(String::as_str)),
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO snapshots (snapshot_id, taken_at, identity_count, catalog, digest)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                info.snapshot_id,
                info.taken_at.to_rfc3339(),
                info.identity_count as i64,
                catalog_json,
                info.digest,
            ],
        )?;
        for (position, (identity, payload)) in
            directory.identities().iter().zip(&payloads).enumerate()
        {
            tx.execute(
                "INSERT INTO snapshot_identities (snapshot_id, position, username, role, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    info.snapshot_id,
                    position as i64,
                    identity.username(),
                    identity.role().as_str(),
                    payload,
                ],
            )?;
        }
        tx.commit().context("Failed to commit snapshot")?;

        info!(
            snapshot_id = %info.snapshot_id,
            identities = info.identity_count,
            "Snapshot saved"
        );
        Ok(info)
    }

    /// All snapshots, newest first
    pub fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT snapshot_id, taken_at, identity_count, digest
             FROM snapshots ORDER BY id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(snapshot_id, taken_at, count, digest)| {
                let taken_at = DateTime::parse_from_rfc3339(&taken_at)
                    .with_context(|| format!("Bad timestamp on snapshot {}", snapshot_id))?
                    .with_timezone(&Utc);
                Ok(SnapshotInfo {
                    snapshot_id,
                    taken_at,
                    identity_count: count as usize,
                    digest,
                })
            })
            .collect()
    }

    pub fn latest(&self) -> Result<Option<SnapshotInfo>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Restore the most recent snapshot, or None if none was ever taken
    pub fn load_latest(&self) -> Result<Option<UserDirectory>> {
        let latest: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot_id FROM snapshots ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match latest {
            Some(snapshot_id) => self.load(&snapshot_id).map(Some),
            None => Ok(None),
        }
    }

    /// Restore a specific snapshot, verifying its digest
    pub fn load(&self, snapshot_id: &str) -> Result<UserDirectory> {
        let (catalog_json, expected_digest): (String, String) = self
            .conn
            .query_row(
                "SELECT catalog, digest FROM snapshots WHERE snapshot_id = ?1",
                params![snapshot_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .with_context(|| format!("Snapshot not found: {}", snapshot_id))?;

        let mut stmt = self.conn.prepare(
            "SELECT payload FROM snapshot_identities
             WHERE snapshot_id = ?1 ORDER BY position",
        )?;
        let payloads = stmt
            .query_map(params![snapshot_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let digest = compute_digest(&catalog_json, payloads.iter().map(String::as_str));
        if digest != expected_digest {
            bail!("Snapshot {} failed digest verification", snapshot_id);
        }

        let catalog: CourseCatalog =
            serde_json::from_str(&catalog_json).context("Failed to decode catalog")?;
        let identities = payloads
            .iter()
            .map(|p| serde_json::from_str::<Identity>(p))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode identity")?;

        info!(snapshot_id, identities = identities.len(), "Snapshot restored");
        Ok(UserDirectory::from_parts(identities, catalog))
    }
}

fn setup_schema(conn: &Connection) -> Result<()> {
    // WAL for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            snapshot_id TEXT UNIQUE NOT NULL,
            taken_at TEXT NOT NULL,
            identity_count INTEGER NOT NULL,
            catalog TEXT NOT NULL,
            digest TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshot_identities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            snapshot_id TEXT NOT NULL REFERENCES snapshots(snapshot_id),
            position INTEGER NOT NULL,
            username TEXT NOT NULL,
            role TEXT NOT NULL,
            payload TEXT NOT NULL,
            UNIQUE (snapshot_id, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_snapshot_identities_username
         ON snapshot_identities(username)",
        [],
    )?;

    Ok(())
}
