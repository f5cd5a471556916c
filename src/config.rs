// ⚙️ Configuration - where records live and how the binary logs
//
// Every field has a default, so an empty JSON object (or no file at all)
// reproduces the classic layout: students.txt and faculty.txt in the
// working directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming a JSON config file
pub const CONFIG_ENV: &str = "CAMPUS_RECORDS_CONFIG";

/// Env var overriding `data_dir`
pub const DATA_DIR_ENV: &str = "CAMPUS_RECORDS_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub data_dir: PathBuf,
    pub student_file: String,
    pub faculty_file: String,
    pub snapshot_db: String,

    /// Fallback tracing filter when RUST_LOG is unset
    pub log_filter: String,

    /// Admin created at startup when no identity with that username exists
    pub bootstrap_admin: Option<AdminCredentials>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        RecordsConfig {
            data_dir: PathBuf::from("."),
            student_file: "students.txt".to_string(),
            faculty_file: "faculty.txt".to_string(),
            snapshot_db: "records.db".to_string(),
            log_filter: "info".to_string(),
            bootstrap_admin: None,
        }
    }
}

impl RecordsConfig {
    /// Parse a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid config JSON")
    }

    /// Resolve config: explicit path, else CAMPUS_RECORDS_CONFIG, else defaults.
    /// CAMPUS_RECORDS_DATA_DIR then overrides the data directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn student_path(&self) -> PathBuf {
        self.data_dir.join(&self.student_file)
    }

    pub fn faculty_path(&self) -> PathBuf {
        self.data_dir.join(&self.faculty_file)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_db)
    }
}
