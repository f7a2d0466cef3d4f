//! Raw and tokenized knowledge packages.
//!
//! Field names follow the on-disk contract (camelCase). Unknown metadata
//! fields are carried through untouched.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const PACKAGE_EXT: &str = "agentmem";
pub const TOKENS_EXT: &str = "tokens";

/// Seconds since the Unix epoch.
pub fn now_secs() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub total_positions: usize,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeMove {
    #[serde(rename = "move")]
    pub mv: String,
    pub evaluation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    pub position: String,
    pub best_move: String,
    pub evaluation: f64,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub principal_variation: Vec<String>,
    #[serde(default)]
    pub alternative_moves: Vec<AlternativeMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryPackage {
    pub metadata: PackageMetadata,
    #[serde(default)]
    pub memories: BTreeMap<String, MemoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeToken {
    #[serde(rename = "move")]
    pub mv: Vec<f32>,
    pub evaluation: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub original_position: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedMemory {
    pub position_tokens: Vec<f32>,
    pub evaluation_token: Vec<f64>,
    pub move_tokens: Vec<f32>,
    #[serde(default)]
    pub pv_tokens: Vec<Vec<f32>>,
    #[serde(default)]
    pub alternative_tokens: Vec<AlternativeToken>,
    pub metadata: TokenMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedPackage {
    pub metadata: PackageMetadata,
    #[serde(default)]
    pub tokenized_memories: BTreeMap<String, TokenizedMemory>,
}

fn with_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(ext) {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_os_string();
        s.push(".");
        s.push(ext);
        PathBuf::from(s)
    }
}

pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let r = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(r)?)
}

impl MemoryPackage {
    pub fn new(source: &str, creation_date: &str) -> Self {
        Self {
            metadata: PackageMetadata {
                source: source.to_string(),
                creation_date: creation_date.to_string(),
                ..PackageMetadata::default()
            },
            memories: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: String, entry: MemoryEntry) {
        self.memories.insert(key, entry);
        self.metadata.total_positions = self.memories.len();
    }

    /// Writes the package, appending `.agentmem` when missing. Returns the path written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let out = with_extension(path.as_ref(), PACKAGE_EXT);
        save_json(self, &out)?;
        Ok(out)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> { load_json(path) }
}

impl TokenizedPackage {
    /// Writes the package, appending `.tokens` when missing. Returns the path written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let out = with_extension(path.as_ref(), TOKENS_EXT);
        save_json(self, &out)?;
        Ok(out)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> { load_json(path) }
}
