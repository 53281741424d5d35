//! On-disk artifacts for the vector store.
//!
//! Two files per store: a JSON array of documents (the source of truth) and a
//! little-endian binary dump of the index vectors. Both are staged to sibling
//! temp files first, then renamed into place, records before index.

use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::infrastructure::flatfile::index::FlatIndex;
use crate::infrastructure::flatfile::records::RecordStore;
use serde::Serialize;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const INDEX_MAGIC: &[u8; 4] = b"RSIX";
const INDEX_VERSION: u32 = 2;
const HEADER_LEN: usize = 4 + 4 + 4 + 4 + 8;
const FLAG_NORMALIZED: u32 = 1;

/// What happened to one artifact while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactState {
    Loaded,
    Missing,
    Corrupt,
    DimensionMismatch,
    /// Vectors were stored with the other normalisation setting.
    NormalizationMismatch,
}

pub struct PersistenceManager {
    index_path: PathBuf,
    records_path: PathBuf,
    normalized: bool,
}

impl PersistenceManager {
    /// `normalized` is recorded in every index written and checked on load.
    pub fn new(index_path: PathBuf, records_path: PathBuf, normalized: bool) -> Self {
        Self {
            index_path,
            records_path,
            normalized,
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Writes both artifacts. Nothing is renamed until both temp files are
    /// on disk; the records file lands before the index. If the index rename
    /// fails the records file may already be replaced, see
    /// [`PersistenceManager::restore_records`].
    pub fn save(&self, records: &RecordStore, index: &FlatIndex) -> Result<(), DomainError> {
        let json = serde_json::to_vec_pretty(records.all())
            .map_err(|e| DomainError::Persistence(format!("Failed to encode records: {e}")))?;

        let records_tmp = stage(&self.records_path, &json).map_err(|e| write_error(&self.records_path, e))?;
        let index_tmp = match stage(&self.index_path, &encode_index(index, self.normalized)) {
            Ok(tmp) => tmp,
            Err(e) => {
                discard(&records_tmp);
                return Err(write_error(&self.index_path, e));
            }
        };

        if let Err(e) = commit(&records_tmp, &self.records_path) {
            discard(&records_tmp);
            discard(&index_tmp);
            return Err(write_error(&self.records_path, e));
        }
        if let Err(e) = commit(&index_tmp, &self.index_path) {
            discard(&index_tmp);
            return Err(write_error(&self.index_path, e));
        }

        debug!(
            records = records.len(),
            vectors = index.size(),
            "persisted store artifacts"
        );
        Ok(())
    }

    /// Rewrites the records file from `records` after a failed
    /// [`PersistenceManager::save`], so the file on disk matches the
    /// in-memory state the caller kept.
    pub fn restore_records(&self, records: &RecordStore) {
        let result = serde_json::to_vec_pretty(records.all())
            .map_err(io::Error::from)
            .and_then(|json| stage(&self.records_path, &json))
            .and_then(|tmp| commit(&tmp, &self.records_path));
        if let Err(e) = result {
            warn!(path = %self.records_path.display(), error = %e, "could not restore records artifact");
        }
    }

    /// Loads the records artifact, substituting an empty list when it is
    /// absent or cannot be parsed.
    pub fn load_records(&self) -> (RecordStore, ArtifactState) {
        let bytes = match fs::read(&self.records_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return (RecordStore::new(), ArtifactState::Missing)
            }
            Err(e) => {
                warn!(path = %self.records_path.display(), error = %e, "records artifact unreadable, starting empty");
                return (RecordStore::new(), ArtifactState::Corrupt);
            }
        };

        match serde_json::from_slice::<Vec<Document>>(&bytes) {
            Ok(records) => (RecordStore::from_vec(records), ArtifactState::Loaded),
            Err(e) => {
                warn!(path = %self.records_path.display(), error = %e, "records artifact corrupt, starting empty");
                (RecordStore::new(), ArtifactState::Corrupt)
            }
        }
    }

    /// Loads the index artifact. Anything other than a well-formed index of
    /// `dimension`, written with this manager's normalisation setting, yields
    /// an empty index of that dimension.
    pub fn load_index(&self, dimension: usize) -> (FlatIndex, ArtifactState) {
        let bytes = match fs::read(&self.index_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return (FlatIndex::new(dimension), ArtifactState::Missing)
            }
            Err(e) => {
                warn!(path = %self.index_path.display(), error = %e, "index artifact unreadable, starting empty");
                return (FlatIndex::new(dimension), ArtifactState::Corrupt);
            }
        };

        match decode_index(&bytes) {
            Ok((index, _)) if index.dimension() != dimension => {
                warn!(
                    path = %self.index_path.display(),
                    stored = index.dimension(),
                    expected = dimension,
                    "index artifact has a different dimension, discarding"
                );
                (FlatIndex::new(dimension), ArtifactState::DimensionMismatch)
            }
            Ok((_, normalized)) if normalized != self.normalized => {
                warn!(
                    path = %self.index_path.display(),
                    stored = normalized,
                    expected = self.normalized,
                    "index artifact has a different normalisation setting, discarding"
                );
                (FlatIndex::new(dimension), ArtifactState::NormalizationMismatch)
            }
            Ok((index, _)) => (index, ArtifactState::Loaded),
            Err(e) => {
                warn!(path = %self.index_path.display(), error = %e, "index artifact corrupt, starting empty");
                (FlatIndex::new(dimension), ArtifactState::Corrupt)
            }
        }
    }
}

/// Header: magic, version, dimension (u32), flags (u32), count (u64), all
/// little-endian, followed by `count * dimension` f32 values.
pub fn encode_index(index: &FlatIndex, normalized: bool) -> Vec<u8> {
    let flags = if normalized { FLAG_NORMALIZED } else { 0 };
    let mut out = Vec::with_capacity(HEADER_LEN + index.raw().len() * 4);
    out.extend_from_slice(INDEX_MAGIC);
    out.extend_from_slice(&INDEX_VERSION.to_le_bytes());
    out.extend_from_slice(&(index.dimension() as u32).to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&(index.size() as u64).to_le_bytes());
    out.extend(index.raw().iter().flat_map(|f| f.to_le_bytes()));
    out
}

/// Returns the index and whether its vectors were stored normalised.
pub fn decode_index(bytes: &[u8]) -> Result<(FlatIndex, bool), String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("index artifact too short ({} bytes)", bytes.len()));
    }
    if &bytes[0..4] != INDEX_MAGIC {
        return Err("bad magic".to_string());
    }
    let version = read_u32(bytes, 4);
    if version != INDEX_VERSION {
        return Err(format!("unsupported index version {version}"));
    }
    let dimension = read_u32(bytes, 8) as usize;
    let flags = read_u32(bytes, 12);
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&bytes[16..24]);
    let count = u64::from_le_bytes(count_bytes) as usize;

    let payload = &bytes[HEADER_LEN..];
    let expected = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| "index header overflows".to_string())?;
    if payload.len() != expected {
        return Err(format!(
            "payload is {} bytes, header declares {expected}",
            payload.len()
        ));
    }

    let data: Vec<f32> = payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    let index = FlatIndex::from_raw(dimension, data).map_err(|e| e.to_string())?;
    Ok((index, flags & FLAG_NORMALIZED != 0))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn write_error(path: &Path, e: io::Error) -> DomainError {
    DomainError::Persistence(format!("Failed to write {}: {e}", path.display()))
}

/// Writes `bytes` to `<path>.tmp` and flushes it to disk.
fn stage(path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(tmp_path)
}

/// Renames a staged file over `path` and syncs the directory entry.
fn commit(tmp_path: &Path, path: &Path) -> io::Result<()> {
    fs::rename(tmp_path, path)?;
    sync_parent(path)
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn discard(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path) {
        debug!(path = %tmp_path.display(), error = %e, "could not remove temp file");
    }
}
