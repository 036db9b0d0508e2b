//! File-backed instinct storage.
//!
//! Each root is a directory holding one `<id>.yaml` frontmatter file per
//! record. A combined store reads the personal root before the inherited
//! root, so a personal record shadows an inherited one with the same ID.
//!
//! # Example
//!
//! ```ignore
//! use instinct_core::store::FileStore;
//! use instinct_core::{InstinctStore, ListFilter};
//!
//! let store = FileStore::new("~/.config/instinct/instincts/personal", "/tmp/inherited");
//! for inst in store.list(&ListFilter::new())? {
//!     println!("{} {:.2}", inst.id, inst.confidence);
//! }
//! ```

pub mod frontmatter;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{InstinctError, InstinctResult};
use crate::traits::InstinctStore;
use crate::types::{validate_id, Instinct, ListFilter, Source};

/// File extension of record files.
pub const RECORD_EXTENSION: &str = "yaml";

/// One store directory and the provenance of its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRoot {
    pub source: Source,
    pub dir: PathBuf,
}

/// Directory-per-source instinct store.
///
/// The first root is the write target.
#[derive(Debug, Clone)]
pub struct FileStore {
    roots: Vec<StoreRoot>,
}

impl FileStore {
    /// Combined view over a personal and an inherited root.
    ///
    /// Writes go to the personal root.
    pub fn new(personal: impl Into<PathBuf>, inherited: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![
                StoreRoot {
                    source: Source::Personal,
                    dir: personal.into(),
                },
                StoreRoot {
                    source: Source::Inherited,
                    dir: inherited.into(),
                },
            ],
        }
    }

    /// Store bound to exactly one root.
    pub fn single(source: Source, dir: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![StoreRoot {
                source,
                dir: dir.into(),
            }],
        }
    }

    /// Roots in read order.
    pub fn roots(&self) -> &[StoreRoot] {
        &self.roots
    }

    /// Root that receives writes.
    pub fn primary(&self) -> &StoreRoot {
        &self.roots[0]
    }

    fn record_path(dir: &Path, id: &str) -> PathBuf {
        dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Read every well-formed record in `root`.
    ///
    /// A missing directory yields nothing. Unreadable or malformed files are
    /// skipped with a warning.
    fn load_root(root: &StoreRoot) -> InstinctResult<Vec<Instinct>> {
        let entries = match fs::read_dir(&root.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %root.dir.display(), "Store root does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(InstinctError::read_failed(&root.dir, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InstinctError::read_failed(&root.dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            match Self::load_file(&path) {
                Ok(inst) => records.push(inst.with_source(root.source)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping malformed instinct file"),
            }
        }

        debug!(dir = %root.dir.display(), count = records.len(), "Loaded store root");
        Ok(records)
    }

    fn load_file(path: &Path) -> InstinctResult<Instinct> {
        let text = fs::read_to_string(path).map_err(|e| InstinctError::read_failed(path, e))?;
        let inst = frontmatter::decode_one(&text).map_err(|e| e.at_path(path))?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if inst.id != stem {
            return Err(InstinctError::parse(format!(
                "record id {:?} does not match file name",
                inst.id
            ))
            .at_path(path));
        }
        Ok(inst)
    }
}

impl InstinctStore for FileStore {
    fn list(&self, filter: &ListFilter) -> InstinctResult<Vec<Instinct>> {
        let mut merged: BTreeMap<String, Instinct> = BTreeMap::new();

        for root in &self.roots {
            if filter.source.is_some_and(|s| s != root.source) {
                continue;
            }
            for inst in Self::load_root(root)? {
                merged.entry(inst.id.clone()).or_insert(inst);
            }
        }

        Ok(merged.into_values().filter(|inst| filter.matches(inst)).collect())
    }

    fn get(&self, id: &str) -> InstinctResult<Instinct> {
        validate_id(id)?;

        for root in &self.roots {
            let path = Self::record_path(&root.dir, id);
            if !path.exists() {
                continue;
            }
            return Self::load_file(&path).map(|inst| inst.with_source(root.source));
        }

        Err(InstinctError::not_found(id))
    }

    fn save(&self, instinct: &Instinct) -> InstinctResult<()> {
        let text = frontmatter::encode(instinct)?;
        let root = self.primary();

        fs::create_dir_all(&root.dir).map_err(|e| InstinctError::write_failed(&root.dir, e))?;

        // Write beside the target and rename so readers never see a partial file.
        let path = Self::record_path(&root.dir, &instinct.id);
        let staging = root.dir.join(format!(".{}.tmp", instinct.id));
        fs::write(&staging, text).map_err(|e| InstinctError::write_failed(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| InstinctError::write_failed(&path, e))?;

        info!(id = %instinct.id, source = %root.source, "Saved instinct");
        Ok(())
    }
}
