//! Import of instinct records from exported files.
//!
//! Every candidate is classified exactly once against the existing combined
//! store, then new and overwritten records are persisted into the inherited
//! store only.
//!
//! # Example
//!
//! ```ignore
//! use instinct_core::import::{import, read_source, ImportOptions};
//!
//! let candidates = read_source("team-instincts.yaml")?;
//! let opts = ImportOptions::new().with_dry_run(true);
//! let result = import(&combined, &inherited, &candidates, &opts)?;
//! println!("{} instinct(s) {}", result.imported(), result.verb(opts.dry_run));
//! ```

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::{debug, info};

use crate::error::{InstinctError, InstinctResult};
use crate::store::frontmatter;
use crate::traits::InstinctStore;
use crate::types::Instinct;

/// What import does with one candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    /// Left out of the store.
    Skip,
    /// Written as a new record.
    New,
    /// Replaces an existing record.
    Overwrite,
}

impl ImportAction {
    /// Verb shown in reports.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::New => "import",
            Self::Overwrite => "overwrite",
        }
    }

    /// Report label, e.g. `import:` or `[dry-run] overwrite:`.
    pub fn label(&self, dry_run: bool) -> String {
        if dry_run {
            format!("[dry-run] {}:", self.verb())
        } else {
            format!("{}:", self.verb())
        }
    }
}

/// Import behaviour switches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOptions {
    /// Classify without writing.
    pub dry_run: bool,
    /// Replace records whose ID already exists.
    pub force: bool,
    /// Skip candidates whose decayed confidence is below this.
    pub min_confidence: Option<f64>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }
}

/// One classified candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub instinct: Instinct,
    pub action: ImportAction,
}

/// Outcome of an import run, in candidate order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    pub items: Vec<ImportItem>,
}

impl ImportResult {
    /// Candidates classified as new or overwrite.
    pub fn imported(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.action != ImportAction::Skip)
            .count()
    }

    /// Candidates classified as skip.
    pub fn skipped(&self) -> usize {
        self.items.len() - self.imported()
    }

    /// Summary verb for the run.
    pub fn verb(&self, dry_run: bool) -> &'static str {
        if dry_run {
            "would be imported"
        } else {
            "imported"
        }
    }
}

/// Decide what to do with `candidate`.
///
/// `candidate.confidence` must already be decayed.
pub fn classify<S: InstinctStore + ?Sized>(
    existing: &S,
    candidate: &Instinct,
    opts: &ImportOptions,
) -> InstinctResult<ImportAction> {
    if let Some(min) = opts.min_confidence {
        if candidate.confidence < min {
            return Ok(ImportAction::Skip);
        }
    }

    let action = match (existing.contains(&candidate.id)?, opts.force) {
        (true, false) => ImportAction::Skip,
        (true, true) => ImportAction::Overwrite,
        (false, _) => ImportAction::New,
    };
    Ok(action)
}

/// Classify every candidate and persist non-skipped ones into `target`.
///
/// Nothing is written in dry-run mode. Classification of the whole batch
/// happens before any write, so a dry run and a real run classify alike.
/// A repeated ID is classified as if its earlier copy were already stored.
pub fn import<E, T>(
    existing: &E,
    target: &T,
    candidates: &[Instinct],
    opts: &ImportOptions,
) -> InstinctResult<ImportResult>
where
    E: InstinctStore + ?Sized,
    T: InstinctStore + ?Sized,
{
    let mut items = Vec::with_capacity(candidates.len());
    let mut claimed = HashSet::new();
    for candidate in candidates {
        candidate.validate()?;
        let mut action = classify(existing, candidate, opts)?;
        if action != ImportAction::Skip && !claimed.insert(candidate.id.as_str()) {
            action = if opts.force {
                ImportAction::Overwrite
            } else {
                ImportAction::Skip
            };
        }
        debug!(id = %candidate.id, %action, "Classified import candidate");
        items.push(ImportItem {
            instinct: candidate.clone(),
            action,
        });
    }

    if !opts.dry_run {
        for item in items.iter().filter(|i| i.action != ImportAction::Skip) {
            target.save(&item.instinct)?;
        }
    }

    let result = ImportResult { items };
    info!(
        total = candidates.len(),
        imported = result.imported(),
        dry_run = opts.dry_run,
        "Import finished"
    );
    Ok(result)
}

/// Parse exported text into candidates.
///
/// Text whose first non-blank character is `[` is read as a JSON array,
/// anything else as frontmatter blocks.
pub fn parse_source(text: &str) -> InstinctResult<Vec<Instinct>> {
    if text.trim_start().starts_with('[') {
        let records: Vec<Instinct> =
            serde_json::from_str(text).map_err(|e| InstinctError::parse_json(e.to_string()))?;
        for inst in &records {
            inst.validate().map_err(|e| InstinctError::parse_json(e.to_string()))?;
        }
        Ok(records)
    } else {
        frontmatter::decode(text)
    }
}

/// Read and parse an import source file.
pub fn read_source(path: impl AsRef<Path>) -> InstinctResult<Vec<Instinct>> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(InstinctError::SourceNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(InstinctError::read_failed(path, e)),
    };
    parse_source(&text).map_err(|e| e.at_path(path))
}
