//! Instinct operations over configured stores.
//!
//! [`InstinctService`] wires the combined store, the inherited store, the
//! decay engine and the evolve thresholds together. Every read decays the
//! listed records before any confidence threshold is checked.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::InstinctConfig;
use crate::decay::DecayEngine;
use crate::error::InstinctResult;
use crate::evolve::{evolve, EvolveOptions, EvolveResult};
use crate::import::{import, ImportOptions, ImportResult};
use crate::store::FileStore;
use crate::traits::InstinctStore;
use crate::types::{Instinct, ListFilter, Source};

/// Result of an evolve request.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolveOutcome {
    /// Too few records to analyze.
    Insufficient { needed: usize, found: usize },
    /// Analysis ran.
    Analyzed(EvolveResult),
}

/// Application service for status, export, import and evolve.
pub struct InstinctService {
    combined: FileStore,
    inherited: FileStore,
    decay: DecayEngine,
    evolve: EvolveOptions,
}

impl InstinctService {
    /// Build a service from explicit parts.
    pub fn new(combined: FileStore, inherited: FileStore, decay: DecayEngine, evolve: EvolveOptions) -> Self {
        Self {
            combined,
            inherited,
            decay,
            evolve,
        }
    }

    /// Build a service for the paths and thresholds in `config`.
    pub fn from_config(config: &InstinctConfig) -> Self {
        let personal = config.personal_dir();
        let inherited = config.inherited_dir();
        debug!(personal = %personal.display(), inherited = %inherited.display(), "Opening instinct stores");
        Self::new(
            FileStore::new(&personal, &inherited),
            FileStore::single(Source::Inherited, &inherited),
            config.decay_engine(),
            config.evolve_options(),
        )
    }

    pub fn store(&self) -> &FileStore {
        &self.combined
    }

    pub fn evolve_options(&self) -> &EvolveOptions {
        &self.evolve
    }

    fn list_decayed<F>(&self, filter: &ListFilter, cook: F) -> InstinctResult<Vec<Instinct>>
    where
        F: Fn(&[Instinct]) -> Vec<Instinct>,
    {
        let listed = self.combined.list(&filter.without_min_confidence())?;
        let min = filter.min_confidence;
        Ok(cook(&listed)
            .into_iter()
            .filter(|inst| min.map_or(true, |m| inst.confidence >= m))
            .collect())
    }

    /// Decayed records matching `filter`, the confidence bound checked after
    /// decay.
    pub fn status(&self, filter: &ListFilter, now: DateTime<Utc>) -> InstinctResult<Vec<Instinct>> {
        self.list_decayed(filter, |listed| self.decay.apply_all(listed, now))
    }

    /// Like [`status`](Self::status), with timestamps rebased so the written
    /// snapshot is not decayed again for the same interval.
    pub fn export_snapshot(&self, filter: &ListFilter, now: DateTime<Utc>) -> InstinctResult<Vec<Instinct>> {
        self.list_decayed(filter, |listed| self.decay.rebase_all(listed, now))
    }

    /// Run the evolve analysis over every record.
    pub fn evolve(&self, now: DateTime<Utc>) -> InstinctResult<EvolveOutcome> {
        let listed = self.combined.list(&ListFilter::new())?;
        if listed.len() < self.evolve.cluster_threshold {
            return Ok(EvolveOutcome::Insufficient {
                needed: self.evolve.cluster_threshold,
                found: listed.len(),
            });
        }
        let decayed = self.decay.apply_all(&listed, now);
        Ok(EvolveOutcome::Analyzed(evolve(&decayed, &self.evolve)))
    }

    /// Import `candidates` into the inherited store.
    ///
    /// Candidates are rebased first, so the confidence floor applies to
    /// decayed values.
    pub fn import(
        &self,
        candidates: &[Instinct],
        opts: &ImportOptions,
        now: DateTime<Utc>,
    ) -> InstinctResult<ImportResult> {
        let rebased = self.decay.rebase_all(candidates, now);
        import(&self.combined, &self.inherited, &rebased, opts)
    }
}
