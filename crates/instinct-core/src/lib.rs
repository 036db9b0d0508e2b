//! instinct-core - Core library for instinct.
//!
//! This crate provides the record model, file store, confidence decay,
//! trigger clustering, evolution analysis and import/export pipeline for
//! learned trigger/action heuristics.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use instinct_core::{InstinctConfig, InstinctService, ListFilter};
//!
//! let config = InstinctConfig::load(None)?;
//! let service = InstinctService::from_config(&config);
//!
//! // Decayed view of the store
//! let instincts = service.status(&ListFilter::new().with_min_confidence(0.5), Utc::now())?;
//!
//! // Promotion candidates
//! let outcome = service.evolve(Utc::now())?;
//! ```

pub mod cluster;
pub mod config;
pub mod decay;
pub mod error;
pub mod evolve;
pub mod export;
pub mod import;
pub mod report;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cluster::{cluster_by_trigger, Cluster};
pub use config::{EvolveConfig, InstinctConfig};
pub use decay::{decay, DecayEngine};
pub use error::{ErrorCode, InstinctError, InstinctResult};
pub use evolve::{evolve, EvolveOptions, EvolveResult};
pub use export::{ExportFormat, ExportStats};
pub use import::{ImportAction, ImportOptions, ImportResult};
pub use service::{EvolveOutcome, InstinctService};
pub use store::FileStore;
pub use traits::InstinctStore;
pub use types::{Instinct, ListFilter, Source};
