//! Config document versioning.
//!
//! Version 0 is the legacy layout: no `version` key and the instinct
//! settings nested in an `instinct` table alongside unrelated tool
//! sections. Version 1 is [`InstinctConfig`] at the top level.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use super::InstinctConfig;
use crate::error::{InstinctError, InstinctResult};

/// Latest config schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Legacy config document.
///
/// Only the `instinct` table is read; other sections are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyConfigV0 {
    pub instinct: LegacyInstinctSection,
}

/// Instinct settings of a legacy document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyInstinctSection {
    pub personal_path: Option<PathBuf>,
    pub inherited_path: Option<PathBuf>,
    pub min_confidence: Option<f64>,
    pub auto_approve: Option<f64>,
    pub decay_rate: Option<f64>,
    pub max_instincts: Option<usize>,
    pub cluster_threshold: Option<usize>,
}

impl LegacyConfigV0 {
    /// Convert to the current layout; unset values take defaults.
    pub fn migrate(self) -> InstinctConfig {
        let s = self.instinct;
        let d = InstinctConfig::default();
        InstinctConfig {
            version: CURRENT_VERSION,
            personal_path: s.personal_path.unwrap_or(d.personal_path),
            inherited_path: s.inherited_path.unwrap_or(d.inherited_path),
            decay_rate: s.decay_rate.unwrap_or(d.decay_rate),
            cluster_threshold: s.cluster_threshold.unwrap_or(d.cluster_threshold),
            min_confidence: s.min_confidence.unwrap_or(d.min_confidence),
            auto_approve: s.auto_approve.unwrap_or(d.auto_approve),
            max_instincts: s.max_instincts.unwrap_or(d.max_instincts),
            evolve: d.evolve,
        }
    }
}

fn invalid(e: serde_json::Error) -> InstinctError {
    InstinctError::Configuration(e.to_string())
}

/// Read a parsed config document of any known version.
pub fn upgrade(doc: serde_json::Value) -> InstinctResult<InstinctConfig> {
    if !doc.is_object() {
        return Err(InstinctError::Configuration(
            "config document must be a table".to_string(),
        ));
    }

    match doc.get("version").map(|v| v.as_u64()) {
        None => {
            let legacy: LegacyConfigV0 = serde_json::from_value(doc).map_err(invalid)?;
            info!(to = CURRENT_VERSION, "Migrating legacy config layout");
            Ok(legacy.migrate())
        }
        Some(Some(v)) if v == u64::from(CURRENT_VERSION) => serde_json::from_value(doc).map_err(invalid),
        Some(Some(v)) => Err(InstinctError::Configuration(format!(
            "unsupported config version {} (latest is {})",
            v, CURRENT_VERSION
        ))),
        Some(None) => Err(InstinctError::Configuration(
            "config version must be a non-negative integer".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_document_migrates() {
        let doc = json!({
            "hooks": {"timeout_seconds": 30},
            "instinct": {
                "personal_path": "~/.config/cc/personal",
                "decay_rate": 0.05,
                "cluster_threshold": 4
            }
        });
        let config = upgrade(doc).unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(config.personal_path, PathBuf::from("~/.config/cc/personal"));
        assert_eq!(config.decay_rate, 0.05);
        assert_eq!(config.cluster_threshold, 4);
        assert_eq!(config.min_confidence, 0.3);
    }

    #[test]
    fn test_empty_legacy_document_is_default() {
        assert_eq!(upgrade(json!({})).unwrap(), InstinctConfig::default());
    }

    #[test]
    fn test_current_version_reads_directly() {
        let config = upgrade(json!({"version": 1, "max_instincts": 50})).unwrap();
        assert_eq!(config.max_instincts, 50);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = upgrade(json!({"version": 7})).unwrap_err();
        assert!(err.to_string().contains("unsupported config version 7"));
        assert!(upgrade(json!({"version": "one"})).is_err());
        assert!(upgrade(json!([1, 2])).is_err());
    }
}
