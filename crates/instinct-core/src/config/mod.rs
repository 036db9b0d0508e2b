//! Configuration system for instinct.
//!
//! Settings come from one config file (TOML, JSON or YAML), then
//! `INSTINCT_*` environment overrides. Older documents without a `version`
//! field are upgraded by [`migration`].

pub mod migration;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::decay::{DecayEngine, DEFAULT_DECAY_RATE};
use crate::error::{InstinctError, InstinctResult};
use crate::evolve::EvolveOptions;

pub use migration::{LegacyConfigV0, CURRENT_VERSION};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "INSTINCT_CONFIG";

/// Evolution thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolveConfig {
    /// Minimum confidence for command candidates.
    pub command_confidence: f64,
    /// Domain command candidates must belong to.
    pub command_domain: String,
    /// Minimum cluster size for agent candidates.
    pub agent_min_cluster: usize,
    /// Minimum average confidence for agent candidates.
    pub agent_avg_confidence: f64,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        let opts = EvolveOptions::default();
        Self {
            command_confidence: opts.command_confidence,
            command_domain: opts.command_domain,
            agent_min_cluster: opts.agent_min_cluster,
            agent_avg_confidence: opts.agent_avg_confidence,
        }
    }
}

/// Main instinct configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstinctConfig {
    /// Config schema version.
    pub version: u32,
    /// Root of locally observed instincts. Supports `~`.
    pub personal_path: PathBuf,
    /// Root of imported instincts. Supports `~`.
    pub inherited_path: PathBuf,
    /// Confidence lost per whole week since last seen.
    pub decay_rate: f64,
    /// Minimum cluster size for evolve.
    pub cluster_threshold: usize,
    /// Confidence floor used by learning flows.
    pub min_confidence: f64,
    /// Confidence above which learned instincts are auto-approved.
    pub auto_approve: f64,
    /// Cap on stored instincts for learning flows.
    pub max_instincts: usize,
    /// Evolution thresholds.
    pub evolve: EvolveConfig,
}

impl Default for InstinctConfig {
    fn default() -> Self {
        let root = PathBuf::from("~/.config/instinct/instincts");
        Self {
            version: CURRENT_VERSION,
            personal_path: root.join("personal"),
            inherited_path: root.join("inherited"),
            decay_rate: DEFAULT_DECAY_RATE,
            cluster_threshold: 3,
            min_confidence: 0.3,
            auto_approve: 0.7,
            max_instincts: 100,
            evolve: EvolveConfig::default(),
        }
    }
}

impl InstinctConfig {
    /// Default config file location, `<config dir>/instinct/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("instinct").join("config.toml"))
    }

    /// Resolve, read, override and validate the configuration.
    ///
    /// The file is `explicit` if given, else `$INSTINCT_CONFIG`, else the
    /// default path. Only a missing default file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> InstinctResult<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> InstinctResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InstinctError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let ext = path.extension().and_then(|e| e.to_str());

        let doc: serde_json::Value = match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| InstinctError::Configuration(e.to_string()))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| InstinctError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| InstinctError::Configuration(e.to_string()))?,
            _ => {
                return Err(InstinctError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        debug!(path = %path.display(), "Loaded config file");
        migration::upgrade(doc)
    }

    /// Apply `INSTINCT_*` environment overrides.
    pub fn apply_env(&mut self) -> InstinctResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> InstinctResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("INSTINCT_PERSONAL_PATH") {
            self.personal_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("INSTINCT_INHERITED_PATH") {
            self.inherited_path = PathBuf::from(path);
        }
        if let Some(rate) = lookup("INSTINCT_DECAY_RATE") {
            self.decay_rate = rate.trim().parse().map_err(|_| {
                InstinctError::Configuration(format!("INSTINCT_DECAY_RATE is not a number: {}", rate))
            })?;
        }
        if let Some(threshold) = lookup("INSTINCT_CLUSTER_THRESHOLD") {
            self.cluster_threshold = threshold.trim().parse().map_err(|_| {
                InstinctError::Configuration(format!(
                    "INSTINCT_CLUSTER_THRESHOLD is not a positive integer: {}",
                    threshold
                ))
            })?;
        }
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> InstinctResult<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(InstinctError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )))
            }
        };
        unit("decay_rate", self.decay_rate)?;
        unit("min_confidence", self.min_confidence)?;
        unit("auto_approve", self.auto_approve)?;
        unit("evolve.command_confidence", self.evolve.command_confidence)?;
        unit("evolve.agent_avg_confidence", self.evolve.agent_avg_confidence)?;

        if self.cluster_threshold == 0 {
            return Err(InstinctError::Configuration("cluster_threshold must be at least 1".to_string()));
        }
        if self.evolve.agent_min_cluster == 0 {
            return Err(InstinctError::Configuration(
                "evolve.agent_min_cluster must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Personal root with `~` expanded.
    pub fn personal_dir(&self) -> PathBuf {
        expand_tilde(&self.personal_path)
    }

    /// Inherited root with `~` expanded.
    pub fn inherited_dir(&self) -> PathBuf {
        expand_tilde(&self.inherited_path)
    }

    /// Decay engine for the configured rate.
    pub fn decay_engine(&self) -> DecayEngine {
        DecayEngine::new(self.decay_rate)
    }

    /// Evolve thresholds as analysis options.
    pub fn evolve_options(&self) -> EvolveOptions {
        EvolveOptions {
            cluster_threshold: self.cluster_threshold,
            command_confidence: self.evolve.command_confidence,
            command_domain: self.evolve.command_domain.clone(),
            agent_min_cluster: self.evolve.agent_min_cluster,
            agent_avg_confidence: self.evolve.agent_avg_confidence,
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> InstinctResult<String> {
        toml::to_string_pretty(self).map_err(|e| InstinctError::Configuration(e.to_string()))
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = InstinctConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.decay_rate, 0.02);
        assert_eq!(config.cluster_threshold, 3);
        assert_eq!(config.evolve.command_domain, "workflow");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "version = 1\ndecay_rate = 0.05\npersonal_path = \"/data/personal\"\n\n[evolve]\nagent_min_cluster = 5\n",
        )
        .unwrap();

        let config = InstinctConfig::from_file(&path).unwrap();
        assert_eq!(config.decay_rate, 0.05);
        assert_eq!(config.personal_dir(), PathBuf::from("/data/personal"));
        assert_eq!(config.evolve.agent_min_cluster, 5);
        assert_eq!(config.evolve.command_confidence, 0.7);
        assert_eq!(config.cluster_threshold, 3);
    }

    #[test]
    fn test_from_yaml_and_json_files() {
        let tmp = TempDir::new().unwrap();
        let yaml = tmp.path().join("config.yaml");
        std::fs::write(&yaml, "version: 1\ncluster_threshold: 4\n").unwrap();
        assert_eq!(InstinctConfig::from_file(&yaml).unwrap().cluster_threshold, 4);

        let json = tmp.path().join("config.json");
        std::fs::write(&json, r#"{"version": 1, "min_confidence": 0.4}"#).unwrap();
        assert_eq!(InstinctConfig::from_file(&json).unwrap().min_confidence, 0.4);
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.ini");
        std::fs::write(&path, "decay_rate=1").unwrap();
        assert!(matches!(
            InstinctConfig::from_file(&path),
            Err(InstinctError::Configuration(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INSTINCT_PERSONAL_PATH", "/tmp/p"),
            ("INSTINCT_DECAY_RATE", "0.1"),
            ("INSTINCT_CLUSTER_THRESHOLD", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = InstinctConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.personal_path, PathBuf::from("/tmp/p"));
        assert_eq!(config.decay_rate, 0.1);
        assert_eq!(config.cluster_threshold, 5);
        assert_eq!(config.inherited_path, InstinctConfig::default().inherited_path);
    }

    #[test]
    fn test_bad_override_is_error() {
        let mut config = InstinctConfig::default();
        let err = config
            .apply_overrides(|k| (k == "INSTINCT_DECAY_RATE").then(|| "fast".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("INSTINCT_DECAY_RATE"));
    }

    #[test]
    fn test_validate_ranges() {
        let config = InstinctConfig {
            decay_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InstinctConfig {
            cluster_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~/x")), home.join("x"));
        assert_eq!(expand_tilde(Path::new("/abs/x")), PathBuf::from("/abs/x"));
    }

    #[test]
    fn test_toml_output_round_trips() {
        let config = InstinctConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("decay_rate = 0.02"));
        let parsed: InstinctConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
