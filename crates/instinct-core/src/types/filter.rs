//! Filter types for instinct listing.

use serde::{Deserialize, Serialize};

use super::instinct::{Instinct, Source};

/// Optional constraints applied when listing instincts.
///
/// Omitted fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilter {
    /// Exact match on the stored domain.
    pub domain: Option<String>,
    /// Inclusive lower bound on confidence.
    pub min_confidence: Option<f64>,
    /// Restrict to one store root.
    pub source: Option<Source>,
}

impl ListFilter {
    /// Create an empty filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Require at least this confidence.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    /// Restrict to one source.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Copy of this filter without the confidence bound.
    ///
    /// Used when the bound must be evaluated after decay.
    pub fn without_min_confidence(&self) -> Self {
        Self {
            min_confidence: None,
            ..self.clone()
        }
    }

    /// Whether `instinct` satisfies every configured constraint.
    pub fn matches(&self, instinct: &Instinct) -> bool {
        if let Some(domain) = &self.domain {
            if &instinct.domain != domain {
                return false;
            }
        }
        if let Some(min) = self.min_confidence {
            if instinct.confidence < min {
                return false;
            }
        }
        if let Some(source) = self.source {
            if instinct.source != source {
                return false;
            }
        }
        true
    }
}
