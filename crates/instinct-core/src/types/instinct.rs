//! Instinct record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{InstinctError, InstinctResult};
use crate::store::frontmatter::DELIMITER;

/// Domain shown for instincts whose stored domain is empty.
pub const GENERAL_DOMAIN: &str = "general";

/// Lowest confidence assigned from observation counts.
pub const BASE_CONFIDENCE: f64 = 0.3;

/// Observation count tiers and the confidence each one earns.
const OBSERVATION_TIERS: [(u32, f64); 3] = [(11, 0.85), (6, 0.7), (3, 0.5)];

/// Where a listed instinct came from.
///
/// Attached by the store at read time; never persisted in the record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Observed locally.
    #[default]
    Personal,
    /// Received through import.
    Inherited,
}

/// A learned trigger/action heuristic with a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instinct {
    /// Unique identifier, also the record's file stem.
    pub id: String,
    /// Situation that activates this heuristic.
    pub trigger: String,
    /// Recommended behavior.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    /// Belief strength in `[0, 1]`.
    pub confidence: f64,
    /// Category tag. Empty means "general".
    #[serde(default)]
    pub domain: String,
    /// How many times the pattern was reinforced.
    #[serde(default)]
    pub observations: u32,
    /// Repository the instinct was observed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_repo: Option<String>,
    /// Free-form notes kept alongside the record.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last observation or update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Provenance tag set by the store when listing.
    #[serde(skip)]
    pub source: Source,
}

impl Instinct {
    /// Create a new instinct with no timestamps and zero observations.
    pub fn new(
        id: impl Into<String>,
        trigger: impl Into<String>,
        action: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            trigger: trigger.into(),
            action: action.into(),
            confidence,
            domain: String::new(),
            observations: 0,
            source_repo: None,
            content: String::new(),
            created_at: None,
            updated_at: None,
            source: Source::Personal,
        }
    }

    /// Create an instinct seeded from an observation count.
    ///
    /// Confidence comes from [`confidence_for_observations`] and both
    /// timestamps are set to `now`.
    pub fn observed(
        id: impl Into<String>,
        trigger: impl Into<String>,
        action: impl Into<String>,
        observations: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(id, trigger, action, confidence_for_observations(observations))
            .with_observations(observations)
            .with_created_at(now)
            .with_updated_at(now)
    }

    /// Set the domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the observation count.
    pub fn with_observations(mut self, observations: u32) -> Self {
        self.observations = observations;
        self
    }

    /// Set the source repository.
    pub fn with_source_repo(mut self, repo: impl Into<String>) -> Self {
        self.source_repo = Some(repo.into());
        self
    }

    /// Set the body content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Set the update timestamp.
    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Set the provenance tag.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Domain used for display and grouping.
    pub fn display_domain(&self) -> &str {
        if self.domain.is_empty() {
            GENERAL_DOMAIN
        } else {
            &self.domain
        }
    }

    /// Timestamp the record's age is measured from.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    /// Check the invariants required before a record is persisted.
    pub fn validate(&self) -> InstinctResult<()> {
        validate_id(&self.id)?;
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(InstinctError::confidence_out_of_range(&self.id, self.confidence));
        }
        if self.content.lines().any(|line| line == DELIMITER) {
            return Err(InstinctError::validation(format!(
                "instinct {:?} content must not contain a bare {:?} line",
                self.id, DELIMITER
            )));
        }
        Ok(())
    }
}

/// Base confidence earned by an observation count.
pub fn confidence_for_observations(count: u32) -> f64 {
    OBSERVATION_TIERS
        .iter()
        .find(|(min, _)| count >= *min)
        .map(|(_, confidence)| *confidence)
        .unwrap_or(BASE_CONFIDENCE)
}

/// Check that an ID is safe to use as a file stem.
pub fn validate_id(id: &str) -> InstinctResult<()> {
    if id.trim().is_empty() {
        return Err(InstinctError::invalid_id(id, "must not be empty"));
    }
    if id.contains('/') || id.contains('\\') {
        return Err(InstinctError::invalid_id(id, "must not contain path separators"));
    }
    if id.contains("..") {
        return Err(InstinctError::invalid_id(id, "must not contain path traversal"));
    }
    if id.starts_with('.') {
        return Err(InstinctError::invalid_id(id, "must not start with '.'"));
    }
    if id != id.trim() {
        return Err(InstinctError::invalid_id(id, "must not have surrounding whitespace"));
    }
    Ok(())
}
