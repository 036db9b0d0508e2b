//! Candidate promotion analysis.
//!
//! Derives three independent advisory lists from one set of instincts:
//! skill candidates (domain-pure clusters), command candidates (confident
//! instincts in the command domain) and agent candidates (large, confident
//! clusters). Nothing here is persisted.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::cluster::cluster_by_trigger;
use crate::types::Instinct;

/// Thresholds for [`evolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolveOptions {
    /// Minimum cluster size for skill candidates.
    pub cluster_threshold: usize,
    /// Minimum confidence for command candidates.
    pub command_confidence: f64,
    /// Domain command candidates must belong to.
    pub command_domain: String,
    /// Minimum cluster size for agent candidates.
    pub agent_min_cluster: usize,
    /// Minimum average cluster confidence for agent candidates.
    pub agent_avg_confidence: f64,
}

impl Default for EvolveOptions {
    fn default() -> Self {
        Self {
            cluster_threshold: 3,
            command_confidence: 0.7,
            command_domain: "workflow".to_string(),
            agent_min_cluster: 3,
            agent_avg_confidence: 0.75,
        }
    }
}

/// A cluster that could become a skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCandidate {
    pub domain: String,
    pub count: usize,
    pub keywords: Vec<String>,
}

/// An instinct that could become a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandCandidate {
    pub confidence: f64,
    pub trigger: String,
}

/// A cluster that could become an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCandidate {
    pub count: usize,
    pub avg_confidence: f64,
    pub keywords: Vec<String>,
}

/// Output of [`evolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolveResult {
    pub skills: Vec<SkillCandidate>,
    pub commands: Vec<CommandCandidate>,
    pub agents: Vec<AgentCandidate>,
}

impl EvolveResult {
    /// Whether no candidate of any kind was found.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.commands.is_empty() && self.agents.is_empty()
    }
}

/// Domain held by a strict majority of `members`, empty counting as
/// "general".
pub fn dominant_domain(members: &[Instinct]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in members {
        *counts.entry(m.display_domain()).or_default() += 1;
    }
    counts
        .into_iter()
        .find(|(_, c)| c * 2 > members.len())
        .map(|(domain, _)| domain.to_string())
}

/// Instincts grouped by display domain, in sorted domain order.
pub fn group_by_domain(instincts: &[Instinct]) -> BTreeMap<String, Vec<Instinct>> {
    let mut groups: BTreeMap<String, Vec<Instinct>> = BTreeMap::new();
    for inst in instincts {
        groups
            .entry(inst.display_domain().to_string())
            .or_default()
            .push(inst.clone());
    }
    groups
}

/// Analyze `instincts` for promotion candidates.
///
/// Callers check that at least `cluster_threshold` instincts exist first and
/// pass decayed confidences.
pub fn evolve(instincts: &[Instinct], opts: &EvolveOptions) -> EvolveResult {
    let skill_clusters = cluster_by_trigger(instincts, opts.cluster_threshold);
    let skills = skill_clusters
        .iter()
        .filter_map(|c| {
            dominant_domain(&c.members).map(|domain| SkillCandidate {
                domain,
                count: c.len(),
                keywords: c.keywords.clone(),
            })
        })
        .collect();

    let mut commands: Vec<CommandCandidate> = instincts
        .iter()
        .filter(|i| i.confidence >= opts.command_confidence && i.domain == opts.command_domain)
        .map(|i| CommandCandidate {
            confidence: i.confidence,
            trigger: i.trigger.clone(),
        })
        .collect();
    commands.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.trigger.cmp(&b.trigger))
    });

    let agents = skill_clusters
        .iter()
        .filter(|c| c.len() >= opts.agent_min_cluster && c.avg_confidence >= opts.agent_avg_confidence)
        .map(|c| AgentCandidate {
            count: c.len(),
            avg_confidence: c.avg_confidence,
            keywords: c.keywords.clone(),
        })
        .collect();

    EvolveResult {
        skills,
        commands,
        agents,
    }
}
