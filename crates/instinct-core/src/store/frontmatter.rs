//! Frontmatter codec for instinct records.
//!
//! A block is a `---` line, a YAML mapping with the record fields, a closing
//! `---` line and an optional free-form body that runs until the next `---`
//! line or the end of input:
//!
//! ```text
//! ---
//! id: prefer-early-return
//! trigger: when writing new functions
//! action: return early on error paths
//! confidence: 0.7
//! domain: code-style
//! observations: 6
//! updated_at: 2026-02-24T12:00:00Z
//! ---
//! Seen across three repositories.
//! ```
//!
//! Delimiters must match `---` exactly, so indented block-scalar lines never
//! close a block. A body may not contain a bare `---` line. Trailing
//! whitespace in the body is not preserved; leading whitespace is.
//!
//! Decoding is strict: unknown keys, missing `id`/`trigger`, malformed
//! numbers or timestamps and out-of-range confidence are all errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InstinctError, InstinctResult};
use crate::types::{Instinct, Source};

pub(crate) const DELIMITER: &str = "---";

/// On-disk field schema, in emission order.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontmatterRecord {
    id: String,
    trigger: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    action: String,
    confidence: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    observations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl From<&Instinct> for FrontmatterRecord {
    fn from(inst: &Instinct) -> Self {
        Self {
            id: inst.id.clone(),
            trigger: inst.trigger.clone(),
            action: inst.action.clone(),
            confidence: inst.confidence,
            domain: inst.domain.clone(),
            observations: inst.observations,
            source_repo: inst.source_repo.clone(),
            created_at: inst.created_at,
            updated_at: inst.updated_at,
        }
    }
}

impl FrontmatterRecord {
    fn into_instinct(self, content: String) -> Instinct {
        Instinct {
            id: self.id,
            trigger: self.trigger,
            action: self.action,
            confidence: self.confidence,
            domain: self.domain,
            observations: self.observations,
            source_repo: self.source_repo,
            content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            source: Source::Personal,
        }
    }
}

/// Raw frontmatter and body text of one block.
#[derive(Debug)]
struct RawBlock {
    frontmatter: String,
    body: String,
}

/// Encode an instinct as a single frontmatter block.
pub fn encode(inst: &Instinct) -> InstinctResult<String> {
    inst.validate()?;

    let yaml = serde_yaml::to_string(&FrontmatterRecord::from(inst))?;
    let mut out = String::with_capacity(yaml.len() + inst.content.len() + 16);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');

    let body = inst.content.trim_end();
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}

/// Decode every frontmatter block in `input`.
///
/// Text before the first delimiter is ignored. Empty input yields no records.
pub fn decode(input: &str) -> InstinctResult<Vec<Instinct>> {
    split_blocks(input)?
        .into_iter()
        .enumerate()
        .map(|(idx, block)| {
            decode_block(block).map_err(|e| match e {
                InstinctError::Parse { message, code, path } => InstinctError::Parse {
                    message: format!("block {}: {}", idx + 1, message),
                    code,
                    path,
                },
                other => other,
            })
        })
        .collect()
}

/// Decode input that must hold exactly one record.
pub fn decode_one(input: &str) -> InstinctResult<Instinct> {
    let mut records = decode(input)?;
    match records.len() {
        1 => Ok(records.remove(0)),
        0 => Err(InstinctError::parse("no frontmatter block found")),
        n => Err(InstinctError::parse(format!(
            "expected one frontmatter block, found {}",
            n
        ))),
    }
}

fn decode_block(block: RawBlock) -> InstinctResult<Instinct> {
    if block.frontmatter.trim().is_empty() {
        return Err(InstinctError::parse("empty frontmatter block"));
    }

    let record: FrontmatterRecord = serde_yaml::from_str(&block.frontmatter)
        .map_err(|e| InstinctError::parse(e.to_string()))?;

    let inst = record.into_instinct(block.body);
    inst.validate().map_err(|e| InstinctError::parse(e.to_string()))?;
    Ok(inst)
}

fn split_blocks(input: &str) -> InstinctResult<Vec<RawBlock>> {
    let lines: Vec<&str> = input.lines().collect();
    let mut blocks = Vec::new();
    let mut idx = 0;

    // Skip any preamble before the first delimiter.
    while idx < lines.len() && lines[idx] != DELIMITER {
        idx += 1;
    }

    while idx < lines.len() {
        let open = idx;
        idx += 1;

        let fm_start = idx;
        while idx < lines.len() && lines[idx] != DELIMITER {
            idx += 1;
        }
        if idx >= lines.len() {
            return Err(InstinctError::parse(format!(
                "unterminated frontmatter block starting at line {}",
                open + 1
            )));
        }
        let frontmatter = lines[fm_start..idx].join("\n");
        idx += 1;

        let body_start = idx;
        while idx < lines.len() && lines[idx] != DELIMITER {
            idx += 1;
        }
        let body = lines[body_start..idx].join("\n").trim_end().to_string();

        blocks.push(RawBlock { frontmatter, body });
    }

    Ok(blocks)
}
