//! Export of instinct snapshots.
//!
//! Two encodings are supported: frontmatter blocks (`yaml`) and a
//! pretty-printed JSON array (`json`). Both are readable by
//! [`crate::import::parse_source`].
//!
//! # Example
//!
//! ```ignore
//! use instinct_core::export::{export, ExportFormat};
//!
//! let format: ExportFormat = "json".parse()?;
//! let stats = export(std::io::stdout().lock(), &snapshot, format)?;
//! eprintln!("Exported {} instincts", stats.exported);
//! ```

use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::error::{InstinctError, InstinctResult};
use crate::store::frontmatter;
use crate::types::Instinct;

/// Serialized encoding of an export.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Frontmatter blocks separated by blank lines.
    #[default]
    Yaml,
    /// Pretty-printed JSON array.
    Json,
}

impl FromStr for ExportFormat {
    type Err = InstinctError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(InstinctError::unsupported_format(s)),
        }
    }
}

/// Statistics from an export operation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportStats {
    /// Records written.
    pub exported: usize,
    /// Bytes written.
    pub bytes: usize,
}

/// Write `instincts` to `writer` in `format`.
///
/// The caller passes the snapshot to write; no decay is applied here.
pub fn export<W: Write>(
    mut writer: W,
    instincts: &[Instinct],
    format: ExportFormat,
) -> InstinctResult<ExportStats> {
    let text = render(instincts, format)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    debug!(count = instincts.len(), %format, "Exported instincts");
    Ok(ExportStats {
        exported: instincts.len(),
        bytes: text.len(),
    })
}

/// Render `instincts` as text in `format`.
pub fn render(instincts: &[Instinct], format: ExportFormat) -> InstinctResult<String> {
    match format {
        ExportFormat::Yaml => {
            let blocks = instincts
                .iter()
                .map(frontmatter::encode)
                .collect::<InstinctResult<Vec<_>>>()?;
            Ok(blocks.join("\n"))
        }
        ExportFormat::Json => {
            for inst in instincts {
                inst.validate()?;
            }
            let mut text = serde_json::to_string_pretty(instincts)?;
            text.push('\n');
            Ok(text)
        }
    }
}
