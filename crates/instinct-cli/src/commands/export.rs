//! `instinct export`

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use instinct_core::export::{export, render};
use instinct_core::{ExportFormat, Instinct, InstinctService, ListFilter};

use super::parse_confidence;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only export this domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Only export instincts at or above this decayed confidence
    #[arg(long, value_parser = parse_confidence)]
    pub min_confidence: Option<f64>,

    /// Output format (yaml or json)
    #[arg(long, default_value = "yaml")]
    pub format: String,
}

pub fn execute(args: &ExportArgs, service: &InstinctService) -> Result<()> {
    let format: ExportFormat = args.format.parse()?;
    let filter = ListFilter {
        domain: args.domain.clone(),
        min_confidence: args.min_confidence,
        source: None,
    };

    let snapshot = service.export_snapshot(&filter, Utc::now())?;
    if snapshot.is_empty() {
        println!("No instincts to export.");
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            let exported = write_file(path, &snapshot, format)?;
            println!(
                "{} {} instinct(s) to {}",
                "Exported".green(),
                exported,
                path.display()
            );
        }
        None => {
            let mut out = std::io::stdout().lock();
            export(&mut out, &snapshot, format)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Render the whole snapshot before the destination is touched.
fn write_file(path: &Path, snapshot: &[Instinct], format: ExportFormat) -> Result<usize> {
    let text = render(snapshot, format)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(snapshot.len())
}
