//! `instinct import`

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use instinct_core::import::read_source;
use instinct_core::report;
use instinct_core::{ImportOptions, InstinctService};

use super::parse_confidence;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File produced by `instinct export`
    #[arg(value_name = "SOURCE_FILE")]
    pub source: PathBuf,

    /// Show what would be imported without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite instincts that already exist
    #[arg(long)]
    pub force: bool,

    /// Skip instincts below this decayed confidence
    #[arg(long, value_parser = parse_confidence)]
    pub min_confidence: Option<f64>,
}

impl ImportArgs {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            dry_run: self.dry_run,
            force: self.force,
            min_confidence: self.min_confidence,
        }
    }
}

pub fn execute(args: &ImportArgs, service: &InstinctService) -> Result<()> {
    let candidates = read_source(&args.source)?;
    let opts = args.options();
    let result = service.import(&candidates, &opts, Utc::now())?;

    let mut out = std::io::stdout().lock();
    report::write_import(&mut out, &result, opts.dry_run)?;
    out.flush()?;
    Ok(())
}
