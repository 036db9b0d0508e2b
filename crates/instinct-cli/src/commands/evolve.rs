//! `instinct evolve`

use anyhow::Result;
use chrono::Utc;
use std::io::Write;

use instinct_core::report;
use instinct_core::{EvolveOutcome, InstinctService};

pub fn execute(service: &InstinctService) -> Result<()> {
    let mut out = std::io::stdout().lock();

    match service.evolve(Utc::now())? {
        EvolveOutcome::Insufficient { found: 0, .. } => writeln!(out, "No instincts found.")?,
        EvolveOutcome::Insufficient { needed, found } => report::write_insufficient(&mut out, needed, found)?,
        EvolveOutcome::Analyzed(result) => report::write_evolve(&mut out, &result, service.evolve_options())?,
    }
    out.flush()?;
    Ok(())
}
