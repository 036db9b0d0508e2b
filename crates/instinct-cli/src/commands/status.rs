//! `instinct status`

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::io::Write;

use instinct_core::report;
use instinct_core::{InstinctService, ListFilter};

use super::parse_confidence;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show this domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Only show instincts at or above this decayed confidence
    #[arg(long, value_parser = parse_confidence)]
    pub min_confidence: Option<f64>,
}

impl StatusArgs {
    pub fn filter(&self) -> ListFilter {
        ListFilter {
            domain: self.domain.clone(),
            min_confidence: self.min_confidence,
            source: None,
        }
    }
}

pub fn execute(args: &StatusArgs, service: &InstinctService) -> Result<()> {
    let instincts = service.status(&args.filter(), Utc::now())?;

    let mut out = std::io::stdout().lock();
    report::write_status(&mut out, &instincts)?;
    out.flush()?;
    Ok(())
}
