//! Plain-text reports for the command line.

use std::io::{self, Write};

use crate::evolve::{group_by_domain, EvolveOptions, EvolveResult};
use crate::import::{ImportAction, ImportResult};
use crate::types::Instinct;

/// Default confidence bar width in cells.
pub const BAR_WIDTH: usize = 10;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Bar of `width` cells with `floor(confidence * width)` filled.
pub fn confidence_bar(confidence: f64, width: usize) -> String {
    let filled = ((confidence.clamp(0.0, 1.0) * width as f64).floor() as usize).min(width);
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// Instincts grouped by domain with confidence bars.
pub fn write_status<W: Write>(w: &mut W, instincts: &[Instinct]) -> io::Result<()> {
    if instincts.is_empty() {
        return writeln!(w, "No instincts found.");
    }
    for (domain, members) in group_by_domain(instincts) {
        write!(w, "\n[{}]\n", domain)?;
        for inst in &members {
            writeln!(
                w,
                "  {} {:.2}  {}",
                confidence_bar(inst.confidence, BAR_WIDTH),
                inst.confidence,
                inst.trigger
            )?;
        }
    }
    Ok(())
}

/// Skill, command and agent candidate sections.
pub fn write_evolve<W: Write>(w: &mut W, result: &EvolveResult, opts: &EvolveOptions) -> io::Result<()> {
    writeln!(w, "\nSkill candidates ({}+ related instincts):", opts.cluster_threshold)?;
    if result.skills.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for skill in &result.skills {
        writeln!(
            w,
            "  [{}] {} instincts, keywords: {}",
            skill.domain,
            skill.count,
            skill.keywords.join(", ")
        )?;
    }

    writeln!(
        w,
        "\nCommand candidates (confidence >= {:.1}, {} domain):",
        opts.command_confidence, opts.command_domain
    )?;
    if result.commands.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for cmd in &result.commands {
        writeln!(w, "  {:.2}  {}", cmd.confidence, cmd.trigger)?;
    }

    writeln!(
        w,
        "\nAgent candidates ({}+ instincts, avg confidence >= {:.2}):",
        opts.agent_min_cluster, opts.agent_avg_confidence
    )?;
    if result.agents.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for agent in &result.agents {
        writeln!(
            w,
            "  {} instincts (avg {:.2}), keywords: {}",
            agent.count,
            agent.avg_confidence,
            agent.keywords.join(", ")
        )?;
    }
    Ok(())
}

/// Notice that evolve has too few records to analyze.
pub fn write_insufficient<W: Write>(w: &mut W, needed: usize, found: usize) -> io::Result<()> {
    writeln!(w, "Need at least {} instincts to analyze (found {}).", needed, found)
}

/// One line per non-skipped candidate, then a summary.
pub fn write_import<W: Write>(w: &mut W, result: &ImportResult, dry_run: bool) -> io::Result<()> {
    if result.items.is_empty() {
        return writeln!(w, "No instincts found in source file.");
    }
    for item in &result.items {
        if item.action == ImportAction::Skip {
            continue;
        }
        writeln!(
            w,
            "{} {} ({:.2}) [{}]",
            item.action.label(dry_run),
            item.instinct.id,
            item.instinct.confidence,
            item.instinct.display_domain()
        )?;
    }
    write!(w, "\n{} instinct(s) {}.\n", result.imported(), result.verb(dry_run))
}
