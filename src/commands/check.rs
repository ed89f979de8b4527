use std::io::{self, Write};

use anyhow::{Result, bail};
use tracing::{info, warn};

use super::source::load_report;
use crate::cli::CheckArgs;
use crate::model::{ConformanceReport, IdeaConformance};
use crate::report::{ReportParser, SectionKind, SectionMap};
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: CheckArgs) -> Result<()> {
    let loaded = load_report(&args.source, &args.store)?;
    info!(
        source = loaded.info.kind,
        sha256 = %loaded.info.sha256,
        strict = args.strict,
        "checking report conventions"
    );

    let parser = ReportParser::new()?;
    let sectioned = parser.section_report(&loaded.markdown, args.max_ideas);
    let ideas = sectioned
        .ideas
        .iter()
        .map(|(idea, sections)| idea_conformance(idea.index, &idea.title, sections))
        .collect::<Vec<IdeaConformance>>();

    let report = ConformanceReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source: loaded.info,
        idea_count: ideas.len(),
        ideas,
        passed: sectioned.warnings.is_empty(),
        warnings: sectioned.warnings,
    };

    if let Some(path) = &args.report_path {
        write_json_pretty(path, &report)?;
        info!(path = %path.display(), "wrote conformance report");
    }
    write_text_report(&report)?;

    if !report.passed {
        warn!(warnings = report.warnings.len(), "report conventions drifted");
        if args.strict {
            bail!(
                "conformance check failed with {} warning(s)",
                report.warnings.len()
            );
        }
    }

    info!(idea_count = report.idea_count, passed = report.passed, "check finished");
    Ok(())
}

fn idea_conformance(index: u32, title: &str, sections: &SectionMap) -> IdeaConformance {
    let recognized_sections = sections
        .entries()
        .iter()
        .filter(|entry| entry.kind.is_recognized())
        .map(|entry| entry.kind.key().to_string())
        .collect::<Vec<String>>();
    let unrecognized_sections = sections
        .others()
        .map(|entry| entry.heading.clone())
        .collect::<Vec<String>>();
    let missing_sections = SectionKind::KNOWN
        .iter()
        .filter(|kind| sections.get(kind).is_none())
        .map(|kind| kind.key().to_string())
        .collect::<Vec<String>>();

    IdeaConformance {
        index,
        title: title.to_string(),
        recognized_sections,
        unrecognized_sections,
        missing_sections,
    }
}

fn write_text_report(report: &ConformanceReport) -> Result<()> {
    let mut out = io::BufWriter::new(io::stdout().lock());

    writeln!(
        out,
        "Conformance: ideas={} warnings={} passed={}",
        report.idea_count,
        report.warnings.len(),
        report.passed
    )?;
    for idea in &report.ideas {
        writeln!(
            out,
            "{}. {}\trecognized={} unrecognized={} missing={}",
            idea.index,
            idea.title,
            idea.recognized_sections.len(),
            idea.unrecognized_sections.len(),
            idea.missing_sections.len()
        )?;
        if !idea.missing_sections.is_empty() {
            writeln!(out, "\tmissing: {}", idea.missing_sections.join(", "))?;
        }
        if !idea.unrecognized_sections.is_empty() {
            writeln!(out, "\tunrecognized: {}", idea.unrecognized_sections.join(", "))?;
        }
    }
    for warning in &report.warnings {
        writeln!(out, "Warning: {warning}")?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idea_conformance_lists_missing_and_unknown_sections() {
        let parser = ReportParser::new().expect("report patterns should compile");
        let sections = parser.split_idea_sections(
            "Intro.\n### Why It Fits\n- fit\n### Key Risks\n- risk\n### Launch Partners\n- vets\n",
        );

        let conformance = idea_conformance(1, "Pets", &sections);
        assert_eq!(
            conformance.recognized_sections,
            vec!["why it fits".to_string(), "key risks & mitigations".to_string()]
        );
        assert_eq!(conformance.unrecognized_sections, vec!["Launch Partners".to_string()]);
        assert_eq!(
            conformance.missing_sections.len(),
            SectionKind::KNOWN.len() - 2
        );
        assert!(
            conformance
                .missing_sections
                .contains(&"financial snapshot".to_string())
        );
    }

    #[test]
    fn section_report_feeds_conformance_rows_and_warnings() {
        let parser = ReportParser::new().expect("report patterns should compile");
        let sectioned = parser.section_report(
            "## Idea 1: Pet Sitting\n### Key Risks\n- churn\n## Idea 2: Dog Walking\nJust prose.\n",
            10,
        );

        let rows = sectioned
            .ideas
            .iter()
            .map(|(idea, sections)| idea_conformance(idea.index, &idea.title, sections))
            .collect::<Vec<IdeaConformance>>();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].recognized_sections, vec!["key risks & mitigations".to_string()]);
        assert!(rows[1].recognized_sections.is_empty());
        assert_eq!(
            sectioned.warnings,
            vec!["idea 2 (Dog Walking) has no recognized section headings".to_string()]
        );
    }
}
