use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use super::source::{load_report, resolve_profile};
use crate::cli::ParseArgs;
use crate::model::ParseOutput;
use crate::report::{ParsedIdea, ReportParser};
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: ParseArgs) -> Result<()> {
    let loaded = load_report(&args.source, &args.store)?;
    let profile = resolve_profile(&args.profile, loaded.profile.clone())?;

    info!(
        source = loaded.info.kind,
        sha256 = %loaded.info.sha256,
        max_ideas = args.max_ideas,
        "parsing report"
    );

    let parser = ReportParser::new()?;
    let report = parser.parse_report(&loaded.markdown, &profile, args.max_ideas);
    let idea_count = report.idea_count;
    let warning_count = report.warnings.len();

    let output = ParseOutput {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source: loaded.info,
        profile,
        max_ideas: args.max_ideas,
        report,
    };

    if let Some(path) = &args.output_path {
        write_json_pretty(path, &output)?;
        info!(path = %path.display(), "wrote parse output");
    } else if args.json {
        let mut out = io::BufWriter::new(io::stdout().lock());
        serde_json::to_writer_pretty(&mut out, &output)
            .context("failed to serialize parse json output")?;
        writeln!(out)?;
        out.flush()?;
    } else {
        write_text_summary(&output)?;
    }

    info!(idea_count, warnings = warning_count, "parse finished");
    Ok(())
}

fn write_text_summary(output: &ParseOutput) -> Result<()> {
    let mut out = io::BufWriter::new(io::stdout().lock());

    writeln!(
        out,
        "Report: source={} sha256={} ideas={}",
        output.source.kind, output.source.sha256, output.report.idea_count
    )?;
    for warning in &output.report.warnings {
        writeln!(out, "Warning: {warning}")?;
    }

    for idea in &output.report.ideas {
        write_idea_summary(&mut out, idea)?;
    }

    out.flush()?;
    Ok(())
}

fn write_idea_summary(out: &mut impl Write, idea: &ParsedIdea) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}. {}", idea.index, idea.title)?;
    if let Some(hero) = &idea.why_fit.hero_statement {
        writeln!(out, "\twhy: {hero}")?;
    }
    writeln!(out, "\tsections: {}", idea.section_keys.join(", "))?;
    if !idea.fallback_sections.is_empty() {
        writeln!(out, "\tfallback: {}", idea.fallback_sections.join(", "))?;
    }

    for phase in &idea.execution_phases {
        writeln!(out, "\t{}:", phase.name.as_str())?;
        for step in &phase.steps {
            writeln!(out, "\t\t- {step}")?;
        }
    }

    for row in &idea.financial_snapshots.items {
        writeln!(out, "\tfinancial: {} | {} | {}", row.focus, row.estimate, row.metric)?;
    }
    for row in &idea.risks {
        writeln!(out, "\trisk: {} [{}] -> {}", row.risk, row.severity, row.mitigation)?;
    }
    for question in &idea.validation_questions.items {
        writeln!(out, "\tquestion: {}", question.question)?;
    }
    for window in idea.roadmap.iter().filter(|window| !window.markdown.is_empty()) {
        let first_line = window.markdown.lines().next().unwrap_or("");
        writeln!(out, "\t{}: {first_line}", window.label)?;
    }
    for insight in &idea.additional_insights {
        writeln!(out, "\tinsight: {}", insight.heading)?;
    }

    Ok(())
}
