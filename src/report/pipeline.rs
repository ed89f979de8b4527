use tracing::{debug, warn};

use super::execution::group_execution_phases;
use super::normalize::format_section_heading;
use super::parser::ReportParser;
use super::personalize::{TemplateValues, template_values};
use super::types::{
    AdditionalInsight, Extraction, FinancialSnapshotRow, Idea, ParsedIdea, ParsedReport,
    ProfileContext, RiskRow, SectionKind, SectionMap, ValidationQuestion, WhyFit,
};

pub const DEFAULT_MAX_IDEAS: usize = 10;

pub struct SectionedReport {
    pub ideas: Vec<(Idea, SectionMap)>,
    pub warnings: Vec<String>,
}

impl ReportParser {
    /// Parses a whole report into display-ready ideas. Never fails: heading
    /// drift is recorded in `warnings` and missing sections fall back.
    pub fn parse_report(
        &self,
        markdown: &str,
        profile: &ProfileContext,
        max_ideas: usize,
    ) -> ParsedReport {
        let sectioned = self.section_report(markdown, max_ideas);

        let parsed = sectioned
            .ideas
            .iter()
            .map(|(idea, sections)| self.build_parsed_idea(idea, sections, profile))
            .collect::<Vec<ParsedIdea>>();

        debug!(
            idea_count = parsed.len(),
            warnings = sectioned.warnings.len(),
            "parsed report"
        );
        ParsedReport {
            idea_count: parsed.len(),
            ideas: parsed,
            warnings: sectioned.warnings,
        }
    }

    /// Splits every idea into its sections once and records heading drift.
    pub fn section_report(&self, markdown: &str, max_ideas: usize) -> SectionedReport {
        let ideas = self.parse_top_ideas(markdown, max_ideas);
        let mut warnings = Vec::<String>::new();

        if ideas.is_empty() && !markdown.trim().is_empty() {
            warn!(
                report_bytes = markdown.len(),
                "report has content but no idea headings"
            );
            warnings.push("report has content but no recognizable idea headings".to_string());
        }

        let mut sectioned = Vec::<(Idea, SectionMap)>::with_capacity(ideas.len());
        for idea in ideas {
            let sections = self.split_idea_sections(&idea.body);
            if sections.recognized_count() == 0 && !idea.body.trim().is_empty() {
                warn!(
                    idea_index = idea.index,
                    title = %idea.title,
                    "idea body has no recognized section headings"
                );
                warnings.push(format!(
                    "idea {} ({}) has no recognized section headings",
                    idea.index, idea.title
                ));
            }
            sectioned.push((idea, sections));
        }

        SectionedReport {
            ideas: sectioned,
            warnings,
        }
    }

    pub fn build_parsed_idea(
        &self,
        idea: &Idea,
        sections: &SectionMap,
        profile: &ProfileContext,
    ) -> ParsedIdea {
        let values = template_values(profile, &idea.title);
        let mut fallback_sections = Vec::<String>::new();

        let why_fit_source = sections
            .get(&SectionKind::WhyFit)
            .unwrap_or_else(|| sections.intro());
        let why_fit = self.personalize_why_fit(self.extract_why_fit(why_fit_source), &values);

        let execution_steps = self.build_execution_steps(
            sections.get(&SectionKind::ExecutionPath),
            &idea.title,
            profile,
        );
        note_fallback(&mut fallback_sections, SectionKind::ExecutionPath, &execution_steps);
        let execution_steps = Extraction {
            items: execution_steps
                .items
                .iter()
                .map(|step| self.personalize_with(step, &values))
                .collect(),
            source: execution_steps.source,
        };
        let execution_phases = group_execution_phases(&execution_steps.items);

        let financial_snapshots = self.build_financial_snapshots(
            sections.get(&SectionKind::FinancialSnapshot),
            &idea.title,
            profile.budget_range.as_deref(),
        );
        note_fallback(
            &mut fallback_sections,
            SectionKind::FinancialSnapshot,
            &financial_snapshots,
        );
        let financial_snapshots = Extraction {
            items: financial_snapshots
                .items
                .iter()
                .map(|row| FinancialSnapshotRow {
                    focus: self.personalize_with(&row.focus, &values),
                    estimate: self.personalize_with(&row.estimate, &values),
                    metric: self.personalize_with(&row.metric, &values),
                })
                .collect(),
            source: financial_snapshots.source,
        };

        let risks = self
            .parse_risk_rows(sections.get(&SectionKind::KeyRisks).unwrap_or(""))
            .iter()
            .map(|row| RiskRow {
                risk: self.personalize_with(&row.risk, &values),
                severity: self.personalize_with(&row.severity, &values),
                mitigation: self.personalize_with(&row.mitigation, &values),
            })
            .collect();

        let validation_questions = self.build_validation_questions(
            sections.get(&SectionKind::ValidationQuestions),
            &idea.title,
            profile.focus_area.as_deref(),
            profile.goal_type.as_deref(),
        );
        note_fallback(
            &mut fallback_sections,
            SectionKind::ValidationQuestions,
            &validation_questions,
        );
        let validation_questions = Extraction {
            items: validation_questions
                .items
                .iter()
                .map(|question| ValidationQuestion {
                    question: self.personalize_with(&question.question, &values),
                    listen_for: self.personalize_with(&question.listen_for, &values),
                    act_on: self.personalize_with(&question.act_on, &values),
                })
                .collect(),
            source: validation_questions.source,
        };

        let decision_checklist = self
            .extract_checklist_items(sections.get(&SectionKind::DecisionChecklist))
            .iter()
            .map(|item| self.personalize_with(item, &values))
            .collect();

        let roadmap_source = sections
            .get(&SectionKind::Roadmap)
            .or_else(|| sections.get(&SectionKind::TimelineEffort));
        let roadmap = self
            .build_roadmap_windows(roadmap_source)
            .into_iter()
            .map(|mut window| {
                window.markdown = self.personalize_with(&window.markdown, &values);
                window
            })
            .collect();

        let additional_insights = sections
            .others()
            .filter(|entry| !entry.markdown.trim().is_empty())
            .map(|entry| AdditionalInsight {
                key: entry.kind.key().to_string(),
                heading: format_section_heading(entry.kind.key()),
                markdown: self.personalize_with(&entry.markdown, &values),
            })
            .collect();

        ParsedIdea {
            index: idea.index,
            title: idea.title.clone(),
            why_fit,
            execution_steps,
            execution_phases,
            financial_snapshots,
            risks,
            validation_questions,
            customer_persona: self.narrative_section(
                sections.get(&SectionKind::CustomerPersona),
                &values,
            ),
            timeline_effort: self.narrative_section(
                sections.get(&SectionKind::TimelineEffort),
                &values,
            ),
            decision_checklist,
            roadmap,
            additional_insights,
            section_keys: sections
                .entries()
                .iter()
                .filter(|entry| entry.kind.is_recognized())
                .map(|entry| entry.kind.key().to_string())
                .collect(),
            fallback_sections,
        }
    }

    fn personalize_why_fit(&self, why_fit: WhyFit, values: &TemplateValues) -> WhyFit {
        WhyFit {
            hero_statement: why_fit
                .hero_statement
                .map(|statement| self.personalize_with(&statement, values)),
            points: why_fit
                .points
                .iter()
                .map(|point| self.personalize_with(point, values))
                .collect(),
            detail: why_fit
                .detail
                .iter()
                .map(|detail| self.personalize_with(detail, values))
                .collect(),
        }
    }

    fn narrative_section(&self, markdown: Option<&str>, values: &TemplateValues) -> Option<String> {
        let cleaned = self.clean_narrative_markdown(markdown?);
        let text = self.personalize_with(cleaned.trim(), values);
        (!text.is_empty()).then_some(text)
    }
}

fn note_fallback<T>(fallback_sections: &mut Vec<String>, kind: SectionKind, extraction: &Extraction<T>) {
    if extraction.is_fallback() {
        fallback_sections.push(kind.key().to_string());
    }
}
