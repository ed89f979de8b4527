use tracing::debug;

use super::normalize::{dedupe_strings, strip_inline_markdown};
use super::parser::ReportParser;
use super::personalize::{TemplateValues, template_values};
use super::types::{ExecutionPhase, Extraction, PhaseName, ProfileContext};

pub const MAX_EXECUTION_STEPS: usize = 10;

pub(super) const EXECUTION_STEP_TEMPLATES: [&str; 6] = [
    "Write a one-sentence promise for {idea_title} aimed at your {focus_area} audience",
    "Talk to five potential customers in the {focus_area} space and note the problems they repeat",
    "Sketch the smallest version of {idea_title} you can deliver with {time_commitment}",
    "Price a pilot offer that fits within {budget_range}",
    "Deliver the first pilot by leaning on your {skill} skills and a {work_style} routine",
    "Review pilot results against your {goal_type} goal and decide what to double down on",
];

/// Phase boundaries as `(phase, first step, last step)`, 1-based inclusive.
const PHASE_SLICES: [(PhaseName, usize, usize); 4] = [
    (PhaseName::Validate, 1, 3),
    (PhaseName::Build, 4, 6),
    (PhaseName::Launch, 7, 8),
    (PhaseName::Scale, 9, 10),
];

impl ReportParser {
    pub fn build_execution_steps(
        &self,
        section: Option<&str>,
        idea_title: &str,
        profile: &ProfileContext,
    ) -> Extraction<String> {
        let steps = section
            .map(|markdown| self.parse_execution_steps(markdown))
            .unwrap_or_default();
        if !steps.is_empty() {
            return Extraction::from_report(steps);
        }

        debug!(idea = idea_title, "execution path missing, using fallback steps");
        let values = template_values(profile, idea_title);
        Extraction::fallback(self.fallback_execution_steps(&values))
    }

    fn parse_execution_steps(&self, markdown: &str) -> Vec<String> {
        let cleaned = self.clean_narrative_markdown(markdown);
        let items = self.parse_top_level_items(&cleaned);

        let raw_steps = if items.is_empty() {
            cleaned
                .lines()
                .map(str::trim)
                .filter(|line| self.step_label.is_match(line))
                .map(ToOwned::to_owned)
                .collect::<Vec<String>>()
        } else {
            items.into_iter().map(|item| item.text).collect()
        };

        let steps = raw_steps
            .iter()
            .map(|step| {
                let plain = strip_inline_markdown(step);
                self.step_label.replace(&plain, "").trim().to_string()
            })
            .collect::<Vec<String>>();

        dedupe_strings(&steps)
            .into_iter()
            .take(MAX_EXECUTION_STEPS)
            .collect()
    }

    fn fallback_execution_steps(&self, values: &TemplateValues) -> Vec<String> {
        EXECUTION_STEP_TEMPLATES
            .iter()
            .map(|template| self.render_fallback(template, values))
            .collect()
    }
}

/// Groups steps into the fixed Validate/Build/Launch/Scale phases by
/// position. Phases with no steps are omitted.
pub fn group_execution_phases(steps: &[String]) -> Vec<ExecutionPhase> {
    PHASE_SLICES
        .iter()
        .filter_map(|(name, first, last)| {
            let start = first - 1;
            if start >= steps.len() {
                return None;
            }
            let end = (*last).min(steps.len());

            Some(ExecutionPhase {
                name: *name,
                steps: steps[start..end].to_vec(),
            })
        })
        .collect()
}
