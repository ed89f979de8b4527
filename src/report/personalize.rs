use std::collections::BTreeMap;

use anyhow::{Result, bail};
use regex::Captures;
use tracing::warn;

use super::parser::ReportParser;
use super::types::ProfileContext;

pub type TemplateValues = BTreeMap<&'static str, String>;

const NEUTRAL_VALUES: [(&str, &str); 7] = [
    ("idea_title", "this idea"),
    ("goal_type", "primary"),
    ("time_commitment", "the time you have available"),
    ("budget_range", "your stated budget"),
    ("work_style", "sustainable"),
    ("skill", "strongest"),
    ("focus_area", "target"),
];

/// Maps a placeholder name in any common spelling (`goalType`, `goal`,
/// `GOAL_TYPE`) to its canonical token.
pub(super) fn canonical_token(raw: &str) -> Option<&'static str> {
    let mut snake = String::with_capacity(raw.len() + 4);
    let mut previous_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_uppercase() && previous_lower {
            snake.push('_');
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        snake.extend(ch.to_lowercase());
    }

    let token = match snake.as_str() {
        "idea_title" | "idea" | "title" | "idea_name" => "idea_title",
        "goal_type" | "goal" | "goals" => "goal_type",
        "time_commitment" | "time" | "hours" | "availability" => "time_commitment",
        "budget_range" | "budget" => "budget_range",
        "work_style" | "style" => "work_style",
        "skill" | "skills" | "primary_skill" | "top_skill" => "skill",
        "focus_area" | "focus" | "industry" | "interest" | "interests" => "focus_area",
        _ => return None,
    };
    Some(token)
}

/// Template values for one idea, with neutral phrasing for anything the
/// profile leaves blank.
pub fn template_values(profile: &ProfileContext, idea_title: &str) -> TemplateValues {
    let provided = [
        Some(idea_title),
        profile.goal_type.as_deref(),
        profile.time_commitment.as_deref(),
        profile.budget_range.as_deref(),
        profile.work_style.as_deref(),
        profile.skill.as_deref(),
        profile.focus_area.as_deref(),
    ];

    let mut values = TemplateValues::new();
    for ((token, neutral), value) in NEUTRAL_VALUES.into_iter().zip(provided) {
        let value = value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(neutral);
        values.insert(token, value.to_string());
    }

    values
}

impl ReportParser {
    /// Strict substitution for built-in templates: any placeholder without a
    /// value is an error.
    pub fn fill_template(&self, template: &str, values: &TemplateValues) -> Result<String> {
        let (filled, unresolved) = self.substitute_placeholders(template, values);
        if !unresolved.is_empty() {
            bail!(
                "template has unresolved placeholders [{}]: {}",
                unresolved.join(", "),
                template
            );
        }
        Ok(filled)
    }

    /// Substitutes profile values into `text`. Unknown placeholders are
    /// removed so template syntax never reaches the reader.
    pub fn personalize_copy(&self, text: &str, profile: &ProfileContext) -> String {
        self.personalize_with(text, &template_values(profile, ""))
    }

    pub(super) fn personalize_with(&self, text: &str, values: &TemplateValues) -> String {
        if !self.placeholder.is_match(text) {
            return text.to_string();
        }

        let (filled, unresolved) = self.substitute_placeholders(text, values);
        if unresolved.is_empty() {
            return filled;
        }

        let collapsed = self.run_of_spaces.replace_all(&filled, "$lead ");
        self.space_before_punctuation
            .replace_all(&collapsed, "$punct")
            .trim_end()
            .to_string()
    }

    /// Fills a built-in fallback template. An unresolved placeholder is a
    /// programming error: it panics in debug builds and is neutralized in
    /// release builds.
    pub(super) fn render_fallback(&self, template: &str, values: &TemplateValues) -> String {
        match self.fill_template(template, values) {
            Ok(text) => text,
            Err(error) => {
                if cfg!(debug_assertions) {
                    panic!("{error}");
                }
                warn!(error = %error, "fallback template left placeholders unresolved");
                self.personalize_with(template, values)
            }
        }
    }

    fn substitute_placeholders(&self, text: &str, values: &TemplateValues) -> (String, Vec<String>) {
        let mut unresolved = Vec::<String>::new();
        let filled = self
            .placeholder
            .replace_all(text, |captures: &Captures<'_>| {
                let raw = captures
                    .name("triple")
                    .or_else(|| captures.name("double"))
                    .or_else(|| captures.name("single"))
                    .map(|value| value.as_str())
                    .unwrap_or("");
                match canonical_token(raw).and_then(|token| values.get(token)) {
                    Some(value) => value.clone(),
                    None => {
                        unresolved.push(raw.to_string());
                        String::new()
                    }
                }
            })
            .into_owned();

        (filled, unresolved)
    }
}
