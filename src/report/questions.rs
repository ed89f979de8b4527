use tracing::debug;

use super::normalize::{
    dedupe_key, resolve_table_columns, strip_inline_markdown, table_cell, trim_separators,
};
use super::parser::ReportParser;
use super::personalize::TemplateValues;
use super::types::{Extraction, ValidationQuestion};

const QUESTION_LABELS: [&str; 1] = ["question"];
const LISTEN_LABELS: [&str; 3] = ["listen for", "what to listen for", "signal"];
const ACT_LABELS: [&str; 4] = ["act on", "how to act", "next step", "action"];

const QUESTION_COLUMN_KEYWORDS: &[&str] = &["question"];
const LISTEN_COLUMN_KEYWORDS: &[&str] = &["listen", "signal", "look for"];
const ACT_COLUMN_KEYWORDS: &[&str] = &["act", "action", "next", "decision"];

/// `(question, listen for, act on)` templates.
pub(super) const QUESTION_FALLBACK_TEMPLATES: [(&str, &str, &str); 3] = [
    (
        "What do people in the {focus_area} market do today to solve the problem {idea_title} addresses?",
        "Workarounds they already pay for or complain about",
        "If nobody has a workaround, narrow the problem before building",
    ),
    (
        "How much would you pay for {idea_title} if it saved you time this month?",
        "Concrete amounts rather than polite interest",
        "Use the median answer to set your pilot price",
    ),
    (
        "What would make you switch to {idea_title} tomorrow?",
        "Specific triggers and deal-breakers",
        "Keep the triggers that fit your {goal_type} goal and test them first",
    ),
];

impl ReportParser {
    pub fn build_validation_questions(
        &self,
        section: Option<&str>,
        idea_title: &str,
        focus_area: Option<&str>,
        goal_type: Option<&str>,
    ) -> Extraction<ValidationQuestion> {
        let questions = section
            .map(|markdown| self.parse_validation_questions(markdown))
            .unwrap_or_default();
        if !questions.is_empty() {
            return Extraction::from_report(questions);
        }

        debug!(idea = idea_title, "validation questions missing, using fallback questions");
        let mut values = TemplateValues::new();
        values.insert("idea_title", or_neutral(Some(idea_title), "this idea"));
        values.insert("focus_area", or_neutral(focus_area, "target"));
        values.insert("goal_type", or_neutral(goal_type, "primary"));

        Extraction::fallback(
            QUESTION_FALLBACK_TEMPLATES
                .iter()
                .map(|(question, listen_for, act_on)| ValidationQuestion {
                    question: self.render_fallback(question, &values),
                    listen_for: self.render_fallback(listen_for, &values),
                    act_on: self.render_fallback(act_on, &values),
                })
                .collect(),
        )
    }

    fn parse_validation_questions(&self, markdown: &str) -> Vec<ValidationQuestion> {
        let questions = match self.parse_markdown_table(markdown) {
            Some(table) => {
                let header = table.header.as_deref();
                let [question, listen, act] = resolve_table_columns(
                    header,
                    [
                        (QUESTION_COLUMN_KEYWORDS, 0),
                        (LISTEN_COLUMN_KEYWORDS, 1),
                        (ACT_COLUMN_KEYWORDS, 2),
                    ],
                );

                table
                    .rows
                    .iter()
                    .map(|cells| ValidationQuestion {
                        question: table_cell(cells, question),
                        listen_for: table_cell(cells, listen),
                        act_on: table_cell(cells, act),
                    })
                    .collect::<Vec<ValidationQuestion>>()
            }
            None => self.parse_question_items(markdown),
        };

        let mut seen = Vec::<String>::new();
        questions
            .into_iter()
            .filter(|question| !question.question.is_empty())
            .filter(|question| {
                let key = dedupe_key(&question.question);
                if seen.contains(&key) {
                    return false;
                }
                seen.push(key);
                true
            })
            .collect()
    }

    fn parse_question_items(&self, markdown: &str) -> Vec<ValidationQuestion> {
        let cleaned = self.clean_narrative_markdown(markdown);
        let items = self.parse_list_items(&cleaned);

        if items.is_empty() {
            return cleaned
                .lines()
                .map(str::trim)
                .filter(|line| line.contains('?'))
                .map(|line| self.question_from_text(line))
                .collect();
        }

        let shallowest = items.iter().map(|item| item.depth).min().unwrap_or(1);
        let mut questions = Vec::<ValidationQuestion>::new();

        for item in items {
            let parsed = self.question_from_text(&item.text);
            let attaches_to_previous = item.depth > shallowest
                || (parsed.question.is_empty()
                    && (!parsed.listen_for.is_empty() || !parsed.act_on.is_empty()));

            match questions.last_mut() {
                Some(previous) if attaches_to_previous => {
                    merge_question_detail(previous, parsed, &item.text)
                }
                _ if parsed.question.is_empty() => {}
                _ => questions.push(parsed),
            }
        }

        questions
    }

    fn question_from_text(&self, text: &str) -> ValidationQuestion {
        let plain = strip_inline_markdown(text);
        let labeled = self.split_labeled_fields(&plain);

        let mut question = labeled
            .field(&QUESTION_LABELS)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| labeled.lead.clone());
        let mut listen_for = labeled.field(&LISTEN_LABELS).unwrap_or("").to_string();
        let act_on = labeled.field(&ACT_LABELS).unwrap_or("").to_string();

        if let Some(mark) = question.find('?') {
            let tail = trim_separators(&question[mark + 1..]);
            if !tail.is_empty() && listen_for.is_empty() {
                listen_for = tail;
            }
            question.truncate(mark + 1);
        }

        ValidationQuestion {
            question: question
                .trim()
                .trim_matches(['"', '“', '”'])
                .trim()
                .to_string(),
            listen_for,
            act_on,
        }
    }
}

/// Folds a nested bullet into the question above it: labelled text goes to
/// its field, unlabelled text fills `listen_for` and then `act_on`.
fn merge_question_detail(
    previous: &mut ValidationQuestion,
    detail: ValidationQuestion,
    raw_text: &str,
) {
    if !detail.listen_for.is_empty() || !detail.act_on.is_empty() {
        if previous.listen_for.is_empty() {
            previous.listen_for = detail.listen_for;
        }
        if previous.act_on.is_empty() {
            previous.act_on = detail.act_on;
        }
        return;
    }

    let text = strip_inline_markdown(raw_text);
    if previous.listen_for.is_empty() {
        previous.listen_for = text;
    } else if previous.act_on.is_empty() {
        previous.act_on = text;
    }
}

fn or_neutral(value: Option<&str>, neutral: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(neutral)
        .to_string()
}
