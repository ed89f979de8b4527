use std::collections::HashSet;

use super::normalize::{dedupe_key, dedupe_strings, is_table_line, split_sentences, strip_inline_markdown};
use super::parser::ReportParser;
use super::sections::classify_section_heading;
use super::types::WhyFit;

impl ReportParser {
    /// Points explaining why an idea suits the reader. List items are used
    /// when present, otherwise the sentences of the prose paragraphs.
    pub fn extract_why_fit(&self, markdown: &str) -> WhyFit {
        let cleaned = self.clean_narrative_markdown(markdown);
        let items = self.parse_top_level_items(&cleaned);

        let candidates = if items.is_empty() {
            narrative_paragraphs(&cleaned)
                .iter()
                .flat_map(|paragraph| split_sentences(paragraph))
                .collect::<Vec<String>>()
        } else {
            items.into_iter().map(|item| item.text).collect()
        };

        let mut seen = HashSet::<String>::new();
        let mut why_fit = WhyFit::default();
        for detail in candidates {
            let detail = detail.trim().to_string();
            let point = strip_inline_markdown(&detail);
            if point.is_empty() || !seen.insert(dedupe_key(&point)) {
                continue;
            }
            why_fit.points.push(point);
            why_fit.detail.push(detail);
        }
        why_fit.hero_statement = why_fit.points.first().cloned();

        why_fit
    }

    /// Removes bold labels that restate a known section heading inside
    /// section text. List items keep their marker and indentation, and an
    /// item that would become empty is left untouched so list structure is
    /// never altered.
    pub fn clean_narrative_markdown(&self, markdown: &str) -> String {
        let mut lines = Vec::<String>::new();

        for line in markdown.lines() {
            if let Some(captures) = self.list_item.captures(line) {
                let body = captures
                    .name("body")
                    .map(|value| value.as_str())
                    .unwrap_or("");
                let body_start = captures
                    .name("body")
                    .map(|value| value.start())
                    .unwrap_or(line.len());

                match self.strip_restated_label(body) {
                    Some(rest) if !rest.is_empty() => {
                        lines.push(format!("{}{}", &line[..body_start], rest));
                    }
                    _ => lines.push(line.to_string()),
                }
                continue;
            }

            match self.strip_restated_label(line) {
                Some(rest) if rest.is_empty() => {}
                Some(rest) => {
                    let indent = &line[..line.len() - line.trim_start().len()];
                    lines.push(format!("{indent}{rest}"));
                }
                None => lines.push(line.to_string()),
            }
        }

        let mut cleaned = lines.join("\n");
        if markdown.ends_with('\n') && !cleaned.is_empty() {
            cleaned.push('\n');
        }
        cleaned
    }

    /// Decision checklist entries with task-box markers removed.
    pub fn extract_checklist_items(&self, markdown: Option<&str>) -> Vec<String> {
        let Some(markdown) = markdown else {
            return Vec::new();
        };

        let items = self
            .parse_list_items(markdown)
            .iter()
            .map(|item| strip_inline_markdown(&self.strip_task_box(&item.text)))
            .collect::<Vec<String>>();

        dedupe_strings(&items)
    }

    /// Text after a leading bold label naming a known section, or `None`
    /// when the line has no such label.
    fn strip_restated_label(&self, text: &str) -> Option<String> {
        let captures = self.section_bold_label.captures(text)?;
        let label = captures.name("label").map(|value| value.as_str())?;
        if !classify_section_heading(label).is_recognized() {
            return None;
        }

        let rest = captures
            .name("rest")
            .map(|value| value.as_str().trim())
            .unwrap_or("");
        Some(rest.to_string())
    }
}

fn narrative_paragraphs(markdown: &str) -> Vec<String> {
    let mut paragraphs = Vec::<String>::new();
    let mut current = String::new();

    for raw_line in markdown.lines() {
        let line = raw_line.trim();
        let is_break = line.is_empty() || line.starts_with('#') || is_table_line(line);
        if is_break {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}
