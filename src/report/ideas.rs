use super::normalize::{is_code_fence, line_spans};
use super::parser::ReportParser;
use super::types::Idea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdeaHeadingForm {
    Keyword,
    Numbered,
}

#[derive(Debug, Clone)]
struct IdeaHeadingDraft {
    line_start: usize,
    line_end: usize,
    level: usize,
    form: IdeaHeadingForm,
    number: Option<u32>,
    title: String,
}

impl ReportParser {
    /// Splits a report into its top-level ideas in document order.
    ///
    /// Keyword headings (`### Idea 2: ...`, `**Recommendation #1 - ...**`)
    /// take precedence; bare numbered headings (`## 1. ...`) are only used
    /// when no keyword heading exists, and then only at the shallowest level
    /// they appear so numbered sub-headings inside an idea stay in its body.
    pub fn parse_top_ideas(&self, markdown: &str, max_ideas: usize) -> Vec<Idea> {
        if max_ideas == 0 || markdown.trim().is_empty() {
            return Vec::new();
        }

        let headings = self.select_idea_headings(self.collect_idea_headings(markdown));

        headings
            .iter()
            .enumerate()
            .take(max_ideas)
            .map(|(position, heading)| {
                let body_end = headings
                    .get(position + 1)
                    .map(|next| next.line_start)
                    .unwrap_or(markdown.len());
                let index = heading.number.unwrap_or((position + 1) as u32);
                let title = if heading.title.is_empty() {
                    format!("Idea {index}")
                } else {
                    heading.title.clone()
                };

                Idea {
                    index,
                    title,
                    body: markdown[heading.line_end..body_end].to_string(),
                }
            })
            .collect()
    }

    fn collect_idea_headings(&self, markdown: &str) -> Vec<IdeaHeadingDraft> {
        let mut drafts = Vec::<IdeaHeadingDraft>::new();
        let mut in_fence = false;

        for (line_start, line_end, line) in line_spans(markdown) {
            if is_code_fence(line) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            if let Some(draft) = self.detect_idea_heading(line, line_start, line_end) {
                drafts.push(draft);
            }
        }

        drafts
    }

    fn detect_idea_heading(
        &self,
        line: &str,
        line_start: usize,
        line_end: usize,
    ) -> Option<IdeaHeadingDraft> {
        let (text, level) = if let Some(captures) = self.idea_markdown_heading.captures(line) {
            let level = captures.name("hashes").map(|value| value.as_str().len())?;
            let text = captures.name("text").map(|value| value.as_str().to_string())?;
            (text, level)
        } else if let Some(captures) = self.idea_bold_heading.captures(line) {
            let inner = captures
                .name("inner")
                .map(|value| value.as_str().trim())
                .unwrap_or("");
            let tail = captures
                .name("tail")
                .map(|value| value.as_str().trim())
                .unwrap_or("");
            (format!("{inner} {tail}"), 0)
        } else {
            return None;
        };

        let text = text.replace("**", "").replace("__", "");
        let text = text.trim();

        if let Some(captures) = self.idea_keyword_label.captures(text) {
            let number = captures
                .name("number")
                .and_then(|value| value.as_str().parse::<u32>().ok())
                .or_else(|| {
                    captures
                        .name("ordinal")
                        .and_then(|value| ordinal_number(value.as_str()))
                });
            let title = captures
                .name("title")
                .map(|value| clean_idea_title(value.as_str()))
                .unwrap_or_default();

            return Some(IdeaHeadingDraft {
                line_start,
                line_end,
                level,
                form: IdeaHeadingForm::Keyword,
                number,
                title,
            });
        }

        if level == 0 {
            return None;
        }

        let captures = self.idea_numbered_label.captures(text)?;
        let title = captures
            .name("title")
            .map(|value| clean_idea_title(value.as_str()))
            .unwrap_or_default();
        if title.is_empty() {
            return None;
        }

        Some(IdeaHeadingDraft {
            line_start,
            line_end,
            level,
            form: IdeaHeadingForm::Numbered,
            number: captures
                .name("number")
                .and_then(|value| value.as_str().parse::<u32>().ok()),
            title,
        })
    }

    fn select_idea_headings(&self, drafts: Vec<IdeaHeadingDraft>) -> Vec<IdeaHeadingDraft> {
        if drafts
            .iter()
            .any(|draft| draft.form == IdeaHeadingForm::Keyword)
        {
            return drafts
                .into_iter()
                .filter(|draft| draft.form == IdeaHeadingForm::Keyword)
                .collect();
        }

        let Some(shallowest) = drafts.iter().map(|draft| draft.level).min() else {
            return Vec::new();
        };

        drafts
            .into_iter()
            .filter(|draft| draft.level == shallowest)
            .collect()
    }
}

fn ordinal_number(value: &str) -> Option<u32> {
    let number = match value.to_ascii_lowercase().as_str() {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => return None,
    };
    Some(number)
}

fn clean_idea_title(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['-', '–', '—', ':', '.', ')'])
        .trim()
        .trim_end_matches(':')
        .trim_matches(['"', '“', '”'])
        .trim()
        .to_string()
}
