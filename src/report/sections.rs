use super::normalize::{
    is_code_fence, line_spans, normalize_heading_for_match, normalize_heading_key,
};
use super::parser::ReportParser;
use super::types::{SectionKind, SectionMap};

const MAX_OTHER_HEADING_WORDS: usize = 6;

const SUBSTRUCTURE_WORDS: [&str; 13] = [
    "step", "steps", "phase", "week", "weeks", "day", "days", "month", "months", "stage", "option",
    "tier", "part",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DetectedHeading {
    pub kind: SectionKind,
    pub heading: String,
    pub inline: String,
}

struct ActiveSection {
    kind: SectionKind,
    heading: String,
    lines: Vec<String>,
}

pub fn classify_section_heading(label: &str) -> SectionKind {
    let normalized = normalize_heading_for_match(label);
    if normalized.is_empty() {
        return SectionKind::Other(String::new());
    }

    let padded = format!(" {normalized} ");
    for kind in SectionKind::KNOWN.iter() {
        if kind
            .phrases()
            .iter()
            .any(|phrase| padded.contains(&format!(" {phrase} ")))
        {
            return kind.clone();
        }
    }

    SectionKind::Other(normalize_heading_key(label))
}

/// Labels such as `Week 1`, `Phase 2: Build` or `First 30 days` structure the
/// inside of a section and never start a new one.
fn is_substructure_label(key: &str) -> bool {
    let words = key.split_whitespace().take(2).collect::<Vec<&str>>();
    let Some(first) = words.first() else {
        return true;
    };

    let first_word = first.trim_matches(|ch: char| !ch.is_alphanumeric());
    if SUBSTRUCTURE_WORDS.contains(&first_word) {
        return true;
    }

    words
        .iter()
        .any(|word| word.chars().any(|ch| ch.is_ascii_digit()))
}

impl ReportParser {
    /// Splits one idea body into named sections.
    ///
    /// Everything before the first heading is kept verbatim as the intro.
    /// Markdown headings always open a section; bold labels open one when
    /// they name a known section, or when they end in a colon and read like a
    /// short heading. Repeated headings are concatenated.
    pub fn split_idea_sections(&self, body: &str) -> SectionMap {
        let mut map: Option<SectionMap> = None;
        let mut active: Option<ActiveSection> = None;
        let mut in_fence = false;

        for (line_start, _, line) in line_spans(body) {
            if is_code_fence(line) {
                in_fence = !in_fence;
            }

            let detected = if in_fence || is_code_fence(line) {
                None
            } else {
                self.detect_section_heading(line)
            };

            let Some(detected) = detected else {
                if let Some(section) = active.as_mut() {
                    section.lines.push(line.to_string());
                }
                continue;
            };

            let sections = map.get_or_insert_with(|| SectionMap::with_intro(&body[..line_start]));
            if let Some(section) = active.take() {
                flush_section(sections, section);
            }

            let mut lines = Vec::new();
            if !detected.inline.is_empty() {
                lines.push(detected.inline);
            }
            active = Some(ActiveSection {
                kind: detected.kind,
                heading: detected.heading,
                lines,
            });
        }

        let mut sections = map.unwrap_or_else(|| SectionMap::with_intro(body));
        if let Some(section) = active.take() {
            flush_section(&mut sections, section);
        }

        sections
    }

    pub(super) fn detect_section_heading(&self, line: &str) -> Option<DetectedHeading> {
        if let Some(captures) = self.section_markdown_heading.captures(line) {
            let label = captures.name("label").map(|value| value.as_str())?;
            let kind = classify_section_heading(label);
            if let SectionKind::Other(key) = &kind
                && (key.is_empty() || is_substructure_label(key))
            {
                return None;
            }

            return Some(DetectedHeading {
                kind,
                heading: label.trim().to_string(),
                inline: String::new(),
            });
        }

        let captures = self.section_bold_label.captures(line)?;
        let raw_label = captures.name("label").map(|value| value.as_str())?;
        let has_colon = raw_label.trim_end().ends_with(':') || captures.name("colon").is_some();
        let rest = captures
            .name("rest")
            .map(|value| value.as_str().trim())
            .unwrap_or("");
        let kind = classify_section_heading(raw_label);
        let heading = raw_label.trim().trim_end_matches(':').trim().to_string();

        if !rest.is_empty() {
            if kind.is_recognized() && has_colon {
                return Some(DetectedHeading {
                    kind,
                    heading,
                    inline: rest.to_string(),
                });
            }
            return None;
        }

        if let SectionKind::Other(key) = &kind
            && (!has_colon
                || key.is_empty()
                || is_substructure_label(key)
                || key.split_whitespace().count() > MAX_OTHER_HEADING_WORDS)
        {
            return None;
        }

        Some(DetectedHeading {
            kind,
            heading,
            inline: String::new(),
        })
    }
}

fn flush_section(sections: &mut SectionMap, section: ActiveSection) {
    let markdown = section.lines.join("\n").trim().to_string();
    sections.append(section.kind, &section.heading, &markdown);
}
