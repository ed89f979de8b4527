use super::normalize::{is_code_fence, strip_inline_markdown, trim_separators};
use super::parser::ReportParser;
use super::types::TimelineWindow;

pub const TIMELINE_WINDOW_LABELS: [&str; 3] = ["Days 0-30", "Days 30-60", "Days 60-90"];

const WINDOW_DAYS: u32 = 30;
const INLINE_LABEL_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerStrength {
    /// Markdown heading or a bold line of its own.
    Heading,
    /// List item or `Label: text` line.
    Inline,
}

#[derive(Debug, Clone)]
struct TimelineMarker {
    line_index: usize,
    window: Option<usize>,
    remainder: String,
    strength: MarkerStrength,
}

impl ReportParser {
    /// Text of one 30-day window of a 90-day roadmap. Windows 0, 1 and 2 are
    /// days 0-30, 30-60 and 60-90; any other index yields an empty string.
    pub fn extract_timeline_slice(&self, roadmap: &str, window_index: usize) -> String {
        if window_index >= TIMELINE_WINDOW_LABELS.len() || roadmap.trim().is_empty() {
            return String::new();
        }

        let lines = roadmap.lines().collect::<Vec<&str>>();
        let mut markers = self.timeline_markers(&lines);
        if markers.is_empty() {
            return self.distribute_timeline_blocks(roadmap, window_index);
        }
        if markers
            .iter()
            .any(|marker| marker.strength == MarkerStrength::Heading)
        {
            markers.retain(|marker| marker.strength == MarkerStrength::Heading);
        }

        let mut slice = Vec::<String>::new();
        for (position, marker) in markers.iter().enumerate() {
            if marker.window != Some(window_index) {
                continue;
            }

            if !marker.remainder.is_empty() {
                slice.push(marker.remainder.clone());
            }
            let end = markers
                .get(position + 1)
                .map(|next| next.line_index)
                .unwrap_or(lines.len());
            slice.extend(
                lines[marker.line_index + 1..end]
                    .iter()
                    .map(|line| line.to_string()),
            );
        }

        slice.join("\n").trim().to_string()
    }

    /// All three roadmap windows with their labels. Empty windows are kept so
    /// consumers always see the same shape.
    pub fn build_roadmap_windows(&self, roadmap: Option<&str>) -> Vec<TimelineWindow> {
        TIMELINE_WINDOW_LABELS
            .iter()
            .enumerate()
            .map(|(index, label)| TimelineWindow {
                label: (*label).to_string(),
                markdown: roadmap
                    .map(|markdown| self.extract_timeline_slice(markdown, index))
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn timeline_markers(&self, lines: &[&str]) -> Vec<TimelineMarker> {
        let mut markers = Vec::<TimelineMarker>::new();
        let mut in_fence = false;

        for (line_index, line) in lines.iter().enumerate() {
            if is_code_fence(line) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            let Some((label, remainder, strength)) = self.timeline_label(line) else {
                continue;
            };
            let Some((start, end)) = self.timeline_day_span(&label) else {
                continue;
            };

            markers.push(TimelineMarker {
                line_index,
                window: window_for_span(start, end),
                remainder,
                strength,
            });
        }

        markers
    }

    /// Splits a candidate marker line into its label and the text after it.
    fn timeline_label(&self, line: &str) -> Option<(String, String, MarkerStrength)> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(captures) = self.section_markdown_heading.captures(trimmed) {
            let label = captures.name("label")?.as_str();
            return Some((
                strip_inline_markdown(label),
                String::new(),
                MarkerStrength::Heading,
            ));
        }

        let list_body = self
            .list_item
            .captures(line)
            .and_then(|captures| captures.name("body"))
            .map(|value| value.as_str());
        let body = list_body.unwrap_or(trimmed);

        if let Some(captures) = self.section_bold_label.captures(body) {
            let label = captures.name("label")?.as_str();
            let rest = captures
                .name("rest")
                .map(|value| value.as_str().trim())
                .unwrap_or("");
            let strength = if list_body.is_none() && rest.is_empty() {
                MarkerStrength::Heading
            } else {
                MarkerStrength::Inline
            };
            return Some((trim_separators(label), rest.to_string(), strength));
        }

        let plain = strip_inline_markdown(body);
        let colon = plain.find(':')?;
        if plain[..colon].chars().count() > INLINE_LABEL_MAX_CHARS {
            return None;
        }

        Some((
            plain[..colon].trim().to_string(),
            plain[colon + 1..].trim().to_string(),
            MarkerStrength::Inline,
        ))
    }

    /// Day span named by a label, as `(first day, last day)`.
    fn timeline_day_span(&self, label: &str) -> Option<(u32, u32)> {
        if let Some(captures) = self
            .day_range_suffix
            .captures(label)
            .or_else(|| self.day_range.captures(label))
        {
            let start = capture_number(&captures, "start")?;
            let end = capture_number(&captures, "end").unwrap_or(start);
            return Some((start, end.max(start)));
        }

        if let Some(captures) = self.week_range.captures(label) {
            let start = capture_number(&captures, "start")?;
            let end = capture_number(&captures, "end").unwrap_or(start).max(start);
            return Some((start.saturating_sub(1) * 7, end * 7));
        }

        if let Some(captures) = self.month_label.captures(label) {
            let month = capture_number(&captures, "month")?;
            let start = month.saturating_sub(1) * WINDOW_DAYS;
            return Some((start, start + WINDOW_DAYS));
        }

        let captures = self.ordinal_window.captures(label)?;
        let window = match captures.name("which")?.as_str().to_lowercase().as_str() {
            "first" => 0,
            "next" | "second" | "middle" => 1,
            _ => 2,
        };
        Some((window * WINDOW_DAYS, (window + 1) * WINDOW_DAYS))
    }

    /// Spreads paragraph blocks (or top-level list items, when there are
    /// more of them) over the three windows by position.
    fn distribute_timeline_blocks(&self, roadmap: &str, window_index: usize) -> String {
        let paragraphs = paragraph_blocks(roadmap);
        let items = self.parse_top_level_items(roadmap);

        let blocks = if items.len() > paragraphs.len() {
            items
                .into_iter()
                .map(|item| format!("- {}", item.text))
                .collect::<Vec<String>>()
        } else {
            paragraphs
        };

        let window_count = TIMELINE_WINDOW_LABELS.len();
        let total = blocks.len();
        let separator = if blocks.iter().all(|block| block.starts_with("- ")) {
            "\n"
        } else {
            "\n\n"
        };

        blocks
            .into_iter()
            .enumerate()
            .filter(|(position, _)| position * window_count / total == window_index)
            .map(|(_, block)| block)
            .collect::<Vec<String>>()
            .join(separator)
    }
}

fn window_for_span(start: u32, end: u32) -> Option<usize> {
    let midpoint = (start + end) / 2;
    let window = (midpoint / WINDOW_DAYS) as usize;
    (window < TIMELINE_WINDOW_LABELS.len()).then_some(window)
}

fn capture_number(captures: &regex::Captures<'_>, name: &str) -> Option<u32> {
    captures.name(name)?.as_str().parse::<u32>().ok()
}

fn paragraph_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::<String>::new();
    let mut current = Vec::<&str>::new();

    for line in markdown.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line.trim_end());
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}
