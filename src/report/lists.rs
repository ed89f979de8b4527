use super::normalize::{is_table_line, strip_inline_markdown, trim_separators};
use super::parser::ReportParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ListItemDraft {
    pub text: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct MarkdownTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct LabeledText {
    pub lead: String,
    pub fields: Vec<(String, String)>,
}

impl LabeledText {
    pub fn field(&self, labels: &[&str]) -> Option<&str> {
        self.fields
            .iter()
            .find(|(label, value)| labels.contains(&label.as_str()) && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    pub fn has_any(&self, labels: &[&str]) -> bool {
        self.field(labels).is_some()
    }
}

impl ReportParser {
    /// Collects list items with wrapped continuation lines folded in. A blank
    /// line, heading or table row ends the current item.
    pub(super) fn parse_list_items(&self, markdown: &str) -> Vec<ListItemDraft> {
        let mut items = Vec::<ListItemDraft>::new();
        let mut active_item: Option<ListItemDraft> = None;

        for raw_line in markdown.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || is_table_line(line) {
                if let Some(item) = active_item.take() {
                    push_item(&mut items, item);
                }
                continue;
            }

            if let Some(captures) = self.list_item.captures(raw_line) {
                if let Some(item) = active_item.take() {
                    push_item(&mut items, item);
                }

                let indent = captures
                    .name("indent")
                    .map(|value| value.as_str())
                    .unwrap_or("");
                let body = captures
                    .name("body")
                    .map(|value| value.as_str().trim().to_string())
                    .unwrap_or_default();

                active_item = Some(ListItemDraft {
                    text: body,
                    depth: infer_list_depth(indent),
                });
                continue;
            }

            if let Some(item) = active_item.as_mut() {
                if !item.text.is_empty() {
                    item.text.push(' ');
                }
                item.text.push_str(line);
            }
        }

        if let Some(item) = active_item.take() {
            push_item(&mut items, item);
        }

        items
    }

    /// Items at the shallowest depth present, which is where the primary
    /// entries of an LLM-written list sit.
    pub(super) fn parse_top_level_items(&self, markdown: &str) -> Vec<ListItemDraft> {
        let items = self.parse_list_items(markdown);
        let Some(shallowest) = items.iter().map(|item| item.depth).min() else {
            return items;
        };

        items
            .into_iter()
            .filter(|item| item.depth == shallowest)
            .collect()
    }

    /// Parses the first pipe table in `markdown`. The row directly above a
    /// separator row becomes the header; cells are stripped of inline markup.
    pub(super) fn parse_markdown_table(&self, markdown: &str) -> Option<MarkdownTable> {
        let mut table = MarkdownTable::default();
        let mut started = false;

        for line in markdown.lines() {
            if !is_table_line(line) {
                if started {
                    break;
                }
                continue;
            }
            started = true;

            if self.table_separator.is_match(line) {
                if table.header.is_none() && table.rows.len() == 1 {
                    table.header = table.rows.pop();
                }
                continue;
            }

            let cells = split_table_cells(line);
            if cells.iter().any(|cell| !cell.is_empty()) {
                table.rows.push(cells);
            }
        }

        if table.rows.is_empty() {
            return None;
        }

        Some(table)
    }

    pub(super) fn split_labeled_fields(&self, plain: &str) -> LabeledText {
        let matches = self
            .labeled_field
            .captures_iter(plain)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let label = captures.name("label")?.as_str().to_lowercase();
                Some((whole.start(), whole.end(), label))
            })
            .collect::<Vec<(usize, usize, String)>>();

        let Some((first_start, _, _)) = matches.first() else {
            return LabeledText {
                lead: trim_separators(plain),
                fields: Vec::new(),
            };
        };

        let fields = matches
            .iter()
            .enumerate()
            .map(|(position, (_, value_start, label))| {
                let value_end = matches
                    .get(position + 1)
                    .map(|(next_start, _, _)| *next_start)
                    .unwrap_or(plain.len());
                (label.clone(), trim_separators(&plain[*value_start..value_end]))
            })
            .collect();

        LabeledText {
            lead: trim_separators(&plain[..*first_start]),
            fields,
        }
    }

    pub(super) fn strip_task_box(&self, text: &str) -> String {
        self.task_box.replace(text.trim(), "").trim().to_string()
    }
}

fn push_item(items: &mut Vec<ListItemDraft>, item: ListItemDraft) {
    if !item.text.trim().is_empty() {
        items.push(item);
    }
}

fn infer_list_depth(indent: &str) -> usize {
    let indent_units = indent
        .chars()
        .map(|ch| if ch == '\t' { 4usize } else { 1usize })
        .sum::<usize>();

    (indent_units / 2).min(5) + 1
}

fn split_table_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    inner
        .split('|')
        .map(|cell| strip_inline_markdown(cell.trim()))
        .collect()
}
