use std::collections::HashSet;

const MINOR_HEADING_WORDS: [&str; 10] = [
    "a", "an", "and", "as", "for", "in", "of", "on", "the", "to",
];

/// Byte spans of each line: `(start, end_including_newline, line_without_eol)`.
pub(super) fn line_spans(text: &str) -> Vec<(usize, usize, &str)> {
    let mut spans = Vec::new();
    let mut start = 0usize;

    for raw in text.split_inclusive('\n') {
        let end = start + raw.len();
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');
        spans.push((start, end, line));
        start = end;
    }

    spans
}

pub(super) fn is_code_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

pub(super) fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub(super) fn dedupe_key(input: &str) -> String {
    collapse_whitespace(input).to_lowercase()
}

/// Drops case- and whitespace-insensitive duplicates, keeping the first
/// trimmed form of each entry. Empty entries are dropped.
pub fn dedupe_strings<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    let mut out = Vec::<String>::new();

    for value in values {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(dedupe_key(trimmed)) {
            out.push(trimmed.to_string());
        }
    }

    out
}

/// Removes emphasis, code and link markup while keeping the visible text.
pub fn strip_inline_markdown(input: &str) -> String {
    let without_links = strip_links(input).replace("~~", "");
    let chars = without_links.chars().collect::<Vec<char>>();
    let mut out = String::with_capacity(without_links.len());

    for (index, ch) in chars.iter().copied().enumerate() {
        match ch {
            '*' | '`' => continue,
            '_' => {
                let previous_is_word = index
                    .checked_sub(1)
                    .and_then(|value| chars.get(value))
                    .map(|value| value.is_alphanumeric())
                    .unwrap_or(false);
                let next_is_word = chars
                    .get(index + 1)
                    .map(|value| value.is_alphanumeric())
                    .unwrap_or(false);
                if previous_is_word && next_is_word {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    collapse_whitespace(&out)
}

fn strip_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find("](") else {
            break;
        };
        let after_target_open = &after_open[close + 2..];
        let Some(target_close) = after_target_open.find(')') else {
            break;
        };

        out.push_str(&rest[..open]);
        out.push_str(&after_open[..close]);
        rest = &after_target_open[target_close + 1..];
    }

    out.push_str(rest);
    out
}

/// Section keys are lowercase and may be `&`-joined; headings are title case
/// with minor words kept lowercase after the first word.
pub fn format_section_heading(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let words = spaced.split_whitespace().collect::<Vec<&str>>();

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let lowered = word.to_lowercase();
            if index > 0 && MINOR_HEADING_WORDS.contains(&lowered.as_str()) {
                return lowered;
            }

            let mut chars = lowered.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub(super) fn normalize_heading_for_match(label: &str) -> String {
    let plain = strip_inline_markdown(label)
        .to_lowercase()
        .replace(['’', '‘'], "'");
    let kept = plain
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '&' | '/' | '-' | '\'') {
                ch
            } else {
                ' '
            }
        })
        .collect::<String>();

    collapse_whitespace(&kept)
}

pub(super) fn normalize_heading_key(label: &str) -> String {
    let plain = strip_inline_markdown(label);
    let trimmed = plain.trim().trim_end_matches(':').trim();
    collapse_whitespace(trimmed).to_lowercase()
}

/// Trims whitespace and dangling separators left behind after splitting a
/// line into labelled parts.
pub(super) fn trim_separators(input: &str) -> String {
    input
        .trim_matches(|ch: char| {
            ch.is_whitespace() || matches!(ch, '—' | '–' | '-' | ';' | '|' | ',' | ':')
        })
        .to_string()
}

const INLINE_SEPARATORS: [&str; 7] = [" — ", " – ", " | ", " -> ", " → ", "; ", " - "];

/// Splits on the first separator style present in `input`. A spaced hyphen
/// between two amounts (`$500 - $1,000`) is a range, not a separator.
pub(super) fn split_on_separator(input: &str) -> Vec<String> {
    for separator in INLINE_SEPARATORS {
        let positions = input
            .match_indices(separator)
            .map(|(position, _)| position)
            .filter(|position| separator != " - " || !is_amount_range(input, *position))
            .collect::<Vec<usize>>();
        if positions.is_empty() {
            continue;
        }

        let mut parts = Vec::<String>::new();
        let mut start = 0usize;
        for position in positions {
            parts.push(trim_separators(&input[start..position]));
            start = position + separator.len();
        }
        parts.push(trim_separators(&input[start..]));

        return parts.into_iter().filter(|part| !part.is_empty()).collect();
    }

    vec![trim_separators(input)]
}

fn is_amount_range(input: &str, hyphen_position: usize) -> bool {
    let before = input[..hyphen_position].chars().next_back();
    let after = input[hyphen_position + 3..].chars().next();

    let before_is_amount = before
        .map(|ch| ch.is_ascii_digit() || matches!(ch, 'k' | 'K' | '%'))
        .unwrap_or(false);
    let after_is_amount = after
        .map(|ch| ch.is_ascii_digit() || matches!(ch, '$' | '€' | '£'))
        .unwrap_or(false);

    before_is_amount && after_is_amount
}

/// Splits `Label: rest` when the label is short and reads like a label
/// rather than a sentence or a price.
pub(super) fn split_label_colon(input: &str) -> Option<(String, String)> {
    let colon = input.find(':')?;
    let label = input[..colon].trim();
    let rest = input[colon + 1..].trim();

    if label.is_empty()
        || rest.is_empty()
        || label.chars().count() > 60
        || label.contains('$')
        || rest.starts_with("//")
    {
        return None;
    }

    Some((label.to_string(), rest.to_string()))
}

pub(super) fn split_sentences(input: &str) -> Vec<String> {
    let chars = input.chars().collect::<Vec<char>>();
    let mut sentences = Vec::<String>::new();
    let mut current = String::new();

    for (index, ch) in chars.iter().copied().enumerate() {
        current.push(ch);
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }

        let next_is_space = chars
            .get(index + 1)
            .map(|value| value.is_whitespace())
            .unwrap_or(true);
        let following = chars[index + 1..]
            .iter()
            .find(|value| !value.is_whitespace());
        let starts_new = following
            .map(|value| {
                value.is_uppercase() || value.is_ascii_digit() || matches!(*value, '"' | '“' | '*')
            })
            .unwrap_or(true);

        if next_is_space && starts_new {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

pub(super) fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') || trimmed.matches('|').count() >= 2
}

/// Maps each field to a table column. Without a header every field takes its
/// positional fallback. With a header, keyword matches are claimed first and
/// fields left over take the unclaimed columns in field order; a field with
/// no column left stays unmapped.
pub(super) fn resolve_table_columns<const N: usize>(
    header: Option<&[String]>,
    fields: [(&[&str], usize); N],
) -> [Option<usize>; N] {
    let Some(header) = header else {
        return fields.map(|(_, fallback)| Some(fallback));
    };

    let mut claimed = Vec::<usize>::new();
    let mut columns = [None; N];
    for (slot, (keywords, _)) in columns.iter_mut().zip(fields.iter()) {
        let found = header
            .iter()
            .enumerate()
            .filter(|(index, _)| !claimed.contains(index))
            .find(|(_, cell)| {
                let lowered = cell.to_lowercase();
                keywords.iter().any(|keyword| lowered.contains(keyword))
            })
            .map(|(index, _)| index);
        if let Some(index) = found {
            claimed.push(index);
            *slot = Some(index);
        }
    }

    let mut unclaimed = (0..header.len()).filter(|index| !claimed.contains(index));
    for slot in columns.iter_mut().filter(|slot| slot.is_none()) {
        *slot = unclaimed.next();
    }

    columns
}

pub(super) fn table_cell(cells: &[String], column: Option<usize>) -> String {
    column
        .and_then(|index| cells.get(index))
        .cloned()
        .unwrap_or_default()
}
