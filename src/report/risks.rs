use super::normalize::{
    collapse_whitespace, resolve_table_columns, split_label_colon, split_on_separator,
    strip_inline_markdown, table_cell, trim_separators,
};
use super::parser::ReportParser;
use super::types::RiskRow;

const RISK_LABELS: [&str; 1] = ["risk"];
const SEVERITY_LABELS: [&str; 3] = ["severity", "impact", "likelihood"];
const MITIGATION_LABELS: [&str; 4] = ["mitigation", "mitigate", "response", "action"];

const RISK_COLUMN_KEYWORDS: &[&str] = &["risk"];
const SEVERITY_COLUMN_KEYWORDS: &[&str] = &["severity", "impact", "likelihood", "level", "rating"];
const MITIGATION_COLUMN_KEYWORDS: &[&str] = &["mitigation", "response", "plan", "how", "action"];

impl ReportParser {
    /// Risk register rows in source order. Severity is kept as written.
    pub fn parse_risk_rows(&self, markdown: &str) -> Vec<RiskRow> {
        if markdown.trim().is_empty() {
            return Vec::new();
        }

        match self.parse_markdown_table(markdown) {
            Some(table) => {
                let header = table.header.as_deref();
                let [risk, mitigation, severity] = resolve_table_columns(
                    header,
                    [
                        (RISK_COLUMN_KEYWORDS, 0),
                        (MITIGATION_COLUMN_KEYWORDS, 2),
                        (SEVERITY_COLUMN_KEYWORDS, 1),
                    ],
                );

                table
                    .rows
                    .iter()
                    .map(|cells| {
                        if cells.len() == 2 && header.is_none() {
                            return RiskRow {
                                risk: cells[0].clone(),
                                severity: String::new(),
                                mitigation: cells[1].clone(),
                            };
                        }
                        RiskRow {
                            risk: table_cell(cells, risk),
                            severity: table_cell(cells, severity),
                            mitigation: table_cell(cells, mitigation),
                        }
                    })
                    .filter(|row| !row.risk.is_empty())
                    .collect()
            }
            None => self.parse_risk_items(markdown),
        }
    }

    fn parse_risk_items(&self, markdown: &str) -> Vec<RiskRow> {
        let items = self.parse_list_items(&self.clean_narrative_markdown(markdown));
        let Some(shallowest) = items.iter().map(|item| item.depth).min() else {
            return Vec::new();
        };

        let mut rows = Vec::<RiskRow>::new();
        for item in items {
            let row = self.risk_row_from_item(&item.text);
            let is_detail = item.depth > shallowest
                || (row.risk.is_empty() && (!row.mitigation.is_empty() || !row.severity.is_empty()));

            match rows.last_mut() {
                Some(previous) if is_detail => merge_risk_detail(previous, row, &item.text),
                _ if row.risk.is_empty() => {}
                _ => rows.push(row),
            }
        }

        rows
    }

    fn risk_row_from_item(&self, text: &str) -> RiskRow {
        let plain = strip_inline_markdown(text);
        let labeled = self.split_labeled_fields(&plain);

        let mut risk = labeled
            .field(&RISK_LABELS)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| labeled.lead.clone());
        let mut severity = labeled
            .field(&SEVERITY_LABELS)
            .unwrap_or("")
            .to_string();
        let mut mitigation = labeled
            .field(&MITIGATION_LABELS)
            .unwrap_or("")
            .to_string();

        if severity.is_empty()
            && let Some(captures) = self.severity_paren.captures(&risk)
        {
            severity = captures
                .name("severity")
                .map(|value| value.as_str().to_string())
                .unwrap_or_default();
            let whole = captures.get(0).map(|value| value.range()).unwrap_or(0..0);
            let mut without = risk.clone();
            without.replace_range(whole, "");
            risk = self
                .space_before_punctuation
                .replace_all(&collapse_whitespace(&without), "$punct")
                .to_string();
        }

        if mitigation.is_empty() {
            let parts = split_on_separator(&risk);
            if parts.len() > 1 {
                risk = parts[0].clone();
                mitigation = parts[1..].join(" — ");
            } else if let Some((label, rest)) = split_label_colon(&risk) {
                risk = label;
                mitigation = rest;
            }
        }

        RiskRow {
            risk: trim_separators(&risk),
            severity: trim_separators(&severity),
            mitigation: trim_separators(&mitigation),
        }
    }
}

/// Folds a nested or label-only bullet into the risk above it.
fn merge_risk_detail(previous: &mut RiskRow, detail: RiskRow, raw_text: &str) {
    let detail_has_severity = !detail.severity.is_empty();
    if previous.severity.is_empty() && detail_has_severity {
        previous.severity = detail.severity;
    }

    let addition = if detail.mitigation.is_empty() && !detail_has_severity {
        strip_inline_markdown(raw_text)
    } else if detail.risk.is_empty() {
        detail.mitigation
    } else if detail.mitigation.is_empty() {
        detail.risk
    } else {
        format!("{}: {}", detail.risk, detail.mitigation)
    };
    if addition.is_empty() {
        return;
    }

    if previous.mitigation.is_empty() {
        previous.mitigation = addition;
    } else {
        previous.mitigation.push_str("; ");
        previous.mitigation.push_str(&addition);
    }
}
