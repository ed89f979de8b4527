use tracing::debug;

use super::normalize::{
    dedupe_key, resolve_table_columns, split_label_colon, split_on_separator,
    strip_inline_markdown, table_cell,
};
use super::parser::ReportParser;
use super::personalize::TemplateValues;
use super::types::{Extraction, FinancialSnapshotRow};

/// `(focus, estimate, metric)` templates; every estimate names the budget.
pub(super) const FINANCIAL_FALLBACK_TEMPLATES: [(&str, &str, &str); 3] = [
    (
        "Validation spend",
        "A small slice of {budget_range} for landing pages and interviews",
        "Cost per qualified conversation about {idea_title}",
    ),
    (
        "First version",
        "Keep the build within {budget_range}",
        "Time to first paying customer",
    ),
    (
        "Monthly runway",
        "Plan recurring costs against {budget_range}",
        "Monthly revenue compared with monthly spend",
    ),
];

const FOCUS_COLUMN_KEYWORDS: &[&str] = &["focus", "item", "category", "area", "line", "driver"];
const ESTIMATE_COLUMN_KEYWORDS: &[&str] = &["estimate", "amount", "cost", "range", "budget", "value"];
const METRIC_COLUMN_KEYWORDS: &[&str] = &["metric", "kpi", "measure", "target", "signal", "note"];

impl ReportParser {
    pub fn build_financial_snapshots(
        &self,
        section: Option<&str>,
        idea_title: &str,
        budget_range: Option<&str>,
    ) -> Extraction<FinancialSnapshotRow> {
        let rows = section
            .map(|markdown| self.parse_financial_rows(markdown))
            .unwrap_or_default();
        if !rows.is_empty() {
            return Extraction::from_report(rows);
        }

        debug!(idea = idea_title, "financial snapshot missing, using fallback rows");
        let mut values = TemplateValues::new();
        values.insert(
            "idea_title",
            non_blank(Some(idea_title)).unwrap_or("this idea").to_string(),
        );
        values.insert(
            "budget_range",
            non_blank(budget_range)
                .unwrap_or("your stated budget")
                .to_string(),
        );

        Extraction::fallback(
            FINANCIAL_FALLBACK_TEMPLATES
                .iter()
                .map(|(focus, estimate, metric)| FinancialSnapshotRow {
                    focus: self.render_fallback(focus, &values),
                    estimate: self.render_fallback(estimate, &values),
                    metric: self.render_fallback(metric, &values),
                })
                .collect(),
        )
    }

    fn parse_financial_rows(&self, markdown: &str) -> Vec<FinancialSnapshotRow> {
        let rows = match self.parse_markdown_table(markdown) {
            Some(table) => {
                let header = table.header.as_deref();
                let [focus, estimate, metric] = resolve_table_columns(
                    header,
                    [
                        (FOCUS_COLUMN_KEYWORDS, 0),
                        (ESTIMATE_COLUMN_KEYWORDS, 1),
                        (METRIC_COLUMN_KEYWORDS, 2),
                    ],
                );

                table
                    .rows
                    .iter()
                    .map(|cells| FinancialSnapshotRow {
                        focus: table_cell(cells, focus),
                        estimate: table_cell(cells, estimate),
                        metric: table_cell(cells, metric),
                    })
                    .collect::<Vec<FinancialSnapshotRow>>()
            }
            None => self
                .parse_top_level_items(markdown)
                .iter()
                .filter_map(|item| self.financial_row_from_item(&item.text))
                .collect(),
        };

        let mut seen = Vec::<String>::new();
        rows.into_iter()
            .filter(|row| !row.focus.is_empty() || !row.estimate.is_empty())
            .filter(|row| {
                let key = dedupe_key(&format!("{}|{}|{}", row.focus, row.estimate, row.metric));
                if seen.contains(&key) {
                    return false;
                }
                seen.push(key);
                true
            })
            .collect()
    }

    /// Reads `Focus: estimate - metric`, labelled `Estimate:`/`Metric:`
    /// fields, or a separator-delimited line.
    fn financial_row_from_item(&self, text: &str) -> Option<FinancialSnapshotRow> {
        let plain = strip_inline_markdown(text);
        if plain.is_empty() {
            return None;
        }

        let labeled = self.split_labeled_fields(&plain);
        if labeled.has_any(&["estimate", "metric", "kpi"]) {
            let (focus, lead_rest) = split_label_colon(&labeled.lead)
                .unwrap_or_else(|| (labeled.lead.clone(), String::new()));
            return Some(FinancialSnapshotRow {
                focus,
                estimate: labeled
                    .field(&["estimate"])
                    .map(ToOwned::to_owned)
                    .unwrap_or(lead_rest),
                metric: labeled.field(&["metric", "kpi"]).unwrap_or("").to_string(),
            });
        }

        let (focus, remainder) = match split_label_colon(&plain) {
            Some((label, rest)) => (label, split_on_separator(&rest)),
            None => {
                let mut parts = split_on_separator(&plain);
                let focus = if parts.is_empty() {
                    String::new()
                } else {
                    parts.remove(0)
                };
                (focus, parts)
            }
        };

        let mut parts = remainder.into_iter();
        let estimate = parts.next().unwrap_or_default();
        let metric = parts.collect::<Vec<String>>().join(" — ");

        Some(FinancialSnapshotRow {
            focus,
            estimate,
            metric,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
