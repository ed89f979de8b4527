use serde::Serialize;

use crate::report::{ParsedReport, ProfileContext};

#[derive(Debug, Clone, Serialize)]
pub struct ReportSourceInfo {
    pub kind: &'static str,
    pub path: Option<String>,
    pub run_id: Option<String>,
    pub sha256: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: ReportSourceInfo,
    pub profile: ProfileContext,
    pub max_ideas: usize,
    pub report: ParsedReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdeaConformance {
    pub index: u32,
    pub title: String,
    pub recognized_sections: Vec<String>,
    pub unrecognized_sections: Vec<String>,
    pub missing_sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: ReportSourceInfo,
    pub idea_count: usize,
    pub ideas: Vec<IdeaConformance>,
    pub warnings: Vec<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub saved_at: String,
    pub source_path: Option<String>,
    pub report_sha256: String,
    pub idea_count: usize,
}
