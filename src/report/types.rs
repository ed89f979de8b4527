use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Idea {
    pub index: u32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Intro,
    WhyFit,
    ExecutionPath,
    FinancialSnapshot,
    KeyRisks,
    ValidationQuestions,
    CustomerPersona,
    TimelineEffort,
    DecisionChecklist,
    Roadmap,
    Other(String),
}

impl SectionKind {
    /// Classification order matters: earlier kinds win when a heading
    /// contains phrases from several vocabularies.
    pub const KNOWN: [SectionKind; 9] = [
        SectionKind::Roadmap,
        SectionKind::WhyFit,
        SectionKind::ExecutionPath,
        SectionKind::FinancialSnapshot,
        SectionKind::KeyRisks,
        SectionKind::ValidationQuestions,
        SectionKind::CustomerPersona,
        SectionKind::DecisionChecklist,
        SectionKind::TimelineEffort,
    ];

    pub fn key(&self) -> &str {
        match self {
            SectionKind::Intro => "intro",
            SectionKind::WhyFit => "why it fits",
            SectionKind::ExecutionPath => "execution path",
            SectionKind::FinancialSnapshot => "financial snapshot",
            SectionKind::KeyRisks => "key risks & mitigations",
            SectionKind::ValidationQuestions => "validation questions",
            SectionKind::CustomerPersona => "customer persona",
            SectionKind::TimelineEffort => "timeline & effort",
            SectionKind::DecisionChecklist => "decision checklist",
            SectionKind::Roadmap => "90-day roadmap",
            SectionKind::Other(name) => name.as_str(),
        }
    }

    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            SectionKind::WhyFit => &[
                "why it fits",
                "why this fits",
                "why this idea fits",
                "why it's a fit",
                "why it is a fit",
                "why this works",
                "why you",
                "fit for you",
                "personal fit",
            ],
            SectionKind::ExecutionPath => &[
                "execution path",
                "execution plan",
                "execution steps",
                "action plan",
                "action steps",
                "implementation steps",
                "next steps",
                "how to start",
                "getting started",
            ],
            SectionKind::FinancialSnapshot => &[
                "financial snapshot",
                "financial overview",
                "financial outlook",
                "financials",
                "unit economics",
                "revenue model",
                "budget breakdown",
                "startup costs",
            ],
            SectionKind::KeyRisks => &[
                "key risks",
                "risks & mitigations",
                "risks and mitigations",
                "risk register",
                "risk assessment",
                "risks",
                "mitigations",
            ],
            SectionKind::ValidationQuestions => &[
                "validation questions",
                "questions to validate",
                "questions to ask",
                "interview questions",
            ],
            SectionKind::CustomerPersona => &[
                "customer persona",
                "target customer",
                "ideal customer",
                "target audience",
                "persona",
            ],
            SectionKind::TimelineEffort => &[
                "timeline & effort",
                "timeline and effort",
                "time to launch",
                "effort required",
                "timeline",
                "effort",
            ],
            SectionKind::DecisionChecklist => &[
                "decision checklist",
                "decision criteria",
                "go/no-go",
                "go / no-go",
                "checklist",
            ],
            SectionKind::Roadmap => &[
                "90-day roadmap",
                "90 day roadmap",
                "90-day plan",
                "90 day plan",
                "first 90 days",
                "30-60-90",
                "30/60/90",
                "roadmap",
            ],
            SectionKind::Intro | SectionKind::Other(_) => &[],
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, SectionKind::Intro | SectionKind::Other(_))
    }
}

impl Serialize for SectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub kind: SectionKind,
    pub heading: String,
    pub markdown: String,
}

/// Sections of one idea body in first-seen order. The intro entry is always
/// present and always first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMap {
    entries: Vec<SectionEntry>,
}

impl SectionMap {
    pub(crate) fn with_intro(intro: &str) -> Self {
        Self {
            entries: vec![SectionEntry {
                kind: SectionKind::Intro,
                heading: String::new(),
                markdown: intro.to_string(),
            }],
        }
    }

    /// Repeated headings are concatenated into the first entry of that kind.
    pub(crate) fn append(&mut self, kind: SectionKind, heading: &str, markdown: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.kind == kind) {
            if markdown.is_empty() {
                return;
            }
            if !existing.markdown.is_empty() {
                existing.markdown.push_str("\n\n");
            }
            existing.markdown.push_str(markdown);
            return;
        }

        self.entries.push(SectionEntry {
            kind,
            heading: heading.to_string(),
            markdown: markdown.to_string(),
        });
    }

    pub fn intro(&self) -> &str {
        self.get(&SectionKind::Intro).unwrap_or("")
    }

    pub fn get(&self, kind: &SectionKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| &entry.kind == kind)
            .map(|entry| entry.markdown.as_str())
    }

    pub fn get_key(&self, key: &str) -> Option<&str> {
        let wanted = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.kind.key() == wanted)
            .map(|entry| entry.markdown.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.kind.key()).collect()
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn recognized_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind.is_recognized())
            .count()
    }

    pub fn others(&self) -> impl Iterator<Item = &SectionEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.kind, SectionKind::Other(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Report,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction<T> {
    pub items: Vec<T>,
    pub source: ContentSource,
}

impl<T> Extraction<T> {
    pub(crate) fn from_report(items: Vec<T>) -> Self {
        Self {
            items,
            source: ContentSource::Report,
        }
    }

    pub(crate) fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            source: ContentSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhyFit {
    pub hero_statement: Option<String>,
    pub points: Vec<String>,
    pub detail: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseName {
    Validate,
    Build,
    Launch,
    Scale,
}

impl PhaseName {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::Validate => "Validate",
            PhaseName::Build => "Build",
            PhaseName::Launch => "Launch",
            PhaseName::Scale => "Scale",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPhase {
    pub name: PhaseName,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSnapshotRow {
    pub focus: String,
    pub estimate: String,
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskRow {
    pub risk: String,
    pub severity: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationQuestion {
    pub question: String,
    #[serde(rename = "listenFor")]
    pub listen_for: String,
    #[serde(rename = "actOn")]
    pub act_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineWindow {
    pub label: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionalInsight {
    pub key: String,
    pub heading: String,
    pub markdown: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileContext {
    #[serde(alias = "goalType", skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(alias = "timeCommitment", skip_serializing_if = "Option::is_none")]
    pub time_commitment: Option<String>,
    #[serde(alias = "budgetRange", skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(alias = "workStyle", skip_serializing_if = "Option::is_none")]
    pub work_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(alias = "focusArea", skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

impl ProfileContext {
    /// Fields set on `overrides` replace the current values.
    pub fn merge(&mut self, overrides: ProfileContext) {
        fn take(target: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
                *target = Some(value);
            }
        }

        take(&mut self.goal_type, overrides.goal_type);
        take(&mut self.time_commitment, overrides.time_commitment);
        take(&mut self.budget_range, overrides.budget_range);
        take(&mut self.work_style, overrides.work_style);
        take(&mut self.skill, overrides.skill);
        take(&mut self.focus_area, overrides.focus_area);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIdea {
    pub index: u32,
    pub title: String,
    pub why_fit: WhyFit,
    pub execution_steps: Extraction<String>,
    pub execution_phases: Vec<ExecutionPhase>,
    pub financial_snapshots: Extraction<FinancialSnapshotRow>,
    pub risks: Vec<RiskRow>,
    pub validation_questions: Extraction<ValidationQuestion>,
    pub customer_persona: Option<String>,
    pub timeline_effort: Option<String>,
    pub decision_checklist: Vec<String>,
    pub roadmap: Vec<TimelineWindow>,
    pub additional_insights: Vec<AdditionalInsight>,
    pub section_keys: Vec<String>,
    pub fallback_sections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedReport {
    pub idea_count: usize,
    pub ideas: Vec<ParsedIdea>,
    pub warnings: Vec<String>,
}
