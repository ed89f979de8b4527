use anyhow::{Context, Result};
use regex::Regex;

/// Compiled patterns shared by every stage of report parsing. Build once per
/// command and reuse; all parsing methods take `&self` and are pure.
#[derive(Debug)]
pub struct ReportParser {
    pub(super) idea_markdown_heading: Regex,
    pub(super) idea_bold_heading: Regex,
    pub(super) idea_keyword_label: Regex,
    pub(super) idea_numbered_label: Regex,
    pub(super) section_markdown_heading: Regex,
    pub(super) section_bold_label: Regex,
    pub(super) list_item: Regex,
    pub(super) table_separator: Regex,
    pub(super) task_box: Regex,
    pub(super) step_label: Regex,
    pub(super) labeled_field: Regex,
    pub(super) severity_paren: Regex,
    pub(super) placeholder: Regex,
    pub(super) run_of_spaces: Regex,
    pub(super) space_before_punctuation: Regex,
    pub(super) day_range: Regex,
    pub(super) day_range_suffix: Regex,
    pub(super) week_range: Regex,
    pub(super) month_label: Regex,
    pub(super) ordinal_window: Regex,
}

impl ReportParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            idea_markdown_heading: Regex::new(r"^\s{0,3}(?P<hashes>#{1,4})\s*(?P<text>[^#\s].*?)\s*#*\s*$")
                .context("failed to compile idea markdown heading regex")?,
            idea_bold_heading: Regex::new(r"^\s*(?:\*\*|__)(?P<inner>[^*_]+?)(?:\*\*|__)\s*(?P<tail>.*)$")
                .context("failed to compile idea bold heading regex")?,
            idea_keyword_label: Regex::new(
                r"(?i)^(?:(?:top|business|startup)\s+)?(?:(?:idea|recommendation|opportunity|option)\s*#?\s*(?P<number>\d{1,3})|(?P<ordinal>first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\s+(?:idea|recommendation|opportunity|option))\b\s*[:.)\-–—]?\s*(?P<title>.*)$",
            )
            .context("failed to compile idea keyword label regex")?,
            idea_numbered_label: Regex::new(r"^#?(?P<number>\d{1,3})\s*[.):\-–—]\s*(?P<title>\S.*)$")
                .context("failed to compile idea numbered label regex")?,
            section_markdown_heading: Regex::new(r"^\s{0,3}#{1,6}\s+(?P<label>.+?)\s*#*\s*$")
                .context("failed to compile section markdown heading regex")?,
            section_bold_label: Regex::new(
                r"^\s*(?:\*\*|__)(?P<label>[^*_]+?)(?:\*\*|__)(?P<colon>\s*:)?\s*(?P<rest>.*)$",
            )
            .context("failed to compile section bold label regex")?,
            list_item: Regex::new(
                r"^(?P<indent>[ \t]*)(?P<marker>[-*•+]|\d{1,3}[.)]|[a-z][.)])\s+(?P<body>\S.*)$",
            )
            .context("failed to compile list item regex")?,
            table_separator: Regex::new(r"^\s*\|?\s*:?-{2,}:?\s*(?:\|\s*:?-{2,}:?\s*)*\|?\s*$")
                .context("failed to compile table separator regex")?,
            task_box: Regex::new(r"^\[(?: |x|X)\]\s*").context("failed to compile task box regex")?,
            step_label: Regex::new(r"(?i)^(?:step|phase|stage)\s*\d{1,2}\s*[:.)\-–—]\s*")
                .context("failed to compile step label regex")?,
            labeled_field: Regex::new(
                r"(?i)\b(?P<label>severity|impact|likelihood|mitigation|mitigate|response|risk|what to listen for|listen for|signal|act on|how to act|next step|action|estimate|metric|kpi|question)\s*:\s*",
            )
            .context("failed to compile labeled field regex")?,
            severity_paren: Regex::new(
                r"(?i)\(\s*(?P<severity>(?:very\s+)?(?:low|medium|moderate|high|critical|severe)(?:\s*(?:/|-|to)\s*(?:low|medium|moderate|high|critical|severe))?(?:\s+(?:severity|risk|impact|likelihood))?)\s*\)",
            )
            .context("failed to compile severity regex")?,
            placeholder: Regex::new(
                r"\{\{\{\s*(?P<triple>[A-Za-z][A-Za-z0-9_]*)\s*\}\}\}|\{\{\s*(?P<double>[A-Za-z][A-Za-z0-9_]*)\s*\}\}|\{\s*(?P<single>[A-Za-z][A-Za-z0-9_]*)\s*\}",
            )
            .context("failed to compile placeholder regex")?,
            run_of_spaces: Regex::new(r"(?P<lead>\S)[ \t]{2,}")
                .context("failed to compile whitespace run regex")?,
            space_before_punctuation: Regex::new(r"[ \t]+(?P<punct>[.,;:!?])")
                .context("failed to compile punctuation spacing regex")?,
            day_range: Regex::new(
                r"(?i)\bdays?\s*(?P<start>\d{1,3})(?:\s*(?:-|–|—|to|through)\s*(?P<end>\d{1,3}))?",
            )
            .context("failed to compile day range regex")?,
            day_range_suffix: Regex::new(
                r"(?i)\b(?P<start>\d{1,3})\s*(?:-|–|—|to)\s*(?P<end>\d{1,3})\s*days?\b",
            )
            .context("failed to compile day range suffix regex")?,
            week_range: Regex::new(
                r"(?i)\bweeks?\s*(?P<start>\d{1,2})(?:\s*(?:-|–|—|to|through)\s*(?P<end>\d{1,2}))?",
            )
            .context("failed to compile week range regex")?,
            month_label: Regex::new(r"(?i)\bmonth\s*(?P<month>\d{1,2})\b")
                .context("failed to compile month label regex")?,
            ordinal_window: Regex::new(
                r"(?i)\b(?P<which>first|next|second|middle|final|last|third)\s+30\s+days\b",
            )
            .context("failed to compile ordinal window regex")?,
        })
    }
}
