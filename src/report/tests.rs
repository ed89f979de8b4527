use super::execution::{EXECUTION_STEP_TEMPLATES, MAX_EXECUTION_STEPS, group_execution_phases};
use super::financial::FINANCIAL_FALLBACK_TEMPLATES;
use super::normalize::{dedupe_strings, format_section_heading, strip_inline_markdown};
use super::personalize::template_values;
use super::questions::QUESTION_FALLBACK_TEMPLATES;
use super::sections::classify_section_heading;
use super::*;

fn parser() -> ReportParser {
    ReportParser::new().expect("report patterns should compile")
}

fn profile() -> ProfileContext {
    ProfileContext {
        goal_type: Some("side income".to_string()),
        time_commitment: Some("10 hours a week".to_string()),
        budget_range: Some("$1,000–$5,000".to_string()),
        work_style: Some("async".to_string()),
        skill: Some("design".to_string()),
        focus_area: Some("pet care".to_string()),
    }
}

const SAMPLE_REPORT: &str = "# Your Personalized Recommendations

Here are the ideas that best match your profile.

## Idea 1: Pet Sitting App

A booking app for trusted neighbourhood pet sitters.

### Why It Fits
- You already care for **three dogs** on weekends
- Your design skill makes the booking flow stand out

### Execution Path
1. Step 1: Interview 10 pet owners
2. **Step 2:** Build a clickable prototype
3. Recruit five sitters

### Key Risks & Mitigations
| Risk | Severity | Mitigation |
|------|----------|------------|
| Low trust | High | Background checks |
| Seasonal demand | Medium | Offer boarding bundles |

**Customer Persona:** Busy professionals with one or two pets.

### Decision Checklist
- [ ] Ten owner interviews done
- [x] Budget confirmed

### 90-Day Roadmap
#### Days 0-30
- Validate demand with {focus_area} owners
#### Days 31-60
- Launch a paid pilot
#### Days 61-90
- Expand to a second neighbourhood

### Go-To-Market Notes
Partner with local vets.

## Idea 2: Meal Prep Delivery

Weekly meal prep for busy families.

**Financial Snapshot:**
| Focus | Estimate | Metric |
|---|---|---|
| Kitchen rental | $400/month | Meals per hour |

### Validation Questions
- How much do you spend on takeout each week? Listen for: exact amounts. Act on: set price under that.
- Would you pre-pay for a month?
  - Willingness to commit
  - Offer a founding-member discount
";

#[test]
fn parse_top_ideas_returns_min_of_found_and_max_in_index_order() {
    let parser = parser();
    let report = "## Idea 1: Alpha\nbody a\n## Idea 2: Beta\nbody b\n## Idea 3: Gamma\nbody c\n";

    let all = parser.parse_top_ideas(report, 10);
    assert_eq!(all.len(), 3);
    assert_eq!(
        all.iter().map(|idea| idea.index).collect::<Vec<u32>>(),
        vec![1, 2, 3]
    );

    let limited = parser.parse_top_ideas(report, 2);
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[1].title, "Beta");
    assert_eq!(limited[1].body, "body b\n");
}

#[test]
fn parse_top_ideas_returns_empty_without_idea_headings() {
    let parser = parser();
    assert!(parser.parse_top_ideas("Just a paragraph.\n\n- a bullet\n", 10).is_empty());
    assert!(parser.parse_top_ideas("", 10).is_empty());
    assert!(parser.parse_top_ideas("## Idea 1: Alpha\n", 0).is_empty());
}

#[test]
fn parse_top_ideas_accepts_bold_and_ordinal_headings() {
    let parser = parser();

    let bold = parser.parse_top_ideas("**Idea 2 - Tutoring**\nTeach maths online.\n", 10);
    assert_eq!(bold.len(), 1);
    assert_eq!(bold[0].index, 2);
    assert_eq!(bold[0].title, "Tutoring");

    let ordinal = parser.parse_top_ideas("### First Idea: Candle Shop\nHand-poured candles.\n", 10);
    assert_eq!(ordinal.len(), 1);
    assert_eq!(ordinal[0].index, 1);
    assert_eq!(ordinal[0].title, "Candle Shop");
}

#[test]
fn parse_top_ideas_accepts_option_headings() {
    let parser = parser();

    let ideas = parser.parse_top_ideas(
        "### Option 1. Pet Sitting App\n- a\n### Option 2. Dog Walking\n- b\n",
        10,
    );
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].index, 1);
    assert_eq!(ideas[0].title, "Pet Sitting App");
    assert_eq!(ideas[1].index, 2);
    assert_eq!(ideas[1].title, "Dog Walking");
    assert!(ideas[1].body.contains("- b"));
}

#[test]
fn numbered_headings_only_split_at_the_shallowest_level() {
    let parser = parser();
    let report = "## 1. Dog Walking\n### 1. Validate\nTalk to owners.\n## 2. Meal Prep\nCook.\n";

    let ideas = parser.parse_top_ideas(report, 10);
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].title, "Dog Walking");
    assert!(ideas[0].body.contains("### 1. Validate"));
    assert_eq!(ideas[1].index, 2);
}

#[test]
fn idea_headings_inside_code_fences_are_ignored() {
    let parser = parser();
    let report = "## Idea 1: Real\ntext\n```\n## Idea 2: Example\n```\n";

    let ideas = parser.parse_top_ideas(report, 10);
    assert_eq!(ideas.len(), 1);
    assert!(ideas[0].body.contains("## Idea 2: Example"));
}

#[test]
fn intro_is_everything_before_the_first_heading() {
    let parser = parser();
    let body = "Intro line one.\n\nMore intro.\n### Why It Fits\n- You like dogs\n";

    let sections = parser.split_idea_sections(body);
    assert_eq!(sections.intro(), "Intro line one.\n\nMore intro.\n");
    assert_eq!(sections.get(&SectionKind::WhyFit), Some("- You like dogs"));
}

#[test]
fn body_without_headings_is_all_intro() {
    let parser = parser();
    let sections = parser.split_idea_sections("  Only prose here.\n");

    assert_eq!(sections.intro(), "  Only prose here.\n");
    assert_eq!(sections.keys(), vec!["intro"]);
    assert_eq!(sections.recognized_count(), 0);
}

#[test]
fn duplicate_headings_are_concatenated_in_first_position() {
    let parser = parser();
    let body = "### Key Risks\n- Low demand\n### Notes\nKeep costs low.\n### Risks\n- Burnout\n";

    let sections = parser.split_idea_sections(body);
    assert_eq!(
        sections.keys(),
        vec!["intro", "key risks & mitigations", "notes"]
    );
    assert_eq!(
        sections.get(&SectionKind::KeyRisks),
        Some("- Low demand\n\n- Burnout")
    );
}

#[test]
fn bold_lead_in_keeps_inline_text_as_first_line() {
    let parser = parser();
    let body = "**Customer Persona:** Busy parents who travel.\nThey book last minute.\n**Tip:** keep it small\n";

    let sections = parser.split_idea_sections(body);
    assert_eq!(
        sections.get(&SectionKind::CustomerPersona),
        Some("Busy parents who travel.\nThey book last minute.\n**Tip:** keep it small")
    );
}

#[test]
fn substructure_headings_stay_inside_their_section() {
    let parser = parser();
    let body = "### 90-Day Roadmap\n#### Week 1\nInterview owners\n**Phase 2:**\nBuild\n";

    let sections = parser.split_idea_sections(body);
    assert_eq!(sections.keys(), vec!["intro", "90-day roadmap"]);
    assert_eq!(
        sections.get_key("90-day roadmap"),
        Some("#### Week 1\nInterview owners\n**Phase 2:**\nBuild")
    );
}

#[test]
fn classify_section_heading_maps_phrases_to_kinds() {
    assert_eq!(
        classify_section_heading("Key Risks & Mitigations"),
        SectionKind::KeyRisks
    );
    assert_eq!(classify_section_heading("**Why This Fits You**"), SectionKind::WhyFit);
    assert_eq!(classify_section_heading("90-Day Roadmap"), SectionKind::Roadmap);
    assert_eq!(
        classify_section_heading("Timeline & Effort:"),
        SectionKind::TimelineEffort
    );
    assert_eq!(
        classify_section_heading("Go-To-Market"),
        SectionKind::Other("go-to-market".to_string())
    );
}

#[test]
fn pet_sitting_end_to_end() {
    let parser = parser();
    let markdown = "### Idea 1: Pet Sitting App\n**Execution Path:**\n- Step one\n- Step two\n";

    let ideas = parser.parse_top_ideas(markdown, 10);
    assert_eq!(ideas.len(), 1);
    assert!(ideas[0].title.contains("Pet Sitting App"));

    let sections = parser.split_idea_sections(&ideas[0].body);
    let execution = sections.get_key("execution path");
    assert!(execution.is_some());

    let steps = parser.build_execution_steps(execution, &ideas[0].title, &ProfileContext::default());
    assert_eq!(steps.items, vec!["Step one".to_string(), "Step two".to_string()]);
    assert_eq!(steps.source, ContentSource::Report);
}

#[test]
fn dedupe_strings_ignores_case_and_whitespace() {
    assert_eq!(dedupe_strings(&["Do X", "do x", "Do X "]), vec!["Do X".to_string()]);
    assert_eq!(
        dedupe_strings(&["  ", "A  b", "a b", "c"]),
        vec!["A  b".to_string(), "c".to_string()]
    );
}

#[test]
fn execution_steps_strip_step_labels_and_cap_at_ten() {
    let parser = parser();
    let section = "1. Step 1: Interview owners\n2. **Step 2:** Build a landing page\n3. interview owners";

    let steps = parser.build_execution_steps(Some(section), "Pets", &ProfileContext::default());
    assert_eq!(
        steps.items,
        vec!["Interview owners".to_string(), "Build a landing page".to_string()]
    );

    let long = (1..=12)
        .map(|number| format!("- Task number {number}"))
        .collect::<Vec<String>>()
        .join("\n");
    let capped = parser.build_execution_steps(Some(&long), "Pets", &ProfileContext::default());
    assert_eq!(capped.items.len(), MAX_EXECUTION_STEPS);
    assert_eq!(capped.items[9], "Task number 10");
}

#[test]
fn execution_steps_fall_back_to_personalized_templates() {
    let parser = parser();
    let steps = parser.build_execution_steps(None, "Pet Sitting App", &profile());

    assert!(steps.is_fallback());
    assert_eq!(steps.items.len(), EXECUTION_STEP_TEMPLATES.len());
    assert!(steps.items[0].contains("Pet Sitting App"));
    assert!(steps.items.iter().any(|step| step.contains("10 hours a week")));
    assert!(steps.items.iter().all(|step| !step.contains('{')));
}

#[test]
fn execution_phases_follow_fixed_slices() {
    let steps = (1..=7)
        .map(|number| format!("Step {number}"))
        .collect::<Vec<String>>();

    let phases = group_execution_phases(&steps);
    assert_eq!(
        phases.iter().map(|phase| phase.name).collect::<Vec<PhaseName>>(),
        vec![PhaseName::Validate, PhaseName::Build, PhaseName::Launch]
    );
    assert_eq!(phases[0].steps.len(), 3);
    assert_eq!(phases[2].steps, vec!["Step 7".to_string()]);
    assert!(group_execution_phases(&[]).is_empty());
}

#[test]
fn financial_fallback_references_budget_range() {
    let parser = parser();
    let snapshots = parser.build_financial_snapshots(None, "Pet Sitting App", Some("$1,000–$5,000"));

    assert!(snapshots.is_fallback());
    assert!(!snapshots.items.is_empty());
    for row in &snapshots.items {
        assert!(row.estimate.contains("$1,000–$5,000"), "{}", row.estimate);
        assert!(!row.estimate.contains('{'));
    }

    let neutral = parser.build_financial_snapshots(Some("   "), "Pet Sitting App", None);
    assert!(neutral.items.iter().all(|row| row.estimate.contains("your stated budget")));
}

#[test]
fn financial_rows_parse_tables_and_bullets() {
    let parser = parser();

    let table = "| Focus | Estimate | Metric |\n|---|---|---|\n| Launch ads | $500 | CPA under $20 |";
    let rows = parser.build_financial_snapshots(Some(table), "Pets", None);
    assert_eq!(rows.source, ContentSource::Report);
    assert_eq!(
        rows.items,
        vec![FinancialSnapshotRow {
            focus: "Launch ads".to_string(),
            estimate: "$500".to_string(),
            metric: "CPA under $20".to_string(),
        }]
    );

    let bullets = "- **Marketing:** $500 - $1,000 — cost per signup under $5";
    let rows = parser.build_financial_snapshots(Some(bullets), "Pets", None);
    assert_eq!(
        rows.items,
        vec![FinancialSnapshotRow {
            focus: "Marketing".to_string(),
            estimate: "$500 - $1,000".to_string(),
            metric: "cost per signup under $5".to_string(),
        }]
    );
}

#[test]
fn risk_table_rows_keep_source_order() {
    let parser = parser();
    let table = "| Risk | Severity | Mitigation |\n\
                 |------|----------|------------|\n\
                 | Low demand | High | Pre-sell |\n\
                 | Churn | Medium | Onboarding calls |\n\
                 | Burnout | Low | Fixed hours |\n";

    let rows = parser.parse_risk_rows(table);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows.iter().map(|row| row.risk.as_str()).collect::<Vec<&str>>(),
        vec!["Low demand", "Churn", "Burnout"]
    );
    assert_eq!(rows[1].severity, "Medium");
    assert_eq!(rows[2].mitigation, "Fixed hours");
}

#[test]
fn risk_bullets_read_severity_and_nested_mitigations() {
    let parser = parser();
    let section = "- Low demand (High): run pre-sales\n\
                   - Competition — differentiate on service\n  \
                   - Mitigation: loyalty discounts\n";

    let rows = parser.parse_risk_rows(section);
    assert_eq!(
        rows,
        vec![
            RiskRow {
                risk: "Low demand".to_string(),
                severity: "High".to_string(),
                mitigation: "run pre-sales".to_string(),
            },
            RiskRow {
                risk: "Competition".to_string(),
                severity: String::new(),
                mitigation: "differentiate on service; loyalty discounts".to_string(),
            },
        ]
    );
    assert!(parser.parse_risk_rows("").is_empty());
}

#[test]
fn nested_severity_bullet_sets_severity_without_mitigation() {
    let parser = parser();

    let rows = parser.parse_risk_rows("- Churn\n  - Severity: High\n");
    assert_eq!(
        rows,
        vec![RiskRow {
            risk: "Churn".to_string(),
            severity: "High".to_string(),
            mitigation: String::new(),
        }]
    );
}

#[test]
fn headered_tables_leave_absent_columns_empty() {
    let parser = parser();

    let risks = parser.parse_risk_rows("| Risk | Mitigation |\n|---|---|\n| Low demand | Run a pilot first |\n");
    assert_eq!(
        risks,
        vec![RiskRow {
            risk: "Low demand".to_string(),
            severity: String::new(),
            mitigation: "Run a pilot first".to_string(),
        }]
    );

    let financial = parser.build_financial_snapshots(
        Some("| Focus | Metric |\n|---|---|\n| Launch ads | CPA under $20 |\n"),
        "Pets",
        None,
    );
    assert_eq!(
        financial.items,
        vec![FinancialSnapshotRow {
            focus: "Launch ads".to_string(),
            estimate: String::new(),
            metric: "CPA under $20".to_string(),
        }]
    );

    let questions = parser.build_validation_questions(
        Some("| Question | Act on |\n|---|---|\n| Would you pay monthly? | Offer a subscription |\n"),
        "Pets",
        None,
        None,
    );
    assert_eq!(
        questions.items,
        vec![ValidationQuestion {
            question: "Would you pay monthly?".to_string(),
            listen_for: String::new(),
            act_on: "Offer a subscription".to_string(),
        }]
    );
}

#[test]
fn unlabelled_header_columns_fill_remaining_fields() {
    let parser = parser();

    let rows = parser.parse_risk_rows("| Risk | Level | Fix |\n|---|---|---|\n| Churn | High | Loyalty perks |\n");
    assert_eq!(
        rows,
        vec![RiskRow {
            risk: "Churn".to_string(),
            severity: "High".to_string(),
            mitigation: "Loyalty perks".to_string(),
        }]
    );
}

#[test]
fn validation_questions_read_inline_and_nested_answers() {
    let parser = parser();
    let section = "- What do you pay today? Listen for: named tools. Act on: price below them.\n\
                   - Would you switch?\n  \
                   - Specific triggers\n  \
                   - Build the trigger first\n";

    let questions = parser.build_validation_questions(Some(section), "Pets", None, None);
    assert_eq!(questions.source, ContentSource::Report);
    assert_eq!(
        questions.items,
        vec![
            ValidationQuestion {
                question: "What do you pay today?".to_string(),
                listen_for: "named tools.".to_string(),
                act_on: "price below them.".to_string(),
            },
            ValidationQuestion {
                question: "Would you switch?".to_string(),
                listen_for: "Specific triggers".to_string(),
                act_on: "Build the trigger first".to_string(),
            },
        ]
    );
}

#[test]
fn validation_questions_fall_back_with_profile_values() {
    let parser = parser();
    let questions =
        parser.build_validation_questions(None, "Pet Sitting App", Some("pet care"), None);

    assert!(questions.is_fallback());
    assert_eq!(questions.items.len(), QUESTION_FALLBACK_TEMPLATES.len());
    assert!(questions.items[0].question.contains("the pet care market"));
    assert!(questions.items[2].act_on.contains("your primary goal"));
}

#[test]
fn why_fit_prefers_list_items_and_keeps_markdown_detail() {
    let parser = parser();
    let why_fit = parser.extract_why_fit("- You run a **dog-walking** gig\n- Owners trust you\n- owners trust you");

    assert_eq!(why_fit.hero_statement.as_deref(), Some("You run a dog-walking gig"));
    assert_eq!(why_fit.points.len(), 2);
    assert_eq!(why_fit.detail[0], "You run a **dog-walking** gig");
}

#[test]
fn why_fit_splits_paragraph_sentences() {
    let parser = parser();
    let why_fit = parser.extract_why_fit("You already walk dogs. Pet owners trust you.\n\nIt suits your schedule.");

    assert_eq!(
        why_fit.points,
        vec![
            "You already walk dogs.".to_string(),
            "Pet owners trust you.".to_string(),
            "It suits your schedule.".to_string(),
        ]
    );
    assert!(parser.extract_why_fit("").hero_statement.is_none());
}

#[test]
fn clean_narrative_markdown_preserves_list_items() {
    let parser = parser();
    let markdown = "**Execution Path:**\n- **Why it fits:** You love dogs\n- **Key Risks:**\n  - plain item\n";

    let cleaned = parser.clean_narrative_markdown(markdown);
    assert_eq!(cleaned, "- You love dogs\n- **Key Risks:**\n  - plain item\n");
    assert_eq!(
        parser.parse_list_items(&cleaned).len(),
        parser.parse_list_items(markdown).len()
    );
}

#[test]
fn checklist_items_drop_task_boxes() {
    let parser = parser();
    let items = parser.extract_checklist_items(Some("- [ ] Ten interviews done\n- [x] **Budget** confirmed\n"));

    assert_eq!(
        items,
        vec!["Ten interviews done".to_string(), "Budget confirmed".to_string()]
    );
    assert!(parser.extract_checklist_items(None).is_empty());
}

#[test]
fn personalize_copy_never_leaves_placeholders() {
    let parser = parser();

    let filled = parser.personalize_copy(
        "Aim for {goal_type} growth with {{budgetRange}} and {unknown_token}.",
        &profile(),
    );
    assert_eq!(filled, "Aim for side income growth with $1,000–$5,000 and.");

    let neutral = parser.personalize_copy("Lean on your {skill} skills.", &ProfileContext::default());
    assert_eq!(neutral, "Lean on your strongest skills.");

    let untouched = parser.personalize_copy("No tokens here.", &ProfileContext::default());
    assert_eq!(untouched, "No tokens here.");

    let raw_braces = parser.personalize_copy("Aim for {{{goal_type}}} growth", &ProfileContext::default());
    assert_eq!(raw_braces, "Aim for primary growth");
    assert!(!raw_braces.contains('{') && !raw_braces.contains('}'));
}

#[test]
fn fill_template_rejects_unknown_placeholders() {
    let parser = parser();
    let values = template_values(&ProfileContext::default(), "Pets");

    assert_eq!(
        parser
            .fill_template("Launch {idea_title} for {FOCUS_AREA}", &values)
            .expect("known tokens should resolve"),
        "Launch Pets for target"
    );
    assert!(parser.fill_template("Hello {mystery}", &values).is_err());
}

#[test]
fn every_fallback_template_resolves_for_an_empty_profile() {
    let parser = parser();
    let values = template_values(&ProfileContext::default(), "");

    let templates = EXECUTION_STEP_TEMPLATES
        .iter()
        .copied()
        .chain(
            FINANCIAL_FALLBACK_TEMPLATES
                .iter()
                .flat_map(|(focus, estimate, metric)| [*focus, *estimate, *metric]),
        )
        .chain(
            QUESTION_FALLBACK_TEMPLATES
                .iter()
                .flat_map(|(question, listen, act)| [*question, *listen, *act]),
        );

    for template in templates {
        let filled = parser
            .fill_template(template, &values)
            .unwrap_or_else(|err| panic!("template should resolve: {err}"));
        assert!(!filled.contains('{'), "{filled}");
    }
}

#[test]
fn format_section_heading_title_cases_keys() {
    assert_eq!(
        format_section_heading("key risks & mitigations"),
        "Key Risks & Mitigations"
    );
    assert_eq!(format_section_heading("go_to_market plan"), "Go to Market Plan");
    assert_eq!(format_section_heading("the first step"), "The First Step");
}

#[test]
fn strip_inline_markdown_keeps_visible_text() {
    assert_eq!(
        strip_inline_markdown("**Bold** and _italic_ with [a link](https://example.com) and `code`"),
        "Bold and italic with a link and code"
    );
    assert_eq!(strip_inline_markdown("snake_case ~$500"), "snake_case ~$500");
}

#[test]
fn timeline_slices_follow_day_range_markers() {
    let parser = parser();
    let roadmap = "#### Days 0-30\n- Interview 10 owners\n#### Days 31-60\n- Launch pilot\n#### Days 61-90\n- Add second city\n";

    assert_eq!(parser.extract_timeline_slice(roadmap, 0), "- Interview 10 owners");
    assert_eq!(parser.extract_timeline_slice(roadmap, 1), "- Launch pilot");
    assert_eq!(parser.extract_timeline_slice(roadmap, 2), "- Add second city");
    assert_eq!(parser.extract_timeline_slice(roadmap, 3), "");
    assert_eq!(parser.extract_timeline_slice("", 0), "");
}

#[test]
fn timeline_slices_read_month_and_week_labels() {
    let parser = parser();

    let months = "**Month 1:** validate demand\n**Month 2:** build\n**Month 3:** sell";
    assert_eq!(parser.extract_timeline_slice(months, 0), "validate demand");
    assert_eq!(parser.extract_timeline_slice(months, 2), "sell");

    let weeks = "**Weeks 1-4**\nTalk to owners\n**Weeks 5-8**\nRun pilot\n";
    assert_eq!(parser.extract_timeline_slice(weeks, 1), "Run pilot");
    assert_eq!(parser.extract_timeline_slice(weeks, 2), "");
}

#[test]
fn timeline_without_markers_distributes_blocks() {
    let parser = parser();
    let roadmap = "Validate demand.\n\nBuild the MVP.\n\nLaunch publicly.";

    assert_eq!(parser.extract_timeline_slice(roadmap, 0), "Validate demand.");
    assert_eq!(parser.extract_timeline_slice(roadmap, 1), "Build the MVP.");
    assert_eq!(parser.extract_timeline_slice(roadmap, 2), "Launch publicly.");
}

#[test]
fn parse_report_builds_every_section() {
    let parser = parser();
    let report = parser.parse_report(SAMPLE_REPORT, &profile(), DEFAULT_MAX_IDEAS);

    assert_eq!(report.idea_count, 2);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let pets = &report.ideas[0];
    assert_eq!(pets.title, "Pet Sitting App");
    assert_eq!(
        pets.why_fit.hero_statement.as_deref(),
        Some("You already care for three dogs on weekends")
    );
    assert_eq!(
        pets.execution_steps.items,
        vec![
            "Interview 10 pet owners".to_string(),
            "Build a clickable prototype".to_string(),
            "Recruit five sitters".to_string(),
        ]
    );
    assert_eq!(pets.execution_phases.len(), 1);
    assert_eq!(pets.risks.len(), 2);
    assert_eq!(
        pets.customer_persona.as_deref(),
        Some("Busy professionals with one or two pets.")
    );
    assert_eq!(
        pets.decision_checklist,
        vec!["Ten owner interviews done".to_string(), "Budget confirmed".to_string()]
    );
    assert_eq!(pets.roadmap.len(), 3);
    assert_eq!(pets.roadmap[0].label, "Days 0-30");
    assert_eq!(pets.roadmap[0].markdown, "- Validate demand with pet care owners");
    assert_eq!(pets.roadmap[2].markdown, "- Expand to a second neighbourhood");
    assert_eq!(pets.additional_insights.len(), 1);
    assert_eq!(pets.additional_insights[0].heading, "Go-to-market Notes");
    assert_eq!(
        pets.fallback_sections,
        vec![
            "financial snapshot".to_string(),
            "validation questions".to_string()
        ]
    );

    let meals = &report.ideas[1];
    assert_eq!(meals.financial_snapshots.source, ContentSource::Report);
    assert_eq!(meals.financial_snapshots.items[0].estimate, "$400/month");
    assert_eq!(meals.validation_questions.items.len(), 2);
    assert_eq!(
        meals.validation_questions.items[1].act_on,
        "Offer a founding-member discount"
    );
    assert!(meals.why_fit.points[0].starts_with("Weekly meal prep"));
    assert!(meals.fallback_sections.contains(&"execution path".to_string()));
}

#[test]
fn parse_report_is_deterministic() {
    let parser = parser();
    let first = parser.parse_report(SAMPLE_REPORT, &profile(), DEFAULT_MAX_IDEAS);
    let second = parser.parse_report(SAMPLE_REPORT, &profile(), DEFAULT_MAX_IDEAS);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("report should serialize"),
        serde_json::to_string(&second).expect("report should serialize")
    );
}

#[test]
fn parse_report_warns_when_headings_drift() {
    let parser = parser();

    let no_ideas = parser.parse_report("Some unstructured text.", &ProfileContext::default(), 10);
    assert_eq!(no_ideas.idea_count, 0);
    assert_eq!(no_ideas.warnings.len(), 1);

    let no_sections = parser.parse_report(
        "## Idea 1: Bakery\nSell bread to cafes.\n",
        &ProfileContext::default(),
        10,
    );
    assert_eq!(no_sections.idea_count, 1);
    assert_eq!(no_sections.warnings.len(), 1);
    assert!(no_sections.warnings[0].contains("Bakery"));

    let empty = parser.parse_report("", &ProfileContext::default(), 10);
    assert!(empty.warnings.is_empty());
}

#[test]
fn profile_context_accepts_camel_case_and_merges_overrides() {
    let mut profile: ProfileContext =
        serde_json::from_str(r#"{"goalType":"side income","budget_range":"$500"}"#)
            .expect("profile should deserialize");
    assert_eq!(profile.goal_type.as_deref(), Some("side income"));

    profile.merge(ProfileContext {
        budget_range: Some("$2,000".to_string()),
        skill: Some("   ".to_string()),
        ..ProfileContext::default()
    });
    assert_eq!(profile.budget_range.as_deref(), Some("$2,000"));
    assert!(profile.skill.is_none());
}
