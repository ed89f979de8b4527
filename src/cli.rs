use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::report::{DEFAULT_MAX_IDEAS, ProfileContext};

#[derive(Parser, Debug)]
#[command(
    name = "idea-report",
    version,
    about = "Parse startup-idea recommendation reports into structured sections"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Check(CheckArgs),
    Save(SaveArgs),
    Runs(RunsArgs),
    Clear(ClearArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    #[arg(long, default_value = ".cache/idea-report")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

impl StoreArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.cache_root.join("sessions.sqlite"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportSourceArgs {
    #[arg(long, conflicts_with = "run_id")]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub run_id: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub profile_path: Option<PathBuf>,

    #[arg(long)]
    pub goal_type: Option<String>,

    #[arg(long)]
    pub time_commitment: Option<String>,

    #[arg(long)]
    pub budget_range: Option<String>,

    #[arg(long)]
    pub work_style: Option<String>,

    #[arg(long)]
    pub skill: Option<String>,

    #[arg(long)]
    pub focus_area: Option<String>,
}

impl ProfileArgs {
    pub fn overrides(&self) -> ProfileContext {
        ProfileContext {
            goal_type: self.goal_type.clone(),
            time_commitment: self.time_commitment.clone(),
            budget_range: self.budget_range.clone(),
            work_style: self.work_style.clone(),
            skill: self.skill.clone(),
            focus_area: self.focus_area.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub source: ReportSourceArgs,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[arg(long, default_value_t = DEFAULT_MAX_IDEAS)]
    pub max_ideas: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long)]
    pub output_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub source: ReportSourceArgs,

    #[arg(long, default_value_t = DEFAULT_MAX_IDEAS)]
    pub max_ideas: usize,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub run_id: Option<String>,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RunsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ClearArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    pub run_id: Option<String>,

    #[arg(long, default_value_t = false)]
    pub all: bool,
}
