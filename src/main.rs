mod analytics;
mod client;
mod commands;
mod company_cache;
mod config;
mod error;
mod funnel;
mod logging;
mod lookup;
mod models;
mod poll;
mod render;
mod resource;
mod services;
mod session;
#[cfg(test)]
mod testing;
mod tui;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, warn};

use client::ApiClient;
use config::Config;
use models::{ApprovalType, HeadcountStatus, JobBoardSource, JobStatus};
use session::SessionStore;

#[derive(Parser)]
#[command(name = "careers")]
#[command(about = "Admin console for a multi-tenant careers site and ATS")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Show or change local settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Company profile and settings
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Job openings and their approval workflow
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Job boards
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },

    /// Office locations
    Office {
        #[command(subcommand)]
        command: OfficeCommands,
    },

    /// Departments
    Department {
        #[command(subcommand)]
        command: DepartmentCommands,
    },

    /// Job functions (groups of roles)
    Function {
        #[command(subcommand)]
        command: FunctionCommands,
    },

    /// Job roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Headcount requests
    Headcount {
        #[command(subcommand)]
        command: HeadcountCommands,
    },

    /// Company API keys
    ApiKey {
        #[command(subcommand)]
        command: ApiKeyCommands,
    },

    /// Hiring analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },

    /// Show admin dashboard stats
    Dashboard {
        /// Keep refreshing on the configured poll interval
        #[arg(short, long)]
        watch: bool,
    },

    /// Interactive jobs console
    Console {
        /// Only show jobs with this status
        #[arg(short, long)]
        status: Option<JobStatus>,

        /// Only show jobs on this board (name or ID)
        #[arg(short, long)]
        board: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Store a bearer token (read from stdin when --token is omitted)
    Login {
        #[arg(long)]
        token: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show which token would be used
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigKey {
    ApiUrl,
    TimeoutSecs,
    PollIntervalSecs,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write one setting to the config file
    Set {
        key: ConfigKey,
        value: String,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// Show the company profile
    Show,

    /// Create the company profile
    Create {
        name: String,

        #[arg(long)]
        website: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Update fields of the company profile
    Update(CompanyUpdateArgs),

    /// Company settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Args)]
struct CompanyUpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    logo: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    founded_year: Option<i32>,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    mission: Option<String>,
    #[arg(long)]
    vision: Option<String>,
    #[arg(long)]
    values: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    twitter: Option<String>,
    #[arg(long)]
    facebook: Option<String>,
    #[arg(long)]
    instagram: Option<String>,
    #[arg(long)]
    github: Option<String>,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show company settings
    Show,

    /// Change company settings
    Set {
        /// Whether approval happens on headcount or on job openings
        #[arg(long)]
        approval_type: Option<ApprovalType>,

        #[arg(long)]
        calendar_provider: Option<String>,

        /// Allowed sign-up domain (repeatable, replaces the list)
        #[arg(long = "allowed-domain")]
        allowed_domains: Vec<String>,

        /// Remove all allowed domains
        #[arg(long, conflicts_with = "allowed_domains")]
        clear_domains: bool,
    },
}

#[derive(Args)]
struct JobFields {
    #[arg(long)]
    internal_id: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// HTML description
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the HTML description from a file
    #[arg(long)]
    content_file: Option<PathBuf>,

    /// Department name or ID (repeatable)
    #[arg(long = "department")]
    departments: Vec<String>,

    /// Office name or ID (repeatable)
    #[arg(long = "office")]
    offices: Vec<String>,

    /// Job board name or ID
    #[arg(long)]
    board: Option<String>,

    /// Headcount request ID
    #[arg(long)]
    headcount: Option<String>,
}

#[derive(Subcommand)]
enum JobCommands {
    /// List jobs
    List {
        #[arg(short, long)]
        status: Option<JobStatus>,

        /// Job board name or ID
        #[arg(short, long)]
        board: Option<String>,
    },

    /// Show job details
    Show { id: String },

    /// Create a draft job
    Create {
        title: String,

        #[command(flatten)]
        fields: JobFields,
    },

    /// Update a job
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: JobFields,
    },

    /// Delete a job
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Submit a draft for approval
    Submit { id: String },

    /// Approve a pending job
    Approve { id: String },

    /// Reject a pending job
    Reject {
        id: String,

        #[arg(short, long)]
        reason: Option<String>,

        #[arg(short, long)]
        yes: bool,
    },

    /// Publish an approved job
    Publish { id: String },

    /// Archive a job
    Archive {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List job boards
    List,

    /// Show a job board
    Show { board: String },

    /// Create a job board
    Create {
        title: String,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        custom_domain: Option<String>,
    },

    /// Update a job board
    Update {
        board: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        custom_domain: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a job board
    Delete {
        board: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Connect a board synced from an external ATS
    Import {
        source: JobBoardSource,

        title: String,

        /// Board token or job board name on the external system
        #[arg(long)]
        external_id: String,

        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum OfficeCommands {
    /// List offices
    List,

    /// Add an office
    Create {
        name: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        headquarters: bool,
    },

    /// Update an office
    Update {
        office: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        headquarters: Option<bool>,
    },

    /// Delete an office
    Delete {
        office: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DepartmentCommands {
    /// List departments
    List,

    /// Add a department
    Create {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Update a department
    Update {
        department: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a department
    Delete {
        department: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum FunctionCommands {
    /// List job functions
    List,

    /// Add a job function
    Create {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Department name or ID
        #[arg(long)]
        department: Option<String>,
    },

    /// Update a job function
    Update {
        function: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        department: Option<String>,
    },

    /// Delete a job function
    Delete {
        function: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// List job roles
    List {
        /// Job function name or ID
        #[arg(short, long)]
        function: Option<String>,
    },

    /// Add a job role
    Create {
        title: String,

        /// Job function name or ID
        #[arg(short, long)]
        function: String,

        #[arg(long)]
        level: Option<String>,
    },

    /// Update a job role
    Update {
        role: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        function: Option<String>,

        #[arg(long)]
        level: Option<String>,
    },

    /// Delete a job role
    Delete {
        role: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum HeadcountCommands {
    /// List headcount requests
    List {
        #[arg(short, long)]
        status: Option<HeadcountStatus>,
    },

    /// Show a headcount request
    Show { id: String },

    /// Request headcount for a role
    Create {
        /// Job role title or ID
        #[arg(long)]
        role: String,

        /// Department name or ID
        #[arg(long)]
        department: String,

        #[arg(long)]
        team: Option<String>,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Approve a headcount request
    Approve { id: String },

    /// Reject a headcount request
    Reject {
        id: String,

        #[arg(short, long)]
        reason: Option<String>,

        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a headcount request
    Delete {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ApiKeyCommands {
    /// List API keys
    List,

    /// Create an API key (the secret is shown once)
    Create { name: String },

    /// Revoke an API key
    Revoke {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Clone, Copy)]
struct RangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum AnalyticsCommands {
    /// Headline hiring metrics
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Application funnel by stage
    Funnel {
        #[command(flatten)]
        range: RangeArgs,

        /// Print stages as returned by the server
        #[arg(long)]
        raw: bool,
    },

    /// Per-job performance, busiest first
    Jobs {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Per-interviewer performance
    Interviews {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Application sources and their share
    Sources {
        #[command(flatten)]
        range: RangeArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = Config::default_path();
    let mut config = Config::load(&config_path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    debug!(api_url = %config.api_url, "configuration loaded");

    let sessions = SessionStore::open();

    match cli.command {
        Commands::Auth { command } => commands::auth(&sessions, command),
        Commands::Config { command } => commands::config(&config_path, &config, command),
        command => {
            let token = sessions.resolve_token(std::env::var("CAREERS_TOKEN").ok())?;
            if token.is_none() {
                warn!("no API token; run `careers auth login` or set CAREERS_TOKEN");
            }
            let client = ApiClient::from_config(&config, token)?;
            commands::run(&client, &config, command)
        }
    }
}
