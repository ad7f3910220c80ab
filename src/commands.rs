//! Subcommand handlers. Each one is a load or a mutate against the API,
//! printed as a table or a short confirmation.

use anyhow::{Context, Result, anyhow, bail};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;
use tracing::{info, warn};

use crate::analytics::{self as metrics, AnalyticsRange};
use crate::client::ApiClient;
use crate::company_cache::CompanyCache;
use crate::config::Config;
use crate::funnel::normalize_funnel;
use crate::lookup::{self, Named};
use crate::models::{
    Company, DashboardStats, DepartmentInput, ExternalBoardImport, HeadcountInput, Job, JobAction,
    JobBoardInput, JobFilter, JobFunctionInput, JobInput, JobRoleInput, OfficeInput,
};
use crate::poll::Poller;
use crate::render::{self, date, html_to_text, truncate};
use crate::session::{SessionStore, mask_token};
use crate::{
    AnalyticsCommands, ApiKeyCommands, AuthCommands, BoardCommands, Commands, CompanyCommands,
    CompanyUpdateArgs, ConfigCommands, ConfigKey, DepartmentCommands, FunctionCommands,
    HeadcountCommands, JobCommands, JobFields, OfficeCommands, RangeArgs, RoleCommands,
    SettingsCommands, tui,
};

const DETAIL_WIDTH: usize = 80;

pub fn auth(sessions: &SessionStore, command: AuthCommands) -> Result<()> {
    match command {
        AuthCommands::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => {
                    eprint!("Token: ");
                    io::stderr().flush()?;
                    let mut line = String::new();
                    io::stdin().lock().read_line(&mut line)?;
                    line
                }
            };
            if token.trim().is_empty() {
                bail!("No token given");
            }
            let session = sessions.save(&token)?;
            println!(
                "Token {} saved to {}",
                mask_token(&session.token),
                sessions.path().display()
            );
        }

        AuthCommands::Logout => {
            if sessions.clear()? {
                println!("Logged out.");
            } else {
                println!("No stored token.");
            }
        }

        AuthCommands::Status => {
            if let Some(token) = std::env::var("CAREERS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
            {
                println!("Using CAREERS_TOKEN ({})", mask_token(token.trim()));
                return Ok(());
            }
            match sessions.load()? {
                Some(session) => println!(
                    "Logged in with {} (saved {})",
                    mask_token(&session.token),
                    session.saved_at.format("%Y-%m-%d %H:%M")
                ),
                None => println!("Not logged in."),
            }
        }
    }
    Ok(())
}

pub fn config(path: &Path, effective: &Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("Config file: {}", path.display());
            println!("api_url:            {}", effective.api_url);
            println!("timeout_secs:       {}", effective.timeout_secs);
            println!("poll_interval_secs: {}", effective.poll_interval_secs);
        }

        ConfigCommands::Set { key, value } => {
            // Edit the file as written, without environment overrides.
            let mut stored = Config::load(path)?;
            let seconds = || -> Result<u64> {
                value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Expected a whole number of seconds, got '{}'", value))
            };
            match key {
                ConfigKey::ApiUrl => stored.api_url = value.trim().trim_end_matches('/').to_string(),
                ConfigKey::TimeoutSecs => stored.timeout_secs = seconds()?,
                ConfigKey::PollIntervalSecs => stored.poll_interval_secs = seconds()?,
            }
            stored.save(path)?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

pub fn run(client: &ApiClient, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Company { command } => company(client, command),
        Commands::Job { command } => job(client, command),
        Commands::Board { command } => board(client, command),
        Commands::Office { command } => office(client, command),
        Commands::Department { command } => department(client, command),
        Commands::Function { command } => function(client, command),
        Commands::Role { command } => role(client, command),
        Commands::Headcount { command } => headcount(client, command),
        Commands::ApiKey { command } => api_key(client, command),
        Commands::Analytics { command } => analytics(client, command),
        Commands::Dashboard { watch } => dashboard(client, config, watch),
        Commands::Console { status, board } => {
            let job_board_id = board_id(client, board.as_deref())?;
            tui::run_console(
                client,
                JobFilter {
                    status,
                    job_board_id,
                },
            )
        }
        Commands::Auth { .. } | Commands::Config { .. } => {
            unreachable!("handled before the client is built")
        }
    }
}

/// Ask before destructive operations unless `--yes` was given.
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn resolve_id<T: Named>(items: &[T], query: &str, kind: &str) -> Result<String> {
    Ok(lookup::resolve(items, query, kind)?.id().to_string())
}

fn board_id(client: &ApiClient, query: Option<&str>) -> Result<Option<String>> {
    match query {
        Some(query) => {
            let boards = client.job_boards().list().context("Failed to load job boards")?;
            Ok(Some(resolve_id(&boards, query, "job board")?))
        }
        None => Ok(None),
    }
}

// --- Company ---

fn company(client: &ApiClient, command: CompanyCommands) -> Result<()> {
    let mut cache = CompanyCache::new();

    match command {
        CompanyCommands::Show => {
            let company = cache
                .ensure_loaded(client)
                .context("Failed to load company")?;
            print_company(company);
        }

        CompanyCommands::Create {
            name,
            website,
            industry,
            description,
        } => {
            let company = client.company().create(&Company {
                name,
                website,
                industry,
                description,
                ..Company::default()
            })?;
            println!("Created company '{}'.", company.name);
        }

        CompanyCommands::Update(args) => {
            let mut company = cache
                .ensure_loaded(client)
                .context("Failed to load company")?
                .clone();
            apply_company_update(&mut company, args);
            let saved = cache.update(client, &company)?;
            println!("Company '{}' updated.", saved.name);
        }

        CompanyCommands::Settings { command } => match command {
            SettingsCommands::Show => {
                let settings = client.company().settings()?;
                println!("Approval type:     {}", settings.approval_type);
                println!(
                    "Calendar provider: {}",
                    settings.email_calendar_provider.as_deref().unwrap_or("-")
                );
                if settings.allowed_domains.is_empty() {
                    println!("Allowed domains:   -");
                } else {
                    println!("Allowed domains:   {}", settings.allowed_domains.join(", "));
                }
            }

            SettingsCommands::Set {
                approval_type,
                calendar_provider,
                allowed_domains,
                clear_domains,
            } => {
                let mut settings = client.company().settings()?;
                if let Some(approval_type) = approval_type {
                    settings.approval_type = approval_type;
                }
                if calendar_provider.is_some() {
                    settings.email_calendar_provider = calendar_provider;
                }
                if clear_domains {
                    settings.allowed_domains.clear();
                } else if !allowed_domains.is_empty() {
                    settings.allowed_domains = allowed_domains;
                }
                let saved = client.company().update_settings(&settings)?;
                println!("Settings saved (approval type: {}).", saved.approval_type);
            }
        },
    }
    Ok(())
}

fn apply_company_update(company: &mut Company, args: CompanyUpdateArgs) {
    if let Some(name) = args.name {
        company.name = name;
    }
    let optional = [
        (&mut company.logo, args.logo),
        (&mut company.website, args.website),
        (&mut company.description, args.description),
        (&mut company.industry, args.industry),
        (&mut company.size, args.size),
        (&mut company.mission, args.mission),
        (&mut company.vision, args.vision),
        (&mut company.values, args.values),
        (&mut company.social_links.linkedin, args.linkedin),
        (&mut company.social_links.twitter, args.twitter),
        (&mut company.social_links.facebook, args.facebook),
        (&mut company.social_links.instagram, args.instagram),
        (&mut company.social_links.github, args.github),
    ];
    for (field, value) in optional {
        if value.is_some() {
            *field = value;
        }
    }
    if args.founded_year.is_some() {
        company.founded_year = args.founded_year;
    }
}

fn print_company(company: &Company) {
    println!("{}", company.name);
    render::print_rule(DETAIL_WIDTH);
    let fields = [
        ("Website", &company.website),
        ("Industry", &company.industry),
        ("Size", &company.size),
        ("Logo", &company.logo),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }
    if let Some(year) = company.founded_year {
        println!("Founded: {}", year);
    }
    println!("Approval type: {}", company.settings.approval_type);

    let links = &company.social_links;
    for (label, value) in [
        ("LinkedIn", &links.linkedin),
        ("Twitter", &links.twitter),
        ("Facebook", &links.facebook),
        ("Instagram", &links.instagram),
        ("GitHub", &links.github),
    ] {
        if let Some(url) = value {
            println!("{}: {}", label, url);
        }
    }

    for (label, value) in [
        ("About", &company.description),
        ("Mission", &company.mission),
        ("Vision", &company.vision),
        ("Values", &company.values),
    ] {
        if let Some(text) = value {
            println!("\n--- {} ---\n{}", label, render::wrap(&html_to_text(text), DETAIL_WIDTH));
        }
    }
}

// --- Jobs ---

fn job(client: &ApiClient, command: JobCommands) -> Result<()> {
    let jobs = client.jobs();

    match command {
        JobCommands::List { status, board } => {
            let filter = JobFilter {
                status,
                job_board_id: board_id(client, board.as_deref())?,
            };
            let list = jobs.list(&filter).context("Failed to load jobs")?;
            if list.is_empty() {
                println!("No jobs found.");
            } else {
                println!(
                    "{:<26} {:<17} {:<32} {:<18} {:<10}",
                    "ID", "STATUS", "TITLE", "LOCATION", "UPDATED"
                );
                render::print_rule(107);
                for job in list {
                    println!(
                        "{:<26} {:<17} {:<32} {:<18} {:<10}",
                        truncate(&job.id, 24),
                        job.status,
                        truncate(&job.title, 30),
                        truncate(job.location.as_deref().unwrap_or("-"), 16),
                        date(job.updated_at)
                    );
                }
            }
        }

        JobCommands::Show { id } => {
            let job = jobs.get(&id)?;
            print_job(&job);
        }

        JobCommands::Create { title, fields } => {
            let mut input = JobInput {
                title,
                ..JobInput::default()
            };
            apply_job_fields(client, &mut input, fields)?;
            let job = jobs.create(&input)?;
            println!("Created job {} ({}).", job.id, job.status);
        }

        JobCommands::Update { id, title, fields } => {
            // Full replacement built from the current server copy.
            let current = jobs.get(&id)?;
            let mut input = JobInput::from(&current);
            if let Some(title) = title {
                input.title = title;
            }
            apply_job_fields(client, &mut input, fields)?;
            let job = jobs.update(&id, &input)?;
            println!("Job '{}' updated.", job.title);
        }

        JobCommands::Delete { id, yes } => {
            let job = jobs.get(&id)?;
            if !confirm(&format!("Delete job '{}'? This cannot be undone.", job.title), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            jobs.delete(&id)?;
            println!("Job '{}' deleted.", job.title);
        }

        JobCommands::Submit { id } => transition(client, &id, JobAction::SubmitForApproval, None, true)?,
        JobCommands::Approve { id } => transition(client, &id, JobAction::Approve, None, true)?,
        JobCommands::Publish { id } => transition(client, &id, JobAction::Publish, None, true)?,
        JobCommands::Reject { id, reason, yes } => {
            transition(client, &id, JobAction::Reject, reason.as_deref(), yes)?
        }
        JobCommands::Archive { id, yes } => transition(client, &id, JobAction::Archive, None, yes)?,
    }
    Ok(())
}

fn transition(
    client: &ApiClient,
    id: &str,
    action: JobAction,
    reason: Option<&str>,
    yes: bool,
) -> Result<()> {
    let jobs = client.jobs();
    if action.needs_confirmation() {
        let job = jobs.get(id)?;
        if !confirm(&format!("{} '{}'?", action.label(), job.title), yes)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let job = match action {
        JobAction::SubmitForApproval => jobs.submit_for_approval(id),
        JobAction::Approve => jobs.approve(id),
        JobAction::Reject => jobs.reject(id, reason),
        JobAction::Publish => jobs.publish(id),
        JobAction::Archive => jobs.archive(id),
    }
    .with_context(|| format!("Failed to {} job {}", action.label().to_lowercase(), id))?;

    info!(job = %job.id, status = %job.status, "job transitioned");
    println!("Job '{}' {} (now {}).", job.title, action.past_tense(), job.status);
    Ok(())
}

fn apply_job_fields(client: &ApiClient, input: &mut JobInput, fields: JobFields) -> Result<()> {
    if fields.internal_id.is_some() {
        input.internal_id = fields.internal_id;
    }
    if fields.location.is_some() {
        input.location = fields.location;
    }
    if let Some(path) = fields.content_file {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?;
        input.content = Some(content);
    } else if fields.content.is_some() {
        input.content = fields.content;
    }
    if !fields.departments.is_empty() {
        let departments = client
            .departments()
            .list()
            .context("Failed to load departments")?;
        input.departments = lookup::resolve_ids(&departments, &fields.departments, "department")?;
    }
    if !fields.offices.is_empty() {
        let offices = client.offices().list().context("Failed to load offices")?;
        input.offices = lookup::resolve_ids(&offices, &fields.offices, "office")?;
    }
    if let Some(board) = board_id(client, fields.board.as_deref())? {
        input.job_board_id = Some(board);
    }
    if fields.headcount.is_some() {
        input.headcount_id = fields.headcount;
    }
    Ok(())
}

fn print_job(job: &Job) {
    println!("Job {}", job.id);
    println!("Title: {}", job.title);
    println!("Status: {}", job.status);
    if let Some(internal_id) = &job.internal_id {
        println!("Internal ID: {}", internal_id);
    }
    if let Some(location) = &job.location {
        println!("Location: {}", location);
    }
    if !job.departments.is_empty() {
        let names: Vec<&str> = job.departments.iter().map(|d| d.label()).collect();
        println!("Departments: {}", names.join(", "));
    }
    if !job.offices.is_empty() {
        let names: Vec<&str> = job.offices.iter().map(|o| o.label()).collect();
        println!("Offices: {}", names.join(", "));
    }
    if let Some(board) = &job.job_board_id {
        println!("Job board: {}", board);
    }
    if let Some(headcount) = &job.headcount_id {
        println!("Headcount request: {}", headcount);
    }
    if let Some(reason) = &job.rejection_reason {
        println!("Rejection reason: {}", reason);
    }
    println!("Created: {}", date(job.created_at));
    println!("Updated: {}", date(job.updated_at));
    if job.published_at.is_some() {
        println!("Published: {}", date(job.published_at));
    }
    let actions: Vec<&str> = job.status.available_actions().iter().map(|a| a.label()).collect();
    if !actions.is_empty() {
        println!("Next steps: {}", actions.join(", "));
    }
    if let Some(content) = &job.content {
        println!("\n--- Description ---\n{}", render::wrap(&html_to_text(content), DETAIL_WIDTH));
    }
}

// --- Job boards ---

fn board(client: &ApiClient, command: BoardCommands) -> Result<()> {
    let boards = client.job_boards();

    match command {
        BoardCommands::List => {
            let list = boards.list().context("Failed to load job boards")?;
            if list.is_empty() {
                println!("No job boards found.");
            } else {
                println!(
                    "{:<26} {:<28} {:<20} {:<11} {:<6}",
                    "ID", "TITLE", "SLUG", "SOURCE", "ACTIVE"
                );
                render::print_rule(95);
                for board in list {
                    println!(
                        "{:<26} {:<28} {:<20} {:<11} {:<6}",
                        truncate(&board.id, 24),
                        truncate(&board.title, 26),
                        truncate(board.slug.as_deref().unwrap_or("-"), 18),
                        board.source.map(|s| s.as_str()).unwrap_or("internal"),
                        if board.is_active { "yes" } else { "no" }
                    );
                }
            }
        }

        BoardCommands::Show { board } => {
            let all = boards.list().context("Failed to load job boards")?;
            let id = resolve_id(&all, &board, "job board")?;
            let board = boards.get(&id)?;
            println!("Job board {}", board.id);
            println!("Title: {}", board.title);
            if let Some(slug) = &board.slug {
                println!("Slug: {}", slug);
            }
            if let Some(domain) = &board.custom_domain {
                println!("Custom domain: {}", domain);
            }
            if let Some(source) = board.source {
                println!("Synced from: {}", source.as_str());
            }
            println!("Active: {}", if board.is_active { "yes" } else { "no" });
            println!("Created: {}", date(board.created_at));
            if let Some(description) = &board.description {
                println!("\n{}", render::wrap(description, DETAIL_WIDTH));
            }
        }

        BoardCommands::Create {
            title,
            slug,
            description,
            custom_domain,
        } => {
            let board = boards.create(&JobBoardInput {
                title,
                slug,
                description,
                custom_domain,
                is_active: None,
            })?;
            println!("Created job board '{}' ({}).", board.title, board.id);
        }

        BoardCommands::Update {
            board,
            title,
            slug,
            description,
            custom_domain,
            active,
        } => {
            let all = boards.list().context("Failed to load job boards")?;
            let current = lookup::resolve(&all, &board, "job board")?;
            let mut input = JobBoardInput::from(current);
            if let Some(title) = title {
                input.title = title;
            }
            if slug.is_some() {
                input.slug = slug;
            }
            if description.is_some() {
                input.description = description;
            }
            if custom_domain.is_some() {
                input.custom_domain = custom_domain;
            }
            if active.is_some() {
                input.is_active = active;
            }
            let saved = boards.update(&current.id, &input)?;
            println!("Job board '{}' updated.", saved.title);
        }

        BoardCommands::Delete { board, yes } => {
            let all = boards.list().context("Failed to load job boards")?;
            let target = lookup::resolve(&all, &board, "job board")?;
            if !confirm(&format!("Delete job board '{}'?", target.title), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            boards.delete(&target.id)?;
            println!("Job board '{}' deleted.", target.title);
        }

        BoardCommands::Import {
            source,
            title,
            external_id,
            api_key,
        } => {
            let board = boards.create_external(
                source,
                &ExternalBoardImport {
                    title,
                    external_id,
                    api_key,
                },
            )?;
            println!(
                "Connected {} board '{}' ({}).",
                source.as_str(),
                board.title,
                board.id
            );
        }
    }
    Ok(())
}

// --- Organization structure ---

fn office(client: &ApiClient, command: OfficeCommands) -> Result<()> {
    let offices = client.offices();

    match command {
        OfficeCommands::List => {
            let list = offices.list().context("Failed to load offices")?;
            if list.is_empty() {
                println!("No offices found.");
            } else {
                println!("{:<26} {:<24} {:<18} {:<16} {:<3}", "ID", "NAME", "CITY", "COUNTRY", "HQ");
                render::print_rule(90);
                for office in list {
                    println!(
                        "{:<26} {:<24} {:<18} {:<16} {:<3}",
                        truncate(&office.id, 24),
                        truncate(&office.name, 22),
                        truncate(office.city.as_deref().unwrap_or("-"), 16),
                        truncate(office.country.as_deref().unwrap_or("-"), 14),
                        if office.is_headquarters { "*" } else { "" }
                    );
                }
            }
        }

        OfficeCommands::Create {
            name,
            address,
            city,
            country,
            headquarters,
        } => {
            let office = offices.create(&OfficeInput {
                name,
                address,
                city,
                country,
                is_headquarters: headquarters,
            })?;
            println!("Created office '{}' ({}).", office.name, office.id);
        }

        OfficeCommands::Update {
            office,
            name,
            address,
            city,
            country,
            headquarters,
        } => {
            let all = offices.list().context("Failed to load offices")?;
            let current = lookup::resolve(&all, &office, "office")?;
            let mut input = OfficeInput::from(current);
            if let Some(name) = name {
                input.name = name;
            }
            if address.is_some() {
                input.address = address;
            }
            if city.is_some() {
                input.city = city;
            }
            if country.is_some() {
                input.country = country;
            }
            if let Some(headquarters) = headquarters {
                input.is_headquarters = headquarters;
            }
            let saved = offices.update(&current.id, &input)?;
            println!("Office '{}' updated.", saved.name);
        }

        OfficeCommands::Delete { office, yes } => {
            let all = offices.list().context("Failed to load offices")?;
            let target = lookup::resolve(&all, &office, "office")?;
            if !confirm(&format!("Delete office '{}'?", target.name), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            offices.delete(&target.id)?;
            println!("Office '{}' deleted.", target.name);
        }
    }
    Ok(())
}

fn department(client: &ApiClient, command: DepartmentCommands) -> Result<()> {
    let departments = client.departments();

    match command {
        DepartmentCommands::List => {
            let list = departments.list().context("Failed to load departments")?;
            if list.is_empty() {
                println!("No departments found.");
            } else {
                println!("{:<26} {:<24} {:<40}", "ID", "NAME", "DESCRIPTION");
                render::print_rule(90);
                for dept in list {
                    println!(
                        "{:<26} {:<24} {:<40}",
                        truncate(&dept.id, 24),
                        truncate(&dept.name, 22),
                        truncate(dept.description.as_deref().unwrap_or("-"), 40)
                    );
                }
            }
        }

        DepartmentCommands::Create { name, description } => {
            let dept = departments.create(&DepartmentInput { name, description })?;
            println!("Created department '{}' ({}).", dept.name, dept.id);
        }

        DepartmentCommands::Update {
            department,
            name,
            description,
        } => {
            let all = departments.list().context("Failed to load departments")?;
            let current = lookup::resolve(&all, &department, "department")?;
            let input = DepartmentInput {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.or_else(|| current.description.clone()),
            };
            let saved = departments.update(&current.id, &input)?;
            println!("Department '{}' updated.", saved.name);
        }

        DepartmentCommands::Delete { department, yes } => {
            let all = departments.list().context("Failed to load departments")?;
            let target = lookup::resolve(&all, &department, "department")?;
            if !confirm(&format!("Delete department '{}'?", target.name), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            departments.delete(&target.id)?;
            println!("Department '{}' deleted.", target.name);
        }
    }
    Ok(())
}

fn function(client: &ApiClient, command: FunctionCommands) -> Result<()> {
    let functions = client.job_functions();

    match command {
        FunctionCommands::List => {
            let list = functions.list().context("Failed to load job functions")?;
            if list.is_empty() {
                println!("No job functions found.");
            } else {
                println!("{:<26} {:<28} {:<24}", "ID", "NAME", "DEPARTMENT");
                render::print_rule(78);
                for function in list {
                    println!(
                        "{:<26} {:<28} {:<24}",
                        truncate(&function.id, 24),
                        truncate(&function.name, 26),
                        truncate(function.department.as_ref().map(|d| d.label()).unwrap_or("-"), 22)
                    );
                }
            }
        }

        FunctionCommands::Create {
            name,
            description,
            department,
        } => {
            let department_id = department_id(client, department.as_deref())?;
            let function = functions.create(&JobFunctionInput {
                name,
                description,
                department_id,
            })?;
            println!("Created job function '{}' ({}).", function.name, function.id);
        }

        FunctionCommands::Update {
            function,
            name,
            description,
            department,
        } => {
            let all = functions.list().context("Failed to load job functions")?;
            let current = lookup::resolve(&all, &function, "job function")?;
            let department_id = match department_id(client, department.as_deref())? {
                Some(id) => Some(id),
                None => current.department.as_ref().map(|d| d.id().to_string()),
            };
            let input = JobFunctionInput {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.or_else(|| current.description.clone()),
                department_id,
            };
            let saved = functions.update(&current.id, &input)?;
            println!("Job function '{}' updated.", saved.name);
        }

        FunctionCommands::Delete { function, yes } => {
            let all = functions.list().context("Failed to load job functions")?;
            let target = lookup::resolve(&all, &function, "job function")?;
            if !confirm(&format!("Delete job function '{}'?", target.name), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            functions.delete(&target.id)?;
            println!("Job function '{}' deleted.", target.name);
        }
    }
    Ok(())
}

fn department_id(client: &ApiClient, query: Option<&str>) -> Result<Option<String>> {
    match query {
        Some(query) => {
            let departments = client
                .departments()
                .list()
                .context("Failed to load departments")?;
            Ok(Some(resolve_id(&departments, query, "department")?))
        }
        None => Ok(None),
    }
}

fn function_id(client: &ApiClient, query: Option<&str>) -> Result<Option<String>> {
    match query {
        Some(query) => {
            let functions = client
                .job_functions()
                .list()
                .context("Failed to load job functions")?;
            Ok(Some(resolve_id(&functions, query, "job function")?))
        }
        None => Ok(None),
    }
}

fn role(client: &ApiClient, command: RoleCommands) -> Result<()> {
    let roles = client.job_roles();

    match command {
        RoleCommands::List { function } => {
            let function_id = function_id(client, function.as_deref())?;
            let list = roles
                .list(function_id.as_deref())
                .context("Failed to load job roles")?;
            if list.is_empty() {
                println!("No job roles found.");
            } else {
                println!("{:<26} {:<30} {:<10} {:<24}", "ID", "TITLE", "LEVEL", "FUNCTION");
                render::print_rule(90);
                for role in list {
                    println!(
                        "{:<26} {:<30} {:<10} {:<24}",
                        truncate(&role.id, 24),
                        truncate(&role.title, 28),
                        truncate(role.level.as_deref().unwrap_or("-"), 10),
                        truncate(role.job_function.as_ref().map(|f| f.label()).unwrap_or("-"), 22)
                    );
                }
            }
        }

        RoleCommands::Create {
            title,
            function,
            level,
        } => {
            let functions = client
                .job_functions()
                .list()
                .context("Failed to load job functions")?;
            let job_function_id = resolve_id(&functions, &function, "job function")?;
            let role = roles.create(&JobRoleInput {
                title,
                level,
                job_function_id,
            })?;
            println!("Created job role '{}' ({}).", role.title, role.id);
        }

        RoleCommands::Update {
            role,
            title,
            function,
            level,
        } => {
            let all = roles.list(None).context("Failed to load job roles")?;
            let current = lookup::resolve(&all, &role, "job role")?;
            let job_function_id = match function_id(client, function.as_deref())? {
                Some(id) => id,
                None => current
                    .job_function
                    .as_ref()
                    .map(|f| f.id().to_string())
                    .ok_or_else(|| {
                        anyhow!("Job role '{}' has no job function, pass --function", current.title)
                    })?,
            };
            let input = JobRoleInput {
                title: title.unwrap_or_else(|| current.title.clone()),
                level: level.or_else(|| current.level.clone()),
                job_function_id,
            };
            let saved = roles.update(&current.id, &input)?;
            println!("Job role '{}' updated.", saved.title);
        }

        RoleCommands::Delete { role, yes } => {
            let all = roles.list(None).context("Failed to load job roles")?;
            let target = lookup::resolve(&all, &role, "job role")?;
            if !confirm(&format!("Delete job role '{}'?", target.title), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            roles.delete(&target.id)?;
            println!("Job role '{}' deleted.", target.title);
        }
    }
    Ok(())
}

// --- Headcount ---

fn headcount(client: &ApiClient, command: HeadcountCommands) -> Result<()> {
    let requests = client.headcount();

    match command {
        HeadcountCommands::List { status } => {
            let list = requests
                .list(status)
                .context("Failed to load headcount requests")?;
            if list.is_empty() {
                println!("No headcount requests found.");
            } else {
                println!(
                    "{:<26} {:<9} {:<26} {:<20} {:<10}",
                    "ID", "STATUS", "ROLE", "DEPARTMENT", "CREATED"
                );
                render::print_rule(95);
                for request in list {
                    println!(
                        "{:<26} {:<9} {:<26} {:<20} {:<10}",
                        truncate(&request.id, 24),
                        request.status,
                        truncate(request.role.as_ref().map(|r| r.label()).unwrap_or("-"), 24),
                        truncate(request.department.as_ref().map(|d| d.label()).unwrap_or("-"), 18),
                        date(request.created_at)
                    );
                }
            }
        }

        HeadcountCommands::Show { id } => {
            let request = requests.get(&id)?;
            println!("Headcount request {}", request.id);
            println!("Status: {}", request.status);
            if let Some(role) = &request.role {
                println!("Role: {}", role.label());
            }
            if let Some(department) = &request.department {
                println!("Department: {}", department.label());
            }
            if let Some(team) = &request.team_name {
                println!("Team: {}", team);
            }
            if let Some(reason) = &request.reason {
                println!("Reason: {}", reason);
            }
            if let Some(reason) = &request.rejection_reason {
                println!("Rejection reason: {}", reason);
            }
            if let Some(job) = &request.job_id {
                println!("Job: {}", job);
            }
            println!("Created: {}", date(request.created_at));
        }

        HeadcountCommands::Create {
            role,
            department,
            team,
            reason,
        } => {
            let roles = client.job_roles().list(None).context("Failed to load job roles")?;
            let role_id = resolve_id(&roles, &role, "job role")?;
            let departments = client
                .departments()
                .list()
                .context("Failed to load departments")?;
            let department_id = resolve_id(&departments, &department, "department")?;
            let request = requests.create(&HeadcountInput {
                role_id,
                department_id,
                team_name: team,
                reason,
            })?;
            println!("Headcount request {} submitted ({}).", request.id, request.status);
        }

        HeadcountCommands::Approve { id } => {
            let request = requests.approve(&id)?;
            println!("Headcount request {} approved.", request.id);
        }

        HeadcountCommands::Reject { id, reason, yes } => {
            if !confirm(&format!("Reject headcount request {}?", id), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let request = requests.reject(&id, reason.as_deref())?;
            println!("Headcount request {} rejected.", request.id);
        }

        HeadcountCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete headcount request {}?", id), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            requests.delete(&id)?;
            println!("Headcount request {} deleted.", id);
        }
    }
    Ok(())
}

// --- API keys ---

fn api_key(client: &ApiClient, command: ApiKeyCommands) -> Result<()> {
    let keys = client.api_keys();

    match command {
        ApiKeyCommands::List => {
            let list = keys.list().context("Failed to load API keys")?;
            if list.is_empty() {
                println!("No API keys found.");
            } else {
                println!(
                    "{:<26} {:<24} {:<12} {:<10} {:<10}",
                    "ID", "NAME", "PREFIX", "CREATED", "LAST USED"
                );
                render::print_rule(86);
                for key in list {
                    println!(
                        "{:<26} {:<24} {:<12} {:<10} {:<10}",
                        truncate(&key.id, 24),
                        truncate(&key.name, 22),
                        key.prefix.as_deref().unwrap_or("-"),
                        date(key.created_at),
                        date(key.last_used_at)
                    );
                }
            }
        }

        ApiKeyCommands::Create { name } => {
            let created = keys.create(&name)?;
            println!("Created API key '{}' ({}).", created.api_key.name, created.api_key.id);
            println!("\n  {}\n", created.key);
            println!("Copy this key now. It will not be shown again.");
        }

        ApiKeyCommands::Revoke { id, yes } => {
            if !confirm(&format!("Revoke API key {}? Integrations using it will stop working.", id), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            keys.revoke(&id)?;
            println!("API key {} revoked.", id);
        }
    }
    Ok(())
}

// --- Analytics ---

impl From<RangeArgs> for AnalyticsRange {
    fn from(args: RangeArgs) -> Self {
        Self {
            start: args.from,
            end: args.to,
        }
    }
}

fn analytics(client: &ApiClient, command: AnalyticsCommands) -> Result<()> {
    let api = client.analytics();

    match command {
        AnalyticsCommands::Dashboard { range } => {
            let m = api.dashboard(&range.into()).context("Failed to load analytics")?;
            println!("Applications:         {}", m.total_applications);
            if let Some(change) = m.applications_change {
                println!("  vs previous period: {:+.1}%", change);
            }
            println!("Active jobs:          {}", m.active_jobs);
            println!("Interviews scheduled: {}", m.interviews_scheduled);
            println!("Hires:                {}", m.total_hires);
            println!(
                "Avg time to hire:     {}",
                m.avg_time_to_hire
                    .map(|d| format!("{:.1} days", d))
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("Offer acceptance:     {}", render::rate(m.offer_acceptance_rate));
        }

        AnalyticsCommands::Funnel { range, raw } => {
            let stages = api.funnel(&range.into()).context("Failed to load funnel")?;
            let stages = if raw { stages } else { normalize_funnel(&stages) };
            if stages.is_empty() {
                println!("No funnel data for this period.");
            } else {
                println!("{:<14} {:>7} {:>7}", "STAGE", "COUNT", "CONV");
                render::print_rule(60);
                for line in render::funnel_chart(&stages, 30) {
                    println!("{}", line);
                }
            }
        }

        AnalyticsCommands::Jobs { range, limit } => {
            let jobs = api.jobs(&range.into()).context("Failed to load job analytics")?;
            if jobs.is_empty() {
                println!("No job activity for this period.");
            } else {
                println!(
                    "{:<5} {:<32} {:>6} {:>10} {:>6} {:>6} {:>9}",
                    "RANK", "TITLE", "APPS", "INTERVIEWS", "OFFERS", "HIRES", "HIRE RATE"
                );
                render::print_rule(82);
                for (i, job) in metrics::rank_jobs(&jobs).iter().take(limit).enumerate() {
                    println!(
                        "{:<5} {:<32} {:>6} {:>10} {:>6} {:>6} {:>9}",
                        i + 1,
                        truncate(&job.title, 30),
                        job.applications,
                        job.interviews,
                        job.offers,
                        job.hires,
                        format!("{:.1}%", metrics::job_hire_rate(job))
                    );
                }
            }
        }

        AnalyticsCommands::Interviews { range } => {
            let rows = api
                .interviews(&range.into())
                .context("Failed to load interview analytics")?;
            if rows.is_empty() {
                println!("No interviews for this period.");
            } else {
                println!(
                    "{:<28} {:>9} {:>9} {:>9} {:>9}",
                    "INTERVIEWER", "SCHEDULED", "COMPLETED", "PASS", "AVG SCORE"
                );
                render::print_rule(68);
                for row in rows {
                    println!(
                        "{:<28} {:>9} {:>9} {:>9} {:>9}",
                        truncate(&row.interviewer, 26),
                        row.scheduled,
                        row.completed,
                        render::rate(row.pass_rate),
                        row.avg_score
                            .map(|s| format!("{:.1}", s))
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }

        AnalyticsCommands::Sources { range } => {
            let sources = api.sources(&range.into()).context("Failed to load source analytics")?;
            if sources.is_empty() {
                println!("No applications for this period.");
            } else {
                println!(
                    "{:<24} {:>6} {:>7} {:>9}",
                    "SOURCE", "APPS", "SHARE", "HIRE RATE"
                );
                render::print_rule(49);
                for share in metrics::source_shares(&sources) {
                    println!(
                        "{:<24} {:>6} {:>7} {:>9}",
                        truncate(&share.source, 22),
                        share.applications,
                        format!("{:.1}%", share.share),
                        format!("{:.1}%", share.hire_rate)
                    );
                }
            }
        }
    }
    Ok(())
}

// --- Admin dashboard ---

fn print_stats(stats: &DashboardStats) {
    println!("Jobs:              {} ({} published)", stats.total_jobs, stats.published_jobs);
    println!("Pending approvals: {}", stats.pending_approvals);
    println!("Applications:      {}", stats.total_applications);
    println!("Active job boards: {}", stats.active_job_boards);
    println!("Open headcount:    {}", stats.open_headcount);
}

fn dashboard(client: &ApiClient, config: &Config, watch: bool) -> Result<()> {
    if !watch {
        let stats = client
            .analytics()
            .dashboard_stats()
            .context("Failed to load dashboard stats")?;
        print_stats(&stats);
        return Ok(());
    }

    let interval = config.poll_interval();
    let poll_client = client.clone();
    let (poller, updates) = Poller::spawn(interval, move || poll_client.analytics().dashboard_stats());
    info!(interval_secs = interval.as_secs(), "watching dashboard stats");

    let mut last: Option<DashboardStats> = None;
    loop {
        // The poller owns the cadence; this only waits for its next result.
        match updates.recv_timeout(interval + Duration::from_secs(60)) {
            Ok(Ok(stats)) => {
                println!("\n[{}]", chrono::Local::now().format("%H:%M:%S"));
                print_stats(&stats);
                last = Some(stats);
            }
            Ok(Err(e)) => {
                // Keep showing the previous figures.
                warn!(error = %e, "dashboard refresh failed");
                eprintln!("Refresh failed: {}", e);
                if last.is_none() {
                    drop(poller);
                    return Err(e).context("Failed to load dashboard stats");
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    drop(poller);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_company_update_only_touches_given_fields() {
        let mut company = Company {
            name: "Acme".into(),
            website: Some("https://acme.test".into()),
            mission: Some("Build".into()),
            ..Company::default()
        };
        let args = CompanyUpdateArgs {
            name: None,
            logo: None,
            website: Some("https://acme.example".into()),
            description: None,
            industry: None,
            founded_year: Some(2011),
            size: None,
            mission: None,
            vision: None,
            values: None,
            linkedin: Some("https://linkedin.com/company/acme".into()),
            twitter: None,
            facebook: None,
            instagram: None,
            github: None,
        };
        apply_company_update(&mut company, args);

        assert_eq!(company.name, "Acme");
        assert_eq!(company.website.as_deref(), Some("https://acme.example"));
        assert_eq!(company.mission.as_deref(), Some("Build"));
        assert_eq!(company.founded_year, Some(2011));
        assert_eq!(
            company.social_links.linkedin.as_deref(),
            Some("https://linkedin.com/company/acme")
        );
    }

    #[test]
    fn test_confirm_skips_prompt_with_yes() {
        assert!(confirm("Delete everything?", true).unwrap());
    }

    #[test]
    fn test_range_args_map_to_query_window() {
        let range: AnalyticsRange = RangeArgs {
            from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        }
        .into();
        assert_eq!(
            range.to_query(),
            vec![("startDate".to_string(), "2024-01-01".to_string())]
        );
    }
}
