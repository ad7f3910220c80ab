use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::Duration;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::company_cache::{CacheStatus, CompanyCache};
use crate::models::{Job, JobAction, JobFilter, JobStatus};
use crate::render::{date, html_to_text, truncate};
use crate::resource::ResourceList;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingOp {
    Transition(JobAction),
    Delete,
}

impl PendingOp {
    /// Reject asks for a free-text reason inside the confirm dialog.
    fn takes_reason(&self) -> bool {
        matches!(self, PendingOp::Transition(JobAction::Reject))
    }

    fn prompt(&self, title: &str) -> String {
        match self {
            PendingOp::Transition(action) => format!("{} '{}'?", action.label(), title),
            PendingOp::Delete => format!("Delete '{}'? This cannot be undone.", title),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Browse,
    Menu { cursor: usize },
    Confirm {
        job_id: String,
        title: String,
        op: PendingOp,
        reason: String,
    },
}

struct AppState {
    company: CompanyCache,
    jobs: ResourceList<Job>,
    filter: JobFilter,
    selected: usize,
    scroll_offset: u16,
    mode: Mode,
}

impl AppState {
    fn new(filter: JobFilter) -> Self {
        Self {
            company: CompanyCache::new(),
            jobs: ResourceList::new("jobs"),
            filter,
            selected: 0,
            scroll_offset: 0,
            mode: Mode::Browse,
        }
    }

    fn current_job(&self) -> Option<&Job> {
        self.jobs.get(self.selected)
    }

    fn current_actions(&self) -> &'static [JobAction] {
        self.current_job()
            .map(|j| j.status.available_actions())
            .unwrap_or(&[])
    }

    fn header(&self) -> String {
        match (self.company.status(), self.company.value()) {
            (CacheStatus::Loading, _) => {
                format!(" Loading company... - Jobs ({}) ", self.jobs.len())
            }
            (_, Some(company)) => format!(" {} - Jobs ({}) ", company.name, self.jobs.len()),
            _ => format!(" Jobs ({}) ", self.jobs.len()),
        }
    }

    /// Company header first, then the job list. The header falls back to a
    /// plain title if the profile cannot be loaded.
    fn load_all(&mut self, client: &ApiClient) {
        if self.company.ensure_loaded(client).is_err() {
            warn!(
                error = self.company.last_error().unwrap_or_default(),
                "company profile unavailable"
            );
        }
        self.reload(client);
    }

    fn reload(&mut self, client: &ApiClient) {
        let filter = self.filter.clone();
        self.jobs.load(|| client.jobs().list(&filter));
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.jobs.len() {
            self.selected = self.jobs.len().saturating_sub(1);
        }
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    /// Route through the confirm dialog when the operation is destructive.
    fn request(&mut self, op: PendingOp, client: &ApiClient) {
        let Some(job) = self.current_job() else { return };
        let (job_id, title) = (job.id.clone(), job.title.clone());

        let confirm = match op {
            PendingOp::Transition(action) => action.needs_confirmation(),
            PendingOp::Delete => true,
        };
        if confirm {
            self.mode = Mode::Confirm {
                job_id,
                title,
                op,
                reason: String::new(),
            };
        } else {
            self.mode = Mode::Browse;
            self.perform(client, &job_id, op, None);
        }
    }

    fn perform(&mut self, client: &ApiClient, job_id: &str, op: PendingOp, reason: Option<&str>) {
        let filter = self.filter.clone();
        let jobs = client.jobs();
        let outcome = match op {
            PendingOp::Transition(action) => self
                .jobs
                .mutate(
                    || jobs.transition(job_id, action, reason),
                    format!("Job {}", action.past_tense()),
                    || jobs.list(&filter),
                )
                .map(|_| ()),
            PendingOp::Delete => {
                self.jobs
                    .mutate(|| jobs.delete(job_id), "Job deleted", || jobs.list(&filter))
            }
        };
        // Failures are already on the banner.
        if outcome.is_ok() {
            info!(job_id, op = ?op, "job action applied");
        }
        self.clamp_selection();
    }

    /// Key handling inside the confirm dialog. Reject collects a reason as
    /// typed text, so only Enter and Esc act there.
    fn confirm_key(&mut self, client: &ApiClient, code: KeyCode) {
        let Mode::Confirm {
            job_id, op, reason, ..
        } = &mut self.mode
        else {
            return;
        };

        let confirmed = if op.takes_reason() {
            match code {
                KeyCode::Enter => Some(true),
                KeyCode::Esc => Some(false),
                KeyCode::Backspace => {
                    reason.pop();
                    None
                }
                KeyCode::Char(c) => {
                    reason.push(c);
                    None
                }
                _ => None,
            }
        } else {
            match code {
                KeyCode::Char('y') | KeyCode::Enter => Some(true),
                KeyCode::Char('n') | KeyCode::Esc => Some(false),
                _ => None,
            }
        };

        match confirmed {
            Some(true) => {
                let (job_id, op) = (job_id.clone(), *op);
                let reason = Some(reason.trim().to_string()).filter(|r| !r.is_empty());
                self.mode = Mode::Browse;
                self.perform(client, &job_id, op, reason.as_deref());
            }
            Some(false) => self.mode = Mode::Browse,
            None => {}
        }
    }
}

fn shortcut(code: KeyCode) -> Option<PendingOp> {
    match code {
        KeyCode::Char('s') => Some(PendingOp::Transition(JobAction::SubmitForApproval)),
        KeyCode::Char('a') => Some(PendingOp::Transition(JobAction::Approve)),
        KeyCode::Char('r') => Some(PendingOp::Transition(JobAction::Reject)),
        KeyCode::Char('p') => Some(PendingOp::Transition(JobAction::Publish)),
        KeyCode::Char('x') => Some(PendingOp::Transition(JobAction::Archive)),
        KeyCode::Char('d') => Some(PendingOp::Delete),
        _ => None,
    }
}

pub fn run_console(client: &ApiClient, filter: JobFilter) -> Result<()> {
    let mut state = AppState::new(filter);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut list_state = ListState::default();
    list_state.select(Some(0));

    let started = start(&mut terminal, &mut state, client, &mut list_state);
    let nothing_to_show = matches!(started, Ok(false));
    let result = match started {
        Ok(true) => run_loop(&mut terminal, &mut state, client, &mut list_state),
        Ok(false) => Ok(()),
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if nothing_to_show {
        println!("No jobs found.");
    }
    result
}

/// Draw the loading frame, then block on the first fetch. Returns false
/// when the filter matched no jobs at all.
fn start<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    client: &ApiClient,
    list_state: &mut ListState,
) -> Result<bool> {
    state.company.begin_refresh();
    state.jobs.begin_load();
    terminal.draw(|frame| draw(frame, state, list_state))?;

    state.load_all(client);
    Ok(!(state.jobs.has_loaded() && state.jobs.is_empty()))
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    client: &ApiClient,
    list_state: &mut ListState,
) -> Result<()> {
    loop {
        list_state.select(Some(state.selected));
        terminal.draw(|frame| draw(frame, state, list_state))?;

        // Wake up periodically so the success banner can expire.
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.mode.clone() {
            Mode::Browse => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc => {
                    if state.jobs.error().is_some() {
                        state.jobs.dismiss_error();
                    } else {
                        break;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('R') => {
                    state.jobs.begin_load();
                    terminal.draw(|frame| draw(frame, state, list_state))?;
                    state.reload(client);
                }
                KeyCode::Enter | KeyCode::Char('m') => {
                    if !state.current_actions().is_empty() {
                        state.mode = Mode::Menu { cursor: 0 };
                    }
                }
                code => {
                    if let Some(op) = shortcut(code) {
                        state.request(op, client);
                    }
                }
            },
            Mode::Menu { cursor } => {
                let actions = state.current_actions();
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Browse,
                    KeyCode::Down | KeyCode::Char('j') => {
                        state.mode = Mode::Menu {
                            cursor: (cursor + 1).min(actions.len().saturating_sub(1)),
                        }
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        state.mode = Mode::Menu {
                            cursor: cursor.saturating_sub(1),
                        }
                    }
                    KeyCode::Enter => match actions.get(cursor) {
                        Some(action) => state.request(PendingOp::Transition(*action), client),
                        None => state.mode = Mode::Browse,
                    },
                    _ => {}
                }
            }
            Mode::Confirm { .. } => state.confirm_key(client, key.code),
        }
    }
    Ok(())
}

fn status_style(status: JobStatus) -> Style {
    match status {
        JobStatus::Draft => Style::default().fg(Color::Gray),
        JobStatus::PendingApproval => Style::default().fg(Color::Yellow),
        JobStatus::Approved => Style::default().fg(Color::Cyan),
        JobStatus::Published => Style::default().fg(Color::Green),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::Archived => Style::default().fg(Color::DarkGray),
    }
}

fn status_icon(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Draft => " ",
        JobStatus::PendingApproval => "?",
        JobStatus::Approved => "+",
        JobStatus::Published => "*",
        JobStatus::Rejected => "x",
        JobStatus::Archived => "-",
    }
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .items()
        .iter()
        .map(|job| {
            let location = job.location.as_deref().unwrap_or("-");
            ListItem::new(format!(
                "{} {} | {}",
                status_icon(job.status),
                truncate(&job.title, 32),
                location
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.header()),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    // Banner line: loading, then error, then success
    let banner = if state.jobs.is_loading() {
        Paragraph::new(" Loading jobs...").style(Style::default().fg(Color::Yellow))
    } else if let Some(err) = state.jobs.error() {
        Paragraph::new(format!(" {}  (R: retry)", err)).style(Style::default().fg(Color::Red))
    } else if let Some(msg) = state.jobs.success() {
        Paragraph::new(format!(" {}", msg)).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(banner, rows[1]);

    let help = Paragraph::new(
        " j/k:navigate  J/K:scroll  enter:actions  s:submit a:approve r:reject p:publish x:archive d:delete  R:reload  esc:dismiss  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);

    match &state.mode {
        Mode::Browse => {}
        Mode::Menu { cursor } => draw_menu(frame, state.current_actions(), *cursor),
        Mode::Confirm {
            title, op, reason, ..
        } => {
            if op.takes_reason() {
                draw_confirm(frame, &op.prompt(title), Some(reason.as_str()))
            } else {
                draw_confirm(frame, &op.prompt(title), None)
            }
        }
    }
}

fn draw_menu(frame: &mut Frame, actions: &[JobAction], cursor: usize) {
    let area = centered_rect(32, actions.len() as u16 + 2, frame.area());
    let items: Vec<ListItem> = actions.iter().map(|a| ListItem::new(a.label())).collect();
    let menu = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Actions "))
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut menu_state = ListState::default();
    menu_state.select(Some(cursor));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(menu, area, &mut menu_state);
}

fn draw_confirm(frame: &mut Frame, prompt: &str, reason: Option<&str>) {
    let hint = Style::default().fg(Color::DarkGray);
    let lines = match reason {
        Some(reason) => vec![
            Line::from(prompt.to_string()),
            Line::from(format!("Reason: {}_", reason)),
            Line::from(Span::styled("enter: confirm   esc: cancel", hint)),
        ],
        None => vec![
            Line::from(prompt.to_string()),
            Line::from(""),
            Line::from(Span::styled("y: confirm   n: cancel", hint)),
        ],
    };
    let area = centered_rect(60, 5, frame.area());
    let dialog = Paragraph::new(lines)
    .block(Block::default().borders(Borders::ALL).title(" Confirm "))
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(job) = state.current_job() else {
        if state.jobs.is_loading() {
            return Text::raw("Loading...");
        }
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", job.status),
        status_style(job.status),
    )));

    if let Some(internal_id) = &job.internal_id {
        lines.push(Line::from(format!("Internal ID: {}", internal_id)));
    }
    if let Some(location) = &job.location {
        lines.push(Line::from(format!("Location: {}", location)));
    }
    if !job.departments.is_empty() {
        let names: Vec<&str> = job.departments.iter().map(|d| d.label()).collect();
        lines.push(Line::from(format!("Departments: {}", names.join(", "))));
    }
    if !job.offices.is_empty() {
        let names: Vec<&str> = job.offices.iter().map(|o| o.label()).collect();
        lines.push(Line::from(format!("Offices: {}", names.join(", "))));
    }
    if let Some(headcount) = &job.headcount_id {
        lines.push(Line::from(format!("Headcount request: {}", headcount)));
    }
    if let Some(reason) = &job.rejection_reason {
        lines.push(Line::from(Span::styled(
            format!("Rejected: {}", reason),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(format!(
        "Created {}  Updated {}",
        date(job.created_at),
        date(job.updated_at)
    )));

    let actions: Vec<&str> = job.status.available_actions().iter().map(|a| a.label()).collect();
    if !actions.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Actions: {}", actions.join(" | ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));

    match job.content.as_deref().map(html_to_text) {
        Some(text) if !text.is_empty() => {
            for line in text.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        _ => lines.push(Line::from(Span::styled(
            "(No description)",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    Text::from(lines)
}
