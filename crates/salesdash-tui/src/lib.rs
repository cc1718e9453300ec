// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use salesdash_app::{
    AppCommand, AppState, Column, FetchError, FetchOutcome, FetchTicket, FilterField, Focus,
    PageSize, QueryState, ResultPage, SalesRep, SalesRepQuery, SortOrder, TableCommand,
    TableController, TableEvent, TableSummary,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, warn};

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const PANEL_MARK_OPEN: &str = "▲";
const PANEL_MARK_CLOSED: &str = "▼";

/// Data access for the dashboard. `spawn_*` may run the work on another thread
/// as long as the result comes back through `tx`.
pub trait AppRuntime {
    fn fetch_sales_reps(&mut self, query: &SalesRepQuery) -> Result<ResultPage, FetchError>;
    fn ask(&mut self, question: &str) -> Result<String>;
    fn source_label(&self) -> String;

    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.fetch_sales_reps(&ticket.query);
        tx.send(InternalEvent::Fetched {
            request_id: ticket.request_id,
            result,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }

    fn spawn_ask(
        &mut self,
        request_id: u64,
        question: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.ask(question).map_err(|error| error.to_string());
        tx.send(InternalEvent::Answered { request_id, result })
            .map_err(|_| anyhow!("question event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        request_id: u64,
        result: Result<ResultPage, FetchError>,
    },
    Answered {
        request_id: u64,
        result: Result<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct QuestionUiState {
    input: String,
    answer: Option<String>,
    error: Option<String>,
    last_request_id: u64,
    in_flight: Option<u64>,
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    table: TableController,
    cursor_row: usize,
    cursor_col: usize,
    question: QuestionUiState,
    source: String,
    status_token: u64,
    last_updated: Option<OffsetDateTime>,
}

impl ViewData {
    fn new(page_size: PageSize, source: String) -> Self {
        Self {
            table: TableController::new(page_size),
            source,
            ..Self::default()
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    page_size: PageSize,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(page_size, runtime.source_label());
    let (internal_tx, internal_rx) = mpsc::channel();
    start_view(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_view<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let ticket = view_data.table.mount();
    issue_fetch(state, runtime, view_data, internal_tx, ticket);
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched { request_id, result } => {
                let outcome = view_data.table.complete_fetch(request_id, result);
                report_fetch_outcome(state, view_data, tx, outcome);
            }
            InternalEvent::Answered { request_id, result } => {
                handle_answer(state, view_data, tx, request_id, result);
            }
        }
    }
}

fn issue_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    ticket: FetchTicket,
) {
    let request_id = ticket.request_id;
    if let Err(error) = runtime.spawn_fetch(ticket, internal_tx.clone()) {
        warn!(request_id, %error, "could not start fetch");
        let outcome = view_data
            .table
            .complete_fetch(request_id, Err(FetchError::NetworkFailure(error.to_string())));
        report_fetch_outcome(state, view_data, internal_tx, outcome);
    }
}

fn report_fetch_outcome(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    outcome: FetchOutcome,
) {
    match outcome {
        FetchOutcome::Applied { .. } => {
            view_data.last_updated = Some(OffsetDateTime::now_utc());
            let last = view_data.table.rows().len().saturating_sub(1);
            view_data.cursor_row = view_data.cursor_row.min(last);
        }
        FetchOutcome::Failed { error, .. } => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("fetch failed: {error}; press R to retry"),
            );
        }
        FetchOutcome::Discarded { .. } => {}
    }
}

fn handle_answer(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    request_id: u64,
    result: Result<String, String>,
) {
    if view_data.question.in_flight != Some(request_id) {
        debug!(
            request_id,
            latest = view_data.question.last_request_id,
            "discard stale answer"
        );
        return;
    }
    view_data.question.in_flight = None;

    match result {
        Ok(answer) => {
            view_data.question.answer = Some(answer);
            view_data.question.error = None;
        }
        Err(error) => {
            view_data.question.answer = None;
            view_data.question.error = Some(error.clone());
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("question failed: {error}"),
            );
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if state.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            state.dispatch(AppCommand::ToggleHelp);
        }
        return false;
    }

    match state.focus {
        Focus::Question => {
            handle_question_key(state, runtime, view_data, internal_tx, key);
            false
        }
        Focus::Filters(field) => {
            handle_filter_key(state, runtime, view_data, internal_tx, field, key);
            false
        }
        Focus::Table => handle_table_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_table_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => move_cursor_row(view_data, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => move_cursor_row(view_data, -1),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => move_cursor_col(view_data, -1),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => move_cursor_col(view_data, 1),
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            if !run_table_command(state, runtime, view_data, internal_tx, TableCommand::NextPage) {
                emit_status(state, view_data, internal_tx, "already on the last page");
            }
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            if !run_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::PreviousPage,
            ) {
                emit_status(state, view_data, internal_tx, "already on the first page");
            }
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            run_table_command(state, runtime, view_data, internal_tx, TableCommand::SetPage(1));
        }
        (KeyCode::Char('G'), _) => {
            let last = view_data.table.result().total_pages;
            if last > 0 {
                run_table_command(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    TableCommand::SetPage(last),
                );
            }
        }
        (KeyCode::Char('z'), KeyModifiers::NONE) => {
            let size = view_data.table.query().page_size().cycled();
            run_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::SetPageSize(size),
            );
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} rows per page", size.get()),
            );
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            let column = Column::ALL[view_data.cursor_col];
            sort_by(state, runtime, view_data, internal_tx, column);
        }
        (KeyCode::Char(digit @ '1'..='7'), _) => {
            let index = digit as usize - '1' as usize;
            view_data.cursor_col = index;
            sort_by(state, runtime, view_data, internal_tx, Column::ALL[index]);
        }
        (KeyCode::Enter, _) => {
            let row = view_data.cursor_row;
            run_table_command(state, runtime, view_data, internal_tx, TableCommand::SelectRow(row));
        }
        (KeyCode::Esc, _) => {
            run_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::ClearSelection,
            );
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            state.dispatch(AppCommand::ToggleFilters);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            reset_filters(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('R'), _) => {
            let ticket = view_data.table.begin_fetch(false);
            issue_fetch(state, runtime, view_data, internal_tx, ticket);
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) | (KeyCode::Char('@'), _) => {
            state.dispatch(AppCommand::OpenQuestion);
        }
        (KeyCode::Char('?'), _) => {
            state.dispatch(AppCommand::ToggleHelp);
        }
        _ => {}
    }
    false
}

fn handle_filter_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    field: FilterField,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::CloseFilters);
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => {
            state.dispatch(AppCommand::NextFilterField);
        }
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
            state.dispatch(AppCommand::PrevFilterField);
        }
        (KeyCode::Enter, _) => {
            run_table_command(state, runtime, view_data, internal_tx, TableCommand::ApplyFilters);
            state.dispatch(AppCommand::CloseFilters);
            emit_status(state, view_data, internal_tx, "filters applied");
        }
        (KeyCode::Char('r'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            reset_filters(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Backspace, _) => {
            let mut value = view_data.table.query().draft_filters().get(field).to_owned();
            value.pop();
            run_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::EditDraftFilter(field, value),
            );
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let mut value = view_data.table.query().draft_filters().get(field).to_owned();
            value.push(ch);
            run_table_command(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::EditDraftFilter(field, value),
            );
        }
        _ => {}
    }
}

fn handle_question_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::CloseQuestion);
        }
        (KeyCode::Enter, _) => submit_question(runtime, view_data, internal_tx),
        (KeyCode::Backspace, _) => {
            view_data.question.input.pop();
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.question.input.push(ch);
        }
        _ => {}
    }
}

fn submit_question<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let question = view_data.question.input.trim().to_owned();
    if question.is_empty() {
        view_data.question.answer = None;
        view_data.question.error = Some("Question is required".to_owned());
        return;
    }

    view_data.question.last_request_id = view_data.question.last_request_id.saturating_add(1);
    let request_id = view_data.question.last_request_id;
    view_data.question.in_flight = Some(request_id);
    view_data.question.error = None;

    if let Err(error) = runtime.spawn_ask(request_id, &question, internal_tx.clone()) {
        warn!(request_id, %error, "could not start question");
        view_data.question.in_flight = None;
        view_data.question.error = Some(error.to_string());
    }
}

/// Applies `command` to the table controller and starts any fetch it issues.
/// Returns whether a fetch was issued.
fn run_table_command<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: TableCommand,
) -> bool {
    let mut issued = false;
    for event in view_data.table.dispatch(command) {
        match event {
            TableEvent::FetchIssued(ticket) => {
                issued = true;
                issue_fetch(state, runtime, view_data, internal_tx, ticket);
            }
            TableEvent::SelectionChanged(Some(_)) => {
                state.dispatch(AppCommand::ShowDetail);
            }
            TableEvent::SelectionChanged(None) => {
                state.dispatch(AppCommand::HideDetail);
            }
            TableEvent::DraftEdited(_) | TableEvent::FiltersReset => {}
        }
    }
    issued
}

fn sort_by<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    column: Column,
) {
    if !column.is_sortable() {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("{} is not sortable", column.header()),
        );
        return;
    }
    run_table_command(state, runtime, view_data, internal_tx, TableCommand::Sort(column));
}

fn reset_filters<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    run_table_command(state, runtime, view_data, internal_tx, TableCommand::ResetFilters);
    emit_status(
        state,
        view_data,
        internal_tx,
        "filters cleared; rows refresh on the next page change or R",
    );
}

fn move_cursor_row(view_data: &mut ViewData, delta: isize) {
    let len = view_data.table.rows().len();
    if len == 0 {
        view_data.cursor_row = 0;
        return;
    }
    let next = (view_data.cursor_row as isize + delta).clamp(0, len as isize - 1);
    view_data.cursor_row = next as usize;
}

fn move_cursor_col(view_data: &mut ViewData, delta: isize) {
    let last = Column::ALL.len() as isize - 1;
    view_data.cursor_col = (view_data.cursor_col as isize + delta).clamp(0, last) as usize;
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let filter_height = if state.filters_open { 3 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(filter_height),
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data))
        .block(Block::default().title("salesdash").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    if state.filters_open {
        let filters = Paragraph::new(filter_panel_text(state, view_data.table.query()))
            .block(Block::default().title("filters").borders(Borders::ALL));
        frame.render_widget(filters, layout[1]);
    }

    match view_data.table.selection() {
        Some(rep) if state.detail_open => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(layout[2]);
            render_table(frame, body[0], state, view_data);
            let detail = Paragraph::new(detail_text(rep))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title("detail")
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::Cyan)),
                );
            frame.render_widget(detail, body[1]);
        }
        _ => render_table(frame, layout[2], state, view_data),
    }

    let question = Paragraph::new(question_text(state, &view_data.question))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("ask a question").borders(Borders::ALL));
    frame.render_widget(question, layout[3]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[4]);

    if state.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let query = view_data.table.query();
    let header_cells = Column::ALL.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if index == view_data.cursor_col {
            style = style.fg(Color::Cyan);
        }
        Cell::from(header_label(*column, query)).style(style)
    });
    let header = Row::new(header_cells);

    let highlighted = view_data.table.highlighted_row();
    let table_focused = state.focus == Focus::Table;
    let rows = view_data
        .table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, rep)| {
            let mut style = Style::default();
            if Some(index) == highlighted {
                style = style.fg(Color::Black).bg(Color::LightBlue);
            }
            if table_focused && index == view_data.cursor_row {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Row::new(row_cells(rep)).style(style)
        });

    let widths = [
        Constraint::Length(6),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Min(12),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    let summary = view_data.table.summary();
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(pagination_text(&summary, query.page_size()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label(column: Column, query: &QueryState) -> String {
    let mut label = column.header().to_owned();
    if column.sort_field() == Some(query.sort_field()) {
        label.push(' ');
        label.push_str(match query.sort_order() {
            SortOrder::Asc => SORT_MARK_ASC,
            SortOrder::Desc => SORT_MARK_DESC,
        });
    }
    label
}

fn row_cells(rep: &SalesRep) -> Vec<String> {
    vec![
        rep.id.to_string(),
        rep.name.clone(),
        rep.role.clone(),
        rep.region.clone(),
        format!("{} skills", rep.skills.len()),
        format!("{} deals", rep.deals.len()),
        format!("{} clients", rep.clients.len()),
    ]
}

fn pagination_text(summary: &TableSummary, page_size: PageSize) -> String {
    let previous = if summary.can_previous { "[p]rev" } else { "-" };
    let next = if summary.can_next { "[n]ext" } else { "-" };
    let mut text = format!(
        "{previous} | {} | {next} | {} | {} per page",
        summary.page_label(),
        summary.results_label(),
        page_size.get(),
    );
    if summary.loading {
        text.push_str(" | loading");
    }
    text
}

fn header_text(state: &AppState, view_data: &ViewData) -> String {
    let query = view_data.table.query();
    let applied = query.applied_filters().active();
    let filters = if applied.is_empty() {
        "none".to_owned()
    } else {
        applied
            .iter()
            .map(|(field, value)| format!("{}={value}", field.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let panel = if state.filters_open {
        PANEL_MARK_OPEN
    } else {
        PANEL_MARK_CLOSED
    };
    let mut text = format!(
        "{} | sort {} {} | filters {panel} {filters}",
        view_data.source,
        query.sort_field().as_str(),
        query.sort_order().as_str(),
    );
    if query.has_unapplied_draft() {
        text.push_str(" (unapplied edits)");
    }
    text.push_str(" | ");
    text.push_str(&updated_label(view_data.last_updated));
    text
}

fn updated_label(last_updated: Option<OffsetDateTime>) -> String {
    last_updated
        .and_then(|at| {
            at.format(&format_description!("[hour]:[minute]:[second]"))
                .ok()
        })
        .map_or_else(
            || "not loaded".to_owned(),
            |clock| format!("updated {clock} UTC"),
        )
}

fn filter_panel_text(state: &AppState, query: &QueryState) -> String {
    let focused = match state.focus {
        Focus::Filters(field) => Some(field),
        _ => None,
    };
    FilterField::ALL
        .iter()
        .map(|field| {
            let value = query.draft_filters().get(*field);
            if focused == Some(*field) {
                format!("> {}: {value}_", field.label())
            } else {
                format!("  {}: {value}", field.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn detail_text(rep: &SalesRep) -> String {
    let mut lines = vec![
        format!("{} - {}", rep.name, rep.role),
        format!("Region: {}", rep.region),
        String::new(),
    ];

    if rep.skills.is_empty() {
        lines.push("Skills: none".to_owned());
    } else {
        lines.push(format!("Skills: {}", rep.skills.join(", ")));
    }
    lines.push(String::new());

    lines.push(format!(
        "Deals ({}) won {} of {}",
        rep.deals.len(),
        format_money(rep.won_deal_value()),
        format_money(rep.total_deal_value()),
    ));
    for deal in &rep.deals {
        lines.push(format!(
            "  {} {} [{}]",
            deal.client,
            format_money(deal.value),
            deal.status.as_str()
        ));
    }
    lines.push(String::new());

    lines.push(format!("Clients ({})", rep.clients.len()));
    for client in &rep.clients {
        lines.push(format!("  {}", client.name));
        lines.push(format!("    Industry: {}", client.industry));
        lines.push(format!("    Contact: {}", client.contact));
    }
    lines.join("\n")
}

fn question_text(state: &AppState, question: &QuestionUiState) -> String {
    let prompt = if state.focus == Focus::Question {
        format!("> {}_", question.input)
    } else if question.input.is_empty() {
        "press a to ask a question".to_owned()
    } else {
        format!("> {}", question.input)
    };

    let reply = if question.in_flight.is_some() {
        "asking...".to_owned()
    } else if let Some(error) = &question.error {
        format!("error: {error}")
    } else if let Some(answer) = &question.answer {
        format!("AI Response: {answer}")
    } else {
        String::new()
    };

    if reply.is_empty() {
        prompt
    } else {
        format!("{prompt}\n{reply}")
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if state.help_visible {
        return String::new();
    }

    let (mode, hints) = match state.focus {
        Focus::Table => (
            "TABLE",
            "j/k/h/l move | n/p g/G page | z size | s or 1-4 sort | enter detail | f filter r reset | a ask | ? help | q quit",
        ),
        Focus::Filters(_) => (
            "FILTER",
            "type to edit | tab field | enter apply | ctrl+r reset | esc close",
        ),
        Focus::Question => ("ASK", "type question | enter ask | esc close"),
    };

    let mut parts = vec![mode.to_owned()];
    if let Some(error) = view_data.table.error() {
        parts.push(format!("error: {error}"));
    }
    if let Some(status) = &state.status_line {
        parts.push(status.clone());
    }
    parts.push(hints.to_owned());
    parts.join(" | ")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
table: j/k row | h/l column | enter show detail | esc close detail\n\
pages: n/pgdn next | p/pgup previous | g first | G last | z page size 1/5/10\n\
sort: s sort cursor column | 1-4 sort by ID/Name/Role/Region | again to flip order\n\
filters: f open | tab/shift+tab field | type to edit | enter apply | ctrl+r or r reset | esc close\n\
data: R reload current page\n\
question: a open | enter ask | esc close"
}

fn format_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    match cents % 100 {
        0 => format!("{sign}${whole}"),
        fraction => format!("{sign}${whole}.{fraction:02}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InternalEvent, ViewData, detail_text, filter_panel_text, format_money,
        handle_key_event, header_label, header_text, help_overlay_text, pagination_text,
        process_internal_events, question_text, row_cells, start_view, status_text,
        updated_label,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use salesdash_app::{
        AppState, Column, DealStatus, FetchError, FetchTicket, FilterField, Focus, PageSize,
        ResultPage, SalesRepId, SalesRepQuery, SortField, SortOrder,
    };
    use salesdash_testkit::{RepFaker, fixture_page};
    use std::sync::mpsc::{self, Receiver, Sender};
    use time::OffsetDateTime;

    #[derive(Debug, Default)]
    struct TestRuntime {
        pages: Vec<Result<ResultPage, FetchError>>,
        queries: Vec<SalesRepQuery>,
        questions: Vec<String>,
    }

    impl TestRuntime {
        fn answering(pages: Vec<Result<ResultPage, FetchError>>) -> Self {
            Self {
                pages,
                ..Self::default()
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn fetch_sales_reps(&mut self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
            self.queries.push(query.clone());
            if self.pages.is_empty() {
                return Ok(fixture_page(1, 10, 3, 25));
            }
            self.pages.remove(0)
        }

        fn ask(&mut self, question: &str) -> anyhow::Result<String> {
            self.questions.push(question.to_owned());
            Ok(format!(
                "This is a placeholder answer to your question: {question}"
            ))
        }

        fn source_label(&self) -> String {
            "test".to_owned()
        }
    }

    /// Holds tickets and questions until the test resolves them by hand.
    #[derive(Debug, Default)]
    struct DeferredRuntime {
        tickets: Vec<FetchTicket>,
        asked: Vec<(u64, String)>,
    }

    impl AppRuntime for DeferredRuntime {
        fn fetch_sales_reps(&mut self, _query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
            Ok(ResultPage::default())
        }

        fn ask(&mut self, _question: &str) -> anyhow::Result<String> {
            Ok(String::new())
        }

        fn source_label(&self) -> String {
            "deferred".to_owned()
        }

        fn spawn_fetch(
            &mut self,
            ticket: FetchTicket,
            _tx: Sender<InternalEvent>,
        ) -> anyhow::Result<()> {
            self.tickets.push(ticket);
            Ok(())
        }

        fn spawn_ask(
            &mut self,
            request_id: u64,
            question: &str,
            _tx: Sender<InternalEvent>,
        ) -> anyhow::Result<()> {
            self.asked.push((request_id, question.to_owned()));
            Ok(())
        }
    }

    struct Harness<R: AppRuntime> {
        state: AppState,
        runtime: R,
        view_data: ViewData,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
    }

    impl<R: AppRuntime> Harness<R> {
        fn start(runtime: R) -> Self {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: AppState::default(),
                view_data: ViewData::new(PageSize::Ten, runtime.source_label()),
                runtime,
                tx,
                rx,
            };
            start_view(
                &mut harness.state,
                &mut harness.runtime,
                &mut harness.view_data,
                &harness.tx,
            );
            harness.pump();
            harness
        }

        fn pump(&mut self) {
            process_internal_events(&mut self.state, &mut self.view_data, &self.tx, &self.rx);
        }

        fn key_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
            let quit = handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.view_data,
                &self.tx,
                KeyEvent::new(code, modifiers),
            );
            self.pump();
            quit
        }

        fn key(&mut self, code: KeyCode) -> bool {
            self.key_with(code, KeyModifiers::NONE)
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.key(KeyCode::Char(ch));
            }
        }

        fn row_ids(&self) -> Vec<i64> {
            self.view_data
                .table
                .rows()
                .iter()
                .map(|rep| rep.id.get())
                .collect()
        }
    }

    fn page_of(ids: &[i64], total_pages: u32, total_count: u64) -> ResultPage {
        let mut faker = RepFaker::new(9);
        let rows = ids
            .iter()
            .map(|id| {
                let mut rep = faker.sales_rep();
                rep.id = SalesRepId::new(*id);
                rep
            })
            .collect();
        ResultPage {
            rows,
            total_pages,
            total_count,
        }
    }

    #[test]
    fn start_loads_first_page_with_default_query() {
        let harness = Harness::start(TestRuntime::default());

        assert_eq!(harness.runtime.queries.len(), 1);
        let query = &harness.runtime.queries[0];
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, PageSize::Ten);
        assert_eq!(query.sort_field, SortField::Id);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(harness.view_data.table.rows().len(), 10);
        assert!(harness.view_data.last_updated.is_some());

        let summary = harness.view_data.table.summary();
        assert_eq!(summary.results_label(), "Showing 10 of 25 results");
        assert!(summary.can_next);
        assert!(!summary.can_previous);
    }

    #[test]
    fn quit_keys_exit() {
        let mut harness = Harness::start(TestRuntime::default());
        assert!(harness.key_with(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(harness.key(KeyCode::Char('q')));
        assert!(!harness.key(KeyCode::Char('x')));
    }

    #[test]
    fn next_and_previous_page_keys_fetch() {
        let mut harness = Harness::start(TestRuntime::default());

        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.runtime.queries.last().map(|q| q.page), Some(2));
        harness.key(KeyCode::PageUp);
        assert_eq!(harness.runtime.queries.last().map(|q| q.page), Some(1));

        let before = harness.runtime.queries.len();
        harness.key(KeyCode::Char('p'));
        assert_eq!(harness.runtime.queries.len(), before);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("already on the first page")
        );
    }

    #[test]
    fn last_page_key_then_next_is_noop() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('G'));
        assert_eq!(harness.view_data.table.query().page(), 3);

        let before = harness.runtime.queries.len();
        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.runtime.queries.len(), before);
        assert!(!harness.view_data.table.summary().can_next);
    }

    #[test]
    fn page_size_key_cycles_and_returns_to_first_page() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('n'));
        harness.key(KeyCode::Char('z'));

        let query = harness.runtime.queries.last().expect("page size fetch");
        assert_eq!(query.page_size, PageSize::One);
        assert_eq!(query.page, 1);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("1 rows per page")
        );
    }

    #[test]
    fn digit_keys_sort_and_flip_order() {
        let mut harness = Harness::start(TestRuntime::default());

        harness.key(KeyCode::Char('2'));
        let query = harness.runtime.queries.last().expect("sort fetch");
        assert_eq!(query.sort_field, SortField::Name);
        assert_eq!(query.sort_order, SortOrder::Asc);

        harness.key(KeyCode::Char('2'));
        let query = harness.runtime.queries.last().expect("sort fetch");
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(harness.view_data.cursor_col, 1);
    }

    #[test]
    fn aggregate_column_sort_reports_status_without_fetch() {
        let mut harness = Harness::start(TestRuntime::default());
        let before = harness.runtime.queries.len();

        harness.key(KeyCode::Char('6'));
        assert_eq!(harness.runtime.queries.len(), before);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("Deals is not sortable")
        );
    }

    #[test]
    fn sort_key_uses_cursor_column() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('l'));
        harness.key(KeyCode::Char('l'));
        harness.key(KeyCode::Char('s'));

        let query = harness.runtime.queries.last().expect("sort fetch");
        assert_eq!(query.sort_field, SortField::Role);
    }

    #[test]
    fn filter_panel_edits_draft_and_applies_on_enter() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('n'));
        let before = harness.runtime.queries.len();

        harness.key(KeyCode::Char('f'));
        assert!(harness.state.filters_open);
        assert_eq!(harness.state.focus, Focus::Filters(FilterField::Id));

        harness.key(KeyCode::Tab);
        harness.type_text("jox");
        harness.key(KeyCode::Backspace);
        assert_eq!(harness.runtime.queries.len(), before);
        assert_eq!(
            harness.view_data.table.query().draft_filters().get(FilterField::Name),
            "jo"
        );
        assert!(header_text(&harness.state, &harness.view_data).contains("(unapplied edits)"));

        harness.key(KeyCode::Enter);
        let query = harness.runtime.queries.last().expect("apply fetch");
        assert_eq!(query.page, 1);
        assert_eq!(query.filter(FilterField::Name), Some("jo"));
        assert!(!harness.state.filters_open);
        assert_eq!(harness.state.focus, Focus::Table);
        assert_eq!(harness.state.status_line.as_deref(), Some("filters applied"));
    }

    #[test]
    fn page_turn_after_apply_sends_no_filters() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('f'));
        harness.key(KeyCode::Tab);
        harness.type_text("jo");
        harness.key(KeyCode::Enter);
        let query = harness.runtime.queries.last().expect("apply fetch");
        assert_eq!(query.filter(FilterField::Name), Some("jo"));

        harness.key(KeyCode::Char('n'));
        let query = harness.runtime.queries.last().expect("page fetch");
        assert_eq!(query.page, 2);
        assert!(query.filters.is_empty());

        harness.key(KeyCode::Char('R'));
        let query = harness.runtime.queries.last().expect("reload fetch");
        assert!(query.filters.is_empty());
        assert!(header_text(&harness.state, &harness.view_data).contains("name=jo"));
    }

    #[test]
    fn reset_clears_filters_without_fetching() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('f'));
        harness.type_text("7");
        harness.key(KeyCode::Enter);
        let before = harness.runtime.queries.len();

        harness.key(KeyCode::Char('r'));
        assert_eq!(harness.runtime.queries.len(), before);
        assert!(harness.view_data.table.query().applied_filters().is_empty());

        harness.key(KeyCode::Char('f'));
        harness.type_text("3");
        harness.key_with(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(harness.runtime.queries.len(), before);
        assert!(harness.view_data.table.query().draft_filters().is_empty());
    }

    #[test]
    fn enter_selects_row_and_detail_survives_page_change() {
        let mut harness = Harness::start(TestRuntime::answering(vec![
            Ok(page_of(&[1, 2, 3], 2, 6)),
            Ok(page_of(&[4, 5, 6], 2, 6)),
        ]));

        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Enter);
        assert!(harness.state.detail_open);
        assert_eq!(harness.view_data.table.highlighted_row(), Some(1));
        let name = harness
            .view_data
            .table
            .selection()
            .map(|rep| rep.name.clone())
            .expect("selection");

        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.row_ids(), vec![4, 5, 6]);
        assert!(harness.state.detail_open);
        assert_eq!(harness.view_data.table.highlighted_row(), None);
        let selection = harness.view_data.table.selection().expect("still selected");
        assert_eq!(selection.id, SalesRepId::new(2));
        assert!(detail_text(selection).starts_with(&name));

        harness.key(KeyCode::Esc);
        assert!(!harness.state.detail_open);
        assert!(harness.view_data.table.selection().is_none());
    }

    #[test]
    fn cursor_is_clamped_to_shorter_page() {
        let mut harness = Harness::start(TestRuntime::answering(vec![
            Ok(page_of(&[1, 2, 3], 2, 4)),
            Ok(page_of(&[4], 2, 4)),
        ]));
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Char('j'));
        harness.key(KeyCode::Char('j'));
        assert_eq!(harness.view_data.cursor_row, 2);

        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.view_data.cursor_row, 0);
    }

    #[test]
    fn stale_fetch_result_is_discarded() {
        let mut harness = Harness::start(DeferredRuntime::default());
        let mount = harness.runtime.tickets.remove(0);
        harness
            .tx
            .send(InternalEvent::Fetched {
                request_id: mount.request_id,
                result: Ok(page_of(&[1], 3, 25)),
            })
            .expect("send");
        harness.pump();

        harness.key(KeyCode::Char('n'));
        harness.key(KeyCode::Char('3'));
        let sort = harness.runtime.tickets.pop().expect("sort ticket");
        let next = harness.runtime.tickets.pop().expect("next ticket");
        assert!(harness.view_data.table.is_loading());

        harness
            .tx
            .send(InternalEvent::Fetched {
                request_id: sort.request_id,
                result: Ok(page_of(&[20, 21], 3, 25)),
            })
            .expect("send");
        harness
            .tx
            .send(InternalEvent::Fetched {
                request_id: next.request_id,
                result: Ok(page_of(&[11], 3, 25)),
            })
            .expect("send");
        harness.pump();

        assert_eq!(harness.row_ids(), vec![20, 21]);
        assert!(!harness.view_data.table.is_loading());
    }

    #[test]
    fn failed_fetch_keeps_rows_and_surfaces_error() {
        let mut harness = Harness::start(TestRuntime::answering(vec![
            Ok(page_of(&[1, 2], 2, 4)),
            Err(FetchError::NetworkFailure("connection refused".to_owned())),
        ]));

        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.row_ids(), vec![1, 2]);
        let status = status_text(&harness.state, &harness.view_data);
        assert!(status.contains("error: network failure: connection refused"));
        assert!(
            harness
                .state
                .status_line
                .as_deref()
                .is_some_and(|line| line.contains("press R to retry"))
        );

        harness.key(KeyCode::Char('R'));
        assert!(harness.view_data.table.error().is_none());
    }

    #[test]
    fn closed_channel_resolves_fetch_as_network_failure() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::new(PageSize::Five, runtime.source_label());

        start_view(&mut state, &mut runtime, &mut view_data, &tx);
        assert!(!view_data.table.is_loading());
        assert!(matches!(
            view_data.table.error(),
            Some(FetchError::NetworkFailure(_))
        ));
    }

    #[test]
    fn empty_question_is_rejected_locally() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('a'));
        assert_eq!(harness.state.focus, Focus::Question);

        harness.type_text("   ");
        harness.key(KeyCode::Enter);
        assert!(harness.runtime.questions.is_empty());
        assert_eq!(
            harness.view_data.question.error.as_deref(),
            Some("Question is required")
        );
    }

    #[test]
    fn question_round_trip_shows_answer() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('@'));
        harness.type_text("Top region?");
        harness.key(KeyCode::Enter);

        assert_eq!(harness.runtime.questions, vec!["Top region?".to_owned()]);
        let text = question_text(&harness.state, &harness.view_data.question);
        assert!(text.contains(
            "AI Response: This is a placeholder answer to your question: Top region?"
        ));

        harness.key(KeyCode::Esc);
        assert_eq!(harness.state.focus, Focus::Table);
    }

    #[test]
    fn stale_answer_is_ignored() {
        let mut harness = Harness::start(DeferredRuntime::default());
        harness.key(KeyCode::Char('a'));
        harness.type_text("first");
        harness.key(KeyCode::Enter);
        harness.type_text(" again");
        harness.key(KeyCode::Enter);

        let (latest, _) = harness.runtime.asked.pop().expect("second question");
        let (stale, _) = harness.runtime.asked.pop().expect("first question");
        harness
            .tx
            .send(InternalEvent::Answered {
                request_id: latest,
                result: Ok("second answer".to_owned()),
            })
            .expect("send");
        harness
            .tx
            .send(InternalEvent::Answered {
                request_id: stale,
                result: Ok("first answer".to_owned()),
            })
            .expect("send");
        harness.pump();

        assert_eq!(
            harness.view_data.question.answer.as_deref(),
            Some("second answer")
        );
        assert!(harness.view_data.question.in_flight.is_none());
    }

    #[test]
    fn question_failure_is_reported() {
        let mut harness = Harness::start(DeferredRuntime::default());
        harness.key(KeyCode::Char('a'));
        harness.type_text("why");
        harness.key(KeyCode::Enter);
        let (request_id, question) = harness.runtime.asked.pop().expect("question");
        assert_eq!(question, "why");

        harness
            .tx
            .send(InternalEvent::Answered {
                request_id,
                result: Err("server error (500): Internal Server Error".to_owned()),
            })
            .expect("send");
        harness.pump();

        assert!(
            question_text(&harness.state, &harness.view_data.question)
                .contains("error: server error (500)")
        );
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('?'));
        assert!(harness.state.help_visible);
        assert!(status_text(&harness.state, &harness.view_data).is_empty());

        let before = harness.runtime.queries.len();
        assert!(!harness.key(KeyCode::Char('q')));
        harness.key(KeyCode::Char('n'));
        assert_eq!(harness.runtime.queries.len(), before);

        harness.key(KeyCode::Esc);
        assert!(!harness.state.help_visible);
        assert!(help_overlay_text().contains("ctrl+r"));
    }

    #[test]
    fn stale_status_clear_token_is_ignored() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('p'));
        let token = harness.view_data.status_token;

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: token - 1 })
            .expect("send");
        harness.pump();
        assert!(harness.state.status_line.is_some());

        harness
            .tx
            .send(InternalEvent::ClearStatus { token })
            .expect("send");
        harness.pump();
        assert!(harness.state.status_line.is_none());
    }

    #[test]
    fn header_label_marks_sorted_column() {
        let mut harness = Harness::start(TestRuntime::default());
        let query = harness.view_data.table.query();
        assert_eq!(header_label(Column::Id, query), "ID ▲");
        assert_eq!(header_label(Column::Name, query), "Name");

        harness.key(KeyCode::Char('1'));
        let query = harness.view_data.table.query();
        assert_eq!(header_label(Column::Id, query), "ID ▼");
        assert_eq!(header_label(Column::Deals, query), "Deals");
    }

    #[test]
    fn pagination_text_reflects_navigation_state() {
        let harness = Harness::start(TestRuntime::default());
        let text = pagination_text(&harness.view_data.table.summary(), PageSize::Ten);
        assert_eq!(
            text,
            "- | Page 1 of 3 | [n]ext | Showing 10 of 25 results | 10 per page"
        );
    }

    #[test]
    fn filter_panel_marks_focused_field() {
        let mut harness = Harness::start(TestRuntime::default());
        harness.key(KeyCode::Char('f'));
        harness.key(KeyCode::BackTab);
        harness.type_text("EU");

        let text = filter_panel_text(&harness.state, harness.view_data.table.query());
        assert!(text.contains("> Region: EU_"), "got {text}");
        assert!(text.contains("  ID: "));
    }

    #[test]
    fn row_cells_count_nested_lists() {
        let rep = RepFaker::new(5).sales_rep();
        let cells = row_cells(&rep);
        assert_eq!(cells.len(), Column::ALL.len());
        assert_eq!(cells[0], "1");
        assert_eq!(cells[5], format!("{} deals", rep.deals.len()));
    }

    #[test]
    fn detail_text_lists_deals_and_clients() {
        let mut rep = RepFaker::new(2).sales_rep();
        rep.deals[0].status = DealStatus::ClosedWon;
        rep.deals[0].value = 120_000.0;
        let text = detail_text(&rep);

        assert!(text.contains(&format!("Region: {}", rep.region)));
        assert!(text.contains("$120,000 [Closed Won]"));
        assert!(text.contains(&format!("Clients ({})", rep.clients.len())));
        assert!(text.contains(&format!("Contact: {}", rep.clients[0].contact)));
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(950.5), "$950.50");
        assert_eq!(format_money(1_234_567.0), "$1,234,567");
        assert_eq!(format_money(-12_000.25), "-$12,000.25");
    }

    #[test]
    fn updated_label_formats_clock() {
        assert_eq!(updated_label(None), "not loaded");
        assert_eq!(
            updated_label(Some(OffsetDateTime::UNIX_EPOCH)),
            "updated 00:00:00 UTC"
        );
    }
}
