//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the tracker, keeps the
//! rendered project rows in sync with it, routes key presses through the key
//! map or the open prompt, and draws the list, schedule and help screens.

use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::db::Store;
use crate::error::{ActionError, StoreError};
use crate::schedule::{build_grid, GridRow, GRID_COLUMNS};
use crate::selection::{Entity, Selection};
use crate::tracker::Tracker;
use crate::tui::{
    colors::{to_color, DONE_FG, GRID_SELECTED_BG, GRID_SELECTED_FG, PROMPT_BG, SELECTED_FG, STATUS_BG, WARNING_BG},
    enums::{AppState, MessageLevel},
    keymap::{describe_action, Action, Dispatch, Keymap},
    prompt::{Form, Prompt, PromptEvent},
    run::TuiError,
    utils::centered_rect,
};

const KEY_HINTS: &str =
    "p project  s subproject  t task  r rename  d done  za fold  zA fold all  zz done tasks  S schedule  ? help  q quit";

/// Main application state for the terminal user interface.
pub struct App<S: Store> {
    state: AppState,
    tracker: Tracker<S>,
    rows: Vec<(Selection, String)>,
    list_state: ListState,
    keymap: Keymap,
    prompt: Option<Prompt>,
    status_message: String,
    message_level: MessageLevel,
    grid: Vec<GridRow>,
    grid_cursor: (usize, usize),
    grid_state: TableState,
    should_quit: bool,
}

impl<S: Store> App<S> {
    /// Create the app with the cursor on the first row.
    pub fn new(tracker: Tracker<S>) -> Self {
        let mut app = App {
            state: AppState::ProjectList,
            tracker,
            rows: Vec::new(),
            list_state: ListState::default(),
            keymap: Keymap::project_list(),
            prompt: None,
            status_message: String::new(),
            message_level: MessageLevel::Info,
            grid: Vec::new(),
            grid_cursor: (0, 1),
            grid_state: TableState::default(),
            should_quit: false,
        };
        app.update_project_list(None);
        app
    }

    /// The selection under the cursor, if the list is not empty.
    pub fn selected(&self) -> Option<Selection> {
        self.list_state
            .selected()
            .and_then(|i| self.rows.get(i))
            .map(|(sel, _)| *sel)
    }

    /// Whether the event loop should stop.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Rebuild the rows from the tracker.
    ///
    /// The cursor moves to `focus` when it is visible, otherwise it keeps its
    /// index clamped to the new length.
    fn update_project_list(&mut self, focus: Option<Selection>) {
        self.rows = self.tracker.rows();
        let focused = focus.and_then(|f| self.rows.iter().position(|(sel, _)| *sel == f));
        let index = match (focused, self.list_state.selected()) {
            _ if self.rows.is_empty() => None,
            (Some(i), _) => Some(i),
            (None, Some(i)) => Some(i.min(self.rows.len() - 1)),
            (None, None) => Some(0),
        };
        self.list_state.select(index);
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
        self.message_level = MessageLevel::Info;
    }

    fn set_warning(&mut self, msg: String) {
        self.status_message = msg;
        self.message_level = MessageLevel::Warning;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.message_level = MessageLevel::Info;
    }

    /// Show recoverable action errors on the status line; store failures end the session.
    fn report(&mut self, err: ActionError) -> Result<(), StoreError> {
        match err {
            ActionError::Store(e) => Err(e),
            other => {
                warn!(error = %other, "action rejected");
                self.set_warning(other.to_string());
                Ok(())
            }
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), StoreError> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }
        if self.prompt.is_some() {
            return self.handle_prompt_input(key.code);
        }
        match self.state {
            AppState::ProjectList => self.handle_list_input(key.code),
            AppState::Schedule => {
                self.handle_schedule_input(key.code);
                Ok(())
            }
            AppState::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.state = AppState::ProjectList;
                }
                Ok(())
            }
        }
    }

    fn handle_list_input(&mut self, key: KeyCode) -> Result<(), StoreError> {
        self.clear_status_message();
        match key {
            KeyCode::Up | KeyCode::Char('k') if !self.keymap.is_pending() => self.list_state.select_previous(),
            KeyCode::Down | KeyCode::Char('j') if !self.keymap.is_pending() => self.list_state.select_next(),
            KeyCode::Home => self.list_state.select_first(),
            KeyCode::End => self.list_state.select_last(),
            KeyCode::Esc => self.keymap.reset(),
            KeyCode::Char(c) => match self.keymap.feed(c) {
                Dispatch::Action(action) => self.dispatch(action)?,
                Dispatch::Pending(seq) => self.set_status_message(format!("{seq}-")),
                Dispatch::Unbound(seq) => self.set_warning(format!("Unbound key: {seq}")),
            },
            _ => {}
        }
        // select_last/select_next can run past the end until the next render.
        if let Some(i) = self.list_state.selected() {
            if i >= self.rows.len() {
                self.list_state.select(self.rows.len().checked_sub(1));
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        let selected = self.selected();
        match action {
            Action::NewProject => self.open_prompt(Form::NewProject),
            Action::NewSubproject => match self.tracker.require_project(selected) {
                Ok(_) => self.open_prompt(Form::NewSubproject(selected)),
                Err(e) => self.report(e)?,
            },
            Action::NewTask => match self.tracker.require_subproject(selected) {
                Ok(_) => self.open_prompt(Form::NewTask(selected)),
                Err(e) => self.report(e)?,
            },
            Action::Rename => match selected {
                Some(_) => self.open_prompt(Form::Rename(selected)),
                None => self.report(ActionError::NothingSelected)?,
            },
            Action::ToggleDone => {
                if let Some(done) = self.tracker.toggle_done(selected)? {
                    self.update_project_list(None);
                    let msg = if done { "Marked done" } else { "Marked not done" };
                    self.set_status_message(msg.to_string());
                }
            }
            Action::ToggleCollapse => {
                if selected.is_some() {
                    self.tracker.toggle_collapse(selected);
                    self.update_project_list(selected);
                }
            }
            Action::CollapseAll => {
                self.tracker.toggle_collapse(None);
                self.update_project_list(selected);
            }
            Action::ToggleInactiveTasks => {
                let show = self.tracker.toggle_inactive_tasks();
                self.update_project_list(selected);
                let msg = if show { "Showing done tasks" } else { "Hiding done tasks" };
                self.set_status_message(msg.to_string());
            }
            Action::ShowSchedule => self.show_schedule()?,
            Action::Help => self.state = AppState::Help,
            Action::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn open_prompt(&mut self, form: Form) {
        self.prompt = Some(Prompt::new(form, Local::now().date_naive()));
    }

    fn handle_prompt_input(&mut self, key: KeyCode) -> Result<(), StoreError> {
        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(());
        };
        match prompt.handle_key(key) {
            PromptEvent::Continue => self.clear_status_message(),
            PromptEvent::Cancelled => {
                self.prompt = None;
                self.set_status_message("Cancelled".to_string());
            }
            PromptEvent::Invalid(e) => self.set_warning(e.to_string()),
            PromptEvent::Done(answers) => {
                let form = prompt.form();
                self.prompt = None;
                self.clear_status_message();
                if let Some(request) = form.into_request(&answers) {
                    match self.tracker.apply(request) {
                        Ok(sel) => self.update_project_list(Some(sel)),
                        Err(e) => self.report(e)?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Load the latest schedule into the grid and switch to it.
    fn show_schedule(&mut self) -> Result<(), StoreError> {
        let schedule = self.tracker.latest_schedule()?;
        if schedule.is_none() {
            self.set_warning("No schedule found".to_string());
        }
        self.grid = build_grid(schedule.as_ref());
        self.grid_cursor = (0, 1);
        self.state = AppState::Schedule;
        Ok(())
    }

    fn handle_schedule_input(&mut self, key: KeyCode) {
        let hours = self.grid.len().saturating_sub(1);
        let (row, col) = self.grid_cursor;
        self.grid_cursor = match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.state = AppState::ProjectList;
                self.clear_status_message();
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => (row.saturating_sub(1), col),
            KeyCode::Down | KeyCode::Char('j') => ((row + 1).min(hours.saturating_sub(1)), col),
            KeyCode::Left | KeyCode::Char('h') => (row, col.saturating_sub(1).max(1)),
            KeyCode::Right | KeyCode::Char('l') => (row, (col + 1).min(GRID_COLUMNS - 1)),
            _ => (row, col),
        };
    }

    fn render_project_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|(sel, line)| {
                let style = match self.tracker.lookup(*sel) {
                    Some(Entity::Project(p)) => Style::default().fg(to_color(p.fg)).add_modifier(Modifier::BOLD),
                    Some(Entity::Task(t)) if t.done => Style::default().fg(DONE_FG),
                    _ => Style::default(),
                };
                ListItem::new(line.as_str()).style(style)
            })
            .collect();

        let filter = if self.tracker.view().show_inactive_tasks {
            " - showing done"
        } else {
            ""
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Projects ({}){} - Press '?' for help", self.tracker.projects().len(), filter)),
            )
            .highlight_style(Style::default().fg(SELECTED_FG).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_schedule(&mut self, f: &mut Frame, area: Rect) {
        let Some((header, hours)) = self.grid.split_first() else {
            return;
        };
        let header = Row::new(header.iter().map(|h| Cell::from(h.as_str())))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);
        let rows: Vec<Row> = hours
            .iter()
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))))
            .collect();

        let mut widths = vec![Constraint::Length(6)];
        widths.extend(std::iter::repeat(Constraint::Fill(1)).take(GRID_COLUMNS - 1));

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Schedule - Esc to return"))
            .cell_highlight_style(Style::default().bg(GRID_SELECTED_BG).fg(GRID_SELECTED_FG));

        self.grid_state.select(Some(self.grid_cursor.0));
        self.grid_state.select_column(Some(self.grid_cursor.1));
        f.render_stateful_widget(table, area, &mut self.grid_state);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled("Key bindings", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        lines.extend(
            self.keymap
                .describe()
                .into_iter()
                .map(|(keys, action)| Line::from(format!("{:<6}{}", keys, describe_action(action)))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from("Up/Down or j/k to move, Esc to close"));

        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        if let Some(prompt) = &self.prompt {
            let label = format!("{}: ", prompt.label());
            let text = if self.status_message.is_empty() {
                format!("{}{}", label, prompt.input().value)
            } else {
                format!("{}{}  ({})", label, prompt.input().value, self.status_message)
            };
            let status = Paragraph::new(text).style(Style::default().bg(PROMPT_BG));
            f.render_widget(status, area);
            let x = area.x + (UnicodeWidthStr::width(label.as_str()) + prompt.input().cursor_width()) as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
            return;
        }

        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::ProjectList => KEY_HINTS.to_string(),
                AppState::Schedule => "Arrows or h/j/k/l to move  Esc back".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };
        let bg = match self.message_level {
            MessageLevel::Info => STATUS_BG,
            MessageLevel::Warning => WARNING_BG,
        };
        f.render_widget(Paragraph::new(text).style(Style::default().bg(bg)), area);
    }

    /// Main render function that dispatches to the view renderers.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::ProjectList => self.render_project_list(f, chunks[0]),
            AppState::Schedule => self.render_schedule(f, chunks[0]),
            AppState::Help => {
                self.render_project_list(f, chunks[0]);
                self.render_help(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop: draw, wait for a key, handle it.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), TuiError> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }
            if self.should_quit() {
                break;
            }
        }
        Ok(())
    }
}
