use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::repository::{DeleteOutcome, TaskRepository};
use crate::stats::{self, Dashboard, WeeklySummary};
use crate::task::{format_date, Category, Priority, Status, Task};

use super::form::{AddForm, FormAction};
use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Tasks,
    Dashboard,
    Weekly,
}

impl Tab {
    pub(crate) const ALL: [Tab; 3] = [Tab::Tasks, Tab::Dashboard, Tab::Weekly];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "1 Tasks",
            Tab::Dashboard => "2 Dashboard",
            Tab::Weekly => "3 Weekly",
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct StatusPickerState {
    pub(crate) task_id: u64,
    pub(crate) selected: usize,
}

impl StatusPickerState {
    fn new(task: &Task) -> Self {
        let selected = Status::ALL
            .iter()
            .position(|status| *status == task.status)
            .unwrap_or(0);
        Self {
            task_id: task.id,
            selected,
        }
    }

    pub(crate) fn selected_status(&self) -> Status {
        Status::ALL[self.selected % Status::ALL.len()]
    }
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: u64,
    pub(crate) description: String,
}

/// Startup settings for the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions {
    pub date: NaiveDate,
    pub window_days: u32,
    pub default_priority: Priority,
    pub default_category: Category,
}

pub struct AppState {
    pub(crate) tab: Tab,
    pub(crate) date: NaiveDate,
    pub(crate) today: NaiveDate,
    pub(crate) day_tasks: Vec<Task>,
    pub(crate) selected: Option<usize>,
    pub(crate) dashboard: Dashboard,
    pub(crate) weekly: WeeklySummary,
    pub(crate) form: Option<AddForm>,
    pub(crate) status_picker: Option<StatusPickerState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    status_message: Option<String>,
    info_message: Option<String>,
    options: DashboardOptions,
    repo: TaskRepository,
}

impl AppState {
    pub(crate) fn new(repo: TaskRepository, options: DashboardOptions, today: NaiveDate) -> Self {
        Self {
            tab: Tab::Tasks,
            date: options.date,
            today,
            day_tasks: Vec::new(),
            selected: None,
            dashboard: stats::dashboard(&[]),
            weekly: stats::weekly(&[], today, options.window_days),
            form: None,
            status_picker: None,
            delete_confirm: None,
            status_message: None,
            info_message: None,
            options,
            repo,
        }
    }

    pub(crate) fn window_days(&self) -> u32 {
        self.options.window_days
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.day_tasks.get(idx))
    }

    /// Re-read the store and recompute every view.
    pub(crate) fn reload(&mut self) {
        if let Err(err) = self.load() {
            self.set_error(err.to_string());
        }
    }

    fn load(&mut self) -> Result<()> {
        let previous_id = self.selected_task().map(|task| task.id);
        let all = self.repo.list(None)?;
        self.day_tasks = self.repo.list(Some(self.date))?;
        self.dashboard = stats::dashboard(&all);
        self.weekly = stats::weekly(&all, self.today, self.options.window_days);

        self.selected = previous_id
            .and_then(|id| self.day_tasks.iter().position(|task| task.id == id))
            .or(if self.day_tasks.is_empty() { None } else { Some(0) });
        self.status_message = None;
        Ok(())
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        self.info_message
            .as_ref()
            .map(|info| (info.clone(), StatusKind::Info))
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.form.is_some() {
            return "tab/shift-tab move  ←/→ change choice  enter add  esc cancel".to_string();
        }
        if self.status_picker.is_some() {
            return "j/k move  enter apply  esc cancel".to_string();
        }
        if self.delete_confirm.is_some() {
            return "y/enter confirm delete  esc/n cancel".to_string();
        }
        match self.tab {
            Tab::Tasks => {
                "←/→ day  t today  j/k move  s status  d delete  a add  1-3 tabs  r reload  q quit"
                    .to_string()
            }
            Tab::Dashboard | Tab::Weekly => "1-3 tabs  a add  r reload  q quit".to_string(),
        }
    }

    /// Handle one key press. Returns true when the app should exit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.form.is_some() {
            self.handle_form_key(key);
            return false;
        }
        if self.status_picker.is_some() {
            self.handle_status_picker_key(key);
            return false;
        }
        if self.delete_confirm.is_some() {
            self.handle_delete_confirm_key(key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('1') => self.tab = Tab::Tasks,
            KeyCode::Char('2') => self.tab = Tab::Dashboard,
            KeyCode::Char('3') => self.tab = Tab::Weekly,
            KeyCode::Tab => self.cycle_tab(1),
            KeyCode::BackTab => self.cycle_tab(-1),
            KeyCode::Char('r') => {
                self.reload();
                self.set_info("reloaded".to_string());
            }
            KeyCode::Char('a') => self.open_form(),
            _ if self.tab == Tab::Tasks => self.handle_tasks_key(key),
            _ => {}
        }
        false
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('[') => self.shift_date(-1),
            KeyCode::Right | KeyCode::Char(']') => self.shift_date(1),
            KeyCode::Char('t') => {
                self.today = Local::now().date_naive();
                self.set_date(self.today);
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('s') => {
                if let Some(task) = self.selected_task() {
                    self.status_picker = Some(StatusPickerState::new(task));
                }
            }
            KeyCode::Char('d') => self.request_delete(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            FormAction::None => {}
            FormAction::Cancel => self.form = None,
            FormAction::Submit => {
                let new = match form.build() {
                    Ok(new) => new,
                    Err(message) => {
                        form.set_error(message);
                        return;
                    }
                };
                match self.repo.add(new) {
                    Ok(task) => {
                        self.form = None;
                        self.tab = Tab::Tasks;
                        self.date = task.date;
                        self.reload();
                        self.selected = self.day_tasks.iter().position(|t| t.id == task.id);
                        self.set_info(format!("added task #{}", task.id));
                    }
                    Err(err) => form.set_error(err.to_string()),
                }
            }
        }
    }

    fn handle_status_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.status_picker.as_mut() else {
            return;
        };
        let len = Status::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.status_picker = None,
            KeyCode::Down | KeyCode::Char('j') => picker.selected = (picker.selected + 1) % len,
            KeyCode::Up | KeyCode::Char('k') => {
                picker.selected = (picker.selected + len - 1) % len;
            }
            KeyCode::Enter => {
                let task_id = picker.task_id;
                let status = picker.selected_status();
                self.status_picker = None;
                match self.repo.update_status(task_id, status) {
                    Ok(true) => {
                        self.reload();
                        self.set_info(format!("task #{task_id} is now {status}"));
                    }
                    Ok(false) => {
                        self.reload();
                        self.set_info(format!("task #{task_id} not found; nothing changed"));
                    }
                    Err(err) => self.set_error(err.to_string()),
                }
            }
            _ => {}
        }
    }

    fn handle_delete_confirm_key(&mut self, key: KeyEvent) {
        let Some(state) = self.delete_confirm.as_ref() else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => self.delete_confirm = None,
            KeyCode::Enter | KeyCode::Char('y') => {
                let task_id = state.task_id;
                self.delete_confirm = None;
                match self.repo.delete(task_id, false) {
                    Ok(DeleteOutcome::Deleted) => {
                        self.reload();
                        self.set_info(format!("deleted task #{task_id}"));
                    }
                    Ok(DeleteOutcome::NotFound) => {
                        self.reload();
                        self.set_info(format!("task #{task_id} not found; nothing changed"));
                    }
                    Err(err) => self.set_error(err.to_string()),
                }
            }
            _ => {}
        }
    }

    fn request_delete(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if self.repo.protects_pending() && task.status == Status::Pending {
            let message = format!(
                "task #{} is Pending; change its status before deleting",
                task.id
            );
            self.set_error(message);
            return;
        }
        self.delete_confirm = Some(DeleteConfirmState {
            task_id: task.id,
            description: task.description.clone(),
        });
    }

    fn open_form(&mut self) {
        self.form = Some(AddForm::new(
            self.date,
            Local::now().time(),
            self.options.default_priority,
            self.options.default_category,
        ));
    }

    fn cycle_tab(&mut self, delta: isize) {
        self.tab = super::form::cycle(&Tab::ALL, self.tab, delta);
    }

    fn shift_date(&mut self, days: i64) {
        if let Some(date) = self
            .date
            .checked_add_signed(chrono::Duration::days(days))
        {
            self.set_date(date);
        }
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.selected = None;
        self.info_message = None;
        self.reload();
    }

    fn move_selection(&mut self, delta: isize) {
        if self.day_tasks.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let max = self.day_tasks.len().saturating_sub(1) as isize;
        self.selected = Some((current + delta).clamp(0, max) as usize);
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
    }

    pub(crate) fn date_label(&self) -> String {
        if self.date == self.today {
            format!("{} (today)", format_date(self.date))
        } else {
            format_date(self.date)
        }
    }
}

pub fn run(repo: TaskRepository, options: DashboardOptions) -> Result<()> {
    let mut app = AppState::new(repo, options, Local::now().date_naive());
    app.reload();
    run_terminal(&mut app)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
