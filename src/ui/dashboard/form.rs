use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::{format_date, format_time, parse_date, parse_time, Category, NewTask, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldId {
    Description,
    Date,
    Time,
    Priority,
    Category,
}

const FIELD_ORDER: [FormFieldId; 5] = [
    FormFieldId::Description,
    FormFieldId::Date,
    FormFieldId::Time,
    FormFieldId::Priority,
    FormFieldId::Category,
];

impl FormFieldId {
    pub fn label(self) -> &'static str {
        match self {
            FormFieldId::Description => "Description",
            FormFieldId::Date => "Date",
            FormFieldId::Time => "Time",
            FormFieldId::Priority => "Priority",
            FormFieldId::Category => "Category",
        }
    }

    /// Choice fields cycle with left/right instead of taking text.
    pub fn is_choice(self) -> bool {
        matches!(self, FormFieldId::Priority | FormFieldId::Category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    Submit,
}

/// The "add task" form.
#[derive(Debug, Clone)]
pub struct AddForm {
    description: String,
    date: String,
    time: String,
    priority: Priority,
    category: Category,
    active: usize,
    error: Option<String>,
}

impl AddForm {
    pub fn new(date: NaiveDate, time: NaiveTime, priority: Priority, category: Category) -> Self {
        Self {
            description: String::new(),
            date: format_date(date),
            time: format_time(time),
            priority,
            category,
            active: 0,
            error: None,
        }
    }

    pub fn active_field(&self) -> FormFieldId {
        FIELD_ORDER[self.active % FIELD_ORDER.len()]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Label and display value of every field, in order.
    pub fn fields(&self) -> Vec<(FormFieldId, String)> {
        FIELD_ORDER
            .iter()
            .map(|&id| (id, self.display_value(id)))
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('u') {
                if let Some(value) = self.current_text_mut() {
                    value.clear();
                }
                self.error = None;
            }
            return FormAction::None;
        }

        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.move_active(1),
            KeyCode::BackTab | KeyCode::Up => self.move_active(-1),
            KeyCode::Left => self.cycle_choice(-1),
            KeyCode::Right => self.cycle_choice(1),
            KeyCode::Backspace => {
                if let Some(value) = self.current_text_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(value) = self.current_text_mut() {
                    value.push(ch);
                }
            }
            _ => {}
        }

        self.error = None;
        FormAction::None
    }

    pub fn build(&self) -> Result<NewTask, String> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err("description is required".to_string());
        }
        let date = parse_date(&self.date).ok_or("date must be YYYY-MM-DD")?;
        let scheduled_time = parse_time(&self.time).ok_or("time must be HH:MM")?;
        Ok(NewTask {
            date,
            scheduled_time,
            description: description.to_string(),
            priority: self.priority,
            category: self.category,
        })
    }

    fn display_value(&self, id: FormFieldId) -> String {
        match id {
            FormFieldId::Description => self.description.clone(),
            FormFieldId::Date => self.date.clone(),
            FormFieldId::Time => self.time.clone(),
            FormFieldId::Priority => self.priority.to_string(),
            FormFieldId::Category => self.category.to_string(),
        }
    }

    fn move_active(&mut self, delta: isize) {
        let len = FIELD_ORDER.len() as isize;
        self.active = (self.active as isize + delta).rem_euclid(len) as usize;
    }

    fn cycle_choice(&mut self, delta: isize) {
        match self.active_field() {
            FormFieldId::Priority => self.priority = cycle(&Priority::ALL, self.priority, delta),
            FormFieldId::Category => self.category = cycle(&Category::ALL, self.category, delta),
            _ => {}
        }
    }

    fn current_text_mut(&mut self) -> Option<&mut String> {
        match self.active_field() {
            FormFieldId::Description => Some(&mut self.description),
            FormFieldId::Date => Some(&mut self.date),
            FormFieldId::Time => Some(&mut self.time),
            FormFieldId::Priority | FormFieldId::Category => None,
        }
    }
}

pub(crate) fn cycle<T: Copy + PartialEq>(options: &[T], current: T, delta: isize) -> T {
    if options.is_empty() {
        return current;
    }
    let len = options.len() as isize;
    let idx = options
        .iter()
        .position(|option| *option == current)
        .unwrap_or(0) as isize;
    options[(idx + delta).rem_euclid(len) as usize]
}
