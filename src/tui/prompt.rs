//! Status line prompts.
//!
//! A `Prompt` asks for a list of typed fields one at a time. Each answer is
//! converted as soon as it is entered, so a bad value keeps the prompt on the
//! same field. The finished `Answers` are turned into a `Request` by the `Form`
//! that opened the prompt; the tracker never sees raw input.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use crossterm::event::KeyCode;

use crate::error::ParseError;
use crate::parse::{parse_bool, parse_due, parse_int};
use crate::selection::Selection;
use crate::task::NewTask;
use crate::tracker::Request;
use crate::tui::input::InputField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Bool,
    Due,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
}

/// One question of a prompt.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Used when the answer is left empty.
    pub default: Option<&'static str>,
    /// Editable text the input starts with.
    pub prefill: Option<&'static str>,
}

impl Field {
    /// A field with no default and an empty input.
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Field {
            key,
            label,
            kind,
            default: None,
            prefill: None,
        }
    }

    /// Value used when the answer is left empty.
    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Text the input starts with.
    pub fn prefill(mut self, value: &'static str) -> Self {
        self.prefill = Some(value);
        self
    }

    /// Convert a raw answer, applying the default to empty input.
    pub fn convert(&self, raw: &str, today: NaiveDate) -> Result<Value, ParseError> {
        let raw = match (raw.is_empty(), self.default) {
            (true, Some(default)) => default,
            _ => raw,
        };
        match self.kind {
            FieldKind::Text if raw.trim().is_empty() => Err(ParseError::Empty(self.label)),
            FieldKind::Text => Ok(Value::Text(raw.to_string())),
            FieldKind::Int => parse_int(raw).map(Value::Int),
            FieldKind::Bool => parse_bool(raw).map(Value::Bool),
            FieldKind::Due => parse_due(raw, today).map(Value::Date),
        }
    }
}

/// Converted answers by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(BTreeMap<&'static str, Value>);

impl Answers {
    /// Record the converted answer for a field.
    pub fn insert(&mut self, key: &'static str, value: Value) {
        self.0.insert(key, value);
    }

    /// Text answer for `key`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(Value::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    /// Integer answer for `key`.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean answer for `key`.
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Date answer for `key`.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.0.get(key) {
            Some(Value::Date(d)) => Some(*d),
            _ => None,
        }
    }
}

/// What a prompt is collecting input for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    NewProject,
    NewSubproject(Option<Selection>),
    NewTask(Option<Selection>),
    Rename(Option<Selection>),
}

impl Form {
    /// Fields asked for this form, in order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            Form::NewProject => vec![Field::new("name", "Project name", FieldKind::Text)],
            Form::NewSubproject(_) => vec![Field::new("name", "Subproject name", FieldKind::Text)],
            Form::NewTask(_) => vec![
                Field::new("name", "Task name", FieldKind::Text),
                Field::new("expected", "Expected time", FieldKind::Int),
                Field::new("spent", "Time spent", FieldKind::Int).default("0"),
                Field::new("done", "Done", FieldKind::Bool).default("false"),
                Field::new("due", "Due date", FieldKind::Due).prefill("current"),
            ],
            Form::Rename(_) => vec![Field::new("new_name", "New name", FieldKind::Text)],
        }
    }

    /// Build the request from a complete set of answers.
    pub fn into_request(self, answers: &Answers) -> Option<Request> {
        let request = match self {
            Form::NewProject => Request::CreateProject {
                name: answers.text("name")?,
            },
            Form::NewSubproject(target) => Request::CreateSubproject {
                target,
                name: answers.text("name")?,
            },
            Form::NewTask(target) => Request::CreateTask {
                target,
                task: NewTask {
                    name: answers.text("name")?,
                    expected: answers.int("expected")?,
                    spent: answers.int("spent")?,
                    done: answers.bool("done")?,
                    due: answers.date("due")?,
                },
            },
            Form::Rename(target) => Request::Rename {
                target,
                name: answers.text("new_name")?,
            },
        };
        Some(request)
    }
}

/// Outcome of one key press inside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Continue,
    Cancelled,
    Invalid(ParseError),
    Done(Answers),
}

/// An open prompt: the form, its answers so far and the current input.
pub struct Prompt {
    form: Form,
    fields: Vec<Field>,
    index: usize,
    input: InputField,
    answers: Answers,
    today: NaiveDate,
}

impl Prompt {
    /// Start a prompt on the first field. `today` resolves due dates.
    pub fn new(form: Form, today: NaiveDate) -> Self {
        let fields = form.fields();
        let input = Self::input_for(fields.first());
        Prompt {
            form,
            fields,
            index: 0,
            input,
            answers: Answers::default(),
            today,
        }
    }

    fn input_for(field: Option<&Field>) -> InputField {
        match field.and_then(|f| f.prefill) {
            Some(text) => InputField::with_value(text),
            None => InputField::new(),
        }
    }

    /// The form being filled.
    pub fn form(&self) -> Form {
        self.form
    }

    /// Input of the current field.
    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Label of the current field, with its default if any.
    pub fn label(&self) -> String {
        match self.fields.get(self.index) {
            Some(Field {
                label,
                default: Some(d),
                ..
            }) => format!("{label} [{d}]"),
            Some(f) => f.label.to_string(),
            None => String::new(),
        }
    }

    /// Edit the input, or on Enter convert the answer and move to the next field.
    pub fn handle_key(&mut self, key: KeyCode) -> PromptEvent {
        match key {
            KeyCode::Esc => return PromptEvent::Cancelled,
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
        PromptEvent::Continue
    }

    fn submit(&mut self) -> PromptEvent {
        let Some(field) = self.fields.get(self.index) else {
            return PromptEvent::Done(self.answers.clone());
        };
        match field.convert(&self.input.value, self.today) {
            Ok(value) => {
                self.answers.insert(field.key, value);
                self.index += 1;
                self.input = Self::input_for(self.fields.get(self.index));
                if self.index >= self.fields.len() {
                    PromptEvent::Done(self.answers.clone())
                } else {
                    PromptEvent::Continue
                }
            }
            Err(e) => PromptEvent::Invalid(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn type_line(prompt: &mut Prompt, text: &str) -> PromptEvent {
        for c in text.chars() {
            prompt.handle_key(KeyCode::Char(c));
        }
        prompt.handle_key(KeyCode::Enter)
    }

    #[test]
    fn test_task_prompt_with_defaults() {
        let target = Some(Selection::Subproject(2));
        let mut prompt = Prompt::new(Form::NewTask(target), today());
        assert_eq!(type_line(&mut prompt, "Intervals"), PromptEvent::Continue);
        assert_eq!(type_line(&mut prompt, "3"), PromptEvent::Continue);
        assert_eq!(prompt.label(), "Time spent [0]");
        assert_eq!(type_line(&mut prompt, ""), PromptEvent::Continue);
        assert_eq!(type_line(&mut prompt, ""), PromptEvent::Continue);
        assert_eq!(prompt.input().value, "current");
        let PromptEvent::Done(answers) = type_line(&mut prompt, "") else {
            panic!("prompt should be complete");
        };

        assert_eq!(
            prompt.form().into_request(&answers),
            Some(Request::CreateTask {
                target,
                task: NewTask {
                    name: "Intervals".into(),
                    expected: 3,
                    spent: 0,
                    done: false,
                    due: NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
                },
            })
        );
    }

    #[test]
    fn test_invalid_answer_stays_on_field() {
        let mut prompt = Prompt::new(Form::NewTask(None), today());
        type_line(&mut prompt, "Intervals");
        assert_eq!(
            type_line(&mut prompt, "lots"),
            PromptEvent::Invalid(ParseError::InvalidNumber("lots".into()))
        );
        assert_eq!(prompt.label(), "Expected time");
        for _ in 0..4 {
            prompt.handle_key(KeyCode::Backspace);
        }
        assert_eq!(type_line(&mut prompt, "2"), PromptEvent::Continue);
        type_line(&mut prompt, "");
        assert_eq!(
            type_line(&mut prompt, "perhaps"),
            PromptEvent::Invalid(ParseError::InvalidBool("perhaps".into()))
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut prompt = Prompt::new(Form::NewProject, today());
        assert_eq!(
            type_line(&mut prompt, "  "),
            PromptEvent::Invalid(ParseError::Empty("Project name"))
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = Prompt::new(Form::Rename(Some(Selection::Project(1))), today());
        prompt.handle_key(KeyCode::Char('x'));
        assert_eq!(prompt.handle_key(KeyCode::Esc), PromptEvent::Cancelled);
    }

    #[test]
    fn test_rename_request() {
        let target = Some(Selection::Task(7));
        let mut prompt = Prompt::new(Form::Rename(target), today());
        let PromptEvent::Done(answers) = type_line(&mut prompt, "Hill repeats") else {
            panic!("single field prompt should finish");
        };
        assert_eq!(
            Form::Rename(target).into_request(&answers),
            Some(Request::Rename {
                target,
                name: "Hill repeats".into()
            })
        );
    }
}
