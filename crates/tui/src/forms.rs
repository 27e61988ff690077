//! Keyboard-driven forms used by the login, game and movement screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_INPUT_LEN: usize = 256;

/// Single-line text input with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    masked: bool,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            value,
            cursor,
            masked: false,
        }
    }

    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Text to render; masked inputs show one `*` per character.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.value.chars().count() >= MAX_INPUT_LEN {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.value.chars().count() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }
}

/// Option offered by a choice field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldInput {
    Text(TextInput),
    Choice {
        options: Vec<ChoiceOption>,
        selected: Option<usize>,
    },
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub input: FieldInput,
    pub visible: bool,
}

impl Field {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            input: FieldInput::Text(TextInput::new(value)),
            visible: true,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            label,
            input: FieldInput::Text(TextInput::masked()),
            visible: true,
        }
    }

    /// Choice field; `selected` defaults to nothing chosen.
    pub fn choice(label: &'static str, options: Vec<ChoiceOption>, selected: Option<usize>) -> Self {
        let selected = selected.filter(|index| *index < options.len());
        Self {
            label,
            input: FieldInput::Choice { options, selected },
            visible: true,
        }
    }

    /// Raw value: the text, or the chosen option's value.
    pub fn value(&self) -> String {
        match &self.input {
            FieldInput::Text(input) => input.value().to_string(),
            FieldInput::Choice { options, selected } => selected
                .and_then(|index| options.get(index))
                .map(|option| option.value.clone())
                .unwrap_or_default(),
        }
    }

    /// What the field shows.
    pub fn display(&self) -> String {
        match &self.input {
            FieldInput::Text(input) => input.display(),
            FieldInput::Choice { options, selected } => selected
                .and_then(|index| options.get(index))
                .map(|option| format!("◀ {} ▶", option.label))
                .unwrap_or_else(|| {
                    if options.is_empty() {
                        "(no options)".to_string()
                    } else {
                        "◀ select ▶".to_string()
                    }
                }),
        }
    }

    fn cycle(&mut self, delta: isize) {
        if let FieldInput::Choice { options, selected } = &mut self.input {
            if options.is_empty() {
                return;
            }
            let len = options.len() as isize;
            let next = match selected {
                Some(index) => (*index as isize + delta).rem_euclid(len),
                None if delta < 0 => len - 1,
                None => 0,
            };
            *selected = Some(next as usize);
        }
    }
}

/// Result of feeding a key to a [`Form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Edited,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        let mut form = Self { fields, focus: 0 };
        form.ensure_focus_visible();
        form
    }

    pub fn value(&self, index: usize) -> String {
        self.fields.get(index).map(Field::value).unwrap_or_default()
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(field) = self.fields.get_mut(index) {
            field.visible = visible;
        }
        self.ensure_focus_visible();
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(-1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return FormAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return FormAction::None;
            }
            _ => {}
        }

        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormAction::None;
        };
        if let FieldInput::Text(input) = &mut field.input {
            return match key.code {
                KeyCode::Char(ch)
                    if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
                {
                    input.insert(ch);
                    FormAction::Edited
                }
                KeyCode::Backspace => {
                    input.backspace();
                    FormAction::Edited
                }
                KeyCode::Delete => {
                    input.delete();
                    FormAction::Edited
                }
                KeyCode::Left => {
                    input.move_cursor(-1);
                    FormAction::None
                }
                KeyCode::Right => {
                    input.move_cursor(1);
                    FormAction::None
                }
                KeyCode::Home => {
                    input.move_home();
                    FormAction::None
                }
                KeyCode::End => {
                    input.move_end();
                    FormAction::None
                }
                _ => FormAction::None,
            };
        }

        match key.code {
            KeyCode::Left => field.cycle(-1),
            KeyCode::Right | KeyCode::Char(' ') => field.cycle(1),
            _ => return FormAction::None,
        }
        FormAction::Edited
    }

    fn step_focus(&mut self, delta: isize) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        let mut index = self.focus;
        for _ in 0..len {
            index = (index as isize + delta).rem_euclid(len as isize) as usize;
            if self.fields[index].visible {
                self.focus = index;
                return;
            }
        }
    }

    fn ensure_focus_visible(&mut self) {
        let focus_hidden = self
            .fields
            .get(self.focus)
            .map(|field| !field.visible)
            .unwrap_or(true);
        if focus_hidden {
            if let Some(index) = self.fields.iter().position(|field| field.visible) {
                self.focus = index;
            }
        }
    }
}
