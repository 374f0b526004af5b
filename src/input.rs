use crate::models::ApiRequest;
use crate::session::{Event, QuizController, ScreenKind};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Single editable text field. `cursor` is a byte offset that always sits on
/// a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
    pub scroll_y: u16,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn set(&mut self, value: &str) {
        self.buffer = value.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_y = 0;
    }

    fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Applies an editing key. Returns `false` for keys it does not handle.
    pub fn edit(&mut self, key: KeyEvent) -> bool {
        self.cursor = self.cursor.min(self.buffer.len());
        match key.code {
            KeyCode::Left => {
                if let Some(prev) = self.previous_boundary() {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            KeyCode::Backspace => {
                if let Some(prev) = self.previous_boundary() {
                    self.buffer.remove(prev);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert(c);
            }
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Identity,
    FullName,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub identity: TextInput,
    pub full_name: TextInput,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Identity => LoginField::FullName,
            LoginField::FullName => LoginField::Identity,
        };
    }

    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Identity => &mut self.identity,
            LoginField::FullName => &mut self.full_name,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum KeyFlow {
    Continue(Option<ApiRequest>),
    Quit,
}

pub fn handle_key(controller: &mut QuizController, key: KeyEvent) -> KeyFlow {
    if key.kind != KeyEventKind::Press {
        return KeyFlow::Continue(None);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyFlow::Quit;
    }

    match controller.screen().kind() {
        ScreenKind::CourseSelection => handle_course_key(controller, key),
        ScreenKind::Login => handle_login_key(controller, key),
        ScreenKind::Answering => handle_answer_key(controller, key),
        ScreenKind::Finalizing => match key.code {
            KeyCode::Esc => KeyFlow::Quit,
            _ => KeyFlow::Continue(None),
        },
        ScreenKind::Finished => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => KeyFlow::Quit,
            KeyCode::Char('r') => KeyFlow::Continue(controller.handle(Event::RetakeRequested)),
            _ => KeyFlow::Continue(None),
        },
    }
}

fn handle_course_key(controller: &mut QuizController, key: KeyEvent) -> KeyFlow {
    match key.code {
        KeyCode::Esc => return KeyFlow::Quit,
        KeyCode::Up => controller.move_course_selection(-1),
        KeyCode::Down => controller.move_course_selection(1),
        KeyCode::Char('r') => return KeyFlow::Continue(controller.handle(Event::ReloadCourses)),
        KeyCode::Enter => {
            if let Some(id) = controller.selected_course().map(|course| course.id.clone()) {
                return KeyFlow::Continue(controller.handle(Event::CourseChosen(id)));
            }
        }
        _ => {}
    }
    KeyFlow::Continue(None)
}

fn handle_login_key(controller: &mut QuizController, key: KeyEvent) -> KeyFlow {
    match key.code {
        KeyCode::Esc => KeyFlow::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            controller.login.toggle_focus();
            KeyFlow::Continue(None)
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyFlow::Continue(controller.handle(Event::RetakeRequested))
        }
        KeyCode::Enter => {
            let event = Event::LoginSubmitted {
                identity: controller.login.identity.value().to_string(),
                full_name: controller.login.full_name.value().to_string(),
            };
            KeyFlow::Continue(controller.handle(event))
        }
        _ => {
            controller.login.focused_mut().edit(key);
            KeyFlow::Continue(None)
        }
    }
}

fn handle_answer_key(controller: &mut QuizController, key: KeyEvent) -> KeyFlow {
    match key.code {
        KeyCode::Enter => {
            let answer = controller.answer_input.value().to_string();
            KeyFlow::Continue(controller.handle(Event::AnswerSubmitted(answer)))
        }
        _ => {
            controller.answer_input.edit(key);
            KeyFlow::Continue(None)
        }
    }
}
