pub mod layout;
mod courses;
mod login;
mod quiz;
mod results;

pub use courses::draw_course_selection;
pub use layout::{calculate_login_chunks, calculate_quiz_chunks, calculate_screen_chunks};
pub use login::draw_login;
pub use quiz::draw_quiz;
pub use results::{draw_results, result_lines};

use crate::session::{QuizController, ScreenKind};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Redraws the whole frame for the controller's current screen.
pub fn draw(f: &mut Frame, controller: &mut QuizController) {
    match controller.screen().kind() {
        ScreenKind::CourseSelection => draw_course_selection(f, controller),
        ScreenKind::Login => draw_login(f, controller),
        ScreenKind::Answering => draw_quiz(f, controller),
        ScreenKind::Finalizing | ScreenKind::Finished => draw_results(f, controller),
    }
}

pub(crate) fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}

pub(crate) fn draw_title(f: &mut Frame, area: Rect, title: &str) {
    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

pub(crate) fn draw_help(f: &mut Frame, area: Rect, hints: Vec<[Span<'static>; 2]>) {
    let spans: Vec<Span> = hints.into_iter().flatten().collect();
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

pub(crate) fn course_heading(controller: &QuizController) -> String {
    match controller.course() {
        Some(course) => format!("Quiz - {}", course.title),
        None => "Quiz".to_string(),
    }
}
