use super::{course_heading, draw_help, draw_title, key_hint, layout::calculate_login_chunks};
use crate::input::{LoginField, TextInput};
use crate::session::{QuizController, Screen};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

fn draw_field(f: &mut Frame, area: Rect, title: &str, input: &TextInput, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let field = Paragraph::new(input.value().to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title.to_string()),
    );
    f.render_widget(field, area);

    if focused {
        let before_cursor = &input.value()[..input.cursor()];
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1 + before_cursor.width() as u16).min(max_x);
        f.set_cursor_position((x, area.y + 1));
    }
}

pub fn draw_login(f: &mut Frame, controller: &QuizController) {
    let Screen::Login {
        message,
        retake_offered,
        pending,
    } = controller.screen()
    else {
        return;
    };
    let layout = calculate_login_chunks(f.area());
    draw_title(f, layout.header_area, &course_heading(controller));

    let form = &controller.login;
    draw_field(
        f,
        layout.identity_area,
        "Username",
        &form.identity,
        form.focus == LoginField::Identity,
    );
    draw_field(
        f,
        layout.full_name_area,
        "Full name",
        &form.full_name,
        form.focus == LoginField::FullName,
    );

    let (text, style) = if *pending {
        ("Checking...".to_string(), Style::default().fg(Color::DarkGray))
    } else if let Some(message) = message {
        (message.clone(), Style::default().fg(Color::Yellow))
    } else {
        (String::new(), Style::default())
    };
    let message = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default());
    f.render_widget(message, layout.message_area);

    let mut hints = vec![key_hint("Tab", " Switch field  "), key_hint("Enter", " Start  ")];
    if *retake_offered {
        hints.push(key_hint("Ctrl+R", " Retake  "));
    }
    hints.push(key_hint("Esc/Ctrl+C", " Quit"));
    draw_help(f, layout.footer_area, hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourseBinding, Deployment, SessionSettings};
    use crate::models::{ApiResponse, CheckUserOutcome};
    use crate::session::Event;
    use crate::ui::test_support::{contains, render};

    #[test]
    fn test_taken_message_and_retake_hint() {
        let mut controller = QuizController::new(
            Deployment {
                multi_course: false,
                course: Some(CourseBinding::from_id("db")),
            },
            SessionSettings::default(),
        );
        controller.handle(Event::LoginSubmitted {
            identity: "alice".to_string(),
            full_name: "Alice".to_string(),
        });
        let rows = render(80, 20, |f| draw_login(f, &controller));
        assert!(contains(&rows, "Checking..."));

        controller.handle(Event::Api(ApiResponse::CheckUser(Ok(
            CheckUserOutcome::Taken {
                message: "Already attempted".to_string(),
                taken_count: Some(2),
            },
        ))));
        let rows = render(80, 20, |f| draw_login(f, &controller));
        assert!(contains(&rows, "Quiz - DB"));
        assert!(contains(&rows, "Already attempted (Attempts: 2/3)"));
        assert!(contains(&rows, "Ctrl+R"));
    }
}
