use super::{draw_help, key_hint, layout::calculate_quiz_chunks};
use crate::session::QuizController;
use crate::utils::{calculate_wrapped_cursor_position, wrap_by_width};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const LOW_TIME_SECS: u32 = 60;

pub fn draw_quiz(f: &mut Frame, controller: &mut QuizController) {
    let Some(session) = controller.session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };
    let layout = calculate_quiz_chunks(f.area());

    let mut progress = format!(
        "Question {} / {}",
        session.current_index + 1,
        session.questions.len()
    );
    if let Some(course) = controller.course() {
        progress.push_str(&format!(" - {}", course.title));
    }
    if let Some(attempt) = session.attempt {
        progress.push_str(&format!(" (attempt {})", attempt));
    }
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let timer_color = if session.countdown.remaining() < LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Green
    };
    let timer = Paragraph::new(session.countdown.display())
        .style(
            Style::default()
                .fg(timer_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Time"));
    f.render_widget(timer, layout.timer_area);

    let question = Paragraph::new(Text::from(question.text.clone()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    // Lines are wrapped here rather than by the widget so the cursor row
    // matches what is drawn.
    let text_width = layout.answer_area.width.saturating_sub(2) as usize;
    let visible_height = layout.answer_area.height.saturating_sub(2) as usize;
    let input = &mut controller.answer_input;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(input.value(), input.cursor(), text_width);

    let mut scroll = input.scroll_y as usize;
    if cursor_line < scroll {
        scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= scroll + visible_height {
        scroll = cursor_line + 1 - visible_height;
    }
    input.scroll_y = scroll as u16;

    let content = if input.is_empty() {
        Text::from(Line::styled(
            "[Type your answer here...]",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let value = input.value();
        Text::from(
            wrap_by_width(value, text_width)
                .into_iter()
                .map(|(start, end)| Line::from(value[start..end].to_string()))
                .collect::<Vec<_>>(),
        )
    };
    let answer = Paragraph::new(content)
        .scroll((input.scroll_y, 0))
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(answer, layout.answer_area);

    let cursor_x = layout.answer_area.x + 1 + cursor_col as u16;
    let cursor_y = layout.answer_area.y + 1 + (cursor_line - scroll) as u16;
    f.set_cursor_position((cursor_x, cursor_y));

    draw_help(
        f,
        layout.help_area,
        vec![
            key_hint("Enter", " Submit  "),
            key_hint("←/→", " Move  "),
            key_hint("Ctrl+C", " Quit"),
        ],
    );
}
