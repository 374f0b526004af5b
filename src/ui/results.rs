use super::{course_heading, draw_help, draw_title, key_hint, layout::calculate_screen_chunks};
use crate::session::{Outcome, QuizController, Screen};
use crate::utils::{format_score, render_markdown};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Lines shown in the results pane for a finished attempt.
pub fn result_lines(outcome: &Outcome) -> Vec<Line<'static>> {
    let result = match outcome {
        Outcome::Failed(message) => {
            return vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))];
        }
        Outcome::Scored(result) => result,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Score: {} / {}",
                format_score(result.final_score),
                result.total
            ),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for answer in &result.answers {
        let label = Span::styled(
            format!("Q{}: ", answer.index + 1),
            Style::default().add_modifier(Modifier::BOLD),
        );
        let score = Span::styled(
            format!(" (Score: {})", format_score(answer.score)),
            Style::default().fg(Color::Yellow),
        );
        let feedback = match answer.feedback.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => render_markdown(text),
            _ => vec![Line::from("No feedback")],
        };

        // The label joins the first feedback line and the score closes the
        // last one.
        let last = feedback.len().saturating_sub(1);
        for (i, line) in feedback.into_iter().enumerate() {
            let mut spans = Vec::new();
            if i == 0 {
                spans.push(label.clone());
            }
            spans.extend(line.spans);
            if i == last {
                spans.push(score.clone());
            }
            lines.push(Line::from(spans));
        }
    }
    lines
}

pub fn draw_results(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_screen_chunks(f.area());
    draw_title(
        f,
        layout.header_area,
        &format!("{} - Results", course_heading(controller)),
    );

    let block = Block::default().borders(Borders::ALL);
    match controller.screen() {
        Screen::Finished {
            outcome,
            retake_message,
            retake_pending,
        } => {
            let mut text = Text::from(result_lines(outcome));
            if *retake_pending {
                text.push_line(Line::from(""));
                text.push_line(Line::styled(
                    "Requesting retake...",
                    Style::default().fg(Color::DarkGray),
                ));
            } else if let Some(message) = retake_message {
                text.push_line(Line::from(""));
                text.push_line(Line::styled(
                    message.clone(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            let results = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(block);
            f.render_widget(results, layout.content_area);
            draw_help(
                f,
                layout.footer_area,
                vec![key_hint("r", " Retake  "), key_hint("Esc/q", " Quit")],
            );
        }
        _ => {
            let waiting = Paragraph::new("Generating result...")
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .block(block);
            f.render_widget(waiting, layout.content_area);
            draw_help(f, layout.footer_area, vec![key_hint("Esc", " Quit")]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Deployment, SessionSettings};
    use crate::error::ApiError;
    use crate::models::{
        ApiResponse, CheckUserOutcome, FinalizeResult, Question, QuizStart, ScoredAnswer,
    };
    use crate::session::{Event, FINALIZE_ERROR};
    use crate::ui::test_support::{contains, render};

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn finalizing() -> QuizController {
        let mut controller =
            QuizController::new(Deployment::default(), SessionSettings::default());
        controller.handle(Event::LoginSubmitted {
            identity: "alice".to_string(),
            full_name: "Alice".to_string(),
        });
        controller.handle(Event::Api(ApiResponse::CheckUser(Ok(
            CheckUserOutcome::Ready(QuizStart {
                questions: vec![Question::new("What is 2+2?")],
                attempt: None,
                course_id: None,
            }),
        ))));
        controller.handle(Event::AnswerSubmitted("4".to_string()));
        controller
    }

    #[test]
    fn test_result_lines_for_scored_attempt() {
        let outcome = Outcome::Scored(FinalizeResult {
            final_score: 1.5,
            total: 2,
            answers: vec![
                ScoredAnswer {
                    index: 0,
                    feedback: Some("Correct.".to_string()),
                    score: 1.0,
                },
                ScoredAnswer {
                    index: 1,
                    feedback: None,
                    score: 0.5,
                },
            ],
        });
        let lines: Vec<String> = result_lines(&outcome).iter().map(plain).collect();
        assert_eq!(lines[0], "Score: 1.5 / 2");
        assert_eq!(lines[2], "Q1: Correct. (Score: 1)");
        assert_eq!(lines[3], "Q2: No feedback (Score: 0.5)");
    }

    #[test]
    fn test_multiline_feedback_keeps_score_on_last_line() {
        let outcome = Outcome::Scored(FinalizeResult {
            final_score: 0.0,
            total: 1,
            answers: vec![ScoredAnswer {
                index: 0,
                feedback: Some("Not quite.\n- mention **entropy**".to_string()),
                score: 0.0,
            }],
        });
        let lines: Vec<String> = result_lines(&outcome).iter().map(plain).collect();
        assert_eq!(lines[2], "Q1: Not quite.");
        assert_eq!(lines[3], "  • mention entropy (Score: 0)");
    }

    #[test]
    fn test_failed_outcome_is_a_single_line() {
        let lines = result_lines(&Outcome::Failed(FINALIZE_ERROR.to_string()));
        assert_eq!(lines.len(), 1);
        assert_eq!(plain(&lines[0]), FINALIZE_ERROR);
    }

    #[test]
    fn test_results_screen_states() {
        let mut controller = finalizing();
        let rows = render(80, 20, |f| draw_results(f, &controller));
        assert!(contains(&rows, "Generating result..."));

        controller.handle(Event::Api(ApiResponse::Finalize(Err(ApiError::Rejected(
            "session not found".to_string(),
        )))));
        let rows = render(80, 20, |f| draw_results(f, &controller));
        assert!(contains(&rows, FINALIZE_ERROR));
        assert!(contains(&rows, "Retake"));
        assert!(!contains(&rows, "Score:"));
    }
}
