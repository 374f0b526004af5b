use super::{draw_help, draw_title, key_hint, layout::calculate_screen_chunks};
use crate::models::Course;
use crate::session::{CourseCatalog, QuizController, Screen};
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn format_course_item(course: &Course) -> String {
    let description = if course.description.trim().is_empty() {
        String::new()
    } else {
        format!(" - {}", truncate_string(course.description.trim(), 60))
    };
    format!(
        "{}{} ({} questions)",
        course.display_title(),
        description,
        course.question_count
    )
}

fn placeholder(text: &str) -> ListItem<'static> {
    ListItem::new(text.to_string()).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

pub fn draw_course_selection(f: &mut Frame, controller: &QuizController) {
    let Screen::CourseSelection { catalog, selected } = controller.screen() else {
        return;
    };
    let layout = calculate_screen_chunks(f.area());
    draw_title(f, layout.header_area, "Choose a course");

    let block = Block::default().borders(Borders::ALL).title("Courses");
    match catalog {
        CourseCatalog::Loading => {
            f.render_widget(
                List::new(vec![placeholder("Loading courses...")]).block(block),
                layout.content_area,
            );
        }
        CourseCatalog::Failed => {
            let message = Paragraph::new("Could not load courses. Press r to try again.")
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(message, layout.content_area);
        }
        CourseCatalog::Loaded(courses) if courses.is_empty() => {
            f.render_widget(
                List::new(vec![placeholder("No courses available")]).block(block),
                layout.content_area,
            );
        }
        CourseCatalog::Loaded(courses) => {
            let items: Vec<ListItem> = courses
                .iter()
                .enumerate()
                .map(|(i, course)| {
                    let style = if i == *selected {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(format_course_item(course)).style(style)
                })
                .collect();
            f.render_widget(List::new(items).block(block), layout.content_area);
        }
    }

    let mut hints = vec![key_hint("↑/↓", " Navigate  "), key_hint("Enter", " Select  ")];
    if *catalog == CourseCatalog::Failed {
        hints.push(key_hint("r", " Reload  "));
    }
    hints.push(key_hint("Esc/Ctrl+C", " Quit"));
    draw_help(f, layout.footer_area, hints);
}
