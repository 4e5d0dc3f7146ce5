use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use vokab::controller::Phase;
use vokab::feedback_art::{art_for, art_width};

use super::{
    alert_style, bold_style, dim_style, legend_style, severity_style, HORIZONTAL_MARGIN,
    VERTICAL_MARGIN,
};
use crate::App;

pub fn render_practice(app: &App, f: &mut Frame) {
    let controller = &app.controller;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // session info
            Constraint::Min(0),
            Constraint::Length(3), // prompt
            Constraint::Length(3), // answer input
            Constraint::Length(2), // result message
            Constraint::Length(6), // art
            Constraint::Min(0),
            Constraint::Length(1), // alert
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(Span::styled(status_line(app), dim_style())).alignment(Alignment::Center),
        chunks[0],
    );

    let prompt = match controller.phase() {
        Phase::Loading => "Loading level…",
        _ => controller.prompt_text(),
    };
    let prompt_style = match controller.phase() {
        Phase::Active => bold_style().fg(Color::White),
        _ => bold_style().fg(Color::Cyan),
    };
    f.render_widget(
        Paragraph::new(Span::styled(prompt, prompt_style))
            .block(Block::default().borders(Borders::ALL).title("Translate"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[2],
    );

    render_input(app, f, chunks[3]);

    if let Some(feedback) = controller.result() {
        f.render_widget(
            Paragraph::new(Span::styled(
                feedback.text.as_str(),
                severity_style(feedback.severity),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            chunks[4],
        );
    }

    if let Some(outcome) = controller.last_outcome() {
        let art = art_for(outcome.correct);
        let color = if outcome.correct { Color::Green } else { Color::Red };
        let width = art_width(art);
        let lines: Vec<Line> = art
            .iter()
            .map(|line| Line::from(Span::styled(format!("{line:<width$}"), Style::default().fg(color))))
            .collect();
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            chunks[5],
        );
    }

    if let Some(ref alert) = app.alert {
        f.render_widget(
            Paragraph::new(Span::styled(alert.as_str(), alert_style()))
                .alignment(Alignment::Center),
            chunks[7],
        );
    }

    let legend = if app.session_over() {
        "(enter) back to levels / (esc)ape"
    } else {
        "(enter) submit / (esc) back to levels / (ctrl+c) quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(legend, legend_style())).alignment(Alignment::Center),
        chunks[8],
    );
}

fn render_input(app: &App, f: &mut Frame, area: Rect) {
    let enabled = app.controller.submit_enabled();
    let style = if enabled {
        bold_style()
    } else {
        dim_style()
    };

    f.render_widget(
        Paragraph::new(Span::styled(app.input.as_str(), style))
            .block(Block::default().borders(Borders::ALL).title("Your answer")),
        area,
    );

    if enabled {
        let x = area.x + 1 + app.input.width() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn status_line(app: &App) -> String {
    let controller = &app.controller;
    let cache = controller.cache();
    let remembered = format!("remembered {}/{}", cache.len(), cache.limit());

    let Some(session) = controller.session() else {
        return remembered;
    };

    let mut parts = vec![format!("{} · {}", session.language, session.level.display_name)];
    match controller.phase() {
        Phase::Complete(completion) => parts.push(completion.to_string()),
        _ => {
            if let Some((turn, total)) = controller.progress() {
                parts.push(format!("word {turn}/{total}"));
            }
        }
    }
    parts.push(remembered);
    parts.join("   ")
}
