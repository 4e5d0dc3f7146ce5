use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{alert_style, bold_style, dim_style, legend_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::{App, PickerFocus};

pub fn render_picker(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(4),    // lists
            Constraint::Length(1), // alert
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "Choose a language and a level",
        bold_style().fg(Color::Cyan),
    ))
    .block(Block::default().borders(Borders::ALL).title("vokab"))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let selected_language = app.controller.selected_language();
    let languages: Vec<ListItem> = app
        .language_names()
        .into_iter()
        .map(|name| {
            let marker = if selected_language == Some(name.as_str()) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{name}"))
        })
        .collect();

    let mut language_state = ListState::default();
    if app.focus == PickerFocus::Languages {
        language_state.select(Some(app.language_cursor));
    }
    let language_list = List::new(languages)
        .block(Block::default().borders(Borders::ALL).title("Language"))
        .highlight_style(highlight);
    f.render_stateful_widget(language_list, columns[0], &mut language_state);

    let level_select_enabled = app.controller.level_select_enabled();
    let selected_level = app.controller.selected_level();
    let levels: Vec<ListItem> = app
        .controller
        .available_levels()
        .iter()
        .map(|level| {
            let marker = if selected_level == Some(level.data_file.as_str()) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", level.display_name))
        })
        .collect();

    let mut level_state = ListState::default();
    if app.focus == PickerFocus::Levels && level_select_enabled {
        level_state.select(Some(app.level_cursor));
    }
    let level_block = Block::default().borders(Borders::ALL).title("Level");
    let level_list = if level_select_enabled {
        List::new(levels).block(level_block).highlight_style(highlight)
    } else {
        List::new(vec![ListItem::new("Select a language first")])
            .block(level_block)
            .style(dim_style())
    };
    f.render_stateful_widget(level_list, columns[1], &mut level_state);

    if let Some(ref alert) = app.alert {
        let alert = Paragraph::new(Span::styled(alert.as_str(), alert_style()))
            .alignment(Alignment::Center);
        f.render_widget(alert, chunks[2]);
    }

    let legend = if app.controller.start_enabled() {
        "(↑/↓) move / (tab) switch list / (enter) select / (s)tart / (esc)ape"
    } else {
        "(↑/↓) move / (tab) switch list / (enter) select / (esc)ape"
    };
    f.render_widget(
        Paragraph::new(Span::styled(legend, legend_style())).alignment(Alignment::Center),
        chunks[3],
    );
}
