// UI module for rendering the TUI.
// Contains the tab bar, project and commit panels, console log, and help overlay.

mod list;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::ConsoleLevel;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Projects => draw_projects_tab(frame, app, chunks[1]),
        Tab::Commits => list::render_commits_list(frame, &mut app.commits, chunks[1]),
        Tab::Console => draw_console_tab(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the projects list with a details pane for the selection.
fn draw_projects_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    list::render_projects_list(frame, &mut app.projects, chunks[0]);
    list::render_project_details(frame, app.projects.selected_item(), chunks[1]);
}

/// Draw the console activity log.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Console "));
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .console
        .messages
        .iter()
        .map(|msg| {
            let (prefix, color) = match msg.level {
                ConsoleLevel::Info => ("INFO ", Color::Green),
                ConsoleLevel::Warn => ("WARN ", Color::Yellow),
                ConsoleLevel::Error => ("ERROR", Color::Red),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    msg.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(format!(" {}", msg.message)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Console "))
        .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    let mut hints = vec![
        key("q"),
        Span::raw(" quit  "),
        key("Tab"),
        Span::raw(" switch  "),
        key("↑/↓"),
        Span::raw(" select  "),
        key("r"),
        Span::raw(" refresh  "),
        key("?"),
        Span::raw(" help"),
    ];

    let rate_limit = app.aggregator().api().transport().rate_limit();
    if rate_limit.limit > 0 {
        let color = if rate_limit.remaining < rate_limit.limit / 10 {
            Color::Red
        } else {
            Color::DarkGray
        };
        hints.push(Span::styled(
            format!("  API {}/{}", rate_limit.remaining, rate_limit.limit),
            Style::default().fg(color),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 44;
    let popup_height = 12;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let entry = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(text),
        ])
    };
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        entry("  ↑/↓ or j/k    ", "Navigate list"),
        entry("  Tab/S-Tab     ", "Switch tabs"),
        entry("  r             ", "Refresh (skip cache)"),
        entry("  ?             ", "Show/hide this help"),
        entry("  q             ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
