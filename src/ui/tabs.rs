// Tab bar rendering.
// Each tab shows its panel's item count; the title reads like the shell command behind the panel.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::{ConsoleLevel, LoadingState};

fn count_suffix<T>(data: &LoadingState<Vec<T>>) -> String {
    match data {
        LoadingState::Idle => String::new(),
        LoadingState::Loading => " …".to_string(),
        LoadingState::Loaded(items) => format!(" {}", items.len()),
    }
}

fn prompt_command(tab: Tab) -> &'static str {
    match tab {
        Tab::Projects => "ls ~/projects",
        Tab::Commits => "git log --all-repos",
        Tab::Console => "tail -f folio.log",
    }
}

pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let badge = app.console.unread_level().map(|level| match level {
        ConsoleLevel::Error => Color::Red,
        _ => Color::Yellow,
    });

    let tab_titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let (label, badge_color) = match tab {
                Tab::Projects => (
                    format!("{}{}", tab.title(), count_suffix(&app.projects.data)),
                    None,
                ),
                Tab::Commits => (
                    format!("{}{}", tab.title(), count_suffix(&app.commits.data)),
                    None,
                ),
                Tab::Console if app.console.unread > 0 => (
                    format!("{} ({})", tab.title(), app.console.unread),
                    badge,
                ),
                Tab::Console => (tab.title().to_string(), None),
            };

            let style = match (*tab == app.active_tab, badge_color) {
                (true, _) => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                (false, Some(color)) => Style::default().fg(color),
                (false, None) => Style::default().fg(Color::Gray),
            };

            Line::from(Span::styled(label, style))
        })
        .collect();

    let selected = Tab::ALL
        .iter()
        .position(|t| *t == app.active_tab)
        .unwrap_or(0);

    let prompt = Line::from(vec![
        Span::styled(
            format!(" {}@github", app.account()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(":"),
        Span::styled("~", Style::default().fg(Color::Blue)),
        Span::raw(format!("$ {} ", prompt_command(app.active_tab))),
    ]);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(prompt),
        )
        .select(selected)
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .divider(Span::styled(" · ", Style::default().fg(Color::DarkGray)));

    frame.render_widget(tabs_widget, area);
}
