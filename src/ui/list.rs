// List rendering for the projects and commits panels.
// Provides styled list views with loading and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use folio::aggregator::{CommitLogEntry, RepositorySummary, Visibility};

use crate::state::{LoadingState, SelectableList};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn visibility_color(visibility: Visibility) -> Color {
    match visibility {
        Visibility::Public => Color::Green,
        Visibility::Private => Color::Magenta,
        Visibility::Fork => Color::Blue,
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

fn highlighted(list: List<'_>) -> List<'_> {
    list.highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
}

/// Render the projects list.
pub fn render_projects_list(
    frame: &mut Frame,
    list: &mut SelectableList<RepositorySummary>,
    area: Rect,
) {
    match &list.data {
        LoadingState::Idle => render_empty(frame, area, "Press r to load projects"),
        LoadingState::Loading => render_loading(frame, area, "Fetching repositories"),
        LoadingState::Loaded(projects) if projects.is_empty() => {
            render_empty(frame, area, "No repositories found")
        }
        LoadingState::Loaded(projects) => {
            let items: Vec<ListItem> = projects
                .iter()
                .map(|project| {
                    let pushed = project
                        .pushed_at
                        .as_ref()
                        .map(format_relative_time)
                        .unwrap_or_else(|| "never".to_string());

                    let line = Line::from(vec![
                        Span::styled(
                            format!("{:<8}", project.visibility.label()),
                            Style::default().fg(visibility_color(project.visibility)),
                        ),
                        Span::styled(
                            project.name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {} commits", project.commit_count),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            format!("  ★ {}", project.star_count),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(
                            format!("  {}", pushed),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    ListItem::new(line)
                })
                .collect();

            let list_widget = highlighted(
                List::new(items)
                    .block(Block::default().borders(Borders::ALL).title(" ~/projects ")),
            );

            frame.render_stateful_widget(list_widget, area, &mut list.list_state);
        }
    }
}

/// Render details of the selected project.
pub fn render_project_details(frame: &mut Frame, project: Option<&RepositorySummary>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" cat README ");
    let Some(project) = project else {
        frame.render_widget(block, area);
        return;
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Cyan));
    let lines = vec![
        Line::from(Span::styled(
            project.name.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            project
                .description
                .clone()
                .unwrap_or_else(|| "No description".to_string()),
        ),
        Line::from(""),
        Line::from(vec![label("stack    "), Span::raw(project.tech_stack.join(" · "))]),
        Line::from(vec![
            label("stars    "),
            Span::raw(project.star_count.to_string()),
        ]),
        Line::from(vec![
            label("forks    "),
            Span::raw(project.fork_count.to_string()),
        ]),
        Line::from(vec![
            label("commits  "),
            Span::raw(project.commit_count.to_string()),
        ]),
        Line::from(vec![
            label("created  "),
            Span::raw(project.created_at.format("%Y-%m-%d").to_string()),
        ]),
        Line::from(vec![
            label("updated  "),
            Span::raw(format_relative_time(&project.updated_at)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            project.url.clone(),
            Style::default().fg(Color::Blue),
        )),
    ];

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(details, area);
}

/// Render the commit log.
pub fn render_commits_list(
    frame: &mut Frame,
    list: &mut SelectableList<CommitLogEntry>,
    area: Rect,
) {
    match &list.data {
        LoadingState::Idle => render_empty(frame, area, "Press r to load commits"),
        LoadingState::Loading => render_loading(frame, area, "Reading commit history"),
        LoadingState::Loaded(commits) if commits.is_empty() => {
            render_empty(frame, area, "No recent commits")
        }
        LoadingState::Loaded(commits) => {
            let items: Vec<ListItem> = commits
                .iter()
                .map(|commit| {
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{} ", commit.sha),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(
                            format!("[{}] ", commit.repo),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(commit.message.clone()),
                        Span::styled(
                            format!("  {} · {}", commit.author, format_relative_time(&commit.date)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]);
                    ListItem::new(line)
                })
                .collect();

            let list_widget = highlighted(
                List::new(items).block(Block::default().borders(Borders::ALL).title(" git log ")),
            );

            frame.render_stateful_widget(list_widget, area, &mut list.list_state);
        }
    }
}
