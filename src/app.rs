// App state and main event loop.
// Manages tabs, background loads through the aggregator, and keyboard input handling.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use folio::aggregator::{Aggregator, CommitLogEntry, RepositorySummary};
use folio::cache::FileStore;
use folio::github::GitHubClient;

use crate::state::{ConsoleState, SelectableList};
use crate::ui;

/// Repositories sampled for the commit log.
const COMMIT_LOG_REPOS: usize = 5;
/// Commits requested per sampled repository.
const COMMITS_PER_REPO: u32 = 3;

pub type LiveAggregator = Aggregator<GitHubClient, FileStore>;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Projects,
    Commits,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Projects, Tab::Commits, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Commits => "Commits",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Projects => Tab::Commits,
            Tab::Commits => Tab::Console,
            Tab::Console => Tab::Projects,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Projects => Tab::Console,
            Tab::Commits => Tab::Projects,
            Tab::Console => Tab::Commits,
        }
    }
}

/// Results delivered by background loads.
#[derive(Debug)]
pub enum AppEvent {
    ProjectsLoaded(Vec<RepositorySummary>),
    CommitsLoaded(Vec<CommitLogEntry>),
}

/// Main application state.
pub struct App {
    pub active_tab: Tab,
    pub projects: SelectableList<RepositorySummary>,
    pub commits: SelectableList<CommitLogEntry>,
    pub console: ConsoleState,
    pub show_help: bool,
    pub should_quit: bool,
    aggregator: Arc<LiveAggregator>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(aggregator: Arc<LiveAggregator>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            active_tab: Tab::default(),
            projects: SelectableList::new(),
            commits: SelectableList::new(),
            console: ConsoleState::new(),
            show_help: false,
            should_quit: false,
            aggregator,
            events_tx,
            events_rx,
        }
    }

    pub fn account(&self) -> &str {
        self.aggregator.account()
    }

    pub fn aggregator(&self) -> &LiveAggregator {
        &self.aggregator
    }

    /// Main event loop. Must be called from within a tokio runtime.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.load_projects(false);
        self.load_commits(false);

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.drain_loaded();
        }
        Ok(())
    }

    /// Start a background projects load.
    fn load_projects(&mut self, force_refresh: bool) {
        if self.projects.data.is_loading() {
            return;
        }
        self.projects.set_loading();
        self.console
            .log_info(format!("$ fetch projects --user {}", self.account()));

        let aggregator = Arc::clone(&self.aggregator);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let projects = aggregator.get_projects(force_refresh).await;
            let _ = tx.send(AppEvent::ProjectsLoaded(projects));
        });
    }

    /// Start a background commit log load.
    fn load_commits(&mut self, force_refresh: bool) {
        if self.commits.data.is_loading() {
            return;
        }
        self.commits.set_loading();
        self.console
            .log_info(format!("$ git log --all-repos --user {}", self.account()));

        let aggregator = Arc::clone(&self.aggregator);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let commits = if force_refresh {
                aggregator
                    .refresh_recent_commits(COMMIT_LOG_REPOS, COMMITS_PER_REPO)
                    .await
            } else {
                aggregator
                    .get_recent_commits(COMMIT_LOG_REPOS, COMMITS_PER_REPO)
                    .await
            };
            let _ = tx.send(AppEvent::CommitsLoaded(commits));
        });
    }

    /// Apply results of finished background loads.
    fn drain_loaded(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::ProjectsLoaded(projects) => {
                    if projects.is_empty() {
                        self.console.log_error("no repositories found");
                    } else {
                        self.console
                            .log_info(format!("loaded {} projects", projects.len()));
                    }
                    self.projects.set_loaded(projects);
                }
                AppEvent::CommitsLoaded(commits) => {
                    if commits.is_empty() {
                        self.console.log_warn("commit log is empty");
                    } else {
                        self.console
                            .log_info(format!("loaded {} commits", commits.len()));
                    }
                    self.commits.set_loaded(commits);
                }
            }
            self.clear_console_badge_if_viewing();
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if !event::poll(Duration::from_millis(100))? {
            return Ok(());
        }
        let Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                self.clear_console_badge_if_viewing();
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                self.clear_console_badge_if_viewing();
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('r') => self.refresh_current(),
            _ => {}
        }
        Ok(())
    }

    fn select_next(&mut self) {
        match self.active_tab {
            Tab::Projects => self.projects.select_next(),
            Tab::Commits => self.commits.select_next(),
            Tab::Console => self.console.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.active_tab {
            Tab::Projects => self.projects.select_prev(),
            Tab::Commits => self.commits.select_prev(),
            Tab::Console => self.console.select_prev(),
        }
    }

    /// Force-refresh the panel on screen.
    fn refresh_current(&mut self) {
        match self.active_tab {
            Tab::Projects => self.load_projects(true),
            Tab::Commits => self.load_commits(true),
            Tab::Console => {}
        }
    }

    /// Clear console badge when viewing console tab.
    fn clear_console_badge_if_viewing(&mut self) {
        if self.active_tab == Tab::Console {
            self.console.mark_read();
        }
    }
}
