// Panel state management.
// Loading state and keyboard selection for the projects and commits panels.

use ratatui::widgets::ListState;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// State for a selectable list with keyboard navigation.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub data: LoadingState<Vec<T>>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            data: LoadingState::Idle,
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self) {
        self.data = LoadingState::Loading;
    }

    /// Replace the items, keeping the selection in range.
    pub fn set_loaded(&mut self, items: Vec<T>) {
        let selected = match (self.list_state.selected(), items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.data = LoadingState::Loaded(items);
        self.list_state.select(selected);
    }

    /// Get the currently selected item.
    pub fn selected_item(&self) -> Option<&T> {
        let index = self.list_state.selected()?;
        self.data.data()?.get(index)
    }

    /// Select the next item in the list.
    pub fn select_next(&mut self) {
        let Some(len) = self.data.data().map(Vec::len).filter(|len| *len > 0) else {
            return;
        };
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in the list.
    pub fn select_prev(&mut self) {
        let Some(len) = self.data.data().map(Vec::len).filter(|len| *len > 0) else {
            return;
        };
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        };
        self.list_state.select(Some(i));
    }
}
