use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::{editor::EditorState, lock::BackgroundLock, viewer::MemoViewer};
use crate::domain::memo::{CategoryFilter, Memo};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Search,
    Editor,
    List,
}

pub(crate) struct TuiState {
    pub(crate) search: SearchState,
    pub(crate) editor: EditorState,
    pub(crate) memos: Vec<Memo>,
    pub(crate) focus: Focus,
    pub(crate) list_index: Option<usize>,
    pub(crate) category_filter: CategoryFilter,
    /// Last submitted search; the list shows its results while set.
    pub(crate) active_query: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) viewer: MemoViewer,
    background: BackgroundLock,
}

impl TuiState {
    pub(crate) fn new(memos: Vec<Memo>) -> Self {
        let background = BackgroundLock::default();
        let mut state = Self {
            search: SearchState::new(),
            editor: EditorState::new(),
            memos: Vec::new(),
            focus: Focus::List,
            list_index: None,
            category_filter: CategoryFilter::All,
            active_query: None,
            status: None,
            viewer: MemoViewer::new(background.clone()),
            background,
        };
        state.set_memos(memos);
        state
    }

    /// Swaps the list contents, keeping the selection on the same memo when it survives.
    pub(crate) fn set_memos(&mut self, memos: Vec<Memo>) {
        let selected_id = self.selected_memo().map(|memo| memo.id.clone());
        self.memos = memos;
        self.list_index = selected_id
            .and_then(|id| self.memos.iter().position(|memo| memo.id == id))
            .or_else(|| self.first_list_index());
    }

    pub(crate) fn selected_memo(&self) -> Option<&Memo> {
        self.list_index.and_then(|index| self.memos.get(index))
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search | Focus::Editor => Focus::List,
            Focus::List => Focus::Editor,
        };
    }

    pub(crate) fn activate_search(&mut self) {
        self.focus = Focus::Search;
        self.search.clear();
    }

    pub(crate) fn background_locked(&self) -> bool {
        self.background.is_held()
    }

    pub(crate) fn move_list_selection_up(&mut self) {
        if self.background_locked() {
            return;
        }
        let Some(current) = self.list_index else {
            self.list_index = self.first_list_index();
            return;
        };
        if current > 0 {
            self.list_index = Some(current - 1);
        }
    }

    pub(crate) fn move_list_selection_down(&mut self) {
        if self.background_locked() {
            return;
        }
        let Some(current) = self.list_index else {
            self.list_index = self.first_list_index();
            return;
        };
        let max_index = self.memos.len().saturating_sub(1);
        if current < max_index {
            self.list_index = Some(current + 1);
        }
    }

    pub(crate) fn is_search_visible(&self) -> bool {
        matches!(self.focus, Focus::Search) || self.active_query.is_some()
    }

    fn first_list_index(&self) -> Option<usize> {
        if self.memos.is_empty() { None } else { Some(0) }
    }
}

pub(crate) struct SearchState {
    pub(crate) query: String,
}

impl SearchState {
    fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        self.query.push(ch);
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.query.clear();
    }

    pub(crate) fn cursor_position_inline(&self, area: Rect) -> (u16, u16) {
        let col = UnicodeWidthStr::width(self.query.as_str()) as u16;
        (area.x + col + 1, area.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::memo::MemoId;

    fn memo(id: &str) -> Memo {
        Memo {
            id: MemoId::from(id),
            title: id.to_string(),
            content: String::new(),
            category: "work".to_string(),
            tags: Vec::new(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn selection_follows_the_memo_across_refreshes() {
        let mut state = TuiState::new(vec![memo("a"), memo("b"), memo("c")]);
        state.move_list_selection_down();
        assert_eq!(state.selected_memo().unwrap().id.as_str(), "b");

        state.set_memos(vec![memo("new"), memo("a"), memo("b")]);
        assert_eq!(state.selected_memo().unwrap().id.as_str(), "b");

        state.set_memos(vec![memo("x")]);
        assert_eq!(state.list_index, Some(0));
        state.set_memos(Vec::new());
        assert_eq!(state.list_index, None);
    }

    #[test]
    fn open_viewer_freezes_the_list() {
        let mut state = TuiState::new(vec![memo("a"), memo("b")]);
        state.viewer.show(memo("a"));
        state.move_list_selection_down();
        assert_eq!(state.list_index, Some(0));

        state.viewer.close();
        state.move_list_selection_down();
        assert_eq!(state.list_index, Some(1));
    }

    #[test]
    fn search_prompt_shows_while_typing_or_filtering() {
        let mut state = TuiState::new(Vec::new());
        assert!(!state.is_search_visible());
        state.activate_search();
        assert!(state.is_search_visible());
        state.focus = Focus::List;
        state.active_query = Some("x".to_string());
        assert!(state.is_search_visible());
    }
}
