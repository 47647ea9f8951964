use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::{
    editor::{EditorField, EditorState},
    state::{Focus, TuiState},
    viewer::ViewerCallbacks,
};
use crate::{
    domain::memo::{CategoryFilter, Memo, MemoId},
    store::MemoStore,
};

#[derive(Clone, Copy, Debug)]
enum Action {
    Quit,
    ToggleFocus,
    ActivateSearch,
    SubmitSearch,
    CancelSearch,
    OpenSelected,
    NewMemo,
    EditSelected,
    CycleCategory,
    Reload,
    SaveMemo,
    CancelEdit,
    NextField,
    PreviousField,
    InsertNewline,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Backspace,
    Delete,
    InsertChar(char),
}

/// Returns `true` when the app should exit.
pub(crate) fn handle_tui_key(store: &MemoStore, state: &mut TuiState, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if is_quit_chord(&key) {
        return true;
    }
    if state.viewer.is_open() {
        route_to_viewer(store, state, key);
        return false;
    }
    match key_to_action(&key, state.focus) {
        Some(action) => apply_action(store, state, action),
        None => false,
    }
}

/// Viewer-side effects: edits go to the composer, deletes go to the store.
struct ViewerBridge<'a> {
    store: &'a MemoStore,
    editor: &'a mut EditorState,
    focus: &'a mut Focus,
    status: &'a mut Option<String>,
    list_changed: bool,
}

impl ViewerCallbacks for ViewerBridge<'_> {
    fn on_edit(&mut self, memo: &Memo) {
        self.editor.start_edit(memo);
        *self.focus = Focus::Editor;
    }

    fn on_delete(&mut self, id: &MemoId) -> bool {
        let deleted = self.store.delete(id);
        if deleted {
            self.list_changed = true;
            *self.status = Some("Memo deleted".to_string());
        }
        deleted
    }
}

fn route_to_viewer(store: &MemoStore, state: &mut TuiState, key: KeyEvent) {
    let mut bridge = ViewerBridge {
        store,
        editor: &mut state.editor,
        focus: &mut state.focus,
        status: &mut state.status,
        list_changed: false,
    };
    state.viewer.handle_key(key, &mut bridge);
    if bridge.list_changed {
        refresh_list(store, state);
    }
}

fn is_quit_chord(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn key_to_action(key: &KeyEvent, focus: Focus) -> Option<Action> {
    let code = key.code;
    let modifiers = key.modifiers;

    match focus {
        Focus::List => match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::ToggleFocus),
            KeyCode::Char('/') => Some(Action::ActivateSearch),
            KeyCode::Enter => Some(Action::OpenSelected),
            KeyCode::Char('n') => Some(Action::NewMemo),
            KeyCode::Char('e') => Some(Action::EditSelected),
            KeyCode::Char('c') => Some(Action::CycleCategory),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            _ => None,
        },
        Focus::Search => match code {
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Enter => Some(Action::SubmitSearch),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::InsertChar(ch))
            }
            _ => None,
        },
        Focus::Editor => {
            if is_submit_key(code, modifiers) {
                return Some(Action::SaveMemo);
            }
            match code {
                KeyCode::Esc => Some(Action::CancelEdit),
                KeyCode::Tab => Some(Action::NextField),
                KeyCode::BackTab => Some(Action::PreviousField),
                KeyCode::Enter => Some(Action::InsertNewline),
                KeyCode::Up => Some(Action::MoveUp),
                KeyCode::Down => Some(Action::MoveDown),
                KeyCode::Left => Some(Action::MoveLeft),
                KeyCode::Right => Some(Action::MoveRight),
                KeyCode::Backspace => Some(Action::Backspace),
                KeyCode::Delete => Some(Action::Delete),
                KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Action::InsertChar(ch))
                }
                _ => None,
            }
        }
    }
}

fn apply_action(store: &MemoStore, state: &mut TuiState, action: Action) -> bool {
    match action {
        Action::Quit => return true,
        Action::ToggleFocus => state.toggle_focus(),
        Action::ActivateSearch => state.activate_search(),
        Action::SubmitSearch => submit_search(store, state),
        Action::CancelSearch => {
            state.search.clear();
            state.active_query = None;
            state.focus = Focus::List;
            refresh_list(store, state);
        }
        Action::OpenSelected => open_selected(store, state),
        Action::NewMemo => {
            state.editor.start_new();
            state.focus = Focus::Editor;
        }
        Action::EditSelected => {
            if let Some(memo) = state.selected_memo().cloned() {
                state.editor.start_edit(&memo);
                state.focus = Focus::Editor;
            }
        }
        Action::CycleCategory => {
            state.category_filter = state.category_filter.cycle();
            state.active_query = None;
            state.search.clear();
            refresh_list(store, state);
            state.status = Some(format!("Category: {}", state.category_filter.as_str()));
        }
        Action::Reload => {
            refresh_list(store, state);
            state.status = Some(format!("{} memos", state.memos.len()));
        }
        Action::SaveMemo => save_memo(store, state),
        Action::CancelEdit => {
            state.editor.reset();
            state.focus = Focus::List;
        }
        Action::NextField => state.editor.next_field(),
        Action::PreviousField => state.editor.previous_field(),
        Action::InsertNewline => match state.editor.field {
            EditorField::Content => state.editor.content.newline(),
            _ => state.editor.next_field(),
        },
        Action::MoveUp => match state.focus {
            Focus::List => state.move_list_selection_up(),
            Focus::Editor if state.editor.field == EditorField::Content => {
                state.editor.content.move_up()
            }
            _ => {}
        },
        Action::MoveDown => match state.focus {
            Focus::List => state.move_list_selection_down(),
            Focus::Editor if state.editor.field == EditorField::Content => {
                state.editor.content.move_down()
            }
            _ => {}
        },
        Action::MoveLeft => match state.editor.active_input() {
            Some(input) => input.move_left(),
            None => state.editor.category = state.editor.category.previous(),
        },
        Action::MoveRight => match state.editor.active_input() {
            Some(input) => input.move_right(),
            None => state.editor.category = state.editor.category.next(),
        },
        Action::Backspace => match state.focus {
            Focus::Search => state.search.backspace(),
            Focus::Editor => {
                if let Some(input) = state.editor.active_input() {
                    input.backspace();
                }
            }
            Focus::List => {}
        },
        Action::Delete => {
            if let Some(input) = state.editor.active_input() {
                input.delete_char();
            }
        }
        Action::InsertChar(ch) => match state.focus {
            Focus::Search => state.search.insert_char(ch),
            Focus::Editor => match state.editor.active_input() {
                Some(input) => input.insert_char(ch),
                None if ch == ' ' => state.editor.category = state.editor.category.next(),
                None => {}
            },
            Focus::List => {}
        },
    }
    false
}

fn is_submit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    if !modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    matches!(
        code,
        KeyCode::Enter
            | KeyCode::Char('\n')
            | KeyCode::Char('\r')
            | KeyCode::Char('m')
            | KeyCode::Char('j')
            | KeyCode::Char('s')
    )
}

fn refresh_list(store: &MemoStore, state: &mut TuiState) {
    let memos = match &state.active_query {
        Some(query) => store.search(query),
        None => store.filter_by_category(&state.category_filter),
    };
    state.set_memos(memos);
}

fn submit_search(store: &MemoStore, state: &mut TuiState) {
    let query = state.search.query.trim().to_string();
    state.focus = Focus::List;
    if query.is_empty() {
        state.active_query = None;
        refresh_list(store, state);
        return;
    }
    state.category_filter = CategoryFilter::All;
    state.active_query = Some(query);
    refresh_list(store, state);
    state.status = Some(format!("{} found", state.memos.len()));
}

fn open_selected(store: &MemoStore, state: &mut TuiState) {
    let Some(id) = state.selected_memo().map(|memo| memo.id.clone()) else {
        return;
    };
    match store.get_by_id(&id) {
        Some(memo) => state.viewer.show(memo),
        None => {
            debug!(memo_id = %id, "selected memo is gone");
            state.status = Some("That memo is no longer available".to_string());
            refresh_list(store, state);
        }
    }
}

fn save_memo(store: &MemoStore, state: &mut TuiState) {
    let Some(memo) = state.editor.build() else {
        state.editor.status = Some("A title is required".to_string());
        return;
    };
    let saved = if state.editor.editing().is_some() {
        store.update(&memo)
    } else {
        store.insert(&memo)
    };
    let Some(saved) = saved else {
        state.editor.status = Some("Save failed, see the log".to_string());
        return;
    };

    state.editor.reset();
    state.focus = Focus::List;
    state.status = Some(format!("Saved \"{}\"", saved.title));
    refresh_list(store, state);
    if let Some(index) = state.memos.iter().position(|memo| memo.id == saved.id) {
        state.list_index = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteBackend;

    fn store_with(memos: &[Memo]) -> MemoStore {
        let store = MemoStore::new(Box::new(SqliteBackend::open_in_memory().unwrap()));
        for memo in memos {
            store.insert(memo).unwrap();
        }
        store
    }

    fn memo(id: &str, title: &str, category: &str, created_at: &str) -> Memo {
        Memo {
            id: MemoId::from(id),
            title: title.to_string(),
            content: format!("body of {title}"),
            category: category.to_string(),
            tags: Vec::new(),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    fn press(store: &MemoStore, state: &mut TuiState, code: KeyCode) -> bool {
        handle_tui_key(store, state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(store: &MemoStore, state: &mut TuiState, text: &str) {
        for ch in text.chars() {
            press(store, state, KeyCode::Char(ch));
        }
    }

    fn fixture() -> (MemoStore, TuiState) {
        let store = store_with(&[
            memo("1", "Older", "work", "2024-01-01T00:00:00Z"),
            memo("2", "Newer", "idea", "2024-01-02T00:00:00Z"),
        ]);
        let state = TuiState::new(store.list());
        (store, state)
    }

    #[test]
    fn composing_a_memo_saves_it_and_selects_it() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Char('n'));
        assert_eq!(state.focus, Focus::Editor);

        type_text(&store, &mut state, "Groceries");
        press(&store, &mut state, KeyCode::Tab);
        press(&store, &mut state, KeyCode::Right);
        press(&store, &mut state, KeyCode::Tab);
        type_text(&store, &mut state, "food");
        press(&store, &mut state, KeyCode::Tab);
        type_text(&store, &mut state, "milk");
        handle_tui_key(
            &store,
            &mut state,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );

        assert_eq!(state.focus, Focus::List);
        assert_eq!(store.list().len(), 3);
        let selected = state.selected_memo().unwrap();
        assert_eq!(selected.title, "Groceries");
        assert_eq!(selected.category, "personal");
        assert_eq!(selected.tags, vec!["food"]);
        assert_eq!(selected.content, "milk");
    }

    #[test]
    fn saving_without_a_title_keeps_the_composer_open() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Char('n'));
        handle_tui_key(
            &store,
            &mut state,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL),
        );
        assert_eq!(state.focus, Focus::Editor);
        assert!(state.editor.status.is_some());
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn viewer_takes_keys_while_open() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Enter);
        assert!(state.viewer.is_open());

        press(&store, &mut state, KeyCode::Char('j'));
        assert_eq!(state.list_index, Some(0));

        assert!(!press(&store, &mut state, KeyCode::Esc));
        assert!(!state.viewer.is_open());
        assert!(press(&store, &mut state, KeyCode::Esc));
    }

    #[test]
    fn deleting_from_the_viewer_refreshes_the_list() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Enter);
        press(&store, &mut state, KeyCode::Char('d'));
        press(&store, &mut state, KeyCode::Char('y'));

        assert!(!state.viewer.is_open());
        assert_eq!(state.memos.len(), 1);
        assert_eq!(state.memos[0].id.as_str(), "1");
        assert_eq!(store.get_by_id(&MemoId::from("2")), None);
    }

    #[test]
    fn editing_from_the_viewer_updates_in_place() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Enter);
        press(&store, &mut state, KeyCode::Char('e'));
        assert!(!state.viewer.is_open());
        assert_eq!(state.focus, Focus::Editor);

        type_text(&store, &mut state, "!");
        handle_tui_key(
            &store,
            &mut state,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );

        let stored = store.get_by_id(&MemoId::from("2")).unwrap();
        assert_eq!(stored.title, "Newer!");
        assert_eq!(stored.created_at, "2024-01-02T00:00:00Z");
        assert!(stored.was_edited());
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn search_and_category_filters_replace_each_other() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Char('/'));
        type_text(&store, &mut state, "older");
        press(&store, &mut state, KeyCode::Enter);
        assert_eq!(state.active_query.as_deref(), Some("older"));
        assert_eq!(state.memos.len(), 1);

        press(&store, &mut state, KeyCode::Char('c'));
        assert_eq!(state.active_query, None);
        assert_eq!(state.category_filter, CategoryFilter::parse("personal"));
        assert!(state.memos.is_empty());

        for _ in 0..5 {
            press(&store, &mut state, KeyCode::Char('c'));
        }
        assert_eq!(state.category_filter, CategoryFilter::All);
        assert_eq!(state.memos.len(), 2);
    }

    #[test]
    fn escape_in_search_restores_the_full_list() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Char('/'));
        type_text(&store, &mut state, "newer");
        press(&store, &mut state, KeyCode::Enter);
        assert_eq!(state.memos.len(), 1);

        press(&store, &mut state, KeyCode::Char('/'));
        press(&store, &mut state, KeyCode::Esc);
        assert_eq!(state.focus, Focus::List);
        assert_eq!(state.memos.len(), 2);
    }

    #[test]
    fn ctrl_c_quits_even_with_the_viewer_open() {
        let (store, mut state) = fixture();
        press(&store, &mut state, KeyCode::Enter);
        assert!(handle_tui_key(
            &store,
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ));
    }
}
