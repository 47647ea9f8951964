use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Position, Rect},
    text::Line,
};

use super::{
    lock::{BackgroundGuard, BackgroundLock},
    markdown::render_markdown,
};
use crate::{
    domain::memo::{Memo, MemoId},
    format::MemoDetail,
};

const PAGE_LINES: u16 = 10;

/// What the viewer hands back to whoever opened it. Persistence happens on that side.
pub(crate) trait ViewerCallbacks {
    fn on_edit(&mut self, memo: &Memo);

    /// Returns whether the memo is gone.
    fn on_delete(&mut self, id: &MemoId) -> bool;
}

/// Overlay showing one memo. Closed renders nothing and ignores input.
pub(crate) struct MemoViewer {
    background: BackgroundLock,
    open: Option<OpenViewer>,
}

pub(crate) struct OpenViewer {
    pub(crate) memo: Memo,
    pub(crate) detail: MemoDetail,
    /// `None` until the markdown has been rendered; the raw source is shown meanwhile.
    pub(crate) preview: Option<Vec<Line<'static>>>,
    pub(crate) scroll: u16,
    pub(crate) confirming_delete: bool,
    pub(crate) notice: Option<String>,
    _background: BackgroundGuard,
}

enum Transition {
    Stay,
    Close,
}

impl MemoViewer {
    pub(crate) fn new(background: BackgroundLock) -> Self {
        Self {
            background,
            open: None,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn view(&self) -> Option<&OpenViewer> {
        self.open.as_ref()
    }

    /// Opens on `Some(memo)` with `is_open`; anything else closes.
    pub(crate) fn set_props(&mut self, memo: Option<Memo>, is_open: bool) {
        // Release first: the lock is a plain flag, so dropping an old guard after
        // acquiring a new one would clear it.
        self.open = None;
        if let (Some(memo), true) = (memo, is_open) {
            let guard = self.background.acquire();
            self.open = Some(OpenViewer {
                detail: MemoDetail::new(&memo),
                memo,
                preview: None,
                scroll: 0,
                confirming_delete: false,
                notice: None,
                _background: guard,
            });
        }
    }

    pub(crate) fn show(&mut self, memo: Memo) {
        self.set_props(Some(memo), true);
    }

    pub(crate) fn close(&mut self) {
        self.open = None;
    }

    /// Renders the markdown body if it is still pending. Returns whether anything changed.
    pub(crate) fn render_pending_preview(&mut self) -> bool {
        match self.open.as_mut() {
            Some(view) if view.preview.is_none() => {
                view.preview = Some(render_markdown(&view.memo.content));
                true
            }
            _ => false,
        }
    }

    /// Returns `false` when closed, so the key can go elsewhere.
    pub(crate) fn handle_key(&mut self, key: KeyEvent, callbacks: &mut dyn ViewerCallbacks) -> bool {
        let Some(view) = self.open.as_mut() else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return true;
        }
        if let Transition::Close = view.handle_key(key, callbacks) {
            self.close();
        }
        true
    }

    /// A click outside `overlay` lands on the backdrop and closes the viewer.
    pub(crate) fn handle_click(&mut self, column: u16, row: u16, overlay: Rect) {
        if self.is_open() && !overlay.contains(Position::new(column, row)) {
            self.close();
        }
    }
}

impl OpenViewer {
    fn handle_key(&mut self, key: KeyEvent, callbacks: &mut dyn ViewerCallbacks) -> Transition {
        if self.confirming_delete {
            return self.handle_confirm_key(key.code, callbacks);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Transition::Close,
            KeyCode::Char('e') => {
                callbacks.on_edit(&self.memo);
                return Transition::Close;
            }
            KeyCode::Char('d') => {
                self.confirming_delete = true;
                self.notice = None;
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-i32::from(PAGE_LINES)),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(i32::from(PAGE_LINES)),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        Transition::Stay
    }

    fn handle_confirm_key(
        &mut self,
        code: KeyCode,
        callbacks: &mut dyn ViewerCallbacks,
    ) -> Transition {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirming_delete = false;
                if callbacks.on_delete(&self.memo.id) {
                    return Transition::Close;
                }
                self.notice = Some("Delete failed, the memo is still there".to_string());
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirming_delete = false;
            }
            _ => {}
        }
        Transition::Stay
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.body_len().saturating_sub(1);
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(max));
        self.scroll = next as u16;
    }

    fn body_len(&self) -> u16 {
        let len = match &self.preview {
            Some(lines) => lines.len(),
            None => self.memo.content.lines().count(),
        };
        u16::try_from(len).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[derive(Default)]
    struct Recorder {
        edited: Vec<MemoId>,
        deleted: Vec<MemoId>,
        delete_succeeds: bool,
    }

    impl ViewerCallbacks for Recorder {
        fn on_edit(&mut self, memo: &Memo) {
            self.edited.push(memo.id.clone());
        }

        fn on_delete(&mut self, id: &MemoId) -> bool {
            self.deleted.push(id.clone());
            self.delete_succeeds
        }
    }

    fn memo() -> Memo {
        Memo {
            id: MemoId::from("1"),
            title: "Test".to_string(),
            content: "# Hi\n\nline\nline\nline".to_string(),
            category: "idea".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn open_viewer() -> (MemoViewer, BackgroundLock) {
        let lock = BackgroundLock::default();
        let mut viewer = MemoViewer::new(lock.clone());
        viewer.show(memo());
        (viewer, lock)
    }

    #[test]
    fn stays_closed_without_memo_or_open_flag() {
        let lock = BackgroundLock::default();
        let mut viewer = MemoViewer::new(lock.clone());

        viewer.set_props(Some(memo()), false);
        assert!(!viewer.is_open());
        viewer.set_props(None, true);
        assert!(!viewer.is_open());
        assert!(!lock.is_held());
        assert!(!viewer.handle_key(key(KeyCode::Esc), &mut Recorder::default()));
    }

    #[test]
    fn escape_closes_and_releases_the_background() {
        let (mut viewer, lock) = open_viewer();
        assert!(lock.is_held());

        assert!(viewer.handle_key(key(KeyCode::Esc), &mut Recorder::default()));
        assert!(!viewer.is_open());
        assert!(!lock.is_held());
    }

    #[test]
    fn backdrop_click_closes_like_escape() {
        let (mut viewer, lock) = open_viewer();
        let overlay = Rect::new(10, 5, 40, 20);

        viewer.handle_click(12, 6, overlay);
        assert!(viewer.is_open());

        viewer.handle_click(2, 2, overlay);
        assert!(!viewer.is_open());
        assert!(!lock.is_held());
    }

    #[test]
    fn edit_hands_the_memo_over_and_closes() {
        let (mut viewer, _lock) = open_viewer();
        let mut recorder = Recorder::default();

        viewer.handle_key(key(KeyCode::Char('e')), &mut recorder);
        assert_eq!(recorder.edited, vec![MemoId::from("1")]);
        assert!(!viewer.is_open());
    }

    #[test]
    fn failed_delete_keeps_the_viewer_open() {
        let (mut viewer, lock) = open_viewer();
        let mut recorder = Recorder::default();

        viewer.handle_key(key(KeyCode::Char('d')), &mut recorder);
        assert!(recorder.deleted.is_empty());
        viewer.handle_key(key(KeyCode::Char('y')), &mut recorder);

        assert_eq!(recorder.deleted, vec![MemoId::from("1")]);
        assert!(viewer.is_open());
        assert!(lock.is_held());
        let view = viewer.view().unwrap();
        assert!(!view.confirming_delete);
        assert!(view.notice.is_some());
    }

    #[test]
    fn confirmed_delete_closes_on_success() {
        let (mut viewer, lock) = open_viewer();
        let mut recorder = Recorder {
            delete_succeeds: true,
            ..Recorder::default()
        };

        viewer.handle_key(key(KeyCode::Char('d')), &mut recorder);
        viewer.handle_key(key(KeyCode::Char('y')), &mut recorder);
        assert!(!viewer.is_open());
        assert!(!lock.is_held());
    }

    #[test]
    fn declined_delete_calls_nothing() {
        let (mut viewer, _lock) = open_viewer();
        let mut recorder = Recorder::default();

        viewer.handle_key(key(KeyCode::Char('d')), &mut recorder);
        viewer.handle_key(key(KeyCode::Char('n')), &mut recorder);
        assert!(recorder.deleted.is_empty());
        assert!(viewer.is_open());

        viewer.handle_key(key(KeyCode::Char('d')), &mut recorder);
        viewer.handle_key(key(KeyCode::Esc), &mut recorder);
        assert!(viewer.is_open(), "escape only cancels the prompt");
    }

    #[test]
    fn repeated_open_close_never_leaks_the_lock() {
        let lock = BackgroundLock::default();
        let mut viewer = MemoViewer::new(lock.clone());
        for _ in 0..3 {
            viewer.show(memo());
            viewer.show(memo());
            assert!(lock.is_held());
            viewer.set_props(Some(memo()), false);
            assert!(!lock.is_held());
        }
    }

    #[test]
    fn dropping_an_open_viewer_releases_the_lock() {
        let (viewer, lock) = open_viewer();
        drop(viewer);
        assert!(!lock.is_held());
    }

    #[test]
    fn preview_is_rendered_after_opening() {
        let (mut viewer, _lock) = open_viewer();
        assert!(viewer.view().unwrap().preview.is_none());

        assert!(viewer.render_pending_preview());
        assert!(viewer.view().unwrap().preview.is_some());
        assert!(!viewer.render_pending_preview());
    }

    #[test]
    fn scrolling_stays_within_the_body() {
        let (mut viewer, _lock) = open_viewer();
        let mut recorder = Recorder::default();

        viewer.handle_key(key(KeyCode::Up), &mut recorder);
        assert_eq!(viewer.view().unwrap().scroll, 0);
        for _ in 0..20 {
            viewer.handle_key(key(KeyCode::Char('j')), &mut recorder);
        }
        assert_eq!(viewer.view().unwrap().scroll, 4);
    }
}
