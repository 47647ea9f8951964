use super::input::InputState;
use crate::domain::memo::{Category, Memo, parse_tags};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorField {
    Title,
    Category,
    Tags,
    Content,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            EditorField::Title => EditorField::Category,
            EditorField::Category => EditorField::Tags,
            EditorField::Tags => EditorField::Content,
            EditorField::Content => EditorField::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            EditorField::Title => EditorField::Content,
            EditorField::Category => EditorField::Title,
            EditorField::Tags => EditorField::Category,
            EditorField::Content => EditorField::Tags,
        }
    }
}

/// Composer used for new memos and for edits handed over by the viewer.
pub(crate) struct EditorState {
    pub(crate) title: InputState,
    pub(crate) category: Category,
    pub(crate) tags: InputState,
    pub(crate) content: InputState,
    pub(crate) field: EditorField,
    pub(crate) status: Option<String>,
    editing: Option<Memo>,
}

impl EditorState {
    pub(crate) fn new() -> Self {
        Self {
            title: InputState::single_line(),
            category: Category::Other,
            tags: InputState::single_line(),
            content: InputState::multi_line(),
            field: EditorField::Title,
            status: None,
            editing: None,
        }
    }

    pub(crate) fn start_new(&mut self) {
        self.reset();
    }

    pub(crate) fn start_edit(&mut self, memo: &Memo) {
        self.reset();
        self.title.set_text(&memo.title);
        self.category = Category::display_for(&memo.category);
        self.tags.set_text(&memo.tags.join(", "));
        self.content.set_text(&memo.content);
        self.editing = Some(memo.clone());
    }

    pub(crate) fn reset(&mut self) {
        self.title.clear();
        self.tags.clear();
        self.content.clear();
        self.category = Category::Other;
        self.field = EditorField::Title;
        self.status = None;
        self.editing = None;
    }

    pub(crate) fn editing(&self) -> Option<&Memo> {
        self.editing.as_ref()
    }

    pub(crate) fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    /// The text input behind the focused field; `None` on the category picker.
    pub(crate) fn active_input(&mut self) -> Option<&mut InputState> {
        match self.field {
            EditorField::Title => Some(&mut self.title),
            EditorField::Tags => Some(&mut self.tags),
            EditorField::Content => Some(&mut self.content),
            EditorField::Category => None,
        }
    }

    /// Builds the memo to save: a revision when editing, a fresh draft otherwise.
    /// An empty title yields `None`.
    pub(crate) fn build(&self) -> Option<Memo> {
        let title = self.title.text().trim().to_string();
        if title.is_empty() {
            return None;
        }
        let content = self.content.text();
        let tags = parse_tags(&self.tags.text());

        let category = match &self.editing {
            // Keep an unrecognized stored category unless the user picked another one.
            Some(memo) if Category::display_for(&memo.category) == self.category => {
                memo.category.clone()
            }
            _ => self.category.as_str().to_string(),
        };

        Some(match &self.editing {
            Some(memo) => memo.revised(title, content, category, tags),
            None => Memo::draft(title, content, category, tags),
        })
    }
}
