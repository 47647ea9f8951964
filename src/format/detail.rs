use super::time::format_long_time;
use crate::domain::memo::{Category, Memo};

/// What the memo viewer shows above and below the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MemoDetail {
    pub(crate) title: String,
    pub(crate) category: Category,
    pub(crate) created: String,
    /// Only set when the memo was edited after creation.
    pub(crate) updated: Option<String>,
    pub(crate) tags: Vec<String>,
}

impl MemoDetail {
    pub(crate) fn new(memo: &Memo) -> Self {
        Self::with_formatter(memo, format_long_time)
    }

    pub(crate) fn with_formatter(memo: &Memo, format_time: impl Fn(&str) -> String) -> Self {
        Self {
            title: memo.title.clone(),
            category: Category::display_for(&memo.category),
            created: format_time(&memo.created_at),
            updated: memo
                .was_edited()
                .then(|| format_time(&memo.updated_at)),
            tags: memo.tags.iter().map(|tag| format!("#{tag}")).collect(),
        }
    }

    pub(crate) fn timestamps(&self) -> Vec<String> {
        let mut stamps = vec![format!("Created {}", self.created)];
        if let Some(updated) = &self.updated {
            stamps.push(format!("Updated {}", updated));
        }
        stamps
    }
}
