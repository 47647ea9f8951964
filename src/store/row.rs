use serde::{Deserialize, Serialize};

use crate::domain::memo::Memo;

/// A row of the external `memos` table, in the table's snake_case shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MemoRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<&Memo> for MemoRow {
    fn from(memo: &Memo) -> Self {
        Self {
            id: memo.id.as_str().to_string(),
            title: memo.title.clone(),
            content: memo.content.clone(),
            category: memo.category.clone(),
            tags: memo.tags.clone(),
            created_at: memo.created_at.clone(),
            updated_at: memo.updated_at.clone(),
        }
    }
}

impl From<MemoRow> for Memo {
    fn from(row: MemoRow) -> Self {
        Self {
            id: row.id.into(),
            title: row.title,
            content: row.content,
            category: row.category,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Columns written by an update. `id` and `created_at` are never part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct MemoPatch {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) tags: Vec<String>,
    pub(crate) updated_at: String,
}

impl From<&Memo> for MemoPatch {
    fn from(memo: &Memo) -> Self {
        Self {
            title: memo.title.clone(),
            content: memo.content.clone(),
            category: memo.category.clone(),
            tags: memo.tags.clone(),
            updated_at: memo.updated_at.clone(),
        }
    }
}
