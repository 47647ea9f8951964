use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct MemoId(String);

impl MemoId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MemoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MemoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Personal,
    Work,
    Study,
    Idea,
    Other,
}

impl Category {
    pub(crate) const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Idea,
        Category::Other,
    ];

    pub(crate) fn from_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }

    /// Maps a stored category to the one used for display. Unknown values show as `Other`.
    pub(crate) fn display_for(value: &str) -> Self {
        Self::from_name(value).unwrap_or(Category::Other)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Study => "study",
            Category::Idea => "idea",
            Category::Other => "other",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Idea => "Idea",
            Category::Other => "Other",
        }
    }

    pub(crate) fn next(self) -> Self {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    pub(crate) fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category,
        }
    }

    /// All -> personal -> work -> study -> idea -> other -> All.
    pub(crate) fn cycle(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::Personal.as_str().to_string()),
            CategoryFilter::Only(value) => match Category::from_name(value) {
                Some(Category::Other) | None => CategoryFilter::All,
                Some(category) => CategoryFilter::Only(category.next().as_str().to_string()),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Memo {
    pub(crate) id: MemoId,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) tags: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl Memo {
    pub(crate) fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let now = now_timestamp();
        Self {
            id: MemoId::new(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub(crate) fn revised(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags,
            created_at: self.created_at.clone(),
            updated_at: now_timestamp(),
        }
    }

    pub(crate) fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .map(|tag| tag.trim().trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_displays_as_other() {
        assert_eq!(Category::display_for("idea"), Category::Idea);
        assert_eq!(Category::display_for("groceries"), Category::Other);
        assert_eq!(Category::display_for(""), Category::Other);
    }

    #[test]
    fn category_filter_cycles_through_every_category() {
        let mut filter = CategoryFilter::All;
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter = filter.cycle();
            seen.push(filter.as_str().to_string());
        }
        assert_eq!(
            seen,
            vec!["personal", "work", "study", "idea", "other", "all"]
        );
        assert_eq!(CategoryFilter::Only("weird".into()).cycle(), CategoryFilter::All);
    }

    #[test]
    fn draft_starts_unedited_and_revision_keeps_identity() {
        let memo = Memo::draft("Title", "body", "work", vec!["a".into()]);
        assert!(!memo.was_edited());
        assert!(memo.created_at.ends_with('Z'));

        let revised = memo.revised("New", "new body", "idea", vec![]);
        assert_eq!(revised.id, memo.id);
        assert_eq!(revised.created_at, memo.created_at);
        assert_eq!(revised.title, "New");
        assert!(revised.updated_at >= memo.created_at);
    }

    #[test]
    fn memo_serializes_with_camel_case_fields() {
        let memo = Memo::draft("t", "c", "other", vec![]);
        let json = serde_json::to_value(&memo).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["id"], memo.id.as_str());
    }

    #[test]
    fn parse_tags_keeps_order_and_strips_hashes() {
        assert_eq!(
            parse_tags("#rust, cli  notes,,#"),
            vec!["rust".to_string(), "cli".to_string(), "notes".to_string()]
        );
        assert!(parse_tags("   ").is_empty());
    }
}
