#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Column {
    Id,
    Title,
    Content,
    Category,
}

impl Column {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::Content => "content",
            Column::Category => "category",
        }
    }
}

/// Row predicate understood by every backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Filter {
    All,
    Eq(Column, String),
    Neq(Column, String),
    /// Case-insensitive substring match on any of the columns (`ilike` joined with `or`).
    AnyContains(Vec<Column>, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Select {
    pub(crate) filter: Filter,
    pub(crate) newest_first: bool,
    pub(crate) limit: Option<usize>,
}

impl Select {
    pub(crate) fn new(filter: Filter) -> Self {
        Self {
            filter,
            newest_first: false,
            limit: None,
        }
    }

    pub(crate) fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub(crate) fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Escapes LIKE metacharacters so the needle matches literally. The escape char is `\`.
pub(crate) fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
