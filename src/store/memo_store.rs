use anyhow::{Result, bail};
use tracing::{debug, error, info};

use super::{Column, Filter, MemoBackend, MemoPatch, MemoRow, Select, seed};
use crate::domain::memo::{CategoryFilter, Memo, MemoId};

/// Data-access façade over the `memos` table.
///
/// Every operation is a single backend round-trip. Failures never reach the caller:
/// they are logged and turned into the operation's empty result (an empty list,
/// `None` or `false`), so "nothing there" and "backend failed" look the same.
pub(crate) struct MemoStore {
    backend: Box<dyn MemoBackend>,
}

impl MemoStore {
    pub(crate) fn new(backend: Box<dyn MemoBackend>) -> Self {
        Self { backend }
    }

    pub(crate) fn list(&self) -> Vec<Memo> {
        let select = Select::new(Filter::All).newest_first();
        self.fetch(&select)
            .unwrap_or_else(|err| empty_after("loading memos", err))
    }

    pub(crate) fn get_by_id(&self, id: &MemoId) -> Option<Memo> {
        let select = Select::new(Filter::Eq(Column::Id, id.as_str().to_string()));
        self.backend
            .select(&select)
            .and_then(single)
            .map(Memo::from)
            .inspect_err(|err| error!(memo_id = %id, "error getting memo by id: {err:#}"))
            .ok()
    }

    /// Case-insensitive substring match on title or content, newest first.
    pub(crate) fn search(&self, query: &str) -> Vec<Memo> {
        let filter = Filter::AnyContains(vec![Column::Title, Column::Content], query.to_lowercase());
        let select = Select::new(filter).newest_first();
        self.fetch(&select)
            .unwrap_or_else(|err| empty_after("searching memos", err))
    }

    pub(crate) fn filter_by_category(&self, category: &CategoryFilter) -> Vec<Memo> {
        let filter = match category {
            CategoryFilter::All => Filter::All,
            CategoryFilter::Only(name) => Filter::Eq(Column::Category, name.clone()),
        };
        let select = Select::new(filter).newest_first();
        self.fetch(&select)
            .unwrap_or_else(|err| empty_after("filtering memos by category", err))
    }

    /// Writes a caller-built memo (id included) and returns the stored copy.
    pub(crate) fn insert(&self, memo: &Memo) -> Option<Memo> {
        self.backend
            .insert(&[MemoRow::from(memo)])
            .and_then(single)
            .map(Memo::from)
            .inspect(|stored| debug!(memo_id = %stored.id, "memo added"))
            .inspect_err(|err| error!(memo_id = %memo.id, "error adding memo: {err:#}"))
            .ok()
    }

    /// Rewrites the editable fields of the memo with the same id.
    pub(crate) fn update(&self, memo: &Memo) -> Option<Memo> {
        let filter = Filter::Eq(Column::Id, memo.id.as_str().to_string());
        self.backend
            .update(&filter, &MemoPatch::from(memo))
            .and_then(single)
            .map(Memo::from)
            .inspect(|stored| debug!(memo_id = %stored.id, "memo updated"))
            .inspect_err(|err| error!(memo_id = %memo.id, "error updating memo: {err:#}"))
            .ok()
    }

    pub(crate) fn delete(&self, id: &MemoId) -> bool {
        let filter = Filter::Eq(Column::Id, id.as_str().to_string());
        match self.backend.delete(&filter) {
            Ok(count) => {
                debug!(memo_id = %id, count, "memo deleted");
                true
            }
            Err(err) => {
                error!(memo_id = %id, "error deleting memo: {err:#}");
                false
            }
        }
    }

    pub(crate) fn clear_all(&self) -> bool {
        match self.backend.delete(&Filter::Neq(Column::Id, String::new())) {
            Ok(count) => {
                info!(count, "cleared all memos");
                true
            }
            Err(err) => {
                error!("error clearing all memos: {err:#}");
                false
            }
        }
    }

    /// Inserts the sample memos when the table has no rows. A failed check counts as
    /// empty. Two callers racing on an empty table can both seed.
    pub(crate) fn seed_if_empty(&self) {
        let probe = Select::new(Filter::All).limit(1);
        match self.backend.select(&probe) {
            Ok(existing) if !existing.is_empty() => return,
            Ok(_) => {}
            Err(err) => error!("error checking for existing memos: {err:#}"),
        }

        match self.backend.insert(&seed::sample_rows()) {
            Ok(rows) => info!(count = rows.len(), "seeded sample memos"),
            Err(err) => error!("error seeding sample data: {err:#}"),
        }
    }

    fn fetch(&self, select: &Select) -> Result<Vec<Memo>> {
        let rows = self.backend.select(select)?;
        Ok(rows.into_iter().map(Memo::from).collect())
    }
}

fn empty_after(action: &str, err: anyhow::Error) -> Vec<Memo> {
    error!("error {action}: {err:#}");
    Vec::new()
}

fn single(rows: Vec<MemoRow>) -> Result<MemoRow> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => bail!("expected exactly one row, got none"),
        (_, count) => bail!("expected exactly one row, got {count}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteBackend;
    use anyhow::anyhow;
    use std::rc::Rc;

    struct FailingBackend;

    impl MemoBackend for FailingBackend {
        fn select(&self, _: &Select) -> Result<Vec<MemoRow>> {
            Err(anyhow!("connection refused"))
        }

        fn insert(&self, _: &[MemoRow]) -> Result<Vec<MemoRow>> {
            Err(anyhow!("connection refused"))
        }

        fn update(&self, _: &Filter, _: &MemoPatch) -> Result<Vec<MemoRow>> {
            Err(anyhow!("connection refused"))
        }

        fn delete(&self, _: &Filter) -> Result<usize> {
            Err(anyhow!("connection refused"))
        }
    }

    fn store() -> MemoStore {
        MemoStore::new(Box::new(SqliteBackend::open_in_memory().unwrap()))
    }

    fn memo(id: &str, title: &str, content: &str, category: &str, created_at: &str) -> Memo {
        Memo {
            id: MemoId::from(id),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            tags: vec!["z".to_string(), "a".to_string()],
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[test]
    fn insert_then_get_returns_the_same_memo() {
        let store = store();
        let original = memo("1", "Test", "# Hi", "idea", "2024-01-01T00:00:00Z");

        let stored = store.insert(&original).unwrap();
        assert_eq!(stored, original);
        assert_eq!(store.get_by_id(&original.id), Some(original));
    }

    #[test]
    fn insert_with_taken_id_returns_none() {
        let store = store();
        let original = memo("1", "Test", "", "idea", "2024-01-01T00:00:00Z");
        assert!(store.insert(&original).is_some());
        assert!(store.insert(&original).is_none());
    }

    #[test]
    fn update_replaces_fields_and_keeps_created_at() {
        let store = store();
        let original = memo("1", "Test", "body", "idea", "2024-01-01T00:00:00Z");
        store.insert(&original).unwrap();

        let mut changed = original.clone();
        changed.title = "Changed".to_string();
        changed.content = "new body".to_string();
        changed.category = "work".to_string();
        changed.tags = vec!["only".to_string()];
        changed.created_at = "2030-01-01T00:00:00Z".to_string();
        changed.updated_at = "2024-03-01T00:00:00Z".to_string();

        let updated = store.update(&changed).unwrap();
        assert_eq!(updated.title, "Changed");
        assert_eq!(updated.created_at, "2024-01-01T00:00:00Z");

        let fetched = store.get_by_id(&original.id).unwrap();
        assert_eq!(fetched.content, "new body");
        assert_eq!(fetched.category, "work");
        assert_eq!(fetched.tags, vec!["only"]);
        assert_eq!(fetched.updated_at, "2024-03-01T00:00:00Z");
        assert_eq!(fetched.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn update_of_missing_memo_returns_none() {
        let store = store();
        let ghost = memo("404", "Ghost", "", "other", "2024-01-01T00:00:00Z");
        assert!(store.update(&ghost).is_none());
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let store = store();
        let original = memo("1", "Test", "", "idea", "2024-01-01T00:00:00Z");
        store.insert(&original).unwrap();

        assert!(store.delete(&original.id));
        assert_eq!(store.get_by_id(&original.id), None);
    }

    #[test]
    fn list_is_newest_first_regardless_of_insert_order() {
        let store = store();
        for (id, created_at) in [
            ("b", "2024-01-02T00:00:00Z"),
            ("c", "2024-01-03T00:00:00Z"),
            ("a", "2024-01-01T00:00:00Z"),
        ] {
            store.insert(&memo(id, id, "", "work", created_at)).unwrap();
        }

        let ids: Vec<_> = store.list().into_iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn search_matches_title_or_content_ignoring_case() {
        let store = store();
        store
            .insert(&memo("1", "Rust Notes", "", "study", "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("2", "Groceries", "buy RUSTIC bread", "personal", "2024-01-02T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("3", "Plans", "nothing here", "work", "2024-01-03T00:00:00Z"))
            .unwrap();

        let ids: Vec<_> = store
            .search("rUsT")
            .into_iter()
            .map(|m| m.id.to_string())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(store.search("absent").is_empty());
    }

    #[test]
    fn search_folds_case_beyond_ascii() {
        let store = store();
        store
            .insert(&memo("1", "ÜBER Café", "ПРИВЕТ мир", "idea", "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("2", "Plain", "nothing", "idea", "2024-01-02T00:00:00Z"))
            .unwrap();

        for query in ["über", "CAFÉ", "привет", "МИР"] {
            let ids: Vec<_> = store
                .search(query)
                .into_iter()
                .map(|m| m.id.to_string())
                .collect();
            assert_eq!(ids, vec!["1"], "query {query}");
        }
    }

    #[test]
    fn filter_all_matches_list_and_category_filter_is_exact() {
        let store = store();
        store
            .insert(&memo("1", "a", "", "work", "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("2", "b", "", "idea", "2024-01-02T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("3", "c", "", "workshop", "2024-01-03T00:00:00Z"))
            .unwrap();

        assert_eq!(store.filter_by_category(&CategoryFilter::All), store.list());

        let work = store.filter_by_category(&CategoryFilter::parse("work"));
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].id.as_str(), "1");
    }

    #[test]
    fn clear_all_empties_the_table() {
        let store = store();
        store
            .insert(&memo("1", "a", "", "work", "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .insert(&memo("2", "b", "", "idea", "2024-01-02T00:00:00Z"))
            .unwrap();

        assert!(store.clear_all());
        assert!(store.list().is_empty());
    }

    #[test]
    fn seeding_only_happens_on_an_empty_table() {
        let store = store();
        store.seed_if_empty();
        let seeded = store.list();
        assert_eq!(seeded.len(), 2);
        assert!(seeded[0].created_at > seeded[1].created_at);

        store.seed_if_empty();
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn seeding_skips_a_non_empty_table() {
        let store = store();
        store
            .insert(&memo("1", "mine", "", "work", "2024-01-01T00:00:00Z"))
            .unwrap();
        store.seed_if_empty();
        assert_eq!(store.list().len(), 1);
    }

    /// Reads fail, writes reach the shared SQLite table.
    struct WriteOnlyBackend(Rc<SqliteBackend>);

    impl MemoBackend for WriteOnlyBackend {
        fn select(&self, _: &Select) -> Result<Vec<MemoRow>> {
            Err(anyhow!("timeout"))
        }

        fn insert(&self, rows: &[MemoRow]) -> Result<Vec<MemoRow>> {
            self.0.insert(rows)
        }

        fn update(&self, filter: &Filter, patch: &MemoPatch) -> Result<Vec<MemoRow>> {
            self.0.update(filter, patch)
        }

        fn delete(&self, filter: &Filter) -> Result<usize> {
            self.0.delete(filter)
        }
    }

    #[test]
    fn failed_emptiness_check_still_seeds() {
        let table = Rc::new(SqliteBackend::open_in_memory().unwrap());
        let store = MemoStore::new(Box::new(WriteOnlyBackend(Rc::clone(&table))));

        store.seed_if_empty();
        assert_eq!(table.select(&Select::new(Filter::All)).unwrap().len(), 2);
    }

    #[test]
    fn backend_failures_become_empty_results() {
        let store = MemoStore::new(Box::new(FailingBackend));
        let sample = memo("1", "a", "", "work", "2024-01-01T00:00:00Z");

        assert!(store.list().is_empty());
        assert!(store.search("a").is_empty());
        assert!(store.filter_by_category(&CategoryFilter::All).is_empty());
        assert_eq!(store.get_by_id(&sample.id), None);
        assert_eq!(store.insert(&sample), None);
        assert_eq!(store.update(&sample), None);
        assert!(!store.delete(&sample.id));
        assert!(!store.clear_all());
        store.seed_if_empty();
    }

    #[test]
    fn single_rejects_zero_or_many_rows() {
        let row = MemoRow::from(&memo("1", "a", "", "work", "x"));
        assert!(single(vec![]).is_err());
        assert!(single(vec![row.clone(), row.clone()]).is_err());
        assert_eq!(single(vec![row.clone()]).unwrap(), row);
    }
}
