use anyhow::Result;

mod memo_store;
mod postgrest;
mod query;
mod row;
mod schema;
mod seed;
mod sqlite;

pub(crate) use memo_store::MemoStore;
pub(crate) use postgrest::PostgrestBackend;
pub(crate) use query::{Column, Filter, Select};
pub(crate) use row::{MemoPatch, MemoRow};
pub(crate) use sqlite::SqliteBackend;

pub(crate) const MEMOS_TABLE: &str = "memos";

/// Query interface of the table that holds memos. Implementations perform one round-trip
/// per call and report failures as errors; the store decides what to do with them.
pub(crate) trait MemoBackend {
    fn select(&self, select: &Select) -> Result<Vec<MemoRow>>;

    /// Inserts the rows and reads them back.
    fn insert(&self, rows: &[MemoRow]) -> Result<Vec<MemoRow>>;

    /// Applies the patch to every matching row and reads the affected rows back.
    fn update(&self, filter: &Filter, patch: &MemoPatch) -> Result<Vec<MemoRow>>;

    fn delete(&self, filter: &Filter) -> Result<usize>;
}
