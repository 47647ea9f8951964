use anyhow::{Context, Result};
use rusqlite::{
    Connection, Row,
    functions::FunctionFlags,
    params, params_from_iter,
    types::{Type, Value},
};
use std::path::Path;

use super::{
    Filter, MemoBackend, MemoPatch, MemoRow, Select,
    query::escape_like,
    schema,
};

const ROW_COLUMNS: &str = "id, title, content, category, tags, created_at, updated_at";
/// Unicode-aware lowercase. SQLite's own `lower` and `LIKE` only fold ASCII.
const LOWER_FN: &str = "memo_lower";

/// Local stand-in for the hosted table: same columns, tags kept as JSON text.
pub(crate) struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub(crate) fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    fn rows_where(&self, clause: &str, values: Vec<Value>) -> Result<Vec<MemoRow>> {
        let sql = format!("SELECT {ROW_COLUMNS} FROM memos WHERE {clause}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), read_row)?;

        let mut memos = Vec::new();
        for row in rows {
            memos.push(row?);
        }
        Ok(memos)
    }
}

impl MemoBackend for SqliteBackend {
    fn select(&self, select: &Select) -> Result<Vec<MemoRow>> {
        let (mut clause, mut values) = where_clause(&select.filter);
        if select.newest_first {
            clause.push_str(" ORDER BY created_at DESC");
        }
        if let Some(limit) = select.limit {
            clause.push_str(" LIMIT ?");
            values.push(Value::Integer(limit as i64));
        }
        self.rows_where(&clause, values)
    }

    fn insert(&self, rows: &[MemoRow]) -> Result<Vec<MemoRow>> {
        let tx = self.conn.unchecked_transaction()?;
        for row in rows {
            tx.execute(
                "INSERT INTO memos (
                    id,
                    title,
                    content,
                    category,
                    tags,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.id,
                    row.title,
                    row.content,
                    row.category,
                    serde_json::to_string(&row.tags)?,
                    row.created_at,
                    row.updated_at
                ],
            )?;
        }
        tx.commit()?;

        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            inserted.extend(self.rows_where("id = ?", vec![Value::Text(row.id.clone())])?);
        }
        Ok(inserted)
    }

    fn update(&self, filter: &Filter, patch: &MemoPatch) -> Result<Vec<MemoRow>> {
        let (clause, values) = where_clause(filter);
        let ids: Vec<String> = {
            let sql = format!("SELECT id FROM memos WHERE {clause}");
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values), |row| row.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let tags = serde_json::to_string(&patch.tags)?;
        let tx = self.conn.unchecked_transaction()?;
        for id in &ids {
            tx.execute(
                "UPDATE memos
                 SET title = ?2, content = ?3, category = ?4, tags = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    id,
                    patch.title,
                    patch.content,
                    patch.category,
                    tags,
                    patch.updated_at
                ],
            )?;
        }
        tx.commit()?;

        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            updated.extend(self.rows_where("id = ?", vec![Value::Text(id)])?);
        }
        Ok(updated)
    }

    fn delete(&self, filter: &Filter) -> Result<usize> {
        let (clause, values) = where_clause(filter);
        let sql = format!("DELETE FROM memos WHERE {clause}");
        Ok(self.conn.execute(&sql, params_from_iter(values))?)
    }
}

fn where_clause(filter: &Filter) -> (String, Vec<Value>) {
    match filter {
        Filter::All => ("1 = 1".to_string(), Vec::new()),
        Filter::Eq(column, value) => (
            format!("{} = ?", column.name()),
            vec![Value::Text(value.clone())],
        ),
        Filter::Neq(column, value) => (
            format!("{} <> ?", column.name()),
            vec![Value::Text(value.clone())],
        ),
        Filter::AnyContains(columns, _) if columns.is_empty() => ("0 = 1".to_string(), Vec::new()),
        Filter::AnyContains(columns, needle) => {
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            let clause = columns
                .iter()
                .map(|column| format!("{LOWER_FN}({}) LIKE ? ESCAPE '\\'", column.name()))
                .collect::<Vec<_>>()
                .join(" OR ");
            let values = columns
                .iter()
                .map(|_| Value::Text(pattern.clone()))
                .collect();
            (format!("({clause})"), values)
        }
    }
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )?;
    Ok(())
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<MemoRow> {
    let tags_json: String = row.get(4)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;
    Ok(MemoRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        tags,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
