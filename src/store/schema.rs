use anyhow::Result;
use rusqlite::Connection;

pub(super) fn init(conn: &Connection) -> Result<()> {
    create_memos_table(conn)
}

fn create_memos_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS memos (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS memos_created_at_desc_idx
            ON memos (created_at DESC);
        CREATE INDEX IF NOT EXISTS memos_category_idx
            ON memos (category);",
    )?;
    Ok(())
}
