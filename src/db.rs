use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

/// A contact extracted from the page. Email is the natural key; the store
/// enforces uniqueness on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub title: String,
    pub email: String,
}

/// A stored contact, as read back from the database.
#[derive(Debug, Serialize)]
pub struct ContactRow {
    pub iid: i64,
    pub name: String,
    pub title: String,
    pub email: String,
}

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS contacts (
            iid   INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL,
            title TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        );
        ",
    )?;
    Ok(())
}

/// Insert a batch of contacts, skipping any whose email is already stored.
/// Returns the number of newly inserted rows. A repeated email with a
/// different name or title is dropped, not merged.
pub fn insert_contacts(conn: &Connection, contacts: &[Contact]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO contacts (name, title, email) VALUES (?1, ?2, ?3)")?;
        for c in contacts {
            count += stmt.execute(rusqlite::params![c.name, c.title, c.email])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_contacts(conn: &Connection, limit: Option<usize>) -> Result<Vec<ContactRow>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT iid, name, title, email FROM contacts ORDER BY iid LIMIT {}",
            n
        ),
        None => "SELECT iid, name, title, email FROM contacts ORDER BY iid".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ContactRow {
                iid: row.get(0)?,
                name: row.get(1)?,
                title: row.get(2)?,
                email: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct Stats {
    pub total: usize,
    pub by_title: Vec<(String, usize)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?;
    let mut stmt = conn.prepare(
        "SELECT title, COUNT(*) FROM contacts GROUP BY title ORDER BY COUNT(*) DESC, title",
    )?;
    let by_title = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stats { total, by_title })
}

// ── Tests ──
