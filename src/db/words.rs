//! Word queries and the SQLite word source

use rusqlite::{params, Connection, Result, Row};

use crate::domain::{Word, WordId, WordStatus};
use crate::source::{WordFilter, WordSource};

use super::{try_lock, DbPool};

pub fn upsert_word(conn: &Connection, word: &Word) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO words (id, term, translation, next_review_due_at, status)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
      term = excluded.term,
      translation = excluded.translation,
      next_review_due_at = excluded.next_review_due_at,
      status = excluded.status
    "#,
        params![
            word.id,
            word.term,
            word.translation,
            word.next_review_due_at,
            word.status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_word_by_id(conn: &Connection, id: WordId) -> Result<Option<Word>> {
    let mut stmt = conn.prepare(
        "SELECT id, term, translation, next_review_due_at, status FROM words WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_word(row)?))
    } else {
        Ok(None)
    }
}

/// Fetch words matching `filter`, ordered by id. Due-date filtering is left to the caller.
pub fn get_words(conn: &Connection, filter: WordFilter, limit: Option<usize>) -> Result<Vec<Word>> {
    // SQLite treats a negative LIMIT as "no limit"
    let limit = limit.map(|l| l as i64).unwrap_or(-1);

    let (sql, status) = match filter {
        WordFilter::Scheduled => (
            r#"
    SELECT id, term, translation, next_review_due_at, status FROM words
    WHERE next_review_due_at IS NOT NULL
    ORDER BY id LIMIT ?1
    "#,
            None,
        ),
        WordFilter::Status(status) => (
            r#"
    SELECT id, term, translation, next_review_due_at, status FROM words
    WHERE status = ?2
    ORDER BY id LIMIT ?1
    "#,
            Some(status.as_str()),
        ),
        WordFilter::All => (
            "SELECT id, term, translation, next_review_due_at, status FROM words ORDER BY id LIMIT ?1",
            None,
        ),
    };

    let mut stmt = conn.prepare(sql)?;
    let words = match status {
        Some(status) => stmt
            .query_map(params![limit, status], row_to_word)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt
            .query_map(params![limit], row_to_word)?
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(words)
}

pub fn get_word_count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
}

fn row_to_word(row: &Row) -> Result<Word> {
    let status: String = row.get(4)?;
    Ok(Word {
        id: row.get(0)?,
        term: row.get(1)?,
        translation: row.get(2)?,
        next_review_due_at: row.get(3)?,
        status: WordStatus::from_str(&status),
    })
}

/// Word source backed by the shared SQLite connection
#[derive(Clone)]
pub struct SqliteWordSource {
    pool: DbPool,
}

impl SqliteWordSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WordSource for SqliteWordSource {
    type Error = super::DbError;

    fn fetch_learning_set(&self, filter: WordFilter, limit: Option<usize>) -> std::result::Result<Vec<Word>, Self::Error> {
        let conn = try_lock(&self.pool)?;
        let words = get_words(&conn, filter, limit)?;
        tracing::debug!("Fetched {} words for {:?}", words.len(), filter);
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_words, TestEnv};

    #[test]
    fn test_upsert_and_get() {
        let env = TestEnv::new().unwrap();
        let word = Word::new(10, "hola", "hello").with_due("2024-01-10T00:00:00Z");
        upsert_word(&env.conn, &word).unwrap();

        let loaded = get_word_by_id(&env.conn, 10).unwrap().unwrap();
        assert_eq!(loaded, word);
        assert!(get_word_by_id(&env.conn, 11).unwrap().is_none());
    }

    #[test]
    fn test_upsert_updates_existing() {
        let env = TestEnv::new().unwrap();
        upsert_word(&env.conn, &Word::new(1, "hola", "hello")).unwrap();
        let updated = Word::new(1, "hola", "hi").with_status(WordStatus::Known);
        upsert_word(&env.conn, &updated).unwrap();

        assert_eq!(get_word_count(&env.conn).unwrap(), 1);
        assert_eq!(get_word_by_id(&env.conn, 1).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_get_words_filters() {
        let env = TestEnv::with_words(&sample_words()).unwrap();

        let all = get_words(&env.conn, WordFilter::All, None).unwrap();
        assert_eq!(all.len(), sample_words().len());

        let scheduled = get_words(&env.conn, WordFilter::Scheduled, None).unwrap();
        assert!(scheduled.iter().all(|w| w.next_review_due_at.is_some()));
        assert!(scheduled.len() < all.len());

        let learning = get_words(&env.conn, WordFilter::Status(WordStatus::Learning), None).unwrap();
        assert!(!learning.is_empty());
        assert!(learning.iter().all(|w| w.status == WordStatus::Learning));
    }

    #[test]
    fn test_get_words_limit() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        let limited = get_words(&env.conn, WordFilter::All, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, 1);
    }

    #[test]
    fn test_unparseable_due_date_round_trips_raw() {
        let env = TestEnv::new().unwrap();
        upsert_word(&env.conn, &Word::new(1, "hola", "hello").with_due("someday")).unwrap();
        let loaded = get_word_by_id(&env.conn, 1).unwrap().unwrap();
        assert_eq!(loaded.next_review_due_at.as_deref(), Some("someday"));
        assert!(loaded.due_at().is_none());
    }

    #[test]
    fn test_sqlite_word_source() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        let source = SqliteWordSource::new(env.pool());
        let words = source.fetch_learning_set(WordFilter::All, Some(3)).unwrap();
        assert_eq!(words.len(), 3);
    }
}
