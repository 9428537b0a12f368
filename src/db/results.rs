//! Review result logging

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{ResultEvent, TestType, WordId};
use crate::recorder::{RecordError, ResultRecorder};

use super::{try_lock, DbPool};

pub fn insert_result(conn: &Connection, event: &ResultEvent) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO review_results (word_id, test_type, result, recorded_at)
    VALUES (?1, ?2, ?3, ?4)
    "#,
        params![
            event.word_id,
            event.test_type.as_str(),
            if event.result { 1 } else { 0 },
            event.recorded_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All results for a word, oldest first
pub fn get_results_for_word(conn: &Connection, word_id: WordId) -> Result<Vec<ResultEvent>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT word_id, test_type, result, recorded_at
    FROM review_results
    WHERE word_id = ?1
    ORDER BY id ASC
    "#,
    )?;

    let results = stmt
        .query_map(params![word_id], |row| {
            let test_type: String = row.get(1)?;
            let result: i32 = row.get(2)?;
            let recorded_at: String = row.get(3)?;
            Ok(ResultEvent {
                word_id: row.get(0)?,
                test_type: TestType::from_str(&test_type).unwrap_or(TestType::Flashcard),
                result: result == 1,
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(results)
}

/// (correct, total) over all recorded results
pub fn get_result_totals(conn: &Connection) -> Result<(i64, i64)> {
    conn.query_row(
        "SELECT COALESCE(SUM(result), 0), COUNT(*) FROM review_results",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}

/// Result recorder writing straight into `review_results`
#[derive(Clone)]
pub struct SqliteRecorder {
    pool: DbPool,
}

impl SqliteRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ResultRecorder for SqliteRecorder {
    fn record(&self, event: &ResultEvent) -> std::result::Result<(), RecordError> {
        let conn = try_lock(&self.pool).map_err(|e| RecordError::Unavailable(e.to_string()))?;
        insert_result(&conn, event).map_err(|e| RecordError::Rejected(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_words, TestEnv};
    use chrono::TimeZone;

    fn event(word_id: WordId, test_type: TestType, result: bool) -> ResultEvent {
        ResultEvent::new(
            word_id,
            test_type,
            result,
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_read_back() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        insert_result(&env.conn, &event(1, TestType::Flashcard, true)).unwrap();
        insert_result(&env.conn, &event(1, TestType::Typing, false)).unwrap();
        insert_result(&env.conn, &event(2, TestType::Flashcard, true)).unwrap();

        let results = get_results_for_word(&env.conn, 1).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], event(1, TestType::Flashcard, true));
        assert_eq!(results[1], event(1, TestType::Typing, false));
    }

    #[test]
    fn test_result_totals() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        assert_eq!(get_result_totals(&env.conn).unwrap(), (0, 0));
        insert_result(&env.conn, &event(1, TestType::Flashcard, true)).unwrap();
        insert_result(&env.conn, &event(2, TestType::Flashcard, false)).unwrap();
        insert_result(&env.conn, &event(3, TestType::Typing, true)).unwrap();
        assert_eq!(get_result_totals(&env.conn).unwrap(), (2, 3));
    }

    #[test]
    fn test_sqlite_recorder() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        let recorder = SqliteRecorder::new(env.pool());
        recorder.record(&event(5, TestType::Typing, true)).unwrap();

        let results = get_results_for_word(&env.conn, 5).unwrap();
        assert_eq!(results, vec![event(5, TestType::Typing, true)]);
    }

    #[test]
    fn test_sqlite_recorder_rejects_unknown_word() {
        let env = TestEnv::with_words(&sample_words()).unwrap();
        let recorder = SqliteRecorder::new(env.pool());
        let err = recorder.record(&event(99, TestType::Flashcard, true)).unwrap_err();
        assert!(matches!(err, RecordError::Rejected(_)));
        assert_eq!(get_result_totals(&env.conn).unwrap(), (0, 0));
    }

    #[test]
    fn test_sqlite_recorder_reports_failure() {
        let env = TestEnv::new().unwrap();
        let pool = env.pool();
        pool.lock().unwrap().execute_batch("DROP TABLE review_results").unwrap();

        let recorder = SqliteRecorder::new(pool);
        let err = recorder.record(&event(5, TestType::Typing, true)).unwrap_err();
        assert!(matches!(err, RecordError::Rejected(_)));
    }
}
