use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS words (
      id INTEGER PRIMARY KEY,
      term TEXT NOT NULL,
      translation TEXT NOT NULL,
      -- Raw timestamp text as written by the scheduler; may be NULL or unparseable
      next_review_due_at TEXT,
      status TEXT NOT NULL DEFAULT 'unknown'
    );

    CREATE TABLE IF NOT EXISTS review_results (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      word_id INTEGER NOT NULL,
      test_type TEXT NOT NULL,
      result INTEGER NOT NULL,
      recorded_at TEXT NOT NULL,
      FOREIGN KEY (word_id) REFERENCES words(id)
    );

    CREATE INDEX IF NOT EXISTS idx_review_results_word ON review_results(word_id);
    CREATE INDEX IF NOT EXISTS idx_words_status ON words(status);
    "#,
  )?;

  Ok(())
}
