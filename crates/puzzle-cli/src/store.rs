use std::path::Path;

use puzzle_engines::{ScoreStore, StoreError};
use rusqlite::{params, Connection, OptionalExtension};

/// SQLite-backed score store.
///
/// Schema:
/// - results(id INTEGER PRIMARY KEY, game_id TEXT, score INT, finished_at TEXT)
///
/// Every completed game appends one row; best/fewest are aggregate
/// queries so the history stays inspectable.
pub struct SqliteScoreStore {
    conn: Connection,
}

impl SqliteScoreStore {
    /// Create or open the database at `path` and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(backend)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(backend)?;
        Self::with_conn(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_conn(Connection::open_in_memory().map_err(backend)?)
    }

    fn with_conn(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY,
                game_id TEXT NOT NULL,
                score INT NOT NULL,
                finished_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_results_game ON results(game_id);
            "#,
        )
        .map_err(backend)?;
        Ok(SqliteScoreStore { conn })
    }

    /// Lowest recorded score for `game_id` (move-count games).
    pub fn fewest(&self, game_id: &str) -> Result<Option<u64>, StoreError> {
        self.aggregate("MIN", game_id)
    }

    /// Number of recorded results for `game_id`.
    pub fn games_played(&self, game_id: &str) -> Result<u64, StoreError> {
        let n: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM results WHERE game_id = ?1",
                params![game_id],
                |row| row.get(0),
            )
            .map_err(backend)?;
        Ok(n as u64)
    }

    fn aggregate(&self, func: &str, game_id: &str) -> Result<Option<u64>, StoreError> {
        let sql = format!("SELECT {func}(score) FROM results WHERE game_id = ?1");
        let best: Option<i64> = self
            .conn
            .query_row(&sql, params![game_id], |row| row.get(0))
            .optional()
            .map_err(backend)?
            .flatten();
        Ok(best.map(|v| v as u64))
    }
}

impl ScoreStore for SqliteScoreStore {
    fn record_result(&mut self, game_id: &str, score: u64) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO results (game_id, score) VALUES (?1, ?2)",
                params![game_id, score as i64],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn best_score(&self, game_id: &str) -> Result<Option<u64>, StoreError> {
        self.aggregate("MAX", game_id)
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_aggregates() {
        let mut store = SqliteScoreStore::open_in_memory().unwrap();
        assert_eq!(store.best_score("merge4").unwrap(), None);
        assert_eq!(store.fewest("slide4").unwrap(), None);

        store.record_result("merge4", 2048).unwrap();
        store.record_result("merge4", 512).unwrap();
        store.record_result("slide4", 230).unwrap();
        store.record_result("slide4", 145).unwrap();

        assert_eq!(store.best_score("merge4").unwrap(), Some(2048));
        assert_eq!(store.fewest("slide4").unwrap(), Some(145));
        assert_eq!(store.games_played("merge4").unwrap(), 2);
        assert_eq!(store.games_played("slide3").unwrap(), 0);
    }
}
