//! SQLite connection pool.
//!
//! Connections are leased per operation and handed back on drop. Every
//! connection opened here enforces foreign keys (registrations cascade with
//! their event) and waits on a busy database instead of failing at once.

use crate::config::Config;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub struct DbPool {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
    max_idle: usize,
    busy_timeout: Duration,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        Self::with_options(Path::new(path), 4, Duration::from_millis(5_000))
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::with_options(
            Path::new(&cfg.database),
            cfg.pool.max_idle,
            Duration::from_millis(cfg.pool.busy_timeout_ms),
        )
    }

    /// Open the pool, eagerly opening one connection so a bad path fails here
    /// rather than on the first request.
    pub fn with_options(path: &Path, max_idle: usize, busy_timeout: Duration) -> AppResult<Self> {
        let pool = Self {
            path: path.to_path_buf(),
            idle: Mutex::new(Vec::new()),
            max_idle: max_idle.max(1),
            busy_timeout,
        };
        let first = pool.open()?;
        pool.release(first);
        Ok(pool)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        Ok(conn)
    }

    fn release(&self, conn: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }

    /// Lease a connection: reuse an idle one or open a new one.
    pub fn lease(&self) -> AppResult<PooledConnection<'_>> {
        let reused = self.idle.lock().unwrap_or_else(|e| e.into_inner()).pop();
        let conn = match reused {
            Some(c) => c,
            None => self.open()?,
        };
        Ok(PooledConnection {
            pool: self,
            conn: Some(conn),
        })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.lease()?;
        func(&mut *conn)
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

pub struct PooledConnection<'a> {
    pool: &'a DbPool,
    conn: Option<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // only taken in Drop
        self.conn.as_ref().expect("pooled connection already released")
    }
}

impl DerefMut for PooledConnection<'_> {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("pooled connection already released")
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leased_connections_return_to_the_pool() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DbPool::new(&dir.path().join("p.sqlite").to_string_lossy()).unwrap();
        assert_eq!(pool.idle_count(), 1);

        {
            let a = pool.lease().unwrap();
            let b = pool.lease().unwrap();
            assert_eq!(pool.idle_count(), 0);
            drop(a);
            drop(b);
        }
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn foreign_keys_are_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let pool = DbPool::new(&dir.path().join("fk.sqlite").to_string_lossy()).unwrap();
        let on: i64 = pool
            .with_conn(|c| Ok(c.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(on, 1);
    }
}
