//! Substitute query executor for unit tests.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use idpage_storage::{QueryError, QueryExecutor, RawRow};
use serde_json::Value;

/// Records every query and answers with canned JSON rows or a failure.
pub struct MockExecutor {
    rows: Vec<Value>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockExecutor {
    pub fn returning(rows: Vec<Value>) -> Self {
        Self {
            rows,
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query fails as if the pool could not hand out a connection.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries
            .lock()
            .expect("queries lock poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn query_raw<T: RawRow>(&self, sql: &str) -> Result<Vec<T>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("queries lock poisoned")
            .push(sql.to_string());

        if self.fail {
            return Err(QueryError::Database(sqlx::Error::PoolTimedOut));
        }

        self.rows
            .iter()
            .cloned()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|err| QueryError::Database(sqlx::Error::Decode(Box::new(err))))
            })
            .collect()
    }
}
