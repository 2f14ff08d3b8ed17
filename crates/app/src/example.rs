use std::sync::Arc;

use idpage_core::types::ExampleRecord;
use idpage_storage::{ExampleRow, QueryError, QueryExecutor};

/// Statement issued on every call.
pub const EXAMPLE_QUERY: &str = "SELECT gen_random_uuid() AS id";

/// Domain-layer service over the query-execution capability.
pub struct ExampleService<Q> {
    executor: Arc<Q>,
}

impl<Q> Clone for ExampleService<Q> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<Q: QueryExecutor> ExampleService<Q> {
    pub fn new(executor: Arc<Q>) -> Self {
        Self { executor }
    }

    /// Asks the database for a freshly generated UUID.
    ///
    /// Every call is a new round-trip; results are neither cached nor retried.
    pub async fn get_example(&self) -> Result<Vec<ExampleRecord>, QueryError> {
        let rows = self
            .executor
            .query_raw::<ExampleRow>(EXAMPLE_QUERY)
            .await?;
        Ok(rows.into_iter().map(ExampleRow::into_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExecutor;
    use idpage_storage::Database;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn returns_single_record_with_uuid() {
        let generated = Uuid::new_v4().to_string();
        let executor = Arc::new(MockExecutor::returning(vec![json!({ "id": generated })]));
        let service = ExampleService::new(executor.clone());

        let result = service.get_example().await.expect("query succeeds");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, generated);
        result[0].uuid().expect("id parses as uuid");
    }

    #[tokio::test]
    async fn issues_random_uuid_query() {
        let executor = Arc::new(MockExecutor::returning(vec![json!({ "id": Uuid::new_v4() })]));
        let service = ExampleService::new(executor.clone());

        service.get_example().await.expect("query succeeds");

        assert_eq!(executor.last_query().as_deref(), Some(EXAMPLE_QUERY));
    }

    #[tokio::test]
    async fn every_call_performs_a_round_trip() {
        let executor = Arc::new(MockExecutor::returning(vec![json!({ "id": Uuid::new_v4() })]));
        let service = ExampleService::new(executor.clone());

        service.get_example().await.expect("first call");
        service.get_example().await.expect("second call");

        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn propagates_executor_failure() {
        let executor = Arc::new(MockExecutor::failing());
        let service = ExampleService::new(executor.clone());

        let err = service.get_example().await.unwrap_err();

        assert!(matches!(err, QueryError::Database(sqlx::Error::PoolTimedOut)));
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn surfaces_rows_of_the_wrong_shape_as_query_failure() {
        let executor = Arc::new(MockExecutor::returning(vec![json!({ "uuid": "x" })]));
        let service = ExampleService::new(executor);

        let err = service.get_example().await.unwrap_err();
        assert!(matches!(err, QueryError::Database(sqlx::Error::Decode(_))));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn live_database_returns_fresh_uuids() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let database = Database::connect(&url, 1).await.expect("connect");
        let service = ExampleService::new(Arc::new(database));

        // Generation is random; only the shape is checked on each call.
        for _ in 0..2 {
            let result = service.get_example().await.expect("query succeeds");
            assert_eq!(result.len(), 1);
            result[0].uuid().expect("id parses as uuid");
        }
    }
}
