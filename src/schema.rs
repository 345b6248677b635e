use tracing::{error, info};

use crate::{
    error::SetupError,
    rpc::{RpcResponse, SqlExecutor},
};

pub const TABLE_NAME: &str = "test_results";

/// Table and index definitions for `test_results`. Every statement is
/// guarded by `IF NOT EXISTS`, so applying it again is a no-op.
pub const TABLE_DDL: &str = include_str!("../schema.sql");

/// Sends [`TABLE_DDL`] in a single `exec_sql` call.
pub fn apply_schema<E>(executor: &E) -> Result<RpcResponse, SetupError>
where
    E: SqlExecutor + ?Sized,
{
    info!(table = TABLE_NAME, "applying schema");
    match executor.exec_sql(TABLE_DDL) {
        Ok(response) => {
            info!(table = TABLE_NAME, status = response.status, "schema ensured");
            Ok(response)
        }
        Err(e) => {
            error!(table = TABLE_NAME, error = %e, "schema apply failed");
            Err(SetupError::SchemaExecutionFailure(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::{Value, json};

    use super::*;
    use crate::error::RpcError;

    /// Records every payload and answers with a canned result.
    struct RecordingExecutor {
        calls: RefCell<Vec<String>>,
        fail_with: Option<(u16, &'static str)>,
    }

    impl RecordingExecutor {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(status: u16, message: &'static str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_with: Some((status, message)),
            }
        }
    }

    impl SqlExecutor for RecordingExecutor {
        fn exec_sql(&self, sql: &str) -> Result<RpcResponse, RpcError> {
            self.calls.borrow_mut().push(sql.to_owned());
            match self.fail_with {
                Some((status, message)) => Err(RpcError::Status {
                    status,
                    message: message.to_owned(),
                }),
                None => Ok(RpcResponse {
                    status: 200,
                    data: json!({ "applied": true }),
                }),
            }
        }
    }

    #[test]
    fn ddl_creates_table_and_both_indexes() {
        let statements: Vec<&str> = TABLE_DDL
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS test_results ("));
        assert_eq!(
            statements[1],
            "CREATE INDEX IF NOT EXISTS idx_test_results_email ON test_results(applicant_email)"
        );
        assert_eq!(
            statements[2],
            "CREATE INDEX IF NOT EXISTS idx_test_results_date ON test_results(test_date DESC)"
        );
        assert!(statements[0].contains("id UUID DEFAULT gen_random_uuid() PRIMARY KEY"));
        assert!(statements[0].contains("detailed_results JSONB NOT NULL"));
    }

    #[test]
    fn every_statement_is_idempotent() {
        for stmt in TABLE_DDL.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            assert!(stmt.contains("IF NOT EXISTS"), "not guarded: {stmt}");
        }
    }

    #[test]
    fn sends_exactly_one_call_with_the_fixed_payload() {
        let executor = RecordingExecutor::ok();
        let response = apply_schema(&executor).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!({ "applied": true }));
        let calls = executor.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].as_bytes(), TABLE_DDL.as_bytes());
    }

    #[test]
    fn remote_failure_becomes_schema_execution_failure() {
        let executor = RecordingExecutor::failing(403, "permission denied for schema public");
        let err = apply_schema(&executor).unwrap_err();

        assert!(matches!(
            err,
            SetupError::SchemaExecutionFailure(RpcError::Status { status: 403, .. })
        ));
        assert!(err.to_string().contains("permission denied for schema public"));
        assert_eq!(executor.calls.borrow().len(), 1);
    }

    #[test]
    fn reapplying_sends_the_same_payload() {
        let executor = RecordingExecutor::ok();
        apply_schema(&executor).unwrap();
        apply_schema(&executor).unwrap();

        let calls = executor.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn works_through_a_trait_object() {
        let executor = RecordingExecutor::ok();
        let dyn_executor: &dyn SqlExecutor = &executor;
        let response = apply_schema(dyn_executor).unwrap();
        assert_ne!(response.data, Value::Null);
    }
}
