use std::future::Future;

use storage::error::Result;

/// Run an idempotent read, retrying once if the storage layer reports a
/// transient failure. Mutations are never routed through here; an aborted
/// write rolls back whole and surfaces to the caller instead.
pub async fn with_read_retry<T, F, Fut>(op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Err(e) if e.is_transient() => {
            tracing::warn!("Transient storage error, retrying read: {}", e);
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::error::StorageError;

    #[tokio::test]
    async fn test_successful_read_runs_once() {
        let calls = AtomicUsize::new(0);
        let result = with_read_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_retried_once() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32> = with_read_retry(|| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(StorageError::Database(sqlx::Error::PoolTimedOut))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<i32> = with_read_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(StorageError::NotFound) }
        })
        .await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
