//! Runtime abstraction for CPU-bound work
//!
//! With the `tokio-runtime` feature, blocking work is moved to tokio's blocking
//! pool so the event loop keeps serving other futures. Without it the work
//! runs inline when the future is polled.

/// A blocking task panicked or was cancelled before producing a value.
#[derive(Debug, thiserror::Error)]
#[error("background task failed: {0}")]
pub struct TaskFailed(pub String);

/// Common async execution helper to standardize tokio-runtime patterns
pub struct AsyncExecutor;

impl AsyncExecutor {
    /// Execute a CPU-intensive task using the appropriate runtime
    pub async fn execute_blocking<F, R, E>(task: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<TaskFailed> + Send + 'static,
    {
        #[cfg(feature = "tokio-runtime")]
        {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => handle
                    .spawn_blocking(task)
                    .await
                    .map_err(|e| E::from(TaskFailed(e.to_string())))?,
                // Outside a tokio context (e.g. a `futures` executor) run inline.
                Err(_) => task(),
            }
        }

        #[cfg(not(feature = "tokio-runtime"))]
        {
            task()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Failed(String);

    impl From<TaskFailed> for Failed {
        fn from(e: TaskFailed) -> Self {
            Failed(e.0)
        }
    }

    #[tokio::test]
    async fn test_execute_blocking_returns_value() {
        let value: Result<u32, Failed> = AsyncExecutor::execute_blocking(|| Ok(6 * 7)).await;
        assert_eq!(value.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_execute_blocking_propagates_task_error() {
        let value: Result<u32, Failed> =
            AsyncExecutor::execute_blocking(|| Err(Failed("boom".into()))).await;
        assert_eq!(value.unwrap_err().0, "boom");
    }

    #[test]
    fn test_execute_blocking_without_runtime() {
        let value: Result<&str, Failed> =
            futures::executor::block_on(AsyncExecutor::execute_blocking(|| Ok("inline")));
        assert_eq!(value.unwrap(), "inline");
    }
}
