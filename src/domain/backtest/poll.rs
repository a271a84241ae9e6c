//! Progress polling for a running backtest.
//!
//! Runtime-agnostic: waits with `futures_timer`, takes the fetch as a closure
//! so callers can poll through the client or a fake in tests.

use super::BacktestProgress;
use crate::error::{HttpError, SdkError};
use std::future::Future;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const MAX_CONSECUTIVE_ERRORS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    /// Transient fetch failures tolerated in a row before giving up.
    pub max_consecutive_errors: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_consecutive_errors: MAX_CONSECUTIVE_ERRORS,
        }
    }
}

/// Failures worth polling through: the run may still be progressing.
fn is_transient(e: &SdkError) -> bool {
    match e {
        SdkError::Http(h) => !matches!(
            h.last(),
            HttpError::NotFound(_) | HttpError::BadRequest(_) | HttpError::Unauthorized
        ),
        _ => false,
    }
}

/// Fetch progress every `config.interval` until the run reaches a terminal
/// status, reporting each snapshot to `on_progress`.
///
/// Returns the terminal snapshot. Definitive errors (unknown backtest,
/// rejected request) end polling at once; transient ones are logged and
/// retried up to `max_consecutive_errors` times in a row.
pub async fn poll_progress<F, Fut, P>(
    config: &PollConfig,
    mut fetch: F,
    mut on_progress: P,
) -> Result<BacktestProgress, SdkError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BacktestProgress, SdkError>>,
    P: FnMut(&BacktestProgress),
{
    let mut errors = 0u32;
    loop {
        match fetch().await {
            Ok(progress) => {
                errors = 0;
                on_progress(&progress);
                if progress.is_terminal() {
                    tracing::debug!(
                        "backtest {} finished: {}",
                        progress.backtest_id,
                        progress.status.as_str()
                    );
                    return Ok(progress);
                }
            }
            Err(e) if is_transient(&e) && errors < config.max_consecutive_errors => {
                errors += 1;
                tracing::warn!(
                    "progress poll failed ({}/{}): {}",
                    errors,
                    config.max_consecutive_errors,
                    e
                );
            }
            Err(e) => return Err(e),
        }
        futures_timer::Delay::new(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BacktestStatus;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn snapshot(status: BacktestStatus, progress: u8) -> BacktestProgress {
        BacktestProgress {
            backtest_id: "bt_001".into(),
            status,
            progress,
            message: None,
            current_date: None,
            error: None,
        }
    }

    fn fast() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            max_consecutive_errors: 2,
        }
    }

    async fn run(
        config: &PollConfig,
        script: Vec<Result<BacktestProgress, SdkError>>,
    ) -> (Result<BacktestProgress, SdkError>, Vec<u8>, usize) {
        let script = Mutex::new(VecDeque::from(script));
        let calls = Mutex::new(0usize);
        let mut seen = Vec::new();
        let result = poll_progress(
            config,
            || {
                *calls.lock().unwrap() += 1;
                let next = script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(SdkError::Other("script exhausted".into())));
                async move { next }
            },
            |p| seen.push(p.progress),
        )
        .await;
        let calls = *calls.lock().unwrap();
        (result, seen, calls)
    }

    #[tokio::test]
    async fn test_polls_until_terminal() {
        let (result, seen, calls) = run(
            &fast(),
            vec![
                Ok(snapshot(BacktestStatus::Pending, 0)),
                Ok(snapshot(BacktestStatus::Running, 40)),
                Ok(snapshot(BacktestStatus::Completed, 100)),
                Ok(snapshot(BacktestStatus::Running, 1)),
            ],
        )
        .await;
        assert_eq!(result.unwrap().status, BacktestStatus::Completed);
        assert_eq!(seen, vec![0, 40, 100]);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_transient_errors_tolerated() {
        let (result, seen, _) = run(
            &fast(),
            vec![
                Ok(snapshot(BacktestStatus::Running, 10)),
                Err(HttpError::Timeout.into()),
                Err(HttpError::ServerError { status: 503, body: String::new() }.into()),
                Ok(snapshot(BacktestStatus::Running, 60)),
                Err(HttpError::Timeout.into()),
                Ok(snapshot(BacktestStatus::Failed, 60)),
            ],
        )
        .await;
        assert_eq!(result.unwrap().status, BacktestStatus::Failed);
        assert_eq!(seen, vec![10, 60, 60]);
    }

    #[tokio::test]
    async fn test_gives_up_after_consecutive_errors() {
        let (result, _, calls) = run(
            &fast(),
            vec![
                Err(HttpError::Timeout.into()),
                Err(HttpError::Timeout.into()),
                Err(HttpError::Timeout.into()),
                Ok(snapshot(BacktestStatus::Completed, 100)),
            ],
        )
        .await;
        assert!(matches!(result, Err(SdkError::Http(HttpError::Timeout))));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_unknown_backtest_stops_at_once() {
        let (result, _, calls) = run(
            &fast(),
            vec![Err(HttpError::NotFound("回测任务不存在".into()).into())],
        )
        .await;
        assert!(matches!(result, Err(SdkError::Http(HttpError::NotFound(_)))));
        assert_eq!(calls, 1);
    }
}
