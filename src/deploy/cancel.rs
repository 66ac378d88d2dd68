// ABOUTME: Cooperative cancellation and per-step time limits for deployments.
// ABOUTME: A shared flag plus Notify wakes every step waiting on the token.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

use super::error::DeployError;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cloneable handle; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Run one deployment step, giving up on cancellation or after `limit`.
    ///
    /// A step that has not started when the token is already cancelled is
    /// never polled.
    pub async fn guard<T, F>(&self, step: &'static str, limit: Duration, fut: F) -> Result<T, DeployError>
    where
        F: Future<Output = Result<T, DeployError>>,
    {
        if self.is_cancelled() {
            return Err(DeployError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => {
                tracing::warn!(step, "deployment cancelled");
                Err(DeployError::Cancelled)
            }
            result = tokio::time::timeout(limit, fut) => match result {
                Ok(outcome) => outcome,
                Err(_elapsed) => {
                    let seconds = limit.as_secs_f64();
                    tracing::warn!(step, seconds, "deployment step timed out");
                    Err(DeployError::StepTimeout { step, seconds })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn step_runs_when_not_cancelled() {
        let token = CancelToken::new();
        let value = token
            .guard("noop", Duration::from_secs(1), async { Ok::<_, DeployError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn cancelled_token_skips_step() {
        let token = CancelToken::new();
        token.cancel();

        let ran = AtomicBool::new(false);
        let result = token
            .guard("create app", Duration::from_secs(1), async {
                ran.store(true, Ordering::SeqCst);
                Ok::<_, DeployError>(())
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, DeployError::Cancelled));
        assert_eq!(err.to_string(), "Deployment cancelled");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancel_interrupts_running_step() {
        let token = CancelToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = token
            .guard("upload bits", Duration::from_secs(30), async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, DeployError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Cancelled));
    }

    #[tokio::test]
    async fn slow_step_times_out() {
        let token = CancelToken::new();
        let err = token
            .guard("get build", Duration::from_millis(50), async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, DeployError>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::StepTimeout { step: "get build", .. }));
        assert_eq!(err.to_string(), "get build timed out after 0.05 seconds");
    }
}
