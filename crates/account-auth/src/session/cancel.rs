//! Racing session steps against the caller's cancellation token.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use account_core::{AppError, AppResult};

/// Runs `step` unless `cancel` fires first.
///
/// A step that is dropped mid-flight never leaves a partial write behind:
/// every store call is a single atomic statement.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(AppError::cancelled()),
        result = step => result,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use account_core::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let value = cancellable(&cancel, async { Ok(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn already_cancelled_token_wins() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = cancellable(&cancel, async { Ok(5) }).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_a_pending_step() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = cancellable(&cancel, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
