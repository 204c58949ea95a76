use macresolve_domain::DomainError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cancellation seen by one engine operation: the caller's token plus the engine's own
/// shutdown token, which fires on disposal.
#[derive(Debug, Clone)]
pub struct CancelScope {
    caller: CancellationToken,
    shutdown: CancellationToken,
}

impl CancelScope {
    pub fn new(caller: CancellationToken, shutdown: CancellationToken) -> Self {
        Self { caller, shutdown }
    }

    /// Token handed to collaborators.
    pub fn token(&self) -> &CancellationToken {
        &self.caller
    }

    pub fn is_cancelled(&self) -> bool {
        self.caller.is_cancelled() || self.shutdown.is_cancelled()
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if self.is_cancelled() {
            Err(DomainError::Canceled)
        } else {
            Ok(())
        }
    }

    pub async fn cancelled(&self) {
        tokio::select! {
            _ = self.caller.cancelled() => {}
            _ = self.shutdown.cancelled() => {}
        }
    }

    /// Drives `fut` until it completes or the scope is cancelled. The future is dropped on
    /// cancellation, which releases any gate permit it holds.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(DomainError::Canceled),
            result = fut => result,
        }
    }
}
