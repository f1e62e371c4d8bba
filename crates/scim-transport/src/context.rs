//! Cancellation and deadline context shared by every call of a client.

use scim_core::{DirectoryError, DirectoryResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline.
///
/// Supplied once when a client is constructed and handed unchanged to every
/// transport call that client issues.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context bound to `cancel`, without a deadline.
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel, deadline: None }
    }

    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The token that cancels calls made under this context.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drives `fut` to completion unless the token fires or the deadline passes first.
    pub async fn run<F, T>(&self, fut: F) -> DirectoryResult<T>
    where
        F: Future<Output = DirectoryResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(DirectoryError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(DirectoryError::Timeout("request deadline exceeded".to_string())),
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(DirectoryError::Cancelled),
            result = bounded => result,
        }
    }
}
