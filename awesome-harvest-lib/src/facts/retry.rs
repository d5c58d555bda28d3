//! Retry-once policy for per-entry enrichment

use crate::Result;

/// Where an entry stands in its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    FirstAttempt,
    Retrying,
    Exhausted,
}

impl RetryState {
    /// The state to move to after a failed attempt.
    #[must_use]
    pub const fn after_failure(self) -> Self {
        match self {
            Self::FirstAttempt => Self::Retrying,
            Self::Retrying | Self::Exhausted => Self::Exhausted,
        }
    }
}

/// Run `attempt` and, if it fails, run it once more.
///
/// The closure receives the state of the attempt being made. The error of the
/// final attempt is returned once both have failed.
pub async fn with_single_retry<T, F, Fut>(mut attempt: F) -> Result<T>
where
    F: FnMut(RetryState) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut state = RetryState::FirstAttempt;

    loop {
        match attempt(state).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                state = state.after_failure();
                if state == RetryState::Exhausted {
                    return Err(e);
                }
            }
        }
    }
}
