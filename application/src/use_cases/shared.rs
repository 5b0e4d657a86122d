//! Shared utilities for use cases.
//!
//! Contains cancellation checking and timing helpers used by the run-plan
//! and auto-invoke use cases.

use callgate_domain::DomainError;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(DomainError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), DomainError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(DomainError::Cancelled);
    }
    Ok(())
}

/// Milliseconds since `start`, saturating
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cancelled() {
        assert!(check_cancelled(&None).is_ok());

        let token = CancellationToken::new();
        assert!(check_cancelled(&Some(token.clone())).is_ok());

        token.cancel();
        let err = check_cancelled(&Some(token)).unwrap_err();
        assert!(err.is_cancelled());
    }
}
