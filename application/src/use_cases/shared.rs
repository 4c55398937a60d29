//! Shared utilities for use cases.

use crate::use_cases::run_consultation::ConsultationError;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(ConsultationError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), ConsultationError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(ConsultationError::Cancelled);
    }
    Ok(())
}
