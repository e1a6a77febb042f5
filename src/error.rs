use crate::models::{TaskId, TaskStatus};
use crate::store::StoreError;

/// Failures the service cannot recover from by falling back.
///
/// Remote outages never show up here; they are logged and the call is
/// retried against the local store. A remote refusal does.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("local store: {0}")]
    Store(#[from] StoreError),

    #[error("task {id}: {from} → {to} is not an allowed transition")]
    IllegalTransition {
        id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// The remote backend refused the change (it runs a strict policy).
    #[error("task {id}: backend refused status {to}: {reason}")]
    Rejected {
        id: TaskId,
        to: TaskStatus,
        reason: String,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;
