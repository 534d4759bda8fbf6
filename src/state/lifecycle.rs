//! Transition rules of the join request lifecycle.
//!
//! ```text
//! pending ──accept──▶ accepted ──reject──▶ rejected
//!    │                                       │
//!    └───────reject──────▶ rejected ◀────────┘
//! rejected ──request again──▶ pending
//! ```

use thiserror::Error;

use crate::{dao::models::JoinRequestStatus, error::ServiceError};

/// Side effect a moderation decision has on the participant roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `pending → accepted`: capacity check, then insert a participant.
    Admit,
    /// `pending → rejected`: status change only.
    Reject,
    /// `accepted → rejected`: remove the participant again.
    Revoke,
    /// Target equals the current terminal status; nothing to do.
    Unchanged,
}

/// What `requestJoin` does with a possibly existing request for the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No request exists yet; insert a pending one.
    Create,
    /// A rejected request exists; move it back to pending.
    Reopen,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("join requests can only be moved to accepted or rejected, not {0:?}")]
    TargetNotAllowed(JoinRequestStatus),
    #[error("join request cannot go from {from:?} to {to:?}")]
    Invalid {
        from: JoinRequestStatus,
        to: JoinRequestStatus,
    },
    #[error("a {0:?} join request already exists for this tournament")]
    AlreadyRequested(JoinRequestStatus),
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::TargetNotAllowed(_) => ServiceError::InvalidInput(err.to_string()),
            TransitionError::Invalid { .. } => ServiceError::InvalidState(err.to_string()),
            TransitionError::AlreadyRequested(_) => ServiceError::Conflict(err.to_string()),
        }
    }
}

/// Decide how a moderation decision moving a request from `from` to `to` applies.
pub fn plan(from: JoinRequestStatus, to: JoinRequestStatus) -> Result<Transition, TransitionError> {
    use JoinRequestStatus::*;

    match (from, to) {
        (_, Pending) => Err(TransitionError::TargetNotAllowed(to)),
        (Pending, Accepted) => Ok(Transition::Admit),
        (Pending, Rejected) => Ok(Transition::Reject),
        (Accepted, Rejected) => Ok(Transition::Revoke),
        (Accepted, Accepted) | (Rejected, Rejected) => Ok(Transition::Unchanged),
        (Rejected, Accepted) => Err(TransitionError::Invalid { from, to }),
    }
}

/// Decide what a new join request does given the existing one for the pair, if any.
pub fn on_request(existing: Option<JoinRequestStatus>) -> Result<RequestOutcome, TransitionError> {
    match existing {
        None => Ok(RequestOutcome::Create),
        Some(JoinRequestStatus::Rejected) => Ok(RequestOutcome::Reopen),
        Some(status) => Err(TransitionError::AlreadyRequested(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use JoinRequestStatus::*;

    #[test]
    fn pending_can_be_accepted_or_rejected() {
        assert_eq!(plan(Pending, Accepted), Ok(Transition::Admit));
        assert_eq!(plan(Pending, Rejected), Ok(Transition::Reject));
    }

    #[test]
    fn accepted_request_can_be_revoked() {
        assert_eq!(plan(Accepted, Rejected), Ok(Transition::Revoke));
    }

    #[test]
    fn repeated_terminal_status_is_a_no_op() {
        assert_eq!(plan(Accepted, Accepted), Ok(Transition::Unchanged));
        assert_eq!(plan(Rejected, Rejected), Ok(Transition::Unchanged));
    }

    #[test]
    fn rejected_request_cannot_be_accepted_directly() {
        assert_eq!(
            plan(Rejected, Accepted),
            Err(TransitionError::Invalid {
                from: Rejected,
                to: Accepted
            })
        );
    }

    #[test]
    fn pending_is_never_a_moderation_target() {
        for from in [Pending, Accepted, Rejected] {
            assert_eq!(
                plan(from, Pending),
                Err(TransitionError::TargetNotAllowed(Pending))
            );
        }
    }

    #[test]
    fn re_request_reopens_only_rejected_requests() {
        assert_eq!(on_request(None), Ok(RequestOutcome::Create));
        assert_eq!(on_request(Some(Rejected)), Ok(RequestOutcome::Reopen));
        assert_eq!(
            on_request(Some(Pending)),
            Err(TransitionError::AlreadyRequested(Pending))
        );
        assert_eq!(
            on_request(Some(Accepted)),
            Err(TransitionError::AlreadyRequested(Accepted))
        );
    }

    #[test]
    fn errors_map_to_service_categories() {
        assert!(matches!(
            ServiceError::from(TransitionError::TargetNotAllowed(Pending)),
            ServiceError::InvalidInput(_)
        ));
        assert!(matches!(
            ServiceError::from(TransitionError::Invalid {
                from: Rejected,
                to: Accepted
            }),
            ServiceError::InvalidState(_)
        ));
        assert!(matches!(
            ServiceError::from(TransitionError::AlreadyRequested(Pending)),
            ServiceError::Conflict(_)
        ));
    }
}
