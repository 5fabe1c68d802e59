//! Membership maintenance helpers
//!
//! A join or leave touches two documents with independent writes: the target's
//! membership list first, then the user's reciprocal list. These helpers turn
//! the outcome of each write into the error the caller reports. A failed
//! reciprocal write is logged and surfaced but never rolled back.

use uuid::Uuid;

use crate::database::ListWrite;
use crate::utils::errors::{GatherError, MembershipTarget, Result};
use crate::utils::logging::log_partial_write;

/// Error for a target that no longer exists
pub(crate) fn target_not_found(target: MembershipTarget) -> GatherError {
    match target {
        MembershipTarget::Event(event_id) => GatherError::EventNotFound { event_id },
        MembershipTarget::Group(group_id) => GatherError::GroupNotFound { group_id },
    }
}

/// Reject a join on a target that already holds `max` members
pub(crate) fn ensure_capacity(target: MembershipTarget, is_full: bool, max: i32) -> Result<()> {
    if is_full {
        return Err(GatherError::CapacityReached { target, max });
    }
    Ok(())
}

/// Reject a capacity change that would leave the target over-full
pub(crate) fn ensure_capacity_fits(
    target: MembershipTarget,
    requested: Option<i32>,
    current: usize,
) -> Result<()> {
    match requested {
        Some(requested) if (requested.max(0) as usize) < current => {
            Err(GatherError::CapacityBelowMembers { target, requested, current })
        }
        _ => Ok(()),
    }
}

/// Interpret the target-side set-insert of a join
pub(crate) fn target_inserted(target: MembershipTarget, outcome: ListWrite) -> Result<()> {
    match outcome {
        ListWrite::Modified => Ok(()),
        // a concurrent joiner got there first
        ListWrite::Unchanged => Err(GatherError::AlreadyMember { target }),
        ListWrite::Missing => Err(target_not_found(target)),
    }
}

/// Interpret the target-side set-remove of a leave
pub(crate) fn target_removed(target: MembershipTarget, outcome: ListWrite) -> Result<()> {
    match outcome {
        ListWrite::Modified => Ok(()),
        ListWrite::Unchanged => Err(GatherError::NotMember { target }),
        ListWrite::Missing => Err(target_not_found(target)),
    }
}

/// Interpret the user-side write that mirrors a target-side change
///
/// `Unchanged` is accepted: the user side already agrees with the target.
pub(crate) fn reciprocal_written(
    operation: &'static str,
    target: MembershipTarget,
    user_id: Uuid,
    outcome: Result<ListWrite>,
) -> Result<()> {
    let error = match outcome {
        Ok(ListWrite::Modified) | Ok(ListWrite::Unchanged) => return Ok(()),
        Ok(ListWrite::Missing) => GatherError::UserNotFound { user_id },
        Err(error) => error,
    };

    Err(partial_write(operation, target, user_id, error))
}

/// Log a write that left one side of a relation behind and wrap it for the caller
pub(crate) fn partial_write(
    operation: &'static str,
    target: MembershipTarget,
    user_id: Uuid,
    error: GatherError,
) -> GatherError {
    log_partial_write(operation, &target.to_string(), user_id, &error);
    GatherError::PartialWrite { operation, detail: error.to_string() }
}
