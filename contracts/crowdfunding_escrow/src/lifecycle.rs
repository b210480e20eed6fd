//! # Lifecycle
//!
//! Derives and applies campaign status transitions from ledger state and the
//! ledger clock. The only reachable edges are:
//!
//! | From         | To           | Trigger                                   |
//! |--------------|--------------|-------------------------------------------|
//! | `Active`     | `Successful` | a contribution crosses the goal           |
//! | `Active`     | `Failed`     | first refund after an unmet deadline      |
//! | `Successful` | `Withdrawn`  | creator withdrawal                        |

use crate::types::{CampaignConfig, CampaignState, CampaignStatus};
use crate::Error;

/// Returns `true` if `from -> to` is an edge of the campaign state machine.
pub fn is_valid_transition(from: CampaignStatus, to: CampaignStatus) -> bool {
    matches!(
        (from, to),
        (CampaignStatus::Active, CampaignStatus::Successful)
            | (CampaignStatus::Active, CampaignStatus::Failed)
            | (CampaignStatus::Successful, CampaignStatus::Withdrawn)
    )
}

/// Move `state` to `to`, rejecting any edge outside the state machine.
pub fn advance(state: &mut CampaignState, to: CampaignStatus) -> Result<(), Error> {
    if !is_valid_transition(state.status, to) {
        return Err(Error::InvalidTransition);
    }
    state.status = to;
    Ok(())
}

/// `true` once `now` is strictly past the campaign deadline.
pub fn deadline_passed(config: &CampaignConfig, now: u64) -> bool {
    now > config.deadline
}

/// `true` when this contribution moved `raised` from below the goal to at or
/// above it.
pub fn crossed_goal(goal: i128, raised_before: i128, raised_after: i128) -> bool {
    raised_before < goal && raised_after >= goal
}

/// Refund predicate: the contributor still has funds held, the deadline has
/// passed, and the campaign never reached its goal.
pub fn refund_eligible(
    config: &CampaignConfig,
    state: &CampaignState,
    contribution: i128,
    now: u64,
) -> bool {
    contribution > 0 && deadline_passed(config, now) && state.raised_amount < config.goal_amount
}
