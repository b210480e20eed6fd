//! # Types
//!
//! Shared data structures used across all modules of the escrow ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Campaign` is internally stored as two separate ledger entries:
//!
//! - [`CampaignConfig`]: written once at creation; never mutated.
//! - [`CampaignState`]: written on every contribution, refund and withdrawal.
//!
//! The public API exposes the reconstructed [`Campaign`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`CampaignStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Active ──► Successful ──► Withdrawn
//!    └─────► Failed
//! ```
//!
//! `Failed` and `Withdrawn` are terminal. The edge table lives in
//! [`crate::lifecycle`].

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of a campaign.
///
/// The discriminants are part of the public interface (events carry them)
/// and must stay stable.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CampaignStatus {
    /// Accepting contributions until the deadline.
    Active = 0,
    /// Goal reached; waiting for the creator to withdraw.
    Successful = 1,
    /// Deadline passed below goal; contributors are being refunded.
    Failed = 2,
    /// Creator has withdrawn the raised funds.
    Withdrawn = 3,
}

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub goal_amount: i128,
    pub deadline: u64,
}

/// Mutable campaign state, updated on contributions, refunds and withdrawal.
///
/// Kept small so that frequent writes (contributions) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub raised_amount: i128,
    pub status: CampaignStatus,
    pub funds_withdrawn: bool,
    pub contributor_count: u32,
}

/// Full on-chain representation of a campaign.
///
/// Used as the public API return type; reconstructed internally from
/// the split `CampaignConfig` + `CampaignState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Sequential identifier, starting at 0.
    pub id: u64,
    /// Address that created the campaign and receives the funds.
    pub creator: Address,
    pub title: String,
    pub description: String,
    /// Opaque pointer to off-chain media; stored verbatim.
    pub image_url: String,
    /// Target amount in the token's smallest unit.
    pub goal_amount: i128,
    /// Sum of all accepted contributions. Never decremented.
    pub raised_amount: i128,
    /// Ledger timestamp after which contributions are rejected.
    pub deadline: u64,
    pub status: CampaignStatus,
    pub funds_withdrawn: bool,
    /// Number of distinct contributors.
    pub contributor_count: u32,
}

impl Campaign {
    pub(crate) fn from_parts(config: CampaignConfig, state: CampaignState) -> Self {
        Campaign {
            id: config.id,
            creator: config.creator,
            title: config.title,
            description: config.description,
            image_url: config.image_url,
            goal_amount: config.goal_amount,
            raised_amount: state.raised_amount,
            deadline: config.deadline,
            status: state.status,
            funds_withdrawn: state.funds_withdrawn,
            contributor_count: state.contributor_count,
        }
    }
}

/// One logical contribution entry per distinct contributor of a campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionEntry {
    pub contributor: Address,
    /// Current cumulative amount held for this contributor (0 once refunded).
    pub amount: i128,
}

/// Result of the fee computation for a withdrawal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeBreakdown {
    pub platform_fee: i128,
    pub success_fee: i128,
    pub total_fee: i128,
    pub creator_amount: i128,
}
