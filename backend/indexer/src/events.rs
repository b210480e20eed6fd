//! Canonical event types emitted by the crowdfunding escrow contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfunding_escrow/src/events.rs`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the escrow contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new campaign was registered (`created` topic).
    CampaignCreated,
    /// Tokens were escrowed for a campaign (`contrib` topic).
    Contributed,
    /// A campaign moved to a new status (`state` topic).
    StateChanged,
    /// Raised funds were paid to the creator (`released` topic).
    FundsReleased,
    /// A contributor reclaimed their contribution (`refunded` topic).
    Refunded,
    /// The owner swept the fee accumulator (`fees_out` topic).
    FeesWithdrawn,
    /// Campaign creation was paused (`paused` topic).
    Paused,
    /// Campaign creation was resumed (`unpaused` topic).
    Unpaused,
    /// Unallocated surplus was recovered by the owner (`emergency` topic).
    EmergencyWithdrawal,
    /// Contract ownership changed hands (`owner` topic).
    OwnershipTransferred,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "contrib" => Self::Contributed,
            "state" => Self::StateChanged,
            "released" => Self::FundsReleased,
            "refunded" => Self::Refunded,
            "fees_out" => Self::FeesWithdrawn,
            "paused" => Self::Paused,
            "unpaused" => Self::Unpaused,
            "emergency" => Self::EmergencyWithdrawal,
            "owner" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::Contributed => "contributed",
            Self::StateChanged => "state_changed",
            Self::FundsReleased => "funds_released",
            Self::Refunded => "refunded",
            Self::FeesWithdrawn => "fees_withdrawn",
            Self::Paused => "paused",
            Self::Unpaused => "unpaused",
            Self::EmergencyWithdrawal => "emergency_withdrawal",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Self {
        match s {
            "campaign_created" => Self::CampaignCreated,
            "contributed" => Self::Contributed,
            "state_changed" => Self::StateChanged,
            "funds_released" => Self::FundsReleased,
            "refunded" => Self::Refunded,
            "fees_withdrawn" => Self::FeesWithdrawn,
            "paused" => Self::Paused,
            "unpaused" => Self::Unpaused,
            "emergency_withdrawal" => Self::EmergencyWithdrawal,
            "ownership_transferred" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }
}

/// Campaign status names, indexed by the contract's `CampaignStatus` discriminant.
pub const STATUS_NAMES: [&str; 4] = ["active", "successful", "failed", "withdrawn"];

/// A fully decoded contract event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// RPC event id (`<toid>-<index>`); unique per emitted event.
    pub event_id: Option<String>,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    /// Kind-specific extra value: the new status for state changes, the fee
    /// for releases, the running total for contributions.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: Option<String>,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Campaign view reconstructed from its indexed history.
///
/// Amounts are decimal strings so `i128` token values survive JSON clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub creator: Option<String>,
    pub goal_amount: Option<String>,
    pub raised_amount: String,
    pub refunded_amount: String,
    pub contributor_count: usize,
    pub status: String,
    pub creator_payout: Option<String>,
    pub platform_fee: Option<String>,
    pub last_ledger: i64,
    pub event_count: usize,
}

impl CampaignSummary {
    /// Fold a campaign's events (ledger order) into a summary.
    ///
    /// Returns `None` when the campaign has no indexed events at all.
    pub fn fold(campaign_id: &str, events: &[EventRecord]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }

        let mut creator = None;
        let mut goal_amount = None;
        let mut raised: i128 = 0;
        let mut refunded: i128 = 0;
        let mut contributors: HashSet<&str> = HashSet::new();
        let mut status = STATUS_NAMES[0].to_string();
        let mut creator_payout = None;
        let mut platform_fee = None;
        let mut last_ledger = 0;

        for ev in events {
            last_ledger = last_ledger.max(ev.ledger);
            match EventKind::from_stored(&ev.event_type) {
                EventKind::CampaignCreated => {
                    creator = ev.actor.clone();
                    goal_amount = ev.amount.clone();
                }
                EventKind::Contributed => {
                    raised += parse_amount(ev.amount.as_deref());
                    if let Some(actor) = ev.actor.as_deref() {
                        contributors.insert(actor);
                    }
                }
                EventKind::StateChanged => {
                    if let Some(next) = ev.detail.as_deref() {
                        status = next.to_string();
                    }
                }
                EventKind::FundsReleased => {
                    creator_payout = ev.amount.clone();
                    platform_fee = ev.detail.clone();
                }
                EventKind::Refunded => {
                    refunded += parse_amount(ev.amount.as_deref());
                }
                _ => {}
            }
        }

        Some(CampaignSummary {
            campaign_id: campaign_id.to_string(),
            creator,
            goal_amount,
            raised_amount: raised.to_string(),
            refunded_amount: refunded.to_string(),
            contributor_count: contributors.len(),
            status,
            creator_payout,
            platform_fee,
            last_ledger,
            event_count: events.len(),
        })
    }
}

fn parse_amount(raw: Option<&str>) -> i128 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}
