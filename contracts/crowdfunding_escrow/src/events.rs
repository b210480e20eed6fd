//! # Events
//!
//! Every state change of the ledger is published as a contract event whose
//! first topic is a short symbol and, for campaign-scoped events, whose second
//! topic is the campaign id. Payloads are `#[contracttype]` structs so the
//! off-chain indexer receives named fields.
//!
//! | Topic       | Payload                  |
//! |-------------|--------------------------|
//! | `created`   | [`CampaignCreated`]      |
//! | `contrib`   | [`Contributed`]          |
//! | `state`     | [`CampaignStateChanged`] |
//! | `released`  | [`FundsReleased`]        |
//! | `refunded`  | [`Refunded`]             |
//! | `fees_out`  | [`PlatformFeesWithdrawn`]|
//! | `paused`    | caller `Address`         |
//! | `unpaused`  | caller `Address`         |
//! | `emergency` | [`EmergencyWithdrawal`]  |
//! | `owner`     | [`OwnershipTransferred`] |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::CampaignStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub creator: Address,
    pub title: String,
    pub goal_amount: i128,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contributed {
    pub campaign_id: u64,
    pub contributor: Address,
    pub amount: i128,
    pub raised_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignStateChanged {
    pub campaign_id: u64,
    pub status: CampaignStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReleased {
    pub campaign_id: u64,
    pub creator: Address,
    pub creator_amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refunded {
    pub campaign_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformFeesWithdrawn {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawal {
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

pub fn emit_campaign_created(
    env: &Env,
    campaign_id: u64,
    creator: Address,
    title: String,
    goal_amount: i128,
    deadline: u64,
) {
    env.events().publish(
        (symbol_short!("created"), campaign_id),
        CampaignCreated {
            campaign_id,
            creator,
            title,
            goal_amount,
            deadline,
        },
    );
}

pub fn emit_contributed(
    env: &Env,
    campaign_id: u64,
    contributor: Address,
    amount: i128,
    raised_amount: i128,
) {
    env.events().publish(
        (symbol_short!("contrib"), campaign_id),
        Contributed {
            campaign_id,
            contributor,
            amount,
            raised_amount,
        },
    );
}

pub fn emit_state_changed(env: &Env, campaign_id: u64, status: CampaignStatus) {
    env.events().publish(
        (symbol_short!("state"), campaign_id),
        CampaignStateChanged {
            campaign_id,
            status,
        },
    );
}

pub fn emit_funds_released(
    env: &Env,
    campaign_id: u64,
    creator: Address,
    creator_amount: i128,
    fee: i128,
) {
    env.events().publish(
        (symbol_short!("released"), campaign_id),
        FundsReleased {
            campaign_id,
            creator,
            creator_amount,
            fee,
        },
    );
}

pub fn emit_refunded(env: &Env, campaign_id: u64, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refunded"), campaign_id),
        Refunded {
            campaign_id,
            contributor,
            amount,
        },
    );
}

pub fn emit_fees_withdrawn(env: &Env, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("fees_out"),),
        PlatformFeesWithdrawn { owner, amount },
    );
}

pub fn emit_paused(env: &Env, caller: Address) {
    env.events().publish((symbol_short!("paused"),), caller);
}

pub fn emit_unpaused(env: &Env, caller: Address) {
    env.events().publish((symbol_short!("unpaused"),), caller);
}

pub fn emit_emergency_withdrawal(env: &Env, owner: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("emergency"),),
        EmergencyWithdrawal { owner, amount },
    );
}

pub fn emit_ownership_transferred(env: &Env, previous_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("owner"),),
        OwnershipTransferred {
            previous_owner,
            new_owner,
        },
    );
}
