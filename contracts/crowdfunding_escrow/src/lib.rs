//! # Crowdfunding Escrow Contract
//!
//! This crate exposes the single Soroban contract `CrowdfundingEscrow`, which
//! custodies contributed funds for time-boxed campaigns and either disburses
//! them to the creator (minus platform fees) or refunds contributors when a
//! campaign misses its goal.
//!
//! | Phase        | Entry Point(s)                                               |
//! |--------------|--------------------------------------------------------------|
//! | Bootstrap    | [`CrowdfundingEscrow::init`]                                 |
//! | Registration | [`CrowdfundingEscrow::create_campaign`]                      |
//! | Funding      | [`CrowdfundingEscrow::contribute`]                           |
//! | Settlement   | `withdraw_funds`, `request_refund`, `is_eligible_for_refund` |
//! | Admin        | `pause`, `unpause`, `withdraw_platform_fees`, `emergency_withdraw`, `transfer_ownership` |
//! | Queries      | `get_campaign`, `get_contribution`, `get_creator_campaigns`, `get_contributor_campaigns`, `get_campaign_contributions`, scalar getters |
//!
//! ## Architecture
//!
//! Authorization and the pause flag live in `access`. Status transitions
//! live in `lifecycle`, fee math in `fees` and every token movement in
//! `custody`. Storage access is fully delegated to `storage`. This file
//! wires them together per entry point and emits events.
//!
//! Any entry point that returns an `Err` is rolled back by the host, so a
//! rejected call never leaves partial state, events or transfers behind.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

mod access;
mod custody;
pub mod events;
mod fees;
mod lifecycle;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_contributions;
#[cfg(test)]
mod test_events;

pub use fees::{BASIS_POINTS, PLATFORM_FEE_BPS, SUCCESS_FEE_BPS};
pub use types::{Campaign, CampaignStatus, ContributionEntry, FeeBreakdown};

pub const SECONDS_PER_DAY: u64 = 86_400;
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 365;

/// Contract errors. Code ranges group the failure classes:
/// 1–9 validation, 10–19 authorization, 20–39 state, 40 availability,
/// 50 not found.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    EmptyTitle = 1,
    EmptyDescription = 2,
    InvalidGoal = 3,
    InvalidDuration = 4,
    InvalidAmount = 5,

    NotOwner = 10,
    NotCreator = 11,
    CreatorCannotContribute = 12,

    DeadlinePassed = 20,
    CampaignNotActive = 21,
    WithdrawConditionsNotMet = 22,
    AlreadyWithdrawn = 23,
    RefundConditionsNotMet = 24,
    InvalidTransition = 25,
    NoFeesToWithdraw = 26,
    NothingToRecover = 27,
    Reentrant = 28,
    AlreadyInitialized = 29,
    NotInitialized = 30,

    ContractPaused = 40,

    CampaignNotFound = 50,
}

/// Failure class of an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Availability,
    NotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            1..=9 => ErrorKind::Validation,
            10..=19 => ErrorKind::Authorization,
            20..=39 => ErrorKind::State,
            40..=49 => ErrorKind::Availability,
            _ => ErrorKind::NotFound,
        }
    }
}

#[contract]
pub struct CrowdfundingEscrow;

#[contractimpl]
impl CrowdfundingEscrow {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the ledger with its owner and the token used for all value.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls fail with `Error::AlreadyInitialized`.
    pub fn init(env: Env, owner: Address, token: Address) -> Result<(), Error> {
        owner.require_auth();
        access::init_owner(&env, &owner)?;
        storage::set_token(&env, &token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Campaign registry
    // ─────────────────────────────────────────────────────────

    /// Open a new campaign and return its id.
    ///
    /// The deadline is `now + duration_days * 86_400`. `image_url` is an
    /// opaque off-chain reference and is stored as given.
    pub fn create_campaign(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        image_url: String,
        goal_amount: i128,
        duration_days: u32,
    ) -> Result<u64, Error> {
        if !storage::is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        access::require_not_paused(&env)?;
        creator.require_auth();

        if title.len() == 0 {
            return Err(Error::EmptyTitle);
        }
        if description.len() == 0 {
            return Err(Error::EmptyDescription);
        }
        if goal_amount <= 0 {
            return Err(Error::InvalidGoal);
        }
        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration_days) {
            return Err(Error::InvalidDuration);
        }

        let deadline = env.ledger().timestamp() + duration_days as u64 * SECONDS_PER_DAY;
        let id = storage::get_and_increment_campaign_id(&env);

        let config = types::CampaignConfig {
            id,
            creator: creator.clone(),
            title: title.clone(),
            description,
            image_url,
            goal_amount,
            deadline,
        };
        let state = types::CampaignState {
            raised_amount: 0,
            status: CampaignStatus::Active,
            funds_withdrawn: false,
            contributor_count: 0,
        };

        storage::save_campaign(&env, &config, &state);
        storage::push_creator_campaign(&env, &creator, id);

        events::emit_campaign_created(&env, id, creator, title, goal_amount, deadline);
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────
    // Contributions
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` tokens to an active campaign.
    ///
    /// Reaching the goal moves the campaign to `Successful`, after which
    /// further contributions are rejected with `CampaignNotActive`.
    pub fn contribute(
        env: Env,
        campaign_id: u64,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        custody::enter(&env)?;

        let (config, mut state) =
            storage::load_campaign_pair(&env, campaign_id).ok_or(Error::CampaignNotFound)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if contributor == config.creator {
            return Err(Error::CreatorCannotContribute);
        }
        contributor.require_auth();

        if lifecycle::deadline_passed(&config, env.ledger().timestamp()) {
            return Err(Error::DeadlinePassed);
        }
        if state.status != CampaignStatus::Active {
            return Err(Error::CampaignNotActive);
        }

        let raised_before = state.raised_amount;
        state.raised_amount += amount;

        let first_time = !storage::has_contributed(&env, campaign_id, &contributor);
        let held = storage::get_contribution(&env, campaign_id, &contributor);
        storage::set_contribution(&env, campaign_id, &contributor, held + amount);
        if first_time {
            state.contributor_count += 1;
            storage::push_contributor(&env, campaign_id, &contributor);
            storage::push_contributor_campaign(&env, &contributor, campaign_id);
        }
        storage::add_total_raised(&env, amount);

        let reached_goal =
            lifecycle::crossed_goal(config.goal_amount, raised_before, state.raised_amount);
        if reached_goal {
            lifecycle::advance(&mut state, CampaignStatus::Successful)?;
        }
        storage::save_campaign_state(&env, campaign_id, &state);

        events::emit_contributed(
            &env,
            campaign_id,
            contributor.clone(),
            amount,
            state.raised_amount,
        );
        if reached_goal {
            events::emit_state_changed(&env, campaign_id, CampaignStatus::Successful);
        }

        custody::collect(&env, &contributor, amount)?;
        custody::exit(&env);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Release the funds of a successful campaign to its creator.
    ///
    /// State is written before the transfer; a second call fails with
    /// `AlreadyWithdrawn`.
    pub fn withdraw_funds(env: Env, campaign_id: u64, caller: Address) -> Result<FeeBreakdown, Error> {
        custody::enter(&env)?;

        let (config, mut state) =
            storage::load_campaign_pair(&env, campaign_id).ok_or(Error::CampaignNotFound)?;

        if caller != config.creator {
            return Err(Error::NotCreator);
        }
        caller.require_auth();

        if state.funds_withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }
        if state.status != CampaignStatus::Successful {
            return Err(Error::WithdrawConditionsNotMet);
        }

        let breakdown = fees::compute_fees(state.raised_amount, config.goal_amount);

        state.funds_withdrawn = true;
        lifecycle::advance(&mut state, CampaignStatus::Withdrawn)?;
        storage::save_campaign_state(&env, campaign_id, &state);
        storage::set_fees_collected(&env, storage::fees_collected(&env) + breakdown.total_fee);
        custody::debit_escrow(&env, state.raised_amount);

        events::emit_funds_released(
            &env,
            campaign_id,
            config.creator.clone(),
            breakdown.creator_amount,
            breakdown.total_fee,
        );
        events::emit_state_changed(&env, campaign_id, CampaignStatus::Withdrawn);

        custody::pay_out(&env, &config.creator, breakdown.creator_amount)?;
        custody::exit(&env);
        Ok(breakdown)
    }

    /// Side-effect-free refund predicate: the contributor has funds held, the
    /// deadline has passed and the goal was not reached.
    pub fn is_eligible_for_refund(env: Env, campaign_id: u64, contributor: Address) -> bool {
        match storage::load_campaign_pair(&env, campaign_id) {
            Some((config, state)) => {
                let held = storage::get_contribution(&env, campaign_id, &contributor);
                lifecycle::refund_eligible(&config, &state, held, env.ledger().timestamp())
            }
            None => false,
        }
    }

    /// Return the caller's full contribution to a campaign that missed its
    /// goal. The first refund marks the campaign `Failed`.
    ///
    /// Returns the refunded amount.
    pub fn request_refund(env: Env, campaign_id: u64, contributor: Address) -> Result<i128, Error> {
        custody::enter(&env)?;

        let (config, mut state) =
            storage::load_campaign_pair(&env, campaign_id).ok_or(Error::CampaignNotFound)?;
        contributor.require_auth();

        let amount = storage::get_contribution(&env, campaign_id, &contributor);
        if !lifecycle::refund_eligible(&config, &state, amount, env.ledger().timestamp()) {
            return Err(Error::RefundConditionsNotMet);
        }

        storage::set_contribution(&env, campaign_id, &contributor, 0);
        custody::debit_escrow(&env, amount);

        let newly_failed = state.status != CampaignStatus::Failed;
        if newly_failed {
            lifecycle::advance(&mut state, CampaignStatus::Failed)?;
            storage::save_campaign_state(&env, campaign_id, &state);
            events::emit_state_changed(&env, campaign_id, CampaignStatus::Failed);
        }
        events::emit_refunded(&env, campaign_id, contributor.clone(), amount);

        custody::pay_out(&env, &contributor, amount)?;
        custody::exit(&env);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Owner operations
    // ─────────────────────────────────────────────────────────

    /// Send every collected platform fee to the owner and reset the
    /// accumulator. Returns the amount sent.
    pub fn withdraw_platform_fees(env: Env, caller: Address) -> Result<i128, Error> {
        custody::enter(&env)?;
        access::require_owner(&env, &caller)?;

        let amount = storage::fees_collected(&env);
        if amount == 0 {
            return Err(Error::NoFeesToWithdraw);
        }
        storage::set_fees_collected(&env, 0);
        events::emit_fees_withdrawn(&env, caller.clone(), amount);

        custody::pay_out(&env, &caller, amount)?;
        custody::exit(&env);
        Ok(amount)
    }

    /// Halt campaign creation.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        access::set_paused(&env, &caller, true)?;
        events::emit_paused(&env, caller);
        Ok(())
    }

    /// Resume campaign creation.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        access::set_paused(&env, &caller, false)?;
        events::emit_unpaused(&env, caller);
        Ok(())
    }

    /// Recover tokens held above the ledger's obligations (for instance
    /// tokens sent with a raw transfer instead of `contribute`).
    ///
    /// Escrowed campaign funds and uncollected fees are never touched.
    /// Returns the amount sent to the owner.
    pub fn emergency_withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        custody::enter(&env)?;
        access::require_owner(&env, &caller)?;

        let surplus = custody::unallocated(&env)?;
        if surplus == 0 {
            return Err(Error::NothingToRecover);
        }
        events::emit_emergency_withdrawal(&env, caller.clone(), surplus);

        custody::pay_out(&env, &caller, surplus)?;
        custody::exit(&env);
        Ok(surplus)
    }

    /// Hand the owner capability to `new_owner`.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        let previous = access::transfer_ownership(&env, &caller, &new_owner)?;
        events::emit_ownership_transferred(&env, previous, new_owner);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_campaign(env: Env, campaign_id: u64) -> Result<Campaign, Error> {
        let (config, state) =
            storage::load_campaign_pair(&env, campaign_id).ok_or(Error::CampaignNotFound)?;
        Ok(Campaign::from_parts(config, state))
    }

    /// Amount currently held for `contributor` in `campaign_id` (0 if none).
    pub fn get_contribution(env: Env, campaign_id: u64, contributor: Address) -> i128 {
        storage::get_contribution(&env, campaign_id, &contributor)
    }

    pub fn get_creator_campaigns(env: Env, creator: Address) -> Vec<u64> {
        storage::creator_campaigns(&env, &creator)
    }

    pub fn get_contributor_campaigns(env: Env, contributor: Address) -> Vec<u64> {
        storage::contributor_campaigns(&env, &contributor)
    }

    /// One entry per distinct contributor, in order of first contribution.
    pub fn get_campaign_contributions(
        env: Env,
        campaign_id: u64,
    ) -> Result<Vec<ContributionEntry>, Error> {
        if storage::load_campaign_config(&env, campaign_id).is_none() {
            return Err(Error::CampaignNotFound);
        }
        let mut entries = Vec::new(&env);
        for contributor in storage::contributors(&env, campaign_id).iter() {
            let amount = storage::get_contribution(&env, campaign_id, &contributor);
            entries.push_back(ContributionEntry {
                contributor,
                amount,
            });
        }
        Ok(entries)
    }

    pub fn total_campaigns(env: Env) -> u64 {
        storage::campaign_count(&env)
    }

    pub fn total_raised(env: Env) -> i128 {
        storage::total_raised(&env)
    }

    pub fn platform_fees_collected(env: Env) -> i128 {
        storage::fees_collected(&env)
    }

    pub fn paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        access::owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env).ok_or(Error::NotInitialized)
    }

    /// Tokens held by the contract that no campaign or fee accounts for.
    pub fn unallocated_balance(env: Env) -> Result<i128, Error> {
        custody::unallocated(&env)
    }

    pub fn platform_fee_bps(_env: Env) -> u32 {
        fees::PLATFORM_FEE_BPS
    }

    pub fn success_fee_bps(_env: Env) -> u32 {
        fees::SUCCESS_FEE_BPS
    }

    pub fn basis_points(_env: Env) -> u32 {
        fees::BASIS_POINTS
    }
}
