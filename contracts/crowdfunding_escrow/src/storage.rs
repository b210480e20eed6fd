//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type      | Description                               |
//! |------------------|-----------|-------------------------------------------|
//! | `Owner`          | `Address` | Admin identity                            |
//! | `Token`          | `Address` | Token contract used for all value         |
//! | `Paused`         | `bool`    | Campaign creation halted                  |
//! | `CampaignCount`  | `u64`     | Next campaign id / total campaigns        |
//! | `TotalRaised`    | `i128`    | Sum of all contributions ever accepted    |
//! | `FeesCollected`  | `i128`    | Platform fee accumulator                  |
//! | `Escrowed`       | `i128`    | Funds still owed to creators/contributors |
//! | `Locked`         | `bool`    | Reentrancy lock around outbound transfers |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                         | Type             | Description                          |
//! |-----------------------------|------------------|--------------------------------------|
//! | `CampConfig(id)`            | `CampaignConfig` | Immutable campaign configuration     |
//! | `CampState(id)`             | `CampaignState`  | Mutable campaign state               |
//! | `Contribution(id, addr)`    | `i128`           | Cumulative amount held for `addr`    |
//! | `Contributors(id)`          | `Vec<Address>`   | Distinct contributors, first-seen order |
//! | `CreatorCampaigns(addr)`    | `Vec<u64>`       | Campaigns created by `addr`          |
//! | `ContributorCampaigns(addr)`| `Vec<u64>`       | Campaigns funded by `addr`           |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Why split Config and State?
//!
//! Contributions are high-frequency writes. The config carries three strings
//! and never changes after creation, so a contribution only rewrites the small
//! `CampaignState` entry.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{CampaignConfig, CampaignState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    Token,
    Paused,
    CampaignCount,
    TotalRaised,
    FeesCollected,
    Escrowed,
    Locked,
    CampConfig(u64),
    CampState(u64),
    Contribution(u64, Address),
    Contributors(u64),
    CreatorCampaigns(Address),
    ContributorCampaigns(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn get_instance_i128(env: &Env, key: &DataKey) -> i128 {
    env.storage().instance().get(key).unwrap_or(0)
}

fn set_instance_i128(env: &Env, key: &DataKey, value: i128) {
    env.storage().instance().set(key, &value);
    bump_instance(env);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

/// Reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = campaign_count(env);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

pub fn campaign_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

pub fn total_raised(env: &Env) -> i128 {
    get_instance_i128(env, &DataKey::TotalRaised)
}

pub fn add_total_raised(env: &Env, amount: i128) {
    set_instance_i128(env, &DataKey::TotalRaised, total_raised(env) + amount);
}

pub fn fees_collected(env: &Env) -> i128 {
    get_instance_i128(env, &DataKey::FeesCollected)
}

pub fn set_fees_collected(env: &Env, amount: i128) {
    set_instance_i128(env, &DataKey::FeesCollected, amount);
}

pub fn escrowed(env: &Env) -> i128 {
    get_instance_i128(env, &DataKey::Escrowed)
}

pub fn set_escrowed(env: &Env, amount: i128) {
    set_instance_i128(env, &DataKey::Escrowed, amount);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Locked)
        .unwrap_or(false)
}

pub fn set_locked(env: &Env, locked: bool) {
    if locked {
        env.storage().instance().set(&DataKey::Locked, &true);
    } else {
        env.storage().instance().remove(&DataKey::Locked);
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new campaign.
pub fn save_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    let config_key = DataKey::CampConfig(config.id);
    let state_key = DataKey::CampState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load only the immutable campaign configuration.
pub fn load_campaign_config(env: &Env, id: u64) -> Option<CampaignConfig> {
    let key = DataKey::CampConfig(id);
    let config: CampaignConfig = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(config)
}

/// Load only the mutable campaign state.
pub fn load_campaign_state(env: &Env, id: u64) -> Option<CampaignState> {
    let key = DataKey::CampState(id);
    let state: CampaignState = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(state)
}

/// Load config and state together; `None` if the campaign does not exist.
pub fn load_campaign_pair(env: &Env, id: u64) -> Option<(CampaignConfig, CampaignState)> {
    let config = load_campaign_config(env, id)?;
    let state = load_campaign_state(env, id)?;
    Some((config, state))
}

/// Save only the mutable campaign state.
pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    let key = DataKey::CampState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

pub fn get_contribution(env: &Env, id: u64, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(id, contributor.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_contribution(env: &Env, id: u64, contributor: &Address, amount: i128) {
    let key = DataKey::Contribution(id, contributor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

/// Whether `contributor` has ever funded campaign `id`.
pub fn has_contributed(env: &Env, id: u64, contributor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Contribution(id, contributor.clone()))
}

pub fn contributors(env: &Env, id: u64) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Contributors(id))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn push_contributor(env: &Env, id: u64, contributor: &Address) {
    let key = DataKey::Contributors(id);
    let mut list = contributors(env, id);
    list.push_back(contributor.clone());
    env.storage().persistent().set(&key, &list);
    bump_persistent(env, &key);
}

pub fn creator_campaigns(env: &Env, creator: &Address) -> Vec<u64> {
    load_id_list(env, &DataKey::CreatorCampaigns(creator.clone()))
}

pub fn push_creator_campaign(env: &Env, creator: &Address, id: u64) {
    append_id(env, DataKey::CreatorCampaigns(creator.clone()), id);
}

pub fn contributor_campaigns(env: &Env, contributor: &Address) -> Vec<u64> {
    load_id_list(env, &DataKey::ContributorCampaigns(contributor.clone()))
}

pub fn push_contributor_campaign(env: &Env, contributor: &Address, id: u64) {
    append_id(env, DataKey::ContributorCampaigns(contributor.clone()), id);
}

fn load_id_list(env: &Env, key: &DataKey) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

fn append_id(env: &Env, key: DataKey, id: u64) {
    let mut ids = load_id_list(env, &key);
    ids.push_back(id);
    env.storage().persistent().set(&key, &ids);
    bump_persistent(env, &key);
}
