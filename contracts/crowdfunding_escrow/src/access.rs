//! # Access control and pause guard
//!
//! The ledger has a single privileged identity, the owner, fixed at `init`
//! and transferable by the owner. Identity comparison always runs before
//! `require_auth` so a wrong caller is reported as `NotOwner` regardless of
//! what it signed.
//!
//! The pause flag gates campaign creation only. Contributions, refunds and
//! withdrawals of already-escrowed funds stay available while paused.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::Error;

/// Store the first owner. Fails if the ledger was already initialised.
pub fn init_owner(env: &Env, owner: &Address) -> Result<(), Error> {
    if storage::is_initialized(env) {
        return Err(Error::AlreadyInitialized);
    }
    storage::set_owner(env, owner);
    storage::set_paused(env, false);
    Ok(())
}

pub fn owner(env: &Env) -> Result<Address, Error> {
    storage::get_owner(env).ok_or(Error::NotInitialized)
}

/// Reject unless `caller` is the owner and has signed the invocation.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if *caller != owner(env)? {
        return Err(Error::NotOwner);
    }
    caller.require_auth();
    Ok(())
}

pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    if storage::is_paused(env) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}

pub fn set_paused(env: &Env, caller: &Address, paused: bool) -> Result<(), Error> {
    require_owner(env, caller)?;
    storage::set_paused(env, paused);
    Ok(())
}

/// Hand the owner capability to `new_owner`. Returns the previous owner.
pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) -> Result<Address, Error> {
    require_owner(env, caller)?;
    storage::set_owner(env, new_owner);
    Ok(caller.clone())
}
