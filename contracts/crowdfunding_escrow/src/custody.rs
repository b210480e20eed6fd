//! # Fund custody
//!
//! Every token movement of the ledger goes through this module.
//!
//! Ordering rule for all fund-moving entry points:
//!
//! 1. [`enter`] takes the reentrancy lock.
//! 2. All checks run, then all storage effects are written.
//! 3. The token transfer ([`collect`] / [`pay_out`]) runs last.
//! 4. [`exit`] releases the lock.
//!
//! If any step returns an error the host rolls back the whole invocation,
//! lock included.
//!
//! The Soroban host already refuses to re-enter a contract that is on the
//! call stack, so `Reentrant` cannot fire through a token callback today.
//! The lock is defence in depth: it keeps every fund-moving entry point
//! exclusive even if that host rule is relaxed or a call path reaches the
//! contract through another route.
//!
//! Escrow bookkeeping: `escrowed` is what the ledger still owes creators and
//! contributors. Together with the fee accumulator it forms the obligations
//! that the token balance of the contract must always cover. Anything above
//! that (tokens pushed with a raw transfer) is unallocated and never credited
//! to a campaign.

use soroban_sdk::{token, Address, Env};

use crate::storage;
use crate::Error;

pub fn enter(env: &Env) -> Result<(), Error> {
    if storage::is_locked(env) {
        return Err(Error::Reentrant);
    }
    storage::set_locked(env, true);
    Ok(())
}

pub fn exit(env: &Env) {
    storage::set_locked(env, false);
}

fn token_client(env: &Env) -> Result<token::Client<'_>, Error> {
    let token = storage::get_token(env).ok_or(Error::NotInitialized)?;
    Ok(token::Client::new(env, &token))
}

/// Record `amount` as escrowed and pull it from `from`.
pub fn collect(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    let client = token_client(env)?;
    storage::set_escrowed(env, storage::escrowed(env) + amount);
    client.transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Release `amount` of escrowed funds from the ledger's obligations.
pub fn debit_escrow(env: &Env, amount: i128) {
    storage::set_escrowed(env, storage::escrowed(env) - amount);
}

/// Send `amount` from the contract to `to`. Zero amounts are skipped.
pub fn pay_out(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    token_client(env)?.transfer(&env.current_contract_address(), to, &amount);
    Ok(())
}

/// Token balance currently held by the contract.
pub fn held_balance(env: &Env) -> Result<i128, Error> {
    Ok(token_client(env)?.balance(&env.current_contract_address()))
}

/// Escrowed funds plus uncollected platform fees.
pub fn obligations(env: &Env) -> i128 {
    storage::escrowed(env) + storage::fees_collected(env)
}

/// Balance held above the ledger's obligations.
pub fn unallocated(env: &Env) -> Result<i128, Error> {
    let surplus = held_balance(env)? - obligations(env);
    Ok(surplus.max(0))
}
