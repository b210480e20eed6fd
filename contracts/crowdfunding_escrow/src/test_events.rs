extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, Symbol, TryFromVal, TryIntoVal, Val, Vec,
};

use crate::events::{
    CampaignCreated, CampaignStateChanged, Contributed, EmergencyWithdrawal, FundsReleased,
    OwnershipTransferred, PlatformFeesWithdrawn, Refunded,
};
use crate::{CampaignStatus, CrowdfundingEscrow, CrowdfundingEscrowClient};

fn setup() -> (Env, CrowdfundingEscrowClient<'static>, token::Client<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let addr = env.register_stellar_asset_contract_v2(owner.clone());
    let token = token::Client::new(&env, &addr.address());
    let contract_id = env.register(CrowdfundingEscrow, ());
    let client = CrowdfundingEscrowClient::new(&env, &contract_id);
    client.init(&owner, &token.address);
    (env, client, token, owner)
}

fn create(env: &Env, client: &CrowdfundingEscrowClient, creator: &Address) -> u64 {
    client.create_campaign(
        creator,
        &String::from_str(env, "Test Campaign"),
        &String::from_str(env, "This is a test crowdfunding campaign"),
        &String::from_str(env, "https://example.com/image.jpg"),
        &5_000i128,
        &30u32,
    )
}

fn funded(env: &Env, token: &token::Client, amount: i128) -> Address {
    let who = Address::generate(env);
    token::StellarAssetClient::new(env, &token.address).mint(&who, &amount);
    who
}

/// Events published by `contract`, oldest first. Token contract events are
/// skipped.
fn contract_events(env: &Env, contract: &Address) -> std::vec::Vec<(Vec<Val>, Val)> {
    env.events()
        .all()
        .iter()
        .filter(|(addr, _, _)| addr == contract)
        .map(|(_, topics, data)| (topics, data))
        .collect()
}

fn topic_symbol(env: &Env, topics: &Vec<Val>) -> Option<Symbol> {
    topics
        .get(0)
        .and_then(|v| Symbol::try_from_val(env, &v).ok())
}

#[test]
fn test_campaign_created_event() {
    let (env, client, _token, _owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);

    let events = contract_events(&env, &client.address);
    let (topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: CampaignCreated = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            campaign_id: id,
            creator: creator.clone(),
            title: String::from_str(&env, "Test Campaign"),
            goal_amount: 5_000,
            deadline: client.get_campaign(&id).deadline,
        }
    );
}

#[test]
fn test_contributed_event_below_goal() {
    let (env, client, token, _owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);
    let contributor = funded(&env, &token, 2_000);

    client.contribute(&id, &contributor, &1_000);
    client.contribute(&id, &contributor, &500);

    let events = contract_events(&env, &client.address);
    let (topics, data) = events.last().expect("No events found").clone();
    assert_eq!(
        topics,
        vec![&env, symbol_short!("contrib").into_val(&env), id.into_val(&env)]
    );

    let event_data: Contributed = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Contributed {
            campaign_id: id,
            contributor: contributor.clone(),
            amount: 500,
            raised_amount: 1_500,
        }
    );
}

#[test]
fn test_goal_reached_emits_state_change_after_contribution() {
    let (env, client, token, _owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);
    let contributor = funded(&env, &token, 5_000);

    client.contribute(&id, &contributor, &5_000);

    let events = contract_events(&env, &client.address);
    let n = events.len();
    assert!(n >= 2);

    let (topics, data) = events[n - 1].clone();
    assert_eq!(
        topics,
        vec![&env, symbol_short!("state").into_val(&env), id.into_val(&env)]
    );
    let changed: CampaignStateChanged = data.try_into_val(&env).unwrap();
    assert_eq!(
        changed,
        CampaignStateChanged {
            campaign_id: id,
            status: CampaignStatus::Successful,
        }
    );

    let (topics, data) = events[n - 2].clone();
    assert_eq!(topic_symbol(&env, &topics), Some(symbol_short!("contrib")));
    let contributed: Contributed = data.try_into_val(&env).unwrap();
    assert_eq!(contributed.raised_amount, 5_000);
}

#[test]
fn test_funds_released_event() {
    let (env, client, token, _owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);
    let contributor = funded(&env, &token, 7_000);
    client.contribute(&id, &contributor, &7_000);

    client.withdraw_funds(&id, &creator);

    let events = contract_events(&env, &client.address);
    let n = events.len();

    let (topics, data) = events[n - 2].clone();
    assert_eq!(
        topics,
        vec![&env, symbol_short!("released").into_val(&env), id.into_val(&env)]
    );
    let released: FundsReleased = data.try_into_val(&env).unwrap();
    assert_eq!(
        released,
        FundsReleased {
            campaign_id: id,
            creator: creator.clone(),
            creator_amount: 6_825,
            fee: 175,
        }
    );

    let (topics, data) = events[n - 1].clone();
    assert_eq!(topic_symbol(&env, &topics), Some(symbol_short!("state")));
    let changed: CampaignStateChanged = data.try_into_val(&env).unwrap();
    assert_eq!(changed.status, CampaignStatus::Withdrawn);
}

#[test]
fn test_refund_events_emit_failed_only_once() {
    let (env, client, token, _owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);
    let alice = funded(&env, &token, 1_000);
    let bob = funded(&env, &token, 1_000);
    client.contribute(&id, &alice, &1_000);
    client.contribute(&id, &bob, &1_000);
    env.ledger().with_mut(|li| li.timestamp += 30 * 86_400 + 1);

    client.request_refund(&id, &alice);
    let events = contract_events(&env, &client.address);
    let n = events.len();

    let (topics, data) = events[n - 2].clone();
    assert_eq!(topic_symbol(&env, &topics), Some(symbol_short!("state")));
    let changed: CampaignStateChanged = data.try_into_val(&env).unwrap();
    assert_eq!(changed.status, CampaignStatus::Failed);

    let (topics, data) = events[n - 1].clone();
    assert_eq!(
        topics,
        vec![&env, symbol_short!("refunded").into_val(&env), id.into_val(&env)]
    );
    let refunded: Refunded = data.try_into_val(&env).unwrap();
    assert_eq!(
        refunded,
        Refunded {
            campaign_id: id,
            contributor: alice.clone(),
            amount: 1_000,
        }
    );

    client.request_refund(&id, &bob);
    let events = contract_events(&env, &client.address);
    let n = events.len();

    let (_, data) = events[n - 1].clone();
    let refunded: Refunded = data.try_into_val(&env).unwrap();
    assert_eq!(refunded.contributor, bob);
    // The event before Bob's refund is never a fresh state change.
    if n >= 2 {
        let (topics, _) = events[n - 2].clone();
        assert_ne!(topic_symbol(&env, &topics), Some(symbol_short!("state")));
    }
}

#[test]
fn test_admin_events() {
    let (env, client, token, owner) = setup();
    let creator = Address::generate(&env);
    let id = create(&env, &client, &creator);
    let contributor = funded(&env, &token, 5_000);
    client.contribute(&id, &contributor, &5_000);
    client.withdraw_funds(&id, &creator);

    client.withdraw_platform_fees(&owner);
    let events = contract_events(&env, &client.address);
    let (topics, data) = events.last().expect("No events found").clone();
    assert_eq!(topics, vec![&env, symbol_short!("fees_out").into_val(&env)]);
    let swept: PlatformFeesWithdrawn = data.try_into_val(&env).unwrap();
    assert_eq!(
        swept,
        PlatformFeesWithdrawn {
            owner: owner.clone(),
            amount: 100,
        }
    );

    client.pause(&owner);
    let events = contract_events(&env, &client.address);
    let (topics, data) = events.last().expect("No events found").clone();
    assert_eq!(topic_symbol(&env, &topics), Some(symbol_short!("paused")));
    let caller: Address = data.try_into_val(&env).unwrap();
    assert_eq!(caller, owner);

    client.unpause(&owner);
    let events = contract_events(&env, &client.address);
    let (topics, _) = events.last().expect("No events found").clone();
    assert_eq!(topic_symbol(&env, &topics), Some(symbol_short!("unpaused")));

    let stray = funded(&env, &token, 40);
    token.transfer(&stray, &client.address, &40);
    client.emergency_withdraw(&owner);
    let events = contract_events(&env, &client.address);
    let (_, data) = events.last().expect("No events found").clone();
    let recovered: EmergencyWithdrawal = data.try_into_val(&env).unwrap();
    assert_eq!(recovered.amount, 40);

    let next = Address::generate(&env);
    client.transfer_ownership(&owner, &next);
    let events = contract_events(&env, &client.address);
    let (_, data) = events.last().expect("No events found").clone();
    let transferred: OwnershipTransferred = data.try_into_val(&env).unwrap();
    assert_eq!(
        transferred,
        OwnershipTransferred {
            previous_owner: owner,
            new_owner: next,
        }
    );
}
