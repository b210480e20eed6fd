extern crate std;

use soroban_sdk::{testutils::Address as _, token, vec, Address, Env, String};

use crate::invariants;
use crate::{ContributionEntry, CrowdfundingEscrow, CrowdfundingEscrowClient};

fn setup() -> (Env, CrowdfundingEscrowClient<'static>, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let token = create_token(&env, &owner);
    let contract_id = env.register(CrowdfundingEscrow, ());
    let client = CrowdfundingEscrowClient::new(&env, &contract_id);
    client.init(&owner, &token.address);
    (env, client, token)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn new_campaign(env: &Env, client: &CrowdfundingEscrowClient, creator: &Address, goal: i128) -> u64 {
    client.create_campaign(
        creator,
        &String::from_str(env, "Campaign"),
        &String::from_str(env, "Description"),
        &String::from_str(env, "ipfs://image"),
        &goal,
        &30,
    )
}

fn contributor_with(env: &Env, token: &token::Client, amount: i128) -> Address {
    let contributor = Address::generate(env);
    token::StellarAssetClient::new(env, &token.address).mint(&contributor, &amount);
    contributor
}

#[test]
fn test_contributor_count_starts_at_zero() {
    let (env, client, _token) = setup();
    let creator = Address::generate(&env);
    let id = new_campaign(&env, &client, &creator, 10_000);

    assert_eq!(client.get_campaign(&id).contributor_count, 0);
    assert_eq!(client.get_campaign_contributions(&id).len(), 0);
}

#[test]
fn test_contributor_count_increments_for_new_contributor() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let id = new_campaign(&env, &client, &creator, 10_000);
    let contributor = contributor_with(&env, &token, 1_000);

    client.contribute(&id, &contributor, &500);

    assert_eq!(client.get_campaign(&id).contributor_count, 1);
    assert_eq!(client.get_contribution(&id, &contributor), 500);
    assert_eq!(client.get_contributor_campaigns(&contributor), vec![&env, id]);
}

#[test]
fn test_repeat_contributions_accumulate_without_recounting() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let id = new_campaign(&env, &client, &creator, 10_000);
    let contributor = contributor_with(&env, &token, 2_000);

    client.contribute(&id, &contributor, &1_000);
    let count_before = client.get_campaign(&id).contributor_count;
    client.contribute(&id, &contributor, &500);
    let campaign = client.get_campaign(&id);

    invariants::assert_contributor_count_monotonic(count_before, campaign.contributor_count);
    assert_eq!(campaign.contributor_count, 1);
    assert_eq!(campaign.raised_amount, 1_500);
    assert_eq!(client.get_contribution(&id, &contributor), 1_500);

    // Index entries are appended once per campaign, not per contribution.
    assert_eq!(client.get_contributor_campaigns(&contributor), vec![&env, id]);
    assert_eq!(
        client.get_campaign_contributions(&id),
        vec![
            &env,
            ContributionEntry {
                contributor: contributor.clone(),
                amount: 1_500,
            }
        ]
    );
}

#[test]
fn test_contributions_listed_in_first_contribution_order() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let id = new_campaign(&env, &client, &creator, 10_000);
    let first = contributor_with(&env, &token, 5_000);
    let second = contributor_with(&env, &token, 5_000);

    client.contribute(&id, &first, &1_000);
    client.contribute(&id, &second, &2_000);
    client.contribute(&id, &first, &250);

    let entries = client.get_campaign_contributions(&id);
    assert_eq!(entries.len(), 2);

    let a = entries.get(0).expect("first entry missing");
    let b = entries.get(1).expect("second entry missing");
    assert_eq!(a.contributor, first);
    assert_eq!(a.amount, 1_250);
    assert_eq!(b.contributor, second);
    assert_eq!(b.amount, 2_000);
    assert_eq!(client.get_campaign(&id).contributor_count, 2);
}

#[test]
fn test_reverse_indices_across_campaigns() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let other_creator = Address::generate(&env);
    let contributor = contributor_with(&env, &token, 5_000);

    let c0 = new_campaign(&env, &client, &creator, 1_000_000);
    let c1 = new_campaign(&env, &client, &creator, 1_000_000);
    let c2 = new_campaign(&env, &client, &other_creator, 1_000_000);

    client.contribute(&c0, &contributor, &500);
    client.contribute(&c2, &contributor, &500);
    client.contribute(&c1, &contributor, &500);
    client.contribute(&c0, &contributor, &500);

    assert_eq!(client.get_creator_campaigns(&creator), vec![&env, c0, c1]);
    assert_eq!(client.get_creator_campaigns(&other_creator), vec![&env, c2]);
    assert_eq!(
        client.get_contributor_campaigns(&contributor),
        vec![&env, c0, c2, c1]
    );
    assert_eq!(
        client.get_contributor_campaigns(&creator).len(),
        0
    );
}

#[test]
fn test_contributor_count_complex_scenario() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let id = new_campaign(&env, &client, &creator, 1_000_000);
    let c1 = contributor_with(&env, &token, 5_000);
    let c2 = contributor_with(&env, &token, 5_000);
    let c3 = contributor_with(&env, &token, 5_000);

    let steps = [
        (&c1, 100i128, 1u32),
        (&c1, 100, 1),
        (&c2, 200, 2),
        (&c3, 300, 3),
        (&c2, 250, 3),
        (&c3, 1, 3),
    ];

    let mut raised = 0i128;
    for (who, amount, expected_count) in steps {
        let before = client.get_campaign(&id);
        client.contribute(&id, who, &amount);
        let after = client.get_campaign(&id);
        raised += amount;

        assert_eq!(after.contributor_count, expected_count);
        assert_eq!(after.raised_amount, raised);
        invariants::assert_contributor_count_monotonic(
            before.contributor_count,
            after.contributor_count,
        );
        invariants::assert_campaign_immutable_fields(&before, &after);
    }

    let total: i128 = client
        .get_campaign_contributions(&id)
        .iter()
        .map(|e| e.amount)
        .sum();
    assert_eq!(total, raised);
}

#[test]
fn test_contributions_for_unknown_campaign() {
    let (_env, client, _token) = setup();
    assert_eq!(
        client.try_get_campaign_contributions(&3),
        Err(Ok(crate::Error::CampaignNotFound))
    );
    assert_eq!(
        client.try_get_campaign(&3),
        Err(Ok(crate::Error::CampaignNotFound))
    );
}
