#![allow(dead_code)]

extern crate std;

use crate::types::{Campaign, CampaignStatus};
use crate::CrowdfundingEscrowClient;

/// INV-1: Campaign goal must always be positive.
pub fn assert_goal_positive(campaign: &Campaign) {
    assert!(
        campaign.goal_amount > 0,
        "INV-1 violated: campaign {} has non-positive goal ({})",
        campaign.id,
        campaign.goal_amount
    );
}

/// INV-2: Raised amount is never negative.
pub fn assert_raised_non_negative(campaign: &Campaign) {
    assert!(
        campaign.raised_amount >= 0,
        "INV-2 violated: campaign {} has negative raised amount ({})",
        campaign.id,
        campaign.raised_amount
    );
}

/// INV-3: `funds_withdrawn` is set exactly when the campaign is `Withdrawn`.
pub fn assert_withdrawn_flag_consistent(campaign: &Campaign) {
    assert_eq!(
        campaign.funds_withdrawn,
        campaign.status == CampaignStatus::Withdrawn,
        "INV-3 violated: campaign {} has funds_withdrawn={} in status {:?}",
        campaign.id,
        campaign.funds_withdrawn,
        campaign.status
    );
}

/// INV-4: `Successful` and `Withdrawn` campaigns reached their goal;
/// `Failed` ones did not.
pub fn assert_status_matches_goal(campaign: &Campaign) {
    match campaign.status {
        CampaignStatus::Successful | CampaignStatus::Withdrawn => assert!(
            campaign.raised_amount >= campaign.goal_amount,
            "INV-4 violated: campaign {} is {:?} below goal",
            campaign.id,
            campaign.status
        ),
        CampaignStatus::Failed => assert!(
            campaign.raised_amount < campaign.goal_amount,
            "INV-4 violated: campaign {} failed at or above goal",
            campaign.id
        ),
        CampaignStatus::Active => {}
    }
}

/// INV-5: Contribution invariant: after contributing `amount`, both the
/// campaign's raised amount and the global total rise by exactly `amount`.
pub fn assert_contribution_invariant(before: i128, after: i128, amount: i128) {
    assert_eq!(
        after,
        before + amount,
        "INV-5 violated: contribution invariant broken: {} + {} != {}",
        before,
        amount,
        after
    );
}

/// INV-6: Campaign IDs are sequential starting from 0.
pub fn assert_sequential_ids(campaigns: &[Campaign]) {
    for (i, campaign) in campaigns.iter().enumerate() {
        assert_eq!(
            campaign.id, i as u64,
            "INV-6 violated: expected id {}, got {}",
            i, campaign.id
        );
    }
}

/// INV-7: Status changes follow the state machine; staying put is allowed.
pub fn assert_valid_status_change(from: CampaignStatus, to: CampaignStatus) {
    assert!(
        from == to || crate::lifecycle::is_valid_transition(from, to),
        "INV-7 violated: invalid status transition from {:?} to {:?}",
        from,
        to
    );
}

/// INV-8: Creation fields never change.
pub fn assert_campaign_immutable_fields(original: &Campaign, current: &Campaign) {
    assert_eq!(original.id, current.id, "INV-8 violated: campaign id changed");
    assert_eq!(
        original.creator, current.creator,
        "INV-8 violated: campaign creator changed"
    );
    assert_eq!(
        original.title, current.title,
        "INV-8 violated: campaign title changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-8 violated: campaign description changed"
    );
    assert_eq!(
        original.image_url, current.image_url,
        "INV-8 violated: campaign image_url changed"
    );
    assert_eq!(
        original.goal_amount, current.goal_amount,
        "INV-8 violated: campaign goal changed"
    );
    assert_eq!(
        original.deadline, current.deadline,
        "INV-8 violated: campaign deadline changed"
    );
}

/// INV-9: contributor_count must never decrease.
pub fn assert_contributor_count_monotonic(count_before: u32, count_after: u32) {
    assert!(
        count_after >= count_before,
        "INV-9 violated: contributor_count decreased from {} to {}",
        count_before,
        count_after
    );
}

/// INV-10: The contract's token balance covers everything it owes: funds of
/// campaigns not yet withdrawn that have not been refunded, plus uncollected
/// platform fees.
pub fn assert_escrow_covered(client: &CrowdfundingEscrowClient, held: i128) {
    let mut owed = client.platform_fees_collected();
    for id in 0..client.total_campaigns() {
        let campaign = client.get_campaign(&id);
        if campaign.status == CampaignStatus::Withdrawn {
            continue;
        }
        for entry in client.get_campaign_contributions(&id).iter() {
            owed += entry.amount;
        }
    }
    assert!(
        held >= owed,
        "INV-10 violated: contract holds {} but owes {}",
        held,
        owed
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(campaign: &Campaign) {
    assert_goal_positive(campaign);
    assert_raised_non_negative(campaign);
    assert_withdrawn_flag_consistent(campaign);
    assert_status_matches_goal(campaign);
}
