use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::{
    Campaign, CampaignId, Money, Organization, OrganizationId, Property, PropertyId, Status,
    UserId,
};

pub static SOLVENT_ORGANIZATION: Lazy<Organization> = Lazy::new(|| Organization {
    id: OrganizationId(10),
    balance: Money::from_dollars(10_000),
});

pub static BROKE_ORGANIZATION: Lazy<Organization> = Lazy::new(|| Organization {
    id: OrganizationId(20),
    balance: Money::ZERO,
});

/// A premium campaign on the 2019 Q1 schedule used by the pricing and
/// budgeting tests: $3.00 base eCPM, $5,000 total budget.
pub static PREMIUM_CAMPAIGN: Lazy<Campaign> = Lazy::new(|| Campaign {
    id: CampaignId(1),
    advertiser: UserId(100),
    organization: SOLVENT_ORGANIZATION.id,
    name: "Premium sponsor".to_string(),
    url: "https://sponsor.example.com".to_string(),
    status: Status::Active,
    fallback: false,
    fixed_ecpm: true,
    ecpm: Money::from_dollars(3),
    start_date: Some(NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date")),
    end_date: Some(NaiveDate::from_ymd_opt(2019, 4, 1).expect("valid date")),
    weekdays_only: false,
    core_hours_only: false,
    total_budget: Money::from_dollars(5_000),
    daily_budget: Money::ZERO,
    hourly_budget: Money::ZERO,
    country_codes: ["CA", "FR", "GB", "IN", "JP", "RO", "US"]
        .map(String::from)
        .to_vec(),
    province_codes: vec![],
    keywords: ["javascript", "rust"].map(String::from).to_vec(),
    negative_keywords: vec![],
    assigned_property_ids: vec![],
});

/// An untargeted filler campaign owned by an organization with no balance,
/// since fallback delivery is never budget-gated.
pub static FALLBACK_CAMPAIGN: Lazy<Campaign> = Lazy::new(|| Campaign {
    id: CampaignId(2),
    advertiser: UserId(200),
    organization: BROKE_ORGANIZATION.id,
    name: "House ad".to_string(),
    url: "https://jobs.example.com".to_string(),
    status: Status::Active,
    fallback: true,
    fixed_ecpm: true,
    ecpm: Money::ZERO,
    start_date: Some(NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date")),
    end_date: Some(NaiveDate::from_ymd_opt(2019, 12, 31).expect("valid date")),
    weekdays_only: false,
    core_hours_only: false,
    total_budget: Money::ZERO,
    daily_budget: Money::ZERO,
    hourly_budget: Money::ZERO,
    country_codes: vec![],
    province_codes: vec![],
    keywords: ["javascript", "rust"].map(String::from).to_vec(),
    negative_keywords: vec![],
    assigned_property_ids: vec![],
});

pub static PROPERTY: Lazy<Property> = Lazy::new(|| Property {
    id: PropertyId(1),
    publisher: UserId(300),
    name: "The Daily Borrow".to_string(),
    active: true,
    restrict_to_assigner_campaigns: false,
    prohibit_fallback_campaigns: false,
    assigner_campaign_ids: vec![],
    assigned_fallback_campaign_ids: vec![],
    prohibited_advertiser_ids: vec![],
    keywords: ["javascript", "rust"].map(String::from).to_vec(),
    ad_template: None,
    ad_theme: None,
    fallback_ad_template: None,
    fallback_ad_theme: None,
});
