use primitives::{campaign::is_weekend, Campaign, Config, Property};

use crate::context::RequestContext;

/// Date, weekday and hour gating shared by both tiers.
pub fn base_eligible(campaign: &Campaign, ctx: &RequestContext, config: &Config) -> bool {
    campaign.is_active()
        && campaign.available_on(ctx.today)
        && !(is_weekend(ctx.today) && campaign.weekdays_only)
        && !(ctx.prohibited_hour(config) && campaign.core_hours_only)
}

/// Country and province targeting. A resolved country must be targeted; an
/// unknown one only matches campaigns without country targets. Province
/// targets are optional, but once present they must match.
pub fn geo_targeted(campaign: &Campaign, ctx: &RequestContext) -> bool {
    let country_ok = match ctx.country_code.as_deref() {
        Some(country) => contains(&campaign.country_codes, country),
        None => campaign.country_codes.is_empty(),
    };
    let province_ok = match ctx.province_code.as_deref() {
        Some(province) => {
            campaign.province_codes.is_empty() || contains(&campaign.province_codes, province)
        }
        None => campaign.province_codes.is_empty(),
    };

    country_ok && province_ok
}

pub fn advertiser_permitted(campaign: &Campaign, property: &Property) -> bool {
    !property.prohibits_advertiser(campaign.advertiser)
}

/// Positive-keyword overlap and negative-keyword non-overlap against the
/// caller's search terms, or the property's own keywords when none given.
pub fn keyword_targeted(campaign: &Campaign, property: &Property, ctx: &RequestContext) -> bool {
    let terms: &[String] = if ctx.keywords.is_empty() {
        &property.keywords
    } else {
        &ctx.keywords
    };

    overlaps(&campaign.keywords, terms) && !overlaps(&campaign.negative_keywords, terms)
}

/// A campaign reaches a property either through explicit assignment or
/// through keyword targeting. Targeted matching is reserved for campaigns
/// with no assignment list, so an assignment cannot be bypassed.
pub fn targets_property(campaign: &Campaign, property: &Property, ctx: &RequestContext) -> bool {
    if campaign.assigned_property_ids.contains(&property.id) {
        return true;
    }

    campaign.assigned_property_ids.is_empty() && keyword_targeted(campaign, property, ctx)
}

/// Premium-tier matching, before balance and hourly-budget gating.
pub fn premium_match(campaign: &Campaign, property: &Property, ctx: &RequestContext) -> bool {
    if !campaign.premium() || !advertiser_permitted(campaign, property) {
        return false;
    }

    if property.restrict_to_assigner_campaigns {
        return property.assigner_campaign_ids.contains(&campaign.id);
    }

    targets_property(campaign, property, ctx)
}

/// Geo-targeted fallback-tier matching. Explicit assignment overrides the
/// property's prohibit-fallback flag; keyword-matched fill does not.
pub fn fallback_match(campaign: &Campaign, property: &Property, ctx: &RequestContext) -> bool {
    if !campaign.fallback
        || !advertiser_permitted(campaign, property)
        || !fallback_allowed(campaign, property)
    {
        return false;
    }

    if campaign.assigned_property_ids.contains(&property.id) {
        return true;
    }

    !property.prohibit_fallback_campaigns
        && campaign.assigned_property_ids.is_empty()
        && keyword_targeted(campaign, property, ctx)
}

/// The broadened last stage: untargeted fallback campaigns matched on the
/// property's own keywords once the geo-targeted stage comes up empty.
pub fn broadened_fallback_match(campaign: &Campaign, property: &Property) -> bool {
    if !campaign.fallback
        || !advertiser_permitted(campaign, property)
        || !fallback_allowed(campaign, property)
    {
        return false;
    }

    if campaign.assigned_property_ids.contains(&property.id) {
        return true;
    }

    !property.prohibit_fallback_campaigns
        && campaign.assigned_property_ids.is_empty()
        && campaign.country_codes.is_empty()
        && campaign.province_codes.is_empty()
        && overlaps(&campaign.keywords, &property.keywords)
        && !overlaps(&campaign.negative_keywords, &property.keywords)
}

/// The property's explicit fallback allow-list, when present.
fn fallback_allowed(campaign: &Campaign, property: &Property) -> bool {
    property.assigned_fallback_campaign_ids.is_empty()
        || property.assigned_fallback_campaign_ids.contains(&campaign.id)
}

fn contains(tags: &[String], value: &str) -> bool {
    tags.iter().any(|tag| tag == value)
}

fn overlaps(tags: &[String], others: &[String]) -> bool {
    tags.iter().any(|tag| others.contains(tag))
}
