use chrono::NaiveDate;
use once_cell::sync::Lazy;
use primitives::{Campaign, Config, Money};
use serde::Serialize;

/// No adjusted price goes below this, whatever the multipliers say.
pub const PRICE_FLOOR: Money = Money::from_cents(10);

/// Campaigns started before this date keep the per-country multipliers they
/// were sold under.
pub static PRICING_CUTOVER: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2019, 3, 7).expect("valid date"));

/// Effective per-country price for a campaign.
///
/// Fixed-eCPM campaigns serve at their base price everywhere. Everything
/// else is scaled by the country's multiplier from the config table, with
/// the unknown-country multiplier as the default when no country resolved.
/// Unknown country codes never fail; they fall back to that same default.
pub fn adjusted_ecpm(campaign: &Campaign, country_code: Option<&str>, config: &Config) -> Money {
    if campaign.fixed_ecpm {
        return campaign.ecpm;
    }

    let mut adjusted = campaign.ecpm.scaled(config.unknown_country_multiplier);
    if let Some(country) = country_code.and_then(|code| config.country(code)) {
        let keeps_launch_pricing = campaign
            .start_date
            .map(|start| start < *PRICING_CUTOVER)
            .unwrap_or(false);

        let multiplier = if keeps_launch_pricing {
            country.country_multiplier
        } else {
            country.cpm_multiplier
        };
        adjusted = campaign.ecpm.scaled(multiplier);
    }

    adjusted.max(PRICE_FLOOR)
}

/// One row of the per-country pricing report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryEcpm {
    pub country_code: String,
    pub country_name: String,
    pub ecpm: Money,
}

/// Adjusted price for every country the campaign targets, in target order.
/// Countries missing from the config table are skipped.
pub fn ecpms(campaign: &Campaign, config: &Config) -> Vec<CountryEcpm> {
    campaign
        .country_codes
        .iter()
        .filter_map(|code| {
            config.country(code).map(|country| CountryEcpm {
                country_code: code.clone(),
                country_name: country.name.clone(),
                ecpm: adjusted_ecpm(campaign, Some(code), config),
            })
        })
        .collect()
}
