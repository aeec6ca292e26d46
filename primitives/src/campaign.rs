use crate::{Money, OrganizationId, Property, PropertyId, UserId};

use chrono::{Datelike, NaiveDate, Weekday};
use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// A campaign with any daily spend at all never paces below this per hour.
pub const MINIMUM_HOURLY_BUDGET: Money = Money::from_cents(10);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    FromStr,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
#[display("{0}")]
pub struct CampaignId(pub u64);

/// Campaign lifecycle. Archived campaigns never serve again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromStr, Serialize, Deserialize)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Active,
    Archived,
}

impl Status {
    /// The lifecycle is one-directional: pending -> active -> archived.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Pending, Status::Active) | (Status::Active, Status::Archived)
        )
    }
}

/// An advertisement offer competing for display requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub advertiser: UserId,
    /// Billing entity whose balance gates premium delivery.
    pub organization: OrganizationId,
    pub name: String,
    pub url: String,
    pub status: Status,
    /// Fallback campaigns fill inventory when no premium campaign qualifies.
    #[serde(default)]
    pub fallback: bool,
    /// A fixed eCPM is served at its base price in every country.
    #[serde(default)]
    pub fixed_ecpm: bool,
    /// Base price per 1000 impressions.
    pub ecpm: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub weekdays_only: bool,
    #[serde(default)]
    pub core_hours_only: bool,
    #[serde(default)]
    pub total_budget: Money,
    #[serde(default)]
    pub daily_budget: Money,
    #[serde(default)]
    pub hourly_budget: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub province_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub negative_keywords: Vec<String>,
    /// Explicit allow-list of properties this campaign is assigned to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_property_ids: Vec<PropertyId>,
}

impl Campaign {
    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status == Status::Archived
    }

    pub fn premium(&self) -> bool {
        !self.fallback
    }

    pub fn campaign_type(&self) -> &'static str {
        if self.fallback {
            "fallback"
        } else {
            "premium"
        }
    }

    /// Whether the schedule covers `date`, inclusive on both ends.
    /// A campaign without a complete schedule is never available.
    pub fn available_on(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// Calendar days the campaign is scheduled to run, excluding weekends
    /// for weekday-restricted campaigns.
    pub fn total_operative_days(&self) -> u64 {
        let (start, end) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => (start, end),
            _ => return 0,
        };

        if self.weekdays_only {
            start
                .iter_days()
                .take_while(|day| *day <= end)
                .filter(|day| !is_weekend(*day))
                .count() as u64
        } else {
            end.signed_duration_since(start).num_days() as u64 + 1
        }
    }

    /// Today's pacing allotment: the explicit daily budget, or the total
    /// budget spread over the operative days.
    pub fn operative_daily_budget(&self) -> Money {
        if !self.daily_budget.is_zero() {
            return self.daily_budget;
        }

        match self.total_operative_days() {
            0 => Money::ZERO,
            days => self.total_budget / days,
        }
    }

    /// The hourly allotment `init_hourly_budget` would settle on: an
    /// explicit budget at or above the minimum wins; otherwise a twelfth of
    /// the daily allotment, floored to the minimum. A campaign without a
    /// daily allotment derives nothing.
    pub fn effective_hourly_budget(&self) -> Money {
        if self.hourly_budget >= MINIMUM_HOURLY_BUDGET {
            return self.hourly_budget;
        }

        let daily = self.operative_daily_budget();
        if daily.is_zero() {
            return self.hourly_budget;
        }

        (daily / 12).max(MINIMUM_HOURLY_BUDGET)
    }

    /// Settles the hourly budget before the campaign is persisted.
    pub fn init_hourly_budget(&mut self) {
        self.hourly_budget = self.effective_hourly_budget();
    }

    /// Restores the target-set invariant: blank entries removed, sorted,
    /// de-duplicated. Call before persisting.
    pub fn normalize(&mut self) {
        sort_tags(&mut self.country_codes);
        sort_tags(&mut self.province_codes);
        sort_tags(&mut self.keywords);
        sort_tags(&mut self.negative_keywords);
        self.assigned_property_ids.sort();
        self.assigned_property_ids.dedup();
    }

    /// Keywords shared with the property, sorted.
    pub fn matching_keywords(&self, property: &Property) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|keyword| property.keywords.contains(keyword))
            .cloned()
            .collect()
    }
}

pub(crate) fn sort_tags(tags: &mut Vec<String>) {
    tags.retain(|tag| !tag.trim().is_empty());
    tags.sort();
    tags.dedup();
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_util::PREMIUM_CAMPAIGN;

    use super::*;

    #[test]
    fn status_lifecycle_is_one_directional() {
        assert!(Status::Pending.can_transition_to(Status::Active));
        assert!(Status::Active.can_transition_to(Status::Archived));

        assert!(!Status::Pending.can_transition_to(Status::Archived));
        assert!(!Status::Active.can_transition_to(Status::Pending));
        assert!(!Status::Archived.can_transition_to(Status::Active));
        assert!(!Status::Archived.can_transition_to(Status::Pending));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!("active", Status::Active.to_string());
        assert_eq!(Ok(Status::Archived), "archived".parse());
        assert_eq!(
            serde_json::json!("pending"),
            serde_json::to_value(Status::Pending).expect("Should serialize")
        );
    }

    #[test]
    fn operative_days_over_a_quarter() {
        let campaign = PREMIUM_CAMPAIGN.clone();
        assert_eq!(
            Some(NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date")),
            campaign.start_date
        );
        assert_eq!(91, campaign.total_operative_days());
    }

    #[test]
    fn restricting_to_weekdays_impacts_the_numbers() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.weekdays_only = true;

        assert_eq!(65, campaign.total_operative_days());
    }

    #[test]
    fn operative_days_without_a_schedule() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.end_date = None;

        assert_eq!(0, campaign.total_operative_days());
        assert_eq!(Money::ZERO, campaign.operative_daily_budget());
    }

    #[test]
    fn daily_budget_spreads_total_over_operative_days() {
        let campaign = PREMIUM_CAMPAIGN.clone();

        // $5,000.00 over 91 days
        assert_eq!(Money::from_cents(5_494), campaign.operative_daily_budget());
    }

    #[test]
    fn explicit_daily_budget_wins() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(20);

        assert_eq!(Money::from_dollars(20), campaign.operative_daily_budget());
    }

    #[test]
    fn hourly_budget_derives_from_the_daily_budget() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(24);
        campaign.init_hourly_budget();

        assert_eq!(Money::from_dollars(2), campaign.hourly_budget);
    }

    #[test]
    fn hourly_budget_is_floored_to_the_minimum() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_cents(60);
        campaign.init_hourly_budget();

        assert_eq!(MINIMUM_HOURLY_BUDGET, campaign.hourly_budget);
    }

    #[test]
    fn hourly_budget_left_alone_without_any_budget() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::ZERO;
        campaign.total_budget = Money::ZERO;
        campaign.init_hourly_budget();

        assert_eq!(Money::ZERO, campaign.hourly_budget);
    }

    #[test]
    fn hourly_budget_derives_from_the_spread_total() {
        // $5,000.00 over 91 days is $54.94/day, a twelfth of that per hour
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.init_hourly_budget();

        assert_eq!(Money::from_cents(457), campaign.hourly_budget);
    }

    #[test]
    fn explicit_hourly_budget_above_the_minimum_is_kept() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(24);
        campaign.hourly_budget = Money::from_dollars(5);
        campaign.init_hourly_budget();

        assert_eq!(Money::from_dollars(5), campaign.hourly_budget);
    }

    #[test]
    fn normalize_restores_the_target_set_invariant() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.country_codes = vec![
            "US".to_string(),
            "".to_string(),
            "GB".to_string(),
            "US".to_string(),
            "  ".to_string(),
        ];
        campaign.assigned_property_ids = vec![PropertyId(7), PropertyId(2), PropertyId(7)];

        campaign.normalize();

        assert_eq!(vec!["GB".to_string(), "US".to_string()], campaign.country_codes);
        assert_eq!(vec![PropertyId(2), PropertyId(7)], campaign.assigned_property_ids);
    }

    #[test]
    fn matching_keywords_intersects_with_the_property() {
        let campaign = PREMIUM_CAMPAIGN.clone();
        let mut property = crate::test_util::PROPERTY.clone();
        property.keywords = vec!["python".to_string(), "rust".to_string()];

        assert_eq!(vec!["rust".to_string()], campaign.matching_keywords(&property));
        assert_eq!("premium", campaign.campaign_type());
    }

    #[test]
    fn available_on_is_inclusive() {
        let campaign = PREMIUM_CAMPAIGN.clone();
        let start = campaign.start_date.expect("fixture has a schedule");
        let end = campaign.end_date.expect("fixture has a schedule");

        assert!(campaign.available_on(start));
        assert!(campaign.available_on(end));
        assert!(!campaign.available_on(start.pred_opt().expect("valid date")));
        assert!(!campaign.available_on(end.succ_opt().expect("valid date")));
    }
}
