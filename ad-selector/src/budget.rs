use chrono::{DateTime, TimeZone, Timelike, Utc};
use primitives::{Campaign, CampaignId, Money};

/// Consumption lookup against the impression/cost ledger, which is written
/// out-of-core by click and impression recording.
pub trait SpendLedger {
    /// Sum of cost attributed to the campaign since `window_start`.
    fn cost_since(&self, campaign: CampaignId, window_start: DateTime<Utc>) -> Money;
}

/// Budget pacing over an external spend ledger.
///
/// Checks are advisory: concurrent requests may all observe availability
/// before consumption becomes visible, and the resulting bounded
/// over-delivery is accepted.
#[derive(Debug, Clone)]
pub struct BudgetTracker<L> {
    ledger: L,
}

impl<L: SpendLedger> BudgetTracker<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Spend accumulated over the campaign's whole schedule.
    pub fn total_consumed(&self, campaign: &Campaign) -> Money {
        let window_start = campaign
            .start_date
            .map(|start| day_start(start))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        self.ledger.cost_since(campaign.id, window_start)
    }

    pub fn total_remaining(&self, campaign: &Campaign) -> Money {
        campaign
            .total_budget
            .saturating_sub(self.total_consumed(campaign))
    }

    /// Remaining share of today's allotment, as a fraction in `[0, 1]`.
    /// A campaign without a daily allotment has nothing remaining.
    pub fn remaining_budget_percentage(&self, campaign: &Campaign, now: DateTime<Utc>) -> f64 {
        let daily = campaign.operative_daily_budget();
        if daily.is_zero() {
            return 0.0;
        }

        let consumed = self.ledger.cost_since(campaign.id, day_start(now.date_naive()));
        let remaining = daily.saturating_sub(consumed);

        (remaining.to_f64() / daily.to_f64()).clamp(0.0, 1.0)
    }

    /// Whether the current clock hour still has budget to spend.
    pub fn hourly_budget_available(&self, campaign: &Campaign, now: DateTime<Utc>) -> bool {
        let hourly = campaign.effective_hourly_budget();
        if hourly.is_zero() {
            return false;
        }

        let hour_start = now
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .expect("truncating to the hour stays in range");

        self.ledger.cost_since(campaign.id, hour_start) < hourly
    }
}

fn day_start(date: chrono::NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight exists"))
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use primitives::test_util::PREMIUM_CAMPAIGN;

    use super::*;

    /// In-memory ledger of (campaign, recorded at, cost) rows.
    #[derive(Debug, Default)]
    struct FakeLedger(Vec<(CampaignId, DateTime<Utc>, Money)>);

    impl SpendLedger for FakeLedger {
        fn cost_since(&self, campaign: CampaignId, window_start: DateTime<Utc>) -> Money {
            self.0
                .iter()
                .filter(|(id, at, _)| *id == campaign && *at >= window_start)
                .map(|(_, _, cost)| cost)
                .sum()
        }
    }

    fn afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 1, 16, 15, 30, 0).unwrap()
    }

    #[test]
    fn initial_campaign_budgets() {
        let campaign = PREMIUM_CAMPAIGN.clone();
        let tracker = BudgetTracker::new(FakeLedger::default());

        assert_eq!(Money::from_dollars(5_000), campaign.total_budget);
        assert_eq!(Money::ZERO, tracker.total_consumed(&campaign));
        assert_eq!(Money::from_dollars(5_000), tracker.total_remaining(&campaign));
        assert_eq!(
            1.0,
            tracker.remaining_budget_percentage(&campaign, afternoon())
        );
    }

    #[test]
    fn consumption_shrinks_the_remaining_percentage() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(20);

        let yesterday = Utc.with_ymd_and_hms(2019, 1, 15, 12, 0, 0).unwrap();
        let this_morning = Utc.with_ymd_and_hms(2019, 1, 16, 9, 0, 0).unwrap();
        let tracker = BudgetTracker::new(FakeLedger(vec![
            // outside today's pacing window
            (campaign.id, yesterday, Money::from_dollars(20)),
            (campaign.id, this_morning, Money::from_dollars(5)),
        ]));

        assert_eq!(
            0.75,
            tracker.remaining_budget_percentage(&campaign, afternoon())
        );
        assert_eq!(Money::from_dollars(25), tracker.total_consumed(&campaign));
    }

    #[test]
    fn overspend_clamps_to_zero() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(10);

        let this_morning = Utc.with_ymd_and_hms(2019, 1, 16, 9, 0, 0).unwrap();
        let tracker = BudgetTracker::new(FakeLedger(vec![(
            campaign.id,
            this_morning,
            Money::from_dollars(12),
        )]));

        assert_eq!(
            0.0,
            tracker.remaining_budget_percentage(&campaign, afternoon())
        );
    }

    #[test]
    fn no_daily_allotment_means_nothing_remaining() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.total_budget = Money::ZERO;

        let tracker = BudgetTracker::new(FakeLedger::default());

        assert_eq!(
            0.0,
            tracker.remaining_budget_percentage(&campaign, afternoon())
        );
    }

    #[test]
    fn hourly_budget_counts_only_the_current_clock_hour() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.daily_budget = Money::from_dollars(12);
        campaign.init_hourly_budget(); // $1.00/hour

        let last_hour = Utc.with_ymd_and_hms(2019, 1, 16, 14, 59, 0).unwrap();
        let this_hour = Utc.with_ymd_and_hms(2019, 1, 16, 15, 5, 0).unwrap();

        let tracker = BudgetTracker::new(FakeLedger(vec![
            (campaign.id, last_hour, Money::from_dollars(1)),
            (campaign.id, this_hour, Money::from_cents(99)),
        ]));
        assert!(tracker.hourly_budget_available(&campaign, afternoon()));

        let tracker = BudgetTracker::new(FakeLedger(vec![(
            campaign.id,
            this_hour,
            Money::from_dollars(1),
        )]));
        assert!(!tracker.hourly_budget_available(&campaign, afternoon()));
    }

    #[test]
    fn a_zero_hourly_budget_is_never_available() {
        let mut campaign = PREMIUM_CAMPAIGN.clone();
        campaign.total_budget = Money::ZERO;
        assert_eq!(Money::ZERO, campaign.effective_hourly_budget());

        let tracker = BudgetTracker::new(FakeLedger::default());
        assert!(!tracker.hourly_budget_available(&campaign, afternoon()));
    }
}
