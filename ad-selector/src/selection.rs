use chrono::NaiveDate;
use primitives::{Campaign, Config, Money, OrganizationId, Property};

use crate::{
    alias,
    budget::{BudgetTracker, SpendLedger},
    context::RequestContext,
    ecpm, eligibility,
};

/// Floor applied to score denominators so a degenerate candidate set cannot
/// divide by zero.
const DENOMINATOR_EPSILON: f64 = 0.001;

/// Campaign lookup. Ordering of the returned set is irrelevant; weights are
/// computed per element.
pub trait CampaignRepository {
    /// Campaigns in `active` status whose schedule covers `date`.
    fn active_on(&self, date: NaiveDate) -> Vec<Campaign>;
}

/// Billing balance lookup.
pub trait Organizations {
    fn balance(&self, organization: OrganizationId) -> Money;
}

/// The request-scoped decision engine.
///
/// Per request it filters each tier, weights the survivors by price and
/// remaining budget, and draws one winner, cascading premium ->
/// geo-targeted fallback -> broadened fallback. Every stage is terminal on
/// success; a stage is only skipped when it has no candidates at all.
pub struct Selector<R, O, L> {
    config: Config,
    repository: R,
    organizations: O,
    tracker: BudgetTracker<L>,
}

impl<R, O, L> Selector<R, O, L>
where
    R: CampaignRepository,
    O: Organizations,
    L: SpendLedger,
{
    pub fn new(config: Config, repository: R, organizations: O, ledger: L) -> Self {
        Self {
            config,
            repository,
            organizations,
            tracker: BudgetTracker::new(ledger),
        }
    }

    /// Picks at most one campaign for the request. `None` is "no fill",
    /// a valid outcome rather than an error.
    pub fn select_campaign(&self, property: &Property, ctx: &RequestContext) -> Option<Campaign> {
        let pool = self.repository.active_on(ctx.today);
        let base: Vec<&Campaign> = pool
            .iter()
            .filter(|campaign| eligibility::base_eligible(campaign, ctx, &self.config))
            .collect();
        let geo: Vec<&Campaign> = base
            .iter()
            .copied()
            .filter(|campaign| eligibility::geo_targeted(campaign, ctx))
            .collect();

        let mut stages: Vec<(Vec<&Campaign>, bool)> = Vec::with_capacity(3);
        if property.active {
            let premium = geo
                .iter()
                .copied()
                .filter(|campaign| eligibility::premium_match(campaign, property, ctx))
                .filter(|campaign| {
                    self.organizations.balance(campaign.organization) > Money::ZERO
                })
                .filter(|campaign| self.tracker.hourly_budget_available(campaign, ctx.now))
                .collect();
            stages.push((premium, false));
        }
        stages.push((
            geo.iter()
                .copied()
                .filter(|campaign| eligibility::fallback_match(campaign, property, ctx))
                .collect(),
            true,
        ));
        stages.push((
            base.iter()
                .copied()
                .filter(|campaign| eligibility::broadened_fallback_match(campaign, property))
                .collect(),
            true,
        ));

        stages
            .into_iter()
            .find(|(candidates, _)| !candidates.is_empty())
            .and_then(|(candidates, ignore_budgets)| {
                let weights = self.weights(&candidates, ctx, ignore_budgets);

                alias::pick(&candidates, &weights, &mut rand::thread_rng())
                    .map(|winner| (*winner).clone())
            })
    }

    /// Per-candidate draw weight: province bonus + eCPM share + budget
    /// share. Budget shares are omitted for stages that ignore budgets.
    fn weights(&self, candidates: &[&Campaign], ctx: &RequestContext, ignore_budgets: bool) -> Vec<f64> {
        let prices: Vec<f64> = candidates
            .iter()
            .map(|campaign| {
                ecpm::adjusted_ecpm(campaign, ctx.country_code.as_deref(), &self.config).to_f64()
            })
            .collect();
        let price_denominator = floored(prices.iter().sum());

        let budget_shares: Option<(Vec<f64>, f64)> = (!ignore_budgets).then(|| {
            let percentages: Vec<f64> = candidates
                .iter()
                .map(|campaign| self.tracker.remaining_budget_percentage(campaign, ctx.now))
                .collect();
            let denominator = floored(percentages.iter().sum());

            (percentages, denominator)
        });

        candidates
            .iter()
            .enumerate()
            .map(|(index, campaign)| {
                let province_bonus = match ctx.province_code.as_deref() {
                    Some(province)
                        if campaign.province_codes.iter().any(|code| code == province) =>
                    {
                        0.5
                    }
                    _ => 0.0,
                };
                let ecpm_score = round2(prices[index] / price_denominator) + 1.0;
                let budget_score = budget_shares
                    .as_ref()
                    .map(|(percentages, denominator)| round2(percentages[index] / denominator))
                    .unwrap_or(0.0);

                province_bonus + ecpm_score + budget_score
            })
            .collect()
    }
}

fn floored(denominator: f64) -> f64 {
    if denominator == 0.0 {
        DENOMINATOR_EPSILON
    } else {
        denominator
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
