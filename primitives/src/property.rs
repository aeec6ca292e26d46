use crate::{campaign::sort_tags, Campaign, CampaignId, UserId};

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AD_TEMPLATE: &str = "default";
pub const DEFAULT_AD_THEME: &str = "light";

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
pub struct PropertyId(pub u64);

/// A publisher site requesting ads. Read-only from the selection engine's
/// perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub publisher: UserId,
    pub name: String,
    /// Paid/verified properties compete for premium campaigns.
    pub active: bool,
    /// When set, premium selection only considers the assigner campaigns.
    #[serde(default)]
    pub restrict_to_assigner_campaigns: bool,
    /// Excludes keyword/geo-matched fallback campaigns entirely.
    #[serde(default)]
    pub prohibit_fallback_campaigns: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigner_campaign_ids: Vec<CampaignId>,
    /// Explicit allow-list for the fallback tier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_fallback_campaign_ids: Vec<CampaignId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prohibited_advertiser_ids: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_ad_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_ad_theme: Option<String>,
}

impl Property {
    pub fn prohibits_advertiser(&self, advertiser: UserId) -> bool {
        self.prohibited_advertiser_ids.contains(&advertiser)
    }

    /// Template used to render the campaign. Fallback campaigns get the
    /// fallback override when one is configured.
    pub fn template_for(&self, campaign: &Campaign) -> &str {
        let premium = self.ad_template.as_deref().unwrap_or(DEFAULT_AD_TEMPLATE);
        if campaign.fallback {
            self.fallback_ad_template.as_deref().unwrap_or(premium)
        } else {
            premium
        }
    }

    pub fn theme_for(&self, campaign: &Campaign) -> &str {
        let premium = self.ad_theme.as_deref().unwrap_or(DEFAULT_AD_THEME);
        if campaign.fallback {
            self.fallback_ad_theme.as_deref().unwrap_or(premium)
        } else {
            premium
        }
    }

    /// Restores the keyword-set invariant. Call before persisting.
    pub fn normalize(&mut self) {
        sort_tags(&mut self.keywords);
    }
}
