use crate::Money;

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

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
pub struct OrganizationId(pub u64);

/// An advertiser or publisher account.
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
pub struct UserId(pub u64);

/// The advertiser's billing entity. Campaigns only compete for premium
/// placement while their organization can pay for them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub balance: Money,
}

impl Organization {
    pub fn solvent(&self) -> bool {
        self.balance > Money::ZERO
    }
}
