#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

//! The campaign selection engine.
//!
//! For each ad-display request the engine narrows the campaign pool through
//! eligibility and geo predicates, gates premium candidates on balance and
//! hourly budget, weights the survivors by price and remaining budget, draws
//! one winner through an alias table, and escalates premium -> fallback ->
//! broadened fallback until a tier fills. An empty result is "no fill", not
//! an error.

pub mod alias;
pub mod budget;
pub mod context;
pub mod ecpm;
pub mod eligibility;
pub mod impression;
pub mod selection;

pub use self::alias::AliasTable;
pub use self::budget::{BudgetTracker, SpendLedger};
pub use self::context::{parse_keywords, Geo, GeoResolver, RequestContext};
pub use self::ecpm::{adjusted_ecpm, ecpms, CountryEcpm};
pub use self::impression::{
    mint_token, ImpressionRecorder, KeyValueStore, MemoryStore, VirtualImpression,
};
pub use self::selection::{CampaignRepository, Organizations, Selector};
