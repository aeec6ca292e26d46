use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use primitives::Config;
use std::net::IpAddr;

/// Resolved request geography. All fields are optional: a lookup that fails
/// resolves to an unknown location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Geo {
    pub country_code: Option<String>,
    pub province_code: Option<String>,
    /// IANA zone name, e.g. `Europe/Sofia`.
    pub time_zone: Option<String>,
}

/// Black-box IP geolocation. `None` means the address could not be resolved;
/// implementations must not fail in any other way.
pub trait GeoResolver {
    fn lookup(&self, ip: IpAddr) -> Option<Geo>;
}

/// Everything the engine knows about one display request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    pub country_code: Option<String>,
    pub province_code: Option<String>,
    /// Hour of day at the visitor's location, for the prohibited-hours check.
    pub local_hour: u32,
    /// Search terms supplied by the caller; when present they take the place
    /// of the property's own keywords in keyword targeting.
    pub keywords: Vec<String>,
}

impl RequestContext {
    /// A context with no resolved geography.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            today: now.date_naive(),
            now,
            country_code: None,
            province_code: None,
            local_hour: now.hour(),
            keywords: vec![],
        }
    }

    /// Builds a context from a geolocation lookup. A failed lookup degrades
    /// to an unknown country; an unknown time zone degrades to the UTC hour.
    pub fn resolve<G: GeoResolver>(
        resolver: &G,
        ip: IpAddr,
        now: DateTime<Utc>,
        keywords: Vec<String>,
    ) -> Self {
        let geo = resolver.lookup(ip).unwrap_or_default();

        Self {
            today: now.date_naive(),
            now,
            country_code: geo.country_code,
            province_code: geo.province_code,
            local_hour: local_hour(now, geo.time_zone.as_deref()),
            keywords,
        }
    }

    pub fn prohibited_hour(&self, config: &Config) -> bool {
        config.is_prohibited_hour(self.local_hour)
    }
}

/// Hour of day in the named zone, or the UTC hour when the name is missing
/// or not a known IANA zone.
pub fn local_hour(now: DateTime<Utc>, time_zone: Option<&str>) -> u32 {
    time_zone
        .and_then(|name| name.parse::<Tz>().ok())
        .map(|tz| now.with_timezone(&tz).hour())
        .unwrap_or_else(|| now.hour())
}

/// Splits caller-supplied search terms on commas, dropping blanks.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
}
