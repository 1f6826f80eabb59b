use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    config::{TakeoffLandingRule, ValidityPeriod},
    entry::Currency,
};

/// Standing of a time-limited qualification on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyStatus {
    /// Valid and outside the warning window.
    Current,
    /// Valid, but expiring within the warning window.
    ExpiringSoon,
    /// Past its expiry date.
    Expired,
}

/// A stored currency with its expiry derived for the day asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyState {
    /// Stored entry.
    pub currency: Currency,
    /// Trigger date plus validity period.
    pub expiry: Option<NaiveDate>,
    /// Standing relative to the query date.
    pub status: CurrencyStatus,
}

/// Take-off and landing recency for the query date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeoffLandingCurrency {
    /// Last day on which the requirement is met; `None` if never met.
    pub expiry: Option<NaiveDate>,
    /// Standing relative to the query date.
    pub status: CurrencyStatus,
}

/// Take-offs and landings logged on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyEvent {
    /// Date of the flight.
    pub date: NaiveDate,
    /// Take-offs, day and night.
    pub takeoffs: u32,
    /// Landings, day and night.
    pub landings: u32,
}

/// `trigger + period`; `None` only past the representable date range.
pub fn currency_expiry(trigger: NaiveDate, period: ValidityPeriod) -> Option<NaiveDate> {
    period.add_to(trigger)
}

/// Classifies `expiry` relative to `today`. The expiry day itself is still valid.
pub fn currency_status(expiry: NaiveDate, today: NaiveDate, warning_days: u32) -> CurrencyStatus {
    if today > expiry {
        return CurrencyStatus::Expired;
    }
    let remaining = (expiry - today).num_days();
    if remaining <= i64::from(warning_days) {
        CurrencyStatus::ExpiringSoon
    } else {
        CurrencyStatus::Current
    }
}

/// Date until which the take-off and landing requirement stays met.
///
/// Events are walked from the most recent backwards until `rule.required`
/// take-offs and landings have both been collected; the currency lasts
/// `rule.window_days` from the day that completed the count.
pub fn takeoff_landing_expiry(
    events: &[RecencyEvent],
    rule: TakeoffLandingRule,
) -> Option<NaiveDate> {
    let mut ordered: Vec<&RecencyEvent> = events.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let (mut takeoffs, mut landings) = (0u32, 0u32);
    for event in ordered {
        takeoffs = takeoffs.saturating_add(event.takeoffs);
        landings = landings.saturating_add(event.landings);
        if takeoffs >= rule.required && landings >= rule.required {
            return event.date.checked_add_days(Days::new(u64::from(rule.window_days)));
        }
    }
    None
}
