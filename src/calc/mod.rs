//! Pure derivations: block time, night time, currency expiry and totals.
//!
//! Nothing in here touches storage. Thresholds arrive as parameters, usually
//! taken from [`crate::config::LogbookConfig`].

mod currency;
mod night;
mod time;
mod totals;

pub use currency::{
    CurrencyState, CurrencyStatus, RecencyEvent, TakeoffLandingCurrency, currency_expiry,
    currency_status, takeoff_landing_expiry,
};
pub use night::{
    EARTH_RADIUS_NM, NightInput, distance_nm, great_circle_distance, intermediate_points,
    is_night, night_time, solar_elevation,
};
pub use time::{block_time, flight_times};
pub use totals::{Totals, aggregate_totals};

use thiserror::Error;

/// Calculation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Block times are missing or describe no elapsed time.
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),
}
