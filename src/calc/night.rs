//! Night portion of a flight from a low-precision solar ephemeris.
//!
//! The aircraft position is approximated by points spaced one minute of
//! block time apart along the great circle between the two airports, and the
//! solar elevation is evaluated at each point for the matching UTC minute.
//! Flight level, routing and ground time are ignored, so the result is an
//! approximation with a fixed one-minute granularity.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::{entry::Coordinates, types::TimeOfDay};

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.06479482;

/// Assumed cruise altitude in kilometres for the parallax correction.
const CRUISE_ALTITUDE_KM: f64 = 11.0;

/// Mean sun distance in kilometres.
const AU_KM: f64 = 149_598_000.0;

/// Inputs of [`night_time`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightInput {
    /// Departure position, if known.
    pub departure: Option<Coordinates>,
    /// Destination position, if known.
    pub destination: Option<Coordinates>,
    /// UTC date of the off-block time.
    pub date: NaiveDate,
    /// Off-block time, UTC.
    pub off_block: TimeOfDay,
    /// Block time in minutes.
    pub block_minutes: u32,
}

/// Minutes of the flight flown with the sun below `night_angle_deg`.
///
/// Zero when either position is unknown. Never exceeds `block_minutes`.
///
/// Only monotonic in `block_minutes` when both positions are the same.
/// Between distinct airports a longer block time stretches the interpolated
/// track, which shifts every sample point, so one extra minute of block time
/// can yield a minute less of night.
pub fn night_time(input: &NightInput, night_angle_deg: f64) -> u32 {
    let (Some(from), Some(to)) = (input.departure, input.destination) else {
        return 0;
    };
    if input.block_minutes == 0 {
        return 0;
    }
    let route = intermediate_points(from, to, input.block_minutes);
    let start = days_since_epoch(input.date);
    let off = u32::from(input.off_block.minutes());

    route
        .iter()
        .take(input.block_minutes as usize)
        .enumerate()
        .filter(|(i, point)| {
            let minute = off + *i as u32;
            let day = start + f64::from(minute / 1440);
            let elevation = elevation_at(day, f64::from(minute % 1440) / 60.0, point);
            is_night(elevation, night_angle_deg)
        })
        .count() as u32
}

/// True when the sun at `elevation_deg` is below the night threshold.
pub fn is_night(elevation_deg: f64, night_angle_deg: f64) -> bool {
    elevation_deg < night_angle_deg
}

/// Solar elevation in degrees at `at` (UTC) above `position`.
pub fn solar_elevation(at: NaiveDateTime, position: Coordinates) -> f64 {
    let uth =
        f64::from(at.hour()) + f64::from(at.minute()) / 60.0 + f64::from(at.second()) / 3600.0;
    elevation_at(days_since_epoch(at.date()), uth, &position)
}

/// Central angle in radians between two positions (haversine).
pub fn great_circle_distance(from: Coordinates, to: Coordinates) -> f64 {
    let (lat1, lon1) = (from.latitude.to_radians(), from.longitude.to_radians());
    let (lat2, lon2) = (to.latitude.to_radians(), to.longitude.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great circle distance in nautical miles.
pub fn distance_nm(from: Coordinates, to: Coordinates) -> f64 {
    great_circle_distance(from, to) * EARTH_RADIUS_NM
}

/// `steps + 1` equally spaced points from `from` to `to` inclusive.
///
/// Coincident or antipodal endpoints have no unique great circle; every point
/// is then the departure position.
pub fn intermediate_points(from: Coordinates, to: Coordinates, steps: u32) -> Vec<Coordinates> {
    let d = great_circle_distance(from, to);
    let steps = steps.max(1);
    if d.sin().abs() < 1e-12 {
        return vec![from; steps as usize + 1];
    }
    let (lat1, lon1) = (from.latitude.to_radians(), from.longitude.to_radians());
    let (lat2, lon2) = (to.latitude.to_radians(), to.longitude.to_radians());

    (0..=steps)
        .map(|i| {
            let f = f64::from(i) / f64::from(steps);
            let a = ((1.0 - f) * d).sin() / d.sin();
            let b = (f * d).sin() / d.sin();
            let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
            let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
            let z = a * lat1.sin() + b * lat2.sin();
            Coordinates::new(
                z.atan2(x.hypot(y)).to_degrees(),
                y.atan2(x).to_degrees(),
            )
        })
        .collect()
}

/// Days since 2000 January 0.0 UT at midnight of `date`.
fn days_since_epoch(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap_or_default();
    (date - epoch).num_days() as f64
}

/// Elevation for day number `day` (midnight) and `uth` hours after midnight.
fn elevation_at(day: f64, uth: f64, position: &Coordinates) -> f64 {
    let d = day + uth / 24.0;

    // Orbital elements, degrees.
    let w = 282.9404 + 4.70935e-5 * d;
    let e = 0.016709 - 1.151e-9 * d;
    let m = (356.0470 + 0.9856002585 * d).rem_euclid(360.0);
    let oblecl = (23.4393 - 3.563e-7 * d).to_radians();
    let l = w + m;

    let m_rad = m.to_radians();
    let ecc_anomaly = (m + e.to_degrees() * m_rad.sin() * (1.0 + e * m_rad.cos())).to_radians();
    let x = ecc_anomaly.cos() - e;
    let y = ecc_anomaly.sin() * (1.0 - e * e).sqrt();
    let r = x.hypot(y);
    let true_anomaly = y.atan2(x).to_degrees();
    let lon_sun = (true_anomaly + w).to_radians();

    let x_eclip = r * lon_sun.cos();
    let y_eclip = r * lon_sun.sin();
    let x_equat = x_eclip;
    let y_equat = y_eclip * oblecl.cos();
    let z_equat = y_eclip * oblecl.sin();

    let r = (x_equat * x_equat + y_equat * y_equat + z_equat * z_equat).sqrt()
        - CRUISE_ALTITUDE_KM / AU_KM;
    let ra = y_equat.atan2(x_equat).to_degrees();
    let decl = (z_equat / r).clamp(-1.0, 1.0).asin();

    let gmst0 = (l + 180.0).rem_euclid(360.0) / 15.0;
    let sidereal = gmst0 + uth + position.longitude / 15.0;
    let ha = (sidereal * 15.0 - ra).to_radians();

    let x = ha.cos() * decl.cos();
    let z = decl.sin();
    let colat = (90.0 - position.latitude).to_radians();
    let z_hor = x * colat.sin() + z * colat.cos();
    z_hor.clamp(-1.0, 1.0).asin().to_degrees()
}
