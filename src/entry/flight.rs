use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{EntryKind, FlightRules, PilotFunction, RowId, TimeOfDay},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// A logged flight as entered by the operator.
///
/// Durations are not part of the entry; they are derived into
/// [`FlightTimes`] from the block times and airport data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flight {
    /// Storage id.
    pub id: Option<RowId>,
    /// Date of the off-block time, UTC.
    pub date: Option<NaiveDate>,
    /// Departure ICAO code.
    pub departure: String,
    /// Destination ICAO code.
    pub destination: String,
    /// Off-block time, UTC.
    pub off_block: Option<TimeOfDay>,
    /// On-block time, UTC; may be on the following day.
    pub on_block: Option<TimeOfDay>,
    /// Pilot in command.
    pub pic: Option<RowId>,
    /// Second crew member.
    pub second_pilot: Option<RowId>,
    /// Third crew member.
    pub third_pilot: Option<RowId>,
    /// Airframe flown.
    pub tail: Option<RowId>,
    /// Role of the logbook owner.
    pub function: PilotFunction,
    /// Flight rules.
    pub flight_rules: FlightRules,
    /// Owner was pilot flying.
    pub pilot_flying: bool,
    /// Day take-offs.
    pub takeoffs_day: u32,
    /// Night take-offs.
    pub takeoffs_night: u32,
    /// Day landings.
    pub landings_day: u32,
    /// Night landings.
    pub landings_night: u32,
    /// Landing was an autoland.
    pub autoland: bool,
    /// One of [`crate::types::APPROACH_TYPES`] or free text.
    pub approach_type: Option<String>,
    /// Commercial flight number.
    pub flight_number: Option<String>,
    /// Free text.
    pub remarks: Option<String>,
}

impl Flight {
    pub(crate) const DATE: &'static str = "date";
    pub(crate) const DEPARTURE: &'static str = "departure";
    pub(crate) const DESTINATION: &'static str = "destination";
    pub(crate) const OFF_BLOCK: &'static str = "off_block";
    pub(crate) const ON_BLOCK: &'static str = "on_block";
    pub(crate) const PIC: &'static str = "pic_id";
    pub(crate) const SECOND_PILOT: &'static str = "second_pilot_id";
    pub(crate) const THIRD_PILOT: &'static str = "third_pilot_id";
    pub(crate) const TAIL: &'static str = "tail_id";
    pub(crate) const FUNCTION: &'static str = "pilot_function";
    pub(crate) const FLIGHT_RULES: &'static str = "flight_rules";
    pub(crate) const PILOT_FLYING: &'static str = "pilot_flying";
    pub(crate) const TAKEOFFS_DAY: &'static str = "takeoffs_day";
    pub(crate) const TAKEOFFS_NIGHT: &'static str = "takeoffs_night";
    pub(crate) const LANDINGS_DAY: &'static str = "landings_day";
    pub(crate) const LANDINGS_NIGHT: &'static str = "landings_night";
    pub(crate) const AUTOLAND: &'static str = "autoland";
    pub(crate) const APPROACH_TYPE: &'static str = "approach_type";
    pub(crate) const FLIGHT_NUMBER: &'static str = "flight_number";
    pub(crate) const REMARKS: &'static str = "remarks";

    /// Crew references that are set, in seat order.
    pub fn crew(&self) -> impl Iterator<Item = RowId> {
        [self.pic, self.second_pilot, self.third_pilot].into_iter().flatten()
    }

    /// Day plus night take-offs.
    pub fn takeoffs(&self) -> u32 {
        self.takeoffs_day.saturating_add(self.takeoffs_night)
    }

    /// Day plus night landings.
    pub fn landings(&self) -> u32 {
        self.landings_day.saturating_add(self.landings_night)
    }
}

impl LogbookEntry for Flight {
    const KIND: EntryKind = EntryKind::Flight;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            date: Some(r.date(Self::DATE)?),
            departure: r.text(Self::DEPARTURE)?,
            destination: r.text(Self::DESTINATION)?,
            off_block: Some(r.time(Self::OFF_BLOCK)?),
            on_block: Some(r.time(Self::ON_BLOCK)?),
            pic: Some(r.id(Self::PIC)?),
            second_pilot: r.opt_id(Self::SECOND_PILOT)?,
            third_pilot: r.opt_id(Self::THIRD_PILOT)?,
            tail: Some(r.id(Self::TAIL)?),
            function: r.int_code(Self::FUNCTION, PilotFunction::from_code)?,
            flight_rules: r.text_code(Self::FLIGHT_RULES, FlightRules::from_code)?,
            pilot_flying: r.flag(Self::PILOT_FLYING)?,
            takeoffs_day: r.count(Self::TAKEOFFS_DAY)?,
            takeoffs_night: r.count(Self::TAKEOFFS_NIGHT)?,
            landings_day: r.count(Self::LANDINGS_DAY)?,
            landings_night: r.count(Self::LANDINGS_NIGHT)?,
            autoland: r.flag(Self::AUTOLAND)?,
            approach_type: r.opt_text(Self::APPROACH_TYPE)?,
            flight_number: r.opt_text(Self::FLIGHT_NUMBER)?,
            remarks: r.opt_text(Self::REMARKS)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::DATE, self.date)
            .set(Self::DEPARTURE, self.departure.as_str())
            .set(Self::DESTINATION, self.destination.as_str())
            .set(Self::OFF_BLOCK, self.off_block)
            .set(Self::ON_BLOCK, self.on_block)
            .set(Self::PIC, self.pic)
            .set(Self::SECOND_PILOT, self.second_pilot)
            .set(Self::THIRD_PILOT, self.third_pilot)
            .set(Self::TAIL, self.tail)
            .set(Self::FUNCTION, self.function.code())
            .set(Self::FLIGHT_RULES, self.flight_rules.code())
            .set(Self::PILOT_FLYING, self.pilot_flying)
            .set(Self::TAKEOFFS_DAY, self.takeoffs_day)
            .set(Self::TAKEOFFS_NIGHT, self.takeoffs_night)
            .set(Self::LANDINGS_DAY, self.landings_day)
            .set(Self::LANDINGS_NIGHT, self.landings_night)
            .set(Self::AUTOLAND, self.autoland)
            .set(Self::APPROACH_TYPE, self.approach_type.as_deref())
            .set(Self::FLIGHT_NUMBER, self.flight_number.as_deref())
            .set(Self::REMARKS, self.remarks.as_deref())
            .finish()
    }

    fn row_id(&self) -> Option<RowId> {
        self.id
    }

    fn set_row_id(&mut self, id: RowId) {
        self.id = Some(id);
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.date.is_none() {
            out.push(Self::DATE);
        }
        if self.departure.trim().is_empty() {
            out.push(Self::DEPARTURE);
        }
        if self.destination.trim().is_empty() {
            out.push(Self::DESTINATION);
        }
        if self.off_block.is_none() {
            out.push(Self::OFF_BLOCK);
        }
        match (self.off_block, self.on_block) {
            (_, None) => out.push(Self::ON_BLOCK),
            (Some(off), Some(on)) if off == on => out.push(Self::ON_BLOCK),
            _ => {}
        }
        if self.pic.is_none() {
            out.push(Self::PIC);
        }
        if self.tail.is_none() {
            out.push(Self::TAIL);
        }
        out.extend(blank_text(&[
            (Self::APPROACH_TYPE, self.approach_type.as_deref()),
            (Self::FLIGHT_NUMBER, self.flight_number.as_deref()),
            (Self::REMARKS, self.remarks.as_deref()),
        ]));
        out
    }
}

/// Durations derived for one flight, all in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlightTimes {
    /// Block time.
    pub total: u32,
    /// Portion flown with the sun below the night threshold.
    pub night: u32,
    /// Time under instrument flight rules.
    pub ifr: u32,
    /// Single pilot, single engine time.
    pub spse: u32,
    /// Single pilot, multi engine time.
    pub spme: u32,
    /// Multi pilot time.
    pub multi_pilot: u32,
    /// Pilot in command time, including instructor time.
    pub pic: u32,
    /// Pilot in command under supervision time.
    pub picus: u32,
    /// Co-pilot time.
    pub sic: u32,
    /// Dual instruction received.
    pub dual: u32,
    /// Flight instructor time.
    pub instructor: u32,
}

impl FlightTimes {
    /// Stored column names, in the order of [`FlightTimes::values`].
    pub const COLUMNS: [&'static str; 11] = [
        "total_time",
        "night_time",
        "ifr_time",
        "spse_time",
        "spme_time",
        "mp_time",
        "pic_time",
        "picus_time",
        "sic_time",
        "dual_time",
        "fi_time",
    ];

    /// Values matching [`FlightTimes::COLUMNS`].
    pub fn values(&self) -> [u32; 11] {
        [
            self.total,
            self.night,
            self.ifr,
            self.spse,
            self.spme,
            self.multi_pilot,
            self.pic,
            self.picus,
            self.sic,
            self.dual,
            self.instructor,
        ]
    }

    /// Adds every bucket of `other` into `self`.
    pub fn accumulate(&mut self, other: &FlightTimes) {
        self.total = self.total.saturating_add(other.total);
        self.night = self.night.saturating_add(other.night);
        self.ifr = self.ifr.saturating_add(other.ifr);
        self.spse = self.spse.saturating_add(other.spse);
        self.spme = self.spme.saturating_add(other.spme);
        self.multi_pilot = self.multi_pilot.saturating_add(other.multi_pilot);
        self.pic = self.pic.saturating_add(other.pic);
        self.picus = self.picus.saturating_add(other.picus);
        self.sic = self.sic.saturating_add(other.sic);
        self.dual = self.dual.saturating_add(other.dual);
        self.instructor = self.instructor.saturating_add(other.instructor);
    }
}

/// A flight together with its freshly derived durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Stored entry.
    pub flight: Flight,
    /// Derived durations.
    pub times: FlightTimes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_columns_are_never_emitted() {
        let f = Flight {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Flight::default()
        };
        let row = f.to_row();
        for col in FlightTimes::COLUMNS {
            assert!(!row.contains_key(col), "{col} leaked into to_row");
        }
        assert!(!row.contains_key(EntryKind::Flight.id_column()));
    }

    #[test]
    fn equal_block_times_are_invalid() {
        let t = TimeOfDay::from_hm(10, 0);
        let f = Flight {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            departure: "EDDF".into(),
            destination: "EGLL".into(),
            off_block: t,
            on_block: t,
            pic: Some(1),
            tail: Some(1),
            ..Flight::default()
        };
        assert_eq!(f.invalid_fields(), vec![Flight::ON_BLOCK]);
    }
}
