use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{EntryKind, RowId, SimulatorDevice},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// A synthetic training session. Parallel to a flight but without airports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulatorSession {
    /// Storage id.
    pub id: Option<RowId>,
    /// Session date.
    pub date: Option<NaiveDate>,
    /// Device class.
    pub device: SimulatorDevice,
    /// Session length in minutes.
    pub duration: u32,
    /// Simulated aircraft type, required for an FSTD.
    pub aircraft_type: Option<String>,
    /// Device registration or identifier.
    pub registration: Option<String>,
    /// Free text.
    pub remarks: Option<String>,
}

impl SimulatorSession {
    pub(crate) const DATE: &'static str = "date";
    pub(crate) const DEVICE: &'static str = "device";
    pub(crate) const DURATION: &'static str = "duration";
    pub(crate) const AIRCRAFT_TYPE: &'static str = "aircraft_type";
    pub(crate) const REGISTRATION: &'static str = "registration";
    pub(crate) const REMARKS: &'static str = "remarks";
}

impl LogbookEntry for SimulatorSession {
    const KIND: EntryKind = EntryKind::Simulator;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            date: Some(r.date(Self::DATE)?),
            device: r.text_code(Self::DEVICE, SimulatorDevice::from_code)?,
            duration: r.minutes(Self::DURATION)?,
            aircraft_type: r.opt_text(Self::AIRCRAFT_TYPE)?,
            registration: r.opt_text(Self::REGISTRATION)?,
            remarks: r.opt_text(Self::REMARKS)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::DATE, self.date)
            .set(Self::DEVICE, self.device.code())
            .set(Self::DURATION, self.duration)
            .set(Self::AIRCRAFT_TYPE, self.aircraft_type.as_deref())
            .set(Self::REGISTRATION, self.registration.as_deref())
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
        if self.duration == 0 {
            out.push(Self::DURATION);
        }
        let blank = blank_text(&[
            (Self::AIRCRAFT_TYPE, self.aircraft_type.as_deref()),
            (Self::REGISTRATION, self.registration.as_deref()),
            (Self::REMARKS, self.remarks.as_deref()),
        ]);
        let has_type = self.aircraft_type.as_deref().is_some_and(|t| !t.trim().is_empty());
        let type_blank = blank.contains(&Self::AIRCRAFT_TYPE);
        if self.device == SimulatorDevice::Fstd && !has_type && !type_blank {
            out.push(Self::AIRCRAFT_TYPE);
        }
        out.extend(blank);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fstd_requires_an_aircraft_type() {
        let mut s = SimulatorSession {
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            device: SimulatorDevice::Fstd,
            duration: 240,
            ..SimulatorSession::default()
        };
        assert_eq!(s.invalid_fields(), vec![SimulatorSession::AIRCRAFT_TYPE]);
        s.aircraft_type = Some("A320".into());
        assert!(s.validate().is_ok());
        s.device = SimulatorDevice::Fnpt2;
        s.aircraft_type = None;
        assert!(s.validate().is_ok());
    }
}
