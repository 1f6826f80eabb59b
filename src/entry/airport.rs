use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{EntryKind, RowId},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, north positive.
    pub latitude: f64,
    /// Longitude, east positive.
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a position.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Airport reference record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Airport {
    /// Storage id.
    pub id: Option<RowId>,
    /// Four letter ICAO location indicator, unique across airports.
    pub icao: String,
    /// Three letter IATA code.
    pub iata: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Field elevation in feet.
    pub elevation_ft: Option<i64>,
    /// Standard offset from UTC in minutes.
    pub utc_offset_minutes: Option<i64>,
    /// Olson timezone name, e.g. `Europe/Berlin`.
    pub tz_olson: Option<String>,
}

impl Airport {
    pub(crate) const ICAO: &'static str = "icao";
    pub(crate) const IATA: &'static str = "iata";
    pub(crate) const NAME: &'static str = "name";
    const COUNTRY: &'static str = "country";
    pub(crate) const LATITUDE: &'static str = "latitude";
    pub(crate) const LONGITUDE: &'static str = "longitude";
    const ELEVATION: &'static str = "elevation_ft";
    const UTC_OFFSET: &'static str = "utc_offset";
    const TZ_OLSON: &'static str = "tz_olson";

    /// Position, when both latitude and longitude are known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

impl LogbookEntry for Airport {
    const KIND: EntryKind = EntryKind::Airport;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            icao: r.text(Self::ICAO)?,
            iata: r.opt_text(Self::IATA)?,
            name: r.opt_text(Self::NAME)?,
            country: r.opt_text(Self::COUNTRY)?,
            latitude: r.opt_real(Self::LATITUDE)?,
            longitude: r.opt_real(Self::LONGITUDE)?,
            elevation_ft: r.opt_int(Self::ELEVATION)?,
            utc_offset_minutes: r.opt_int(Self::UTC_OFFSET)?,
            tz_olson: r.opt_text(Self::TZ_OLSON)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::ICAO, self.icao.as_str())
            .set(Self::IATA, self.iata.as_deref())
            .set(Self::NAME, self.name.as_deref())
            .set(Self::COUNTRY, self.country.as_deref())
            .set(Self::LATITUDE, self.latitude)
            .set(Self::LONGITUDE, self.longitude)
            .set(Self::ELEVATION, self.elevation_ft)
            .set(Self::UTC_OFFSET, self.utc_offset_minutes)
            .set(Self::TZ_OLSON, self.tz_olson.as_deref())
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
        if self.icao.len() != 4 || !self.icao.chars().all(|c| c.is_ascii_alphanumeric()) {
            out.push(Self::ICAO);
        }
        if self.latitude.is_some_and(|v| !(-90.0..=90.0).contains(&v)) {
            out.push(Self::LATITUDE);
        }
        if self.longitude.is_some_and(|v| !(-180.0..=180.0).contains(&v)) {
            out.push(Self::LONGITUDE);
        }
        out.extend(blank_text(&[
            (Self::IATA, self.iata.as_deref()),
            (Self::NAME, self.name.as_deref()),
            (Self::COUNTRY, self.country.as_deref()),
            (Self::TZ_OLSON, self.tz_olson.as_deref()),
        ]));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_need_both_axes() {
        let mut a = Airport {
            icao: "EDDF".into(),
            latitude: Some(50.03),
            ..Airport::default()
        };
        assert_eq!(a.coordinates(), None);
        a.longitude = Some(8.57);
        assert_eq!(a.coordinates(), Some(Coordinates::new(50.03, 8.57)));
    }

    #[test]
    fn icao_and_ranges_are_checked() {
        let a = Airport {
            icao: "EDD".into(),
            latitude: Some(91.0),
            longitude: Some(-180.0),
            ..Airport::default()
        };
        assert_eq!(a.invalid_fields(), vec![Airport::ICAO, Airport::LATITUDE]);
    }
}
