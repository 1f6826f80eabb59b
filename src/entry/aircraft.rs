use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{AircraftCategory, EngineType, EntryKind, RowId, WeightClass},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// Aircraft type as listed in the reference data, e.g. `Airbus A320-200`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AircraftType {
    /// Storage id.
    pub id: Option<RowId>,
    /// Manufacturer.
    pub make: String,
    /// Model designation.
    pub model: String,
    /// Variant suffix.
    pub variant: Option<String>,
    /// Common name.
    pub name: Option<String>,
    /// ICAO type designator.
    pub icao_code: Option<String>,
    /// IATA type code.
    pub iata_code: Option<String>,
    /// Certified for multi-pilot operation.
    pub multi_pilot: bool,
    /// More than one engine.
    pub multi_engine: bool,
    /// Powerplant class.
    pub engine_type: EngineType,
    /// Wake turbulence class.
    pub weight_class: WeightClass,
}

impl AircraftType {
    pub(crate) const MAKE: &'static str = "make";
    pub(crate) const MODEL: &'static str = "model";
    pub(crate) const VARIANT: &'static str = "variant";
    const NAME: &'static str = "name";
    const ICAO: &'static str = "icao";
    const IATA: &'static str = "iata";
    pub(crate) const MULTI_PILOT: &'static str = "multipilot";
    pub(crate) const MULTI_ENGINE: &'static str = "multiengine";
    const ENGINE_TYPE: &'static str = "engine_type";
    const WEIGHT_CLASS: &'static str = "weight_class";

    /// `make model` or `make model-variant`.
    pub fn display_name(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{} {}-{}", self.make, self.model, variant),
            None => format!("{} {}", self.make, self.model),
        }
    }

    /// Category used for the SP-SE / SP-ME / MP time buckets.
    pub fn category(&self) -> AircraftCategory {
        category_from_flags(self.multi_pilot, self.multi_engine)
    }
}

pub(crate) fn category_from_flags(multi_pilot: bool, multi_engine: bool) -> AircraftCategory {
    match (multi_pilot, multi_engine) {
        (true, _) => AircraftCategory::MultiPilot,
        (false, true) => AircraftCategory::SinglePilotMultiEngine,
        (false, false) => AircraftCategory::SinglePilotSingleEngine,
    }
}

impl LogbookEntry for AircraftType {
    const KIND: EntryKind = EntryKind::AircraftType;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            make: r.text(Self::MAKE)?,
            model: r.text(Self::MODEL)?,
            variant: r.opt_text(Self::VARIANT)?,
            name: r.opt_text(Self::NAME)?,
            icao_code: r.opt_text(Self::ICAO)?,
            iata_code: r.opt_text(Self::IATA)?,
            multi_pilot: r.flag(Self::MULTI_PILOT)?,
            multi_engine: r.flag(Self::MULTI_ENGINE)?,
            engine_type: r.int_code(Self::ENGINE_TYPE, EngineType::from_code)?,
            weight_class: r.int_code(Self::WEIGHT_CLASS, WeightClass::from_code)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::MAKE, self.make.as_str())
            .set(Self::MODEL, self.model.as_str())
            .set(Self::VARIANT, self.variant.as_deref())
            .set(Self::NAME, self.name.as_deref())
            .set(Self::ICAO, self.icao_code.as_deref())
            .set(Self::IATA, self.iata_code.as_deref())
            .set(Self::MULTI_PILOT, self.multi_pilot)
            .set(Self::MULTI_ENGINE, self.multi_engine)
            .set(Self::ENGINE_TYPE, self.engine_type.code())
            .set(Self::WEIGHT_CLASS, self.weight_class.code())
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
        if self.make.trim().is_empty() {
            out.push(Self::MAKE);
        }
        if self.model.trim().is_empty() {
            out.push(Self::MODEL);
        }
        out.extend(blank_text(&[
            (Self::VARIANT, self.variant.as_deref()),
            (Self::NAME, self.name.as_deref()),
            (Self::ICAO, self.icao_code.as_deref()),
            (Self::IATA, self.iata_code.as_deref()),
        ]));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_includes_variant_when_present() {
        let mut t = AircraftType {
            make: "Airbus".into(),
            model: "A320".into(),
            ..AircraftType::default()
        };
        assert_eq!(t.display_name(), "Airbus A320");
        t.variant = Some("200".into());
        assert_eq!(t.display_name(), "Airbus A320-200");
    }

    #[test]
    fn multi_pilot_wins_over_engine_count() {
        assert_eq!(category_from_flags(true, false), AircraftCategory::MultiPilot);
        assert_eq!(category_from_flags(false, true), AircraftCategory::SinglePilotMultiEngine);
        assert_eq!(category_from_flags(false, false), AircraftCategory::SinglePilotSingleEngine);
    }
}
