use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{EntryKind, RowId},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// A specific registered airframe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tail {
    /// Storage id.
    pub id: Option<RowId>,
    /// Registration, unique across tails.
    pub registration: String,
    /// Referenced aircraft type.
    pub aircraft_type_id: Option<RowId>,
    /// Operator.
    pub company: Option<String>,
}

impl Tail {
    pub(crate) const REGISTRATION: &'static str = "registration";
    pub(crate) const AIRCRAFT_TYPE: &'static str = "aircraft_type_id";
    pub(crate) const COMPANY: &'static str = "company";
}

impl LogbookEntry for Tail {
    const KIND: EntryKind = EntryKind::Tail;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            registration: r.text(Self::REGISTRATION)?,
            aircraft_type_id: Some(r.id(Self::AIRCRAFT_TYPE)?),
            company: r.opt_text(Self::COMPANY)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::REGISTRATION, self.registration.as_str())
            .set(Self::AIRCRAFT_TYPE, self.aircraft_type_id)
            .set(Self::COMPANY, self.company.as_deref())
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
        if self.registration.trim().is_empty() {
            out.push(Self::REGISTRATION);
        }
        if self.aircraft_type_id.is_none() {
            out.push(Self::AIRCRAFT_TYPE);
        }
        out.extend(blank_text(&[(Self::COMPANY, self.company.as_deref())]));
        out
    }
}
