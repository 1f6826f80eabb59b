use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{CurrencyKind, EntryKind, RowId},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// A qualification whose expiry is derived from its triggering date.
///
/// Only the trigger is stored; the expiry is computed on every read from the
/// configured validity period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Storage id.
    pub id: Option<RowId>,
    /// Qualification slot.
    pub kind: CurrencyKind,
    /// Display name, used by the custom slots.
    pub name: Option<String>,
    /// Date of the check, issue or renewal that started the validity.
    pub trigger_date: Option<NaiveDate>,
}

impl Currency {
    const KIND_CODE: &'static str = "kind";
    const NAME: &'static str = "name";
    const TRIGGER: &'static str = "trigger_date";

    /// Unsaved currency of `kind` triggered on `date`.
    pub fn new(kind: CurrencyKind, trigger_date: NaiveDate) -> Self {
        Self {
            id: None,
            kind,
            name: None,
            trigger_date: Some(trigger_date),
        }
    }
}

impl LogbookEntry for Currency {
    const KIND: EntryKind = EntryKind::Currency;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            kind: r.code(Self::KIND_CODE, CurrencyKind::from_code)?,
            name: r.opt_text(Self::NAME)?,
            trigger_date: Some(r.date(Self::TRIGGER)?),
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::KIND_CODE, self.kind.code())
            .set(Self::NAME, self.name.as_deref())
            .set(Self::TRIGGER, self.trigger_date)
            .finish()
    }

    fn row_id(&self) -> Option<RowId> {
        self.id
    }

    fn set_row_id(&mut self, id: RowId) {
        self.id = Some(id);
    }

    fn invalid_fields(&self) -> Vec<&'static str> {
        let mut out = blank_text(&[(Self::NAME, self.name.as_deref())]);
        if self.trigger_date.is_none() {
            out.push(Self::TRIGGER);
        }
        out
    }
}
