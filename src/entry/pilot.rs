use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    types::{EntryKind, RowId},
};

use super::{
    LogbookEntry, blank_text,
    row::{RowData, RowReader, RowWriter},
};

/// A crew member, including the logbook owner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pilot {
    /// Storage id.
    pub id: Option<RowId>,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Short name used in crew lists.
    pub alias: Option<String>,
    /// Employer.
    pub company: Option<String>,
    /// Employer's staff number.
    pub employee_id: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// E-mail address.
    pub email: Option<String>,
}

impl Pilot {
    pub(crate) const LAST_NAME: &'static str = "last_name";
    pub(crate) const FIRST_NAME: &'static str = "first_name";
    const ALIAS: &'static str = "alias";
    pub(crate) const COMPANY: &'static str = "company";
    const EMPLOYEE_ID: &'static str = "employee_id";
    const PHONE: &'static str = "phone";
    const EMAIL: &'static str = "email";

    /// `last, first`, or just `last` without a first name.
    pub fn display_name(&self) -> String {
        display_name(&self.last_name, self.first_name.as_deref())
    }
}

pub(crate) fn display_name(last: &str, first: Option<&str>) -> String {
    match first.map(str::trim).filter(|f| !f.is_empty()) {
        Some(first) => format!("{last}, {first}"),
        None => last.to_string(),
    }
}

impl LogbookEntry for Pilot {
    const KIND: EntryKind = EntryKind::Pilot;

    fn from_row(row: &RowData) -> LogbookResult<Self> {
        let r = RowReader::new(Self::KIND.table_name(), row);
        Ok(Self {
            id: r.opt_id(Self::KIND.id_column())?,
            last_name: r.text(Self::LAST_NAME)?,
            first_name: r.opt_text(Self::FIRST_NAME)?,
            alias: r.opt_text(Self::ALIAS)?,
            company: r.opt_text(Self::COMPANY)?,
            employee_id: r.opt_text(Self::EMPLOYEE_ID)?,
            phone: r.opt_text(Self::PHONE)?,
            email: r.opt_text(Self::EMAIL)?,
        })
    }

    fn to_row(&self) -> RowData {
        RowWriter::new(Self::KIND.id_column(), self.id)
            .set(Self::LAST_NAME, self.last_name.as_str())
            .set(Self::FIRST_NAME, self.first_name.as_deref())
            .set(Self::ALIAS, self.alias.as_deref())
            .set(Self::COMPANY, self.company.as_deref())
            .set(Self::EMPLOYEE_ID, self.employee_id.as_deref())
            .set(Self::PHONE, self.phone.as_deref())
            .set(Self::EMAIL, self.email.as_deref())
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
        if self.last_name.trim().is_empty() {
            out.push(Self::LAST_NAME);
        }
        out.extend(blank_text(&[
            (Self::FIRST_NAME, self.first_name.as_deref()),
            (Self::ALIAS, self.alias.as_deref()),
            (Self::COMPANY, self.company.as_deref()),
            (Self::EMPLOYEE_ID, self.employee_id.as_deref()),
            (Self::PHONE, self.phone.as_deref()),
            (Self::EMAIL, self.email.as_deref()),
        ]));
        out
    }
}
