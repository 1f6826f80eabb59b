//! Loosely typed column values and the helpers entries use to read them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LogbookError, LogbookResult},
    types::{RowId, TimeOfDay},
};

/// One column value as exchanged with storage and collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL` / absent.
    #[default]
    Null,
    /// Integer column.
    Integer(i64),
    /// Floating point column.
    Real(f64),
    /// Text column.
    Text(String),
}

impl Value {
    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer content, if any.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Text(value.format("%Y-%m-%d").to_string())
    }
}

impl From<TimeOfDay> for Value {
    fn from(value: TimeOfDay) -> Self {
        Value::Integer(i64::from(value.minutes()))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(v) => ToSqlOutput::from(*v),
            Value::Real(v) => ToSqlOutput::from(*v),
            Value::Text(v) => ToSqlOutput::from(v.as_str()),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => return Err(FromSqlError::InvalidType),
        })
    }
}

/// Column name to value mapping for a single row.
pub type RowData = BTreeMap<String, Value>;

/// Typed accessors over a [`RowData`] that fail with `MalformedRow`.
pub(crate) struct RowReader<'a> {
    table: &'static str,
    row: &'a RowData,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(table: &'static str, row: &'a RowData) -> Self {
        Self { table, row }
    }

    fn malformed(&self, column: &str, reason: impl Into<String>) -> LogbookError {
        LogbookError::MalformedRow {
            table: self.table,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    fn present(&self, column: &str) -> Option<&'a Value> {
        match self.row.get(column) {
            None | Some(Value::Null) => None,
            Some(Value::Text(t)) if t.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn require(&self, column: &str) -> LogbookResult<&'a Value> {
        self.present(column)
            .ok_or_else(|| self.malformed(column, "is missing"))
    }

    pub(crate) fn text(&self, column: &str) -> LogbookResult<String> {
        self.opt_text(column)?
            .ok_or_else(|| self.malformed(column, "is missing"))
    }

    pub(crate) fn opt_text(&self, column: &str) -> LogbookResult<Option<String>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Text(t)) => Ok(Some(t.clone())),
            Some(Value::Integer(v)) => Ok(Some(v.to_string())),
            Some(Value::Real(_)) => Err(self.malformed(column, "expected text, found real")),
            Some(Value::Null) => Ok(None),
        }
    }

    pub(crate) fn int(&self, column: &str) -> LogbookResult<i64> {
        let value = self.require(column)?;
        self.to_int(column, value)
    }

    pub(crate) fn opt_int(&self, column: &str) -> LogbookResult<Option<i64>> {
        self.present(column)
            .map(|value| self.to_int(column, value))
            .transpose()
    }

    fn to_int(&self, column: &str, value: &Value) -> LogbookResult<i64> {
        match value {
            Value::Integer(v) => Ok(*v),
            Value::Text(t) => t
                .trim()
                .parse()
                .map_err(|_| self.malformed(column, format!("expected integer, found `{t}`"))),
            Value::Real(r) if r.fract() == 0.0 && r.is_finite() => Ok(*r as i64),
            other => Err(self.malformed(column, format!("expected integer, found {other:?}"))),
        }
    }

    pub(crate) fn opt_real(&self, column: &str) -> LogbookResult<Option<f64>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Real(r)) => Ok(Some(*r)),
            Some(Value::Integer(v)) => Ok(Some(*v as f64)),
            Some(Value::Text(t)) => t
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.malformed(column, format!("expected number, found `{t}`"))),
            Some(Value::Null) => Ok(None),
        }
    }

    pub(crate) fn opt_id(&self, column: &str) -> LogbookResult<Option<RowId>> {
        self.opt_int(column)
    }

    pub(crate) fn id(&self, column: &str) -> LogbookResult<RowId> {
        self.int(column)
    }

    /// Required non-negative duration in minutes.
    pub(crate) fn minutes(&self, column: &str) -> LogbookResult<u32> {
        let v = self.int(column)?;
        u32::try_from(v).map_err(|_| self.malformed(column, format!("expected minutes, found {v}")))
    }

    pub(crate) fn count(&self, column: &str) -> LogbookResult<u32> {
        match self.opt_int(column)? {
            None => Ok(0),
            Some(v) => u32::try_from(v).map_err(|_| {
                self.malformed(column, format!("expected a non-negative count, found {v}"))
            }),
        }
    }

    pub(crate) fn flag(&self, column: &str) -> LogbookResult<bool> {
        match self.opt_int(column)? {
            None | Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(v) => Err(self.malformed(column, format!("expected 0 or 1, found {v}"))),
        }
    }

    pub(crate) fn opt_date(&self, column: &str) -> LogbookResult<Option<NaiveDate>> {
        match self.opt_text(column)? {
            None => Ok(None),
            Some(t) => NaiveDate::parse_from_str(&t, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| self.malformed(column, format!("expected YYYY-MM-DD, found `{t}`"))),
        }
    }

    pub(crate) fn date(&self, column: &str) -> LogbookResult<NaiveDate> {
        self.opt_date(column)?
            .ok_or_else(|| self.malformed(column, "is missing"))
    }

    pub(crate) fn time(&self, column: &str) -> LogbookResult<TimeOfDay> {
        self.opt_time(column)?
            .ok_or_else(|| self.malformed(column, "is missing"))
    }

    pub(crate) fn opt_time(&self, column: &str) -> LogbookResult<Option<TimeOfDay>> {
        match self.opt_int(column)? {
            None => Ok(None),
            Some(v) => u16::try_from(v)
                .ok()
                .and_then(TimeOfDay::from_minutes)
                .map(Some)
                .ok_or_else(|| self.malformed(column, format!("{v} is not a minute of the day"))),
        }
    }

    /// Decodes an enum stored as an integer code; absent reads as the default.
    pub(crate) fn int_code<T: Default>(
        &self,
        column: &str,
        decode: fn(i64) -> Option<T>,
    ) -> LogbookResult<T> {
        match self.opt_int(column)? {
            None => Ok(T::default()),
            Some(code) => decode(code)
                .ok_or_else(|| self.malformed(column, format!("unknown code {code}"))),
        }
    }

    /// Decodes a required enum stored as an integer code.
    pub(crate) fn code<T>(&self, column: &str, decode: fn(i64) -> Option<T>) -> LogbookResult<T> {
        let code = self.int(column)?;
        decode(code).ok_or_else(|| self.malformed(column, format!("unknown code {code}")))
    }

    pub(crate) fn text_code<T: Default>(
        &self,
        column: &str,
        decode: fn(&str) -> Option<T>,
    ) -> LogbookResult<T> {
        match self.opt_text(column)? {
            None => Ok(T::default()),
            Some(code) => decode(&code)
                .ok_or_else(|| self.malformed(column, format!("unknown code `{code}`"))),
        }
    }
}

/// Builds the column map returned by `to_row`; absent values are written as `Null`.
pub(crate) struct RowWriter {
    row: RowData,
}

impl RowWriter {
    pub(crate) fn new(id_column: &str, id: Option<RowId>) -> Self {
        let mut row = RowData::new();
        if let Some(id) = id {
            row.insert(id_column.to_string(), Value::Integer(id));
        }
        Self { row }
    }

    pub(crate) fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.row.insert(column.to_string(), value.into());
        self
    }

    pub(crate) fn finish(self) -> RowData {
        self.row
    }
}
