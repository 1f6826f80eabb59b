//! Reporting queries over the logbook views.

use chrono::NaiveDate;
use rusqlite::params_from_iter;
use serde::{Deserialize, Serialize};

use crate::{
    entry::Value,
    error::LogbookResult,
    types::LogbookView,
};

use super::Database;

/// Inclusive date range selecting rows; unbounded ends match everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryFilter {
    /// First date included.
    pub date_from: Option<NaiveDate>,
    /// Last date included.
    pub date_to: Option<NaiveDate>,
}

impl QueryFilter {
    /// Row condition on a `date` column, bound to [`QueryFilter::params`].
    pub(crate) const CONDITION: &'static str =
        "(?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)";

    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches `from..=to`.
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            date_from: Some(from),
            date_to: Some(to),
        }
    }

    /// Matches one calendar year.
    pub fn year(year: i32) -> Self {
        Self {
            date_from: NaiveDate::from_ymd_opt(year, 1, 1),
            date_to: NaiveDate::from_ymd_opt(year, 12, 31),
        }
    }

    pub(crate) fn params(&self) -> [Value; 2] {
        [Value::from(self.date_from), Value::from(self.date_to)]
    }
}

/// Rows of a reporting view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Row values, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Index of `column`, if the view has it.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Values of `column` across all rows.
    pub fn column(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }
}

impl Database {
    /// Rows of `view` selected by `filter`, newest first.
    ///
    /// Selection depends only on the filter; the view decides which columns
    /// are joined in.
    pub fn query(&self, view: LogbookView, filter: &QueryFilter) -> LogbookResult<QueryResult> {
        self.ensure_ready()?;
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY date DESC, id DESC",
            view.view_name(),
            QueryFilter::CONDITION
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let width = columns.len();
        let rows = stmt
            .query_map(params_from_iter(filter.params()), |row| {
                (0..width).map(|i| row.get::<_, Value>(i)).collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(QueryResult { columns, rows })
    }
}
