//! Table definitions, verification of existing tables and reporting views.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::{
    error::{LogbookError, LogbookResult},
    types::{EntryKind, LogbookView},
};

use super::{Database, SchemaState, SeedData, seed};

/// One expected column: name, declared type and constraint suffix.
struct Column {
    name: &'static str,
    sql_type: &'static str,
    constraint: &'static str,
}

const fn col(name: &'static str, sql_type: &'static str, constraint: &'static str) -> Column {
    Column {
        name,
        sql_type,
        constraint,
    }
}

const AIRCRAFT_TYPE_COLUMNS: &[Column] = &[
    col("make", "TEXT", "NOT NULL"),
    col("model", "TEXT", "NOT NULL"),
    col("variant", "TEXT", ""),
    col("name", "TEXT", ""),
    col("icao", "TEXT", ""),
    col("iata", "TEXT", ""),
    col("multipilot", "INTEGER", "NOT NULL DEFAULT 0"),
    col("multiengine", "INTEGER", "NOT NULL DEFAULT 0"),
    col("engine_type", "INTEGER", ""),
    col("weight_class", "INTEGER", ""),
];

const TAIL_COLUMNS: &[Column] = &[
    col("registration", "TEXT", "NOT NULL"),
    col(
        "aircraft_type_id",
        "INTEGER",
        "NOT NULL REFERENCES aircraft_types(aircraft_type_id) ON DELETE RESTRICT",
    ),
    col("company", "TEXT", ""),
];

const PILOT_COLUMNS: &[Column] = &[
    col("last_name", "TEXT", "NOT NULL"),
    col("first_name", "TEXT", ""),
    col("alias", "TEXT", ""),
    col("company", "TEXT", ""),
    col("employee_id", "TEXT", ""),
    col("phone", "TEXT", ""),
    col("email", "TEXT", ""),
];

const AIRPORT_COLUMNS: &[Column] = &[
    col("icao", "TEXT", "NOT NULL"),
    col("iata", "TEXT", ""),
    col("name", "TEXT", ""),
    col("country", "TEXT", ""),
    col("latitude", "REAL", ""),
    col("longitude", "REAL", ""),
    col("elevation_ft", "INTEGER", ""),
    col("utc_offset", "INTEGER", ""),
    col("tz_olson", "TEXT", ""),
];

const FLIGHT_COLUMNS: &[Column] = &[
    col("date", "TEXT", "NOT NULL"),
    col("departure", "TEXT", "NOT NULL"),
    col("destination", "TEXT", "NOT NULL"),
    col("off_block", "INTEGER", "NOT NULL"),
    col("on_block", "INTEGER", "NOT NULL"),
    col("pic_id", "INTEGER", "NOT NULL REFERENCES pilots(pilot_id) ON DELETE RESTRICT"),
    col("second_pilot_id", "INTEGER", "REFERENCES pilots(pilot_id) ON DELETE RESTRICT"),
    col("third_pilot_id", "INTEGER", "REFERENCES pilots(pilot_id) ON DELETE RESTRICT"),
    col("tail_id", "INTEGER", "NOT NULL REFERENCES tails(tail_id) ON DELETE RESTRICT"),
    col("pilot_function", "INTEGER", "NOT NULL DEFAULT 0"),
    col("flight_rules", "TEXT", "NOT NULL DEFAULT 'VFR'"),
    col("pilot_flying", "INTEGER", "NOT NULL DEFAULT 0"),
    col("takeoffs_day", "INTEGER", "NOT NULL DEFAULT 0"),
    col("takeoffs_night", "INTEGER", "NOT NULL DEFAULT 0"),
    col("landings_day", "INTEGER", "NOT NULL DEFAULT 0"),
    col("landings_night", "INTEGER", "NOT NULL DEFAULT 0"),
    col("autoland", "INTEGER", "NOT NULL DEFAULT 0"),
    col("approach_type", "TEXT", ""),
    col("flight_number", "TEXT", ""),
    col("remarks", "TEXT", ""),
    // Derived, written together with the source columns.
    col("total_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("night_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("ifr_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("spse_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("spme_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("mp_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("pic_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("picus_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("sic_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("dual_time", "INTEGER", "NOT NULL DEFAULT 0"),
    col("fi_time", "INTEGER", "NOT NULL DEFAULT 0"),
];

const SIMULATOR_COLUMNS: &[Column] = &[
    col("date", "TEXT", "NOT NULL"),
    col("device", "TEXT", "NOT NULL"),
    col("duration", "INTEGER", "NOT NULL"),
    col("aircraft_type", "TEXT", ""),
    col("registration", "TEXT", ""),
    col("remarks", "TEXT", ""),
];

const CURRENCY_COLUMNS: &[Column] = &[
    col("kind", "INTEGER", "NOT NULL"),
    col("name", "TEXT", ""),
    col("trigger_date", "TEXT", "NOT NULL"),
];

fn columns(kind: EntryKind) -> &'static [Column] {
    match kind {
        EntryKind::AircraftType => AIRCRAFT_TYPE_COLUMNS,
        EntryKind::Tail => TAIL_COLUMNS,
        EntryKind::Pilot => PILOT_COLUMNS,
        EntryKind::Airport => AIRPORT_COLUMNS,
        EntryKind::Flight => FLIGHT_COLUMNS,
        EntryKind::Simulator => SIMULATOR_COLUMNS,
        EntryKind::Currency => CURRENCY_COLUMNS,
    }
}

const INDEXES: &str = "
CREATE UNIQUE INDEX IF NOT EXISTS idx_airports_icao ON airports(icao);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tails_registration ON tails(registration);
CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(date);
CREATE INDEX IF NOT EXISTS idx_simulator_sessions_date ON simulator_sessions(date);
";

const PILOT_NAME: &str = "CASE WHEN p.first_name IS NULL OR p.first_name = '' \
     THEN p.last_name ELSE p.last_name || ', ' || p.first_name END";

const TYPE_NAME: &str = "CASE WHEN a.variant IS NULL OR a.variant = '' \
     THEN a.make || ' ' || a.model ELSE a.make || ' ' || a.model || '-' || a.variant END";

fn hhmm(column: &str) -> String {
    format!("printf('%02d:%02d', {column} / 60, {column} % 60)")
}

fn flight_joins() -> &'static str {
    "FROM flights f \
     JOIN pilots p ON p.pilot_id = f.pic_id \
     JOIN tails t ON t.tail_id = f.tail_id \
     JOIN aircraft_types a ON a.aircraft_type_id = t.aircraft_type_id"
}

fn default_select(with_sim_column: bool) -> String {
    let sim = if with_sim_column { ", NULL AS sim_time" } else { "" };
    format!(
        "SELECT f.flight_id AS id, f.date AS date, f.departure AS departure, {off} AS off_block, \
         f.destination AS destination, {on} AS on_block, {PILOT_NAME} AS pic, \
         {TYPE_NAME} AS aircraft_type, t.registration AS registration, \
         f.total_time AS total_time{sim}, f.pilot_function AS pilot_function, \
         f.remarks AS remarks {joins}",
        off = hhmm("f.off_block"),
        on = hhmm("f.on_block"),
        joins = flight_joins(),
    )
}

fn default_sim_select() -> String {
    "SELECT s.session_id AS id, s.date AS date, NULL AS departure, NULL AS off_block, \
     NULL AS destination, NULL AS on_block, s.device AS pic, s.aircraft_type AS aircraft_type, \
     s.registration AS registration, NULL AS total_time, s.duration AS sim_time, \
     NULL AS pilot_function, s.remarks AS remarks FROM simulator_sessions s"
        .to_string()
}

fn easa_select(with_sim_column: bool) -> String {
    let sim = if with_sim_column { ", NULL AS sim_type, NULL AS sim_time" } else { "" };
    format!(
        "SELECT f.flight_id AS id, f.date AS date, f.departure AS departure, {off} AS off_block, \
         f.destination AS destination, {on} AS on_block, {TYPE_NAME} AS aircraft_type, \
         t.registration AS registration, f.spse_time AS spse_time, f.spme_time AS spme_time, \
         f.mp_time AS mp_time, f.total_time AS total_time, {PILOT_NAME} AS pic, \
         f.takeoffs_day AS takeoffs_day, f.takeoffs_night AS takeoffs_night, \
         f.landings_day AS landings_day, f.landings_night AS landings_night, \
         f.night_time AS night_time, f.ifr_time AS ifr_time, f.pic_time AS pic_time, \
         f.sic_time AS sic_time, f.dual_time AS dual_time, f.fi_time AS fi_time{sim}, \
         f.remarks AS remarks {joins}",
        off = hhmm("f.off_block"),
        on = hhmm("f.on_block"),
        joins = flight_joins(),
    )
}

fn easa_sim_select() -> String {
    "SELECT s.session_id AS id, s.date AS date, NULL AS departure, NULL AS off_block, \
     NULL AS destination, NULL AS on_block, s.aircraft_type AS aircraft_type, \
     s.registration AS registration, NULL AS spse_time, NULL AS spme_time, NULL AS mp_time, \
     NULL AS total_time, NULL AS pic, NULL AS takeoffs_day, NULL AS takeoffs_night, \
     NULL AS landings_day, NULL AS landings_night, NULL AS night_time, NULL AS ifr_time, \
     NULL AS pic_time, NULL AS sic_time, NULL AS dual_time, NULL AS fi_time, \
     s.device AS sim_type, s.duration AS sim_time, s.remarks AS remarks \
     FROM simulator_sessions s"
        .to_string()
}

/// `SELECT` body of `view`.
fn view_body(view: LogbookView) -> String {
    match view {
        LogbookView::Default => default_select(false),
        LogbookView::DefaultWithSimulator => {
            format!("{} UNION ALL {}", default_select(true), default_sim_select())
        }
        LogbookView::EasaCompliant => easa_select(false),
        LogbookView::EasaWithSimulator => {
            format!("{} UNION ALL {}", easa_select(true), easa_sim_select())
        }
        LogbookView::SimulatorOnly => "SELECT s.session_id AS id, s.date AS date, \
             s.device AS device, s.aircraft_type AS aircraft_type, \
             s.registration AS registration, s.duration AS duration, s.remarks AS remarks \
             FROM simulator_sessions s"
            .to_string(),
    }
}

fn create_table_sql(kind: EntryKind) -> String {
    let mut defs = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", kind.id_column())];
    for c in columns(kind) {
        let def = format!("{} {} {}", c.name, c.sql_type, c.constraint);
        defs.push(def.trim_end().to_string());
    }
    format!("CREATE TABLE {} (\n    {}\n)", kind.table_name(), defs.join(",\n    "))
}

fn table_exists(conn: &Connection, table: &str) -> LogbookResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Fails unless `kind`'s table holds every expected column with its declared type.
fn verify_table(conn: &Connection, kind: EntryKind) -> LogbookResult<()> {
    let table = kind.table_name();
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let existing = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let expected = std::iter::once((kind.id_column(), "INTEGER"))
        .chain(columns(kind).iter().map(|c| (c.name, c.sql_type)));
    for (name, sql_type) in expected {
        match existing.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            None => {
                return Err(LogbookError::Schema(format!(
                    "table `{table}` is missing column `{name}`"
                )));
            }
            Some((_, found)) if !found.eq_ignore_ascii_case(sql_type) => {
                return Err(LogbookError::Schema(format!(
                    "column `{table}.{name}` has type `{found}`, expected `{sql_type}`"
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn row_count(conn: &Connection, kind: EntryKind) -> LogbookResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

impl Database {
    /// Creates missing tables and indexes, rebuilds the views, verifies
    /// existing tables and imports `seed` into empty reference tables.
    ///
    /// Runs in one transaction: on any failure nothing is committed and the
    /// service stays in its previous state. Existing data is never dropped.
    pub fn initialize_schema(&mut self, seed: Option<&SeedData>) -> LogbookResult<()> {
        let tx = self.conn.transaction()?;

        for kind in EntryKind::ALL {
            if table_exists(&tx, kind.table_name())? {
                verify_table(&tx, kind)?;
                debug!(table = kind.table_name(), "existing table verified");
            } else {
                tx.execute_batch(&create_table_sql(kind))?;
                info!(table = kind.table_name(), "table created");
            }
        }
        tx.execute_batch(INDEXES)
            .map_err(|e| LogbookError::Schema(format!("cannot create indexes: {e}")))?;
        // Views hold no data; rebuilding them replaces bodies left by older versions.
        for view in LogbookView::ALL {
            let name = view.view_name();
            tx.execute_batch(&format!(
                "DROP VIEW IF EXISTS {name}; CREATE VIEW {name} AS {}",
                view_body(view)
            ))
            .map_err(|e| LogbookError::Schema(format!("cannot create view `{name}`: {e}")))?;
        }

        if let Some(seed) = seed {
            if row_count(&tx, EntryKind::AircraftType)? == 0 {
                let n = seed::import(&tx, EntryKind::AircraftType, &seed.aircraft_types)?;
                info!(rows = n, "aircraft types seeded");
            } else {
                debug!("aircraft types present, seed skipped");
            }
            if row_count(&tx, EntryKind::Airport)? == 0 {
                let n = seed::import(&tx, EntryKind::Airport, &seed.airports)?;
                info!(rows = n, "airports seeded");
            } else {
                debug!("airports present, seed skipped");
            }
        }

        tx.commit()?;
        if self.state == SchemaState::Uninitialized {
            info!("logbook schema ready");
        }
        self.state = SchemaState::Ready;
        self.cache.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_statements_carry_primary_keys_and_foreign_keys() {
        let sql = create_table_sql(EntryKind::Tail);
        assert!(sql.starts_with("CREATE TABLE tails"));
        assert!(sql.contains("tail_id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("ON DELETE RESTRICT"));
    }

    #[test]
    fn every_view_selects_id_and_date() {
        for view in LogbookView::ALL {
            let body = view_body(view);
            assert!(body.contains(" AS id,"), "{view:?}");
            assert!(body.contains(" AS date,"), "{view:?}");
        }
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch("CREATE TABLE pilots (pilot_id INTEGER PRIMARY KEY, first_name TEXT)")
            .expect("create");
        let err = verify_table(&conn, EntryKind::Pilot).expect_err("incompatible");
        assert!(matches!(err, LogbookError::Schema(msg) if msg.contains("last_name")));
    }

    #[test]
    fn wrong_column_type_is_a_schema_error() {
        let conn = Connection::open_in_memory().expect("open");
        let sql = create_table_sql(EntryKind::Currency)
            .replace("trigger_date TEXT", "trigger_date REAL");
        conn.execute_batch(&sql).expect("create");
        let err = verify_table(&conn, EntryKind::Currency).expect_err("incompatible");
        assert!(matches!(err, LogbookError::Schema(msg) if msg.contains("trigger_date")));
    }
}
