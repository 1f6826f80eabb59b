//! Shared identifiers, time-of-day values and logbook enums.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Storage-assigned row identifier.
pub type RowId = i64;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Closed set of logbook record kinds, one per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryKind {
    /// Aircraft type reference data.
    AircraftType,
    /// Registered airframe.
    Tail,
    /// Crew member.
    Pilot,
    /// Airport reference data.
    Airport,
    /// Logged flight.
    Flight,
    /// Simulator session.
    Simulator,
    /// Qualification with an expiry.
    Currency,
}

impl EntryKind {
    /// Every kind, in schema creation order.
    pub const ALL: [EntryKind; 7] = [
        EntryKind::AircraftType,
        EntryKind::Tail,
        EntryKind::Pilot,
        EntryKind::Airport,
        EntryKind::Flight,
        EntryKind::Simulator,
        EntryKind::Currency,
    ];

    /// Name of the backing table.
    pub const fn table_name(self) -> &'static str {
        match self {
            EntryKind::AircraftType => "aircraft_types",
            EntryKind::Tail => "tails",
            EntryKind::Pilot => "pilots",
            EntryKind::Airport => "airports",
            EntryKind::Flight => "flights",
            EntryKind::Simulator => "simulator_sessions",
            EntryKind::Currency => "currencies",
        }
    }

    /// Name of the integer primary key column.
    pub const fn id_column(self) -> &'static str {
        match self {
            EntryKind::AircraftType => "aircraft_type_id",
            EntryKind::Tail => "tail_id",
            EntryKind::Pilot => "pilot_id",
            EntryKind::Airport => "airport_id",
            EntryKind::Flight => "flight_id",
            EntryKind::Simulator => "session_id",
            EntryKind::Currency => "currency_id",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Time of day in whole minutes after midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Returns `None` unless `minutes < 1440`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Returns `None` for hours above 23 or minutes above 59.
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Self(hours * 60 + minutes))
    }

    /// Minutes after midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Parses operator input in the shapes `hh:mm`, `h:mm`, `hhmm` or `hmm`.
    ///
    /// A three digit input below `240` is read with a leading zero, so `130`
    /// is `01:30` while `930` is `09:30`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if !input.is_ascii() {
            return None;
        }
        let (hours, minutes) = match (input.len(), input.find(':')) {
            (4, Some(1)) | (5, Some(2)) => {
                let (h, m) = input.split_at(input.len() - 3);
                (h, &m[1..])
            }
            (3, None) | (4, None) => input.split_at(input.len() - 2),
            _ => return None,
        };
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::from_hm(hours.parse().ok()?, minutes.parse().ok()?)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Renders a duration in minutes as `hh:mm`; hours are not wrapped at 24.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Role the logbook owner served in on a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PilotFunction {
    /// Pilot in command.
    #[default]
    Pic,
    /// Pilot in command under supervision.
    Picus,
    /// Second in command.
    Sic,
    /// Dual instruction received.
    Dual,
    /// Flight instructor.
    Fi,
}

impl PilotFunction {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            PilotFunction::Pic => 0,
            PilotFunction::Picus => 1,
            PilotFunction::Sic => 2,
            PilotFunction::Dual => 3,
            PilotFunction::Fi => 4,
        }
    }

    /// Inverse of [`PilotFunction::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => PilotFunction::Pic,
            1 => PilotFunction::Picus,
            2 => PilotFunction::Sic,
            3 => PilotFunction::Dual,
            4 => PilotFunction::Fi,
            _ => return None,
        })
    }
}

/// Flight rules a flight was conducted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlightRules {
    /// Visual flight rules.
    #[default]
    Vfr,
    /// Instrument flight rules.
    Ifr,
}

impl FlightRules {
    /// Stored text code.
    pub fn code(self) -> &'static str {
        match self {
            FlightRules::Vfr => "VFR",
            FlightRules::Ifr => "IFR",
        }
    }

    /// Inverse of [`FlightRules::code`].
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "VFR" => Some(FlightRules::Vfr),
            "IFR" => Some(FlightRules::Ifr),
            _ => None,
        }
    }
}

/// Powerplant class of an aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineType {
    /// Gliders and balloons.
    Unpowered,
    /// Piston engines.
    #[default]
    Piston,
    /// Turboprop engines.
    Turboprop,
    /// Jet engines.
    Jet,
}

impl EngineType {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            EngineType::Unpowered => 0,
            EngineType::Piston => 1,
            EngineType::Turboprop => 2,
            EngineType::Jet => 3,
        }
    }

    /// Inverse of [`EngineType::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => EngineType::Unpowered,
            1 => EngineType::Piston,
            2 => EngineType::Turboprop,
            3 => EngineType::Jet,
            _ => return None,
        })
    }
}

/// Wake turbulence weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightClass {
    /// Light.
    #[default]
    Light,
    /// Medium.
    Medium,
    /// Heavy.
    Heavy,
    /// Super.
    Super,
}

impl WeightClass {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            WeightClass::Light => 0,
            WeightClass::Medium => 1,
            WeightClass::Heavy => 2,
            WeightClass::Super => 3,
        }
    }

    /// Inverse of [`WeightClass::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => WeightClass::Light,
            1 => WeightClass::Medium,
            2 => WeightClass::Heavy,
            3 => WeightClass::Super,
            _ => return None,
        })
    }
}

/// Flight category of an aircraft type, used for the SP/MP time buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftCategory {
    /// Single pilot, single engine.
    SinglePilotSingleEngine,
    /// Single pilot, multi engine.
    SinglePilotMultiEngine,
    /// Multi pilot.
    MultiPilot,
}

/// Synthetic training device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulatorDevice {
    /// Flight and navigation procedures trainer I.
    #[default]
    Fnpt1,
    /// Flight and navigation procedures trainer II.
    Fnpt2,
    /// Type specific flight simulation training device.
    Fstd,
}

impl SimulatorDevice {
    /// Stored text code.
    pub fn code(self) -> &'static str {
        match self {
            SimulatorDevice::Fnpt1 => "FNPT I",
            SimulatorDevice::Fnpt2 => "FNPT II",
            SimulatorDevice::Fstd => "FSTD",
        }
    }

    /// Inverse of [`SimulatorDevice::code`].
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FNPT I" => Some(SimulatorDevice::Fnpt1),
            "FNPT II" => Some(SimulatorDevice::Fnpt2),
            "FSTD" => Some(SimulatorDevice::Fstd),
            _ => None,
        }
    }
}

/// Qualification slots tracked for expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyKind {
    /// Pilot licence.
    Licence,
    /// Type rating.
    TypeRating,
    /// Operator line check.
    LineCheck,
    /// Medical certificate.
    Medical,
    /// First user defined slot.
    Custom1,
    /// Second user defined slot.
    Custom2,
}

impl CurrencyKind {
    /// Stored integer code.
    pub fn code(self) -> i64 {
        match self {
            CurrencyKind::Licence => 1,
            CurrencyKind::TypeRating => 2,
            CurrencyKind::LineCheck => 3,
            CurrencyKind::Medical => 4,
            CurrencyKind::Custom1 => 5,
            CurrencyKind::Custom2 => 6,
        }
    }

    /// Inverse of [`CurrencyKind::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            1 => CurrencyKind::Licence,
            2 => CurrencyKind::TypeRating,
            3 => CurrencyKind::LineCheck,
            4 => CurrencyKind::Medical,
            5 => CurrencyKind::Custom1,
            6 => CurrencyKind::Custom2,
            _ => return None,
        })
    }
}

/// Reporting projections over the flights (and simulator) tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogbookView {
    /// Flights with crew, type and registration.
    Default,
    /// [`LogbookView::Default`] plus simulator sessions.
    DefaultWithSimulator,
    /// Column layout of the EASA paper logbook.
    EasaCompliant,
    /// [`LogbookView::EasaCompliant`] plus simulator sessions.
    EasaWithSimulator,
    /// Simulator sessions only.
    SimulatorOnly,
}

impl LogbookView {
    /// Every view, in creation order.
    pub const ALL: [LogbookView; 5] = [
        LogbookView::Default,
        LogbookView::DefaultWithSimulator,
        LogbookView::EasaCompliant,
        LogbookView::EasaWithSimulator,
        LogbookView::SimulatorOnly,
    ];

    /// Name of the SQL view.
    pub const fn view_name(self) -> &'static str {
        match self {
            LogbookView::Default => "view_default",
            LogbookView::DefaultWithSimulator => "view_default_sim",
            LogbookView::EasaCompliant => "view_easa",
            LogbookView::EasaWithSimulator => "view_easa_sim",
            LogbookView::SimulatorOnly => "view_simulators",
        }
    }
}

/// Free-text fields offered with autocompletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionTarget {
    /// ICAO and IATA airport codes.
    AirportIdentifiers,
    /// Airport names.
    AirportNames,
    /// Tail registrations.
    Registrations,
    /// Pilot and operator companies.
    Companies,
    /// Pilot names as `last, first`.
    PilotNames,
    /// Aircraft type display names.
    AircraftTypes,
}

impl CompletionTarget {
    /// Every completion target.
    pub const ALL: [CompletionTarget; 6] = [
        CompletionTarget::AirportIdentifiers,
        CompletionTarget::AirportNames,
        CompletionTarget::Registrations,
        CompletionTarget::Companies,
        CompletionTarget::PilotNames,
        CompletionTarget::AircraftTypes,
    ];

    /// Tables whose rows feed this target.
    pub fn sources(self) -> &'static [EntryKind] {
        match self {
            CompletionTarget::AirportIdentifiers | CompletionTarget::AirportNames => {
                &[EntryKind::Airport]
            }
            CompletionTarget::Registrations => &[EntryKind::Tail],
            CompletionTarget::Companies => &[EntryKind::Pilot, EntryKind::Tail],
            CompletionTarget::PilotNames => &[EntryKind::Pilot],
            CompletionTarget::AircraftTypes => &[EntryKind::AircraftType],
        }
    }
}

/// Time frame for aggregate totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    /// Every entry.
    AllTime,
    /// From January 1st of the current year up to today.
    CalendarYear,
    /// The last 365 days up to today.
    Rolling12Months,
    /// The last 28 days up to today.
    Rolling28Days,
}

impl TimeFrame {
    /// Inclusive `(start, end)` window relative to `today`; `None` for all time.
    pub fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = match self {
            TimeFrame::AllTime => return None,
            TimeFrame::CalendarYear => today.with_ordinal(1)?,
            TimeFrame::Rolling12Months => today - Duration::days(365),
            TimeFrame::Rolling28Days => today - Duration::days(28),
        };
        Some((start, today))
    }

    /// True if `date` is inside this frame relative to `today`.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.window(today) {
            None => true,
            Some((start, end)) => start <= date && date <= end,
        }
    }
}

/// Approach type names offered by the flight entry form.
pub const APPROACH_TYPES: [&str; 22] = [
    "VISUAL",
    "ILS CAT I",
    "ILS CAT II",
    "ILS CAT III",
    "GLS",
    "MLS",
    "LOC",
    "LOC/DME",
    "RNAV",
    "RNAV (LNAV)",
    "RNAV (LNAV/VNAV)",
    "RNAV (LPV)",
    "RNAV (RNP)",
    "RNAV (RNP-AR)",
    "VOR",
    "VOR/DME",
    "NDB",
    "NDB/DME",
    "TACAN",
    "SRA",
    "PAR",
    "OTHER",
];
