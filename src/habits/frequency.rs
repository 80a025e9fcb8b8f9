//! Weekly frequency descriptors and due-date matching.
//!
//! A habit's schedule is stored as either the literal `daily` or a
//! comma-joined list of weekday names from a fixed Monday-first table
//! (`"Lunes,Miércoles,Viernes"`). Token order and duplicates are irrelevant.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal descriptor for a habit due every day.
pub const DAILY: &str = "daily";

/// Legacy spelling of [`DAILY`], accepted on read.
const DAILY_LEGACY: &str = "diario";

/// Weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Unaccented spellings accepted on read, indexed like [`WEEKDAY_NAMES`].
const WEEKDAY_ALIASES: [Option<&str>; 7] = [
    None,
    None,
    Some("Miercoles"),
    None,
    None,
    Some("Sabado"),
    None,
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Display name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Look up a weekday by its stored name.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    (0..7)
        .find(|&i| WEEKDAY_NAMES[i] == name || WEEKDAY_ALIASES[i] == Some(name))
        .map(|i| WEEKDAYS[i])
}

/// Set of weekdays, one bit per day (bit 0 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    const ALL_BITS: u8 = 0b0111_1111;

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        *self == Self::all()
    }

    /// Days in the set, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> {
        let set = *self;
        WEEKDAYS.into_iter().filter(move |day| set.contains(*day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// When a habit is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Due every day
    Daily,
    /// Due on the listed weekdays only
    Weekdays(WeekdaySet),
}

impl Frequency {
    /// Parse a stored frequency descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, FrequencyError> {
        if descriptor == DAILY || descriptor == DAILY_LEGACY {
            return Ok(Frequency::Daily);
        }

        let mut days = WeekdaySet::empty();
        for token in descriptor.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let day = weekday_from_name(token)
                .ok_or_else(|| FrequencyError::InvalidFrequency(descriptor.to_string()))?;
            days.insert(day);
        }

        if days.is_empty() {
            return Err(FrequencyError::InvalidFrequency(descriptor.to_string()));
        }

        Ok(Frequency::Weekdays(days))
    }

    /// Build a frequency from a weekday selection.
    ///
    /// Selecting all seven days yields [`Frequency::Daily`].
    pub fn from_weekdays<I: IntoIterator<Item = Weekday>>(days: I) -> Result<Self, FrequencyError> {
        let set: WeekdaySet = days.into_iter().collect();
        if set.is_empty() {
            return Err(FrequencyError::InvalidFrequency(String::new()));
        }
        if set.is_full() {
            return Ok(Frequency::Daily);
        }
        Ok(Frequency::Weekdays(set))
    }

    /// Whether the habit is due on `date`.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Weekdays(days) => days.contains(date.weekday()),
        }
    }

    /// Canonical stored form.
    pub fn descriptor(&self) -> String {
        match self {
            Frequency::Daily => DAILY.to_string(),
            Frequency::Weekdays(days) => days
                .iter()
                .map(weekday_name)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

impl TryFrom<String> for Frequency {
    type Error = FrequencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Frequency::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.descriptor()
    }
}

/// Whether a habit with the given stored descriptor is due on `date`.
pub fn is_due(descriptor: &str, date: NaiveDate) -> Result<bool, FrequencyError> {
    Frequency::parse(descriptor).map(|frequency| frequency.is_due(date))
}

/// Frequency errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrequencyError {
    #[error("Invalid frequency descriptor: '{0}'")]
    InvalidFrequency(String),
}
