use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverRecord {
    pub id: i32,
    pub name: String,
}

impl CaregiverRecord {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A stored shift. `date` keeps the literal `YYYY-MM-DD` text from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub id: i32,
    pub date: String,
    pub shift_type: String,
    pub caregiver_id: i32,
}

impl ShiftRecord {
    pub fn parsed_date(&self) -> StoreResult<NaiveDate> {
        parse_date(&self.date).map_err(|e| {
            StoreError::InvalidData(format!(
                "shift {} has invalid date '{}': {e}",
                self.id, self.date
            ))
        })
    }
}

/// Input to [`RecordStore::add_shift`]; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShift {
    pub date: String,
    pub shift_type: String,
    pub caregiver_id: i32,
}

impl NewShift {
    pub fn new(date: NaiveDate, shift_type: impl Into<String>, caregiver_id: i32) -> Self {
        Self {
            date: format_date(date),
            shift_type: shift_type.into(),
            caregiver_id,
        }
    }

    fn into_record(self, id: i32) -> ShiftRecord {
        ShiftRecord {
            id,
            date: self.date,
            shift_type: self.shift_type,
            caregiver_id: self.caregiver_id,
        }
    }
}

/// Half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> StoreResult<Self> {
        if end < start {
            return Err(StoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn week_starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
}

/// Next shift identifier: one past both the last id ever issued and every id
/// still in the collection, so a removed id is never handed out again.
pub fn next_shift_id(shifts: &[ShiftRecord], last_issued: i32) -> StoreResult<i32> {
    let highest = shifts.iter().map(|s| s.id).fold(last_issued, i32::max);
    highest
        .checked_add(1)
        .ok_or_else(|| StoreError::InvalidData(format!("no shift id left after {highest}")))
}

pub fn filter_by_range(
    shifts: Vec<ShiftRecord>,
    range: Option<DateRange>,
) -> StoreResult<Vec<ShiftRecord>> {
    let Some(range) = range else {
        return Ok(shifts);
    };
    let mut kept = Vec::with_capacity(shifts.len());
    for shift in shifts {
        if range.contains(shift.parsed_date()?) {
            kept.push(shift);
        }
    }
    Ok(kept)
}

/// Durable access to the caregiver and shift collections.
///
/// Implementors provide whole-collection load/save and the two mutations;
/// every query is a full load followed by an in-memory filter.
pub trait RecordStore {
    /// Creates the backing storage if it is missing. Safe to call repeatedly.
    fn ensure_storage(&self) -> StoreResult<()>;

    fn load_caregivers(&self) -> StoreResult<Vec<CaregiverRecord>>;
    fn save_caregivers(&self, caregivers: &[CaregiverRecord]) -> StoreResult<()>;
    fn load_shifts(&self) -> StoreResult<Vec<ShiftRecord>>;
    fn save_shifts(&self, shifts: &[ShiftRecord]) -> StoreResult<()>;

    fn add_shift(&self, shift: NewShift) -> StoreResult<ShiftRecord>;
    /// Returns whether a shift with `id` existed and was removed.
    fn remove_shift(&self, id: i32) -> StoreResult<bool>;

    fn get_caregivers(&self) -> StoreResult<Vec<CaregiverRecord>> {
        self.load_caregivers()
    }

    fn get_caregiver(&self, id: i32) -> StoreResult<Option<CaregiverRecord>> {
        Ok(self.load_caregivers()?.into_iter().find(|c| c.id == id))
    }

    fn get_shifts(&self, range: Option<DateRange>) -> StoreResult<Vec<ShiftRecord>> {
        filter_by_range(self.load_shifts()?, range)
    }

    fn get_shifts_by_caregiver(
        &self,
        caregiver_id: i32,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<ShiftRecord>> {
        let shifts = self
            .load_shifts()?
            .into_iter()
            .filter(|s| s.caregiver_id == caregiver_id)
            .collect();
        filter_by_range(shifts, range)
    }

    fn get_shifts_by_date(&self, date: NaiveDate) -> StoreResult<Vec<ShiftRecord>> {
        let mut matched = Vec::new();
        for shift in self.load_shifts()? {
            if shift.parsed_date()? == date {
                matched.push(shift);
            }
        }
        Ok(matched)
    }

    fn get_shifts_by_type(
        &self,
        shift_type: &str,
        date: NaiveDate,
    ) -> StoreResult<Vec<ShiftRecord>> {
        let mut matched = Vec::new();
        for shift in self.load_shifts()? {
            if shift.shift_type == shift_type && shift.parsed_date()? == date {
                matched.push(shift);
            }
        }
        Ok(matched)
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::JsonRecordStore;
