use chrono::NaiveDate;
use std::sync::OnceLock;

use super::{Caregiver, ModelError, ModelResult};
use crate::persistence::{
    DateRange, NewShift, RecordStore, ShiftRecord, format_date, parse_date,
};
use crate::shift_types::ShiftTypeSpec;

/// A stored shift with its date parsed and its caregiver resolvable on demand.
#[derive(Debug, Clone)]
pub struct Shift {
    pub id: i32,
    pub date: NaiveDate,
    pub shift_type: String,
    pub caregiver_id: i32,
    caregiver: OnceLock<Caregiver>,
}

impl PartialEq for Shift {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.date == other.date
            && self.shift_type == other.shift_type
            && self.caregiver_id == other.caregiver_id
    }
}

impl Eq for Shift {}

impl Shift {
    pub fn from_record(record: ShiftRecord) -> ModelResult<Self> {
        let date = parse_date(&record.date).map_err(|source| ModelError::InvalidDate {
            value: record.date.clone(),
            source,
        })?;
        Ok(Self {
            id: record.id,
            date,
            shift_type: record.shift_type,
            caregiver_id: record.caregiver_id,
            caregiver: OnceLock::new(),
        })
    }

    pub fn to_record(&self) -> ShiftRecord {
        ShiftRecord {
            id: self.id,
            date: format_date(self.date),
            shift_type: self.shift_type.clone(),
            caregiver_id: self.caregiver_id,
        }
    }

    /// Resolves the assigned caregiver, caching a hit on this instance.
    ///
    /// A miss is not cached, so a later call looks the id up again.
    pub fn caregiver<S: RecordStore + ?Sized>(&self, store: &S) -> ModelResult<Option<&Caregiver>> {
        if let Some(cached) = self.caregiver.get() {
            return Ok(Some(cached));
        }
        match Caregiver::by_id(store, self.caregiver_id)? {
            Some(found) => Ok(Some(self.caregiver.get_or_init(|| found))),
            None => Ok(None),
        }
    }

    pub fn shift_type_spec(&self) -> ModelResult<&'static ShiftTypeSpec> {
        ShiftTypeSpec::lookup(&self.shift_type)
            .ok_or_else(|| ModelError::UnknownShiftType(self.shift_type.clone()))
    }

    pub fn display_name(&self) -> ModelResult<&'static str> {
        Ok(self.shift_type_spec()?.name)
    }

    pub fn time_range(&self) -> ModelResult<&'static str> {
        Ok(self.shift_type_spec()?.time)
    }

    pub fn start_hour(&self) -> ModelResult<u32> {
        Ok(self.shift_type_spec()?.start_hour)
    }

    pub fn duration_hours(&self) -> ModelResult<u32> {
        Ok(self.shift_type_spec()?.duration)
    }

    pub fn color(&self) -> ModelResult<&'static str> {
        Ok(self.shift_type_spec()?.color)
    }

    pub fn all<S: RecordStore + ?Sized>(
        store: &S,
        range: Option<DateRange>,
    ) -> ModelResult<Vec<Shift>> {
        wrap(store.get_shifts(range)?)
    }

    pub fn by_caregiver<S: RecordStore + ?Sized>(
        store: &S,
        caregiver_id: i32,
        range: Option<DateRange>,
    ) -> ModelResult<Vec<Shift>> {
        wrap(store.get_shifts_by_caregiver(caregiver_id, range)?)
    }

    pub fn by_date<S: RecordStore + ?Sized>(store: &S, date: NaiveDate) -> ModelResult<Vec<Shift>> {
        wrap(store.get_shifts_by_date(date)?)
    }

    pub fn by_type<S: RecordStore + ?Sized>(
        store: &S,
        shift_type: &str,
        date: NaiveDate,
    ) -> ModelResult<Vec<Shift>> {
        wrap(store.get_shifts_by_type(shift_type, date)?)
    }

    pub fn add<S: RecordStore + ?Sized>(
        store: &S,
        date: NaiveDate,
        shift_type: &str,
        caregiver_id: i32,
    ) -> ModelResult<Shift> {
        let record = store.add_shift(NewShift::new(date, shift_type, caregiver_id))?;
        Shift::from_record(record)
    }

    pub fn remove<S: RecordStore + ?Sized>(store: &S, id: i32) -> ModelResult<bool> {
        Ok(store.remove_shift(id)?)
    }
}

fn wrap(records: Vec<ShiftRecord>) -> ModelResult<Vec<Shift>> {
    records.into_iter().map(Shift::from_record).collect()
}
