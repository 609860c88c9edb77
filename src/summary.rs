use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ModelResult, Shift};
use crate::persistence::{DateRange, RecordStore};
use crate::shift_types::HOURS_PER_WEEK;

/// Hours a caregiver is booked for in the seven days from `week_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub caregiver_id: i32,
    pub week_start: NaiveDate,
    pub shifts: usize,
    pub hours: u32,
    pub target_hours: u32,
    pub remaining_hours: u32,
}

pub fn weekly_hours<S: RecordStore + ?Sized>(
    store: &S,
    caregiver_id: i32,
    week_start: NaiveDate,
) -> ModelResult<WeeklyHours> {
    let week = DateRange::week_starting(week_start);
    let shifts = Shift::by_caregiver(store, caregiver_id, Some(week))?;
    let mut hours = 0;
    for shift in &shifts {
        hours += shift.duration_hours()?;
    }
    Ok(WeeklyHours {
        caregiver_id,
        week_start,
        shifts: shifts.len(),
        hours,
        target_hours: HOURS_PER_WEEK,
        remaining_hours: HOURS_PER_WEEK.saturating_sub(hours),
    })
}
