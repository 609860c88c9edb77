//! One-shot import of caregivers and shifts from a relational database into
//! the flat-file collections.

use super::{CaregiverRecord, RecordStore, ShiftRecord, StoreError, StoreResult, format_date};
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub caregivers: usize,
    pub shifts: usize,
}

/// Copies the `caregiver` and `shift` tables into `store`, replacing both
/// collections and keeping the source ids.
pub fn import_from_sqlite<P, S>(db_path: P, store: &S) -> StoreResult<ImportSummary>
where
    P: AsRef<Path>,
    S: RecordStore + ?Sized,
{
    let connection = Connection::open_with_flags(db_path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let caregivers = read_caregivers(&connection)?;
    store.save_caregivers(&caregivers)?;
    info!(count = caregivers.len(), "imported caregivers");

    let shifts = read_shifts(&connection)?;
    store.save_shifts(&shifts)?;
    info!(count = shifts.len(), "imported shifts");

    Ok(ImportSummary {
        caregivers: caregivers.len(),
        shifts: shifts.len(),
    })
}

fn read_caregivers(connection: &Connection) -> StoreResult<Vec<CaregiverRecord>> {
    let mut stmt = connection.prepare("SELECT id, name FROM caregiver ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(CaregiverRecord {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    let mut caregivers = Vec::new();
    for row in rows {
        caregivers.push(row?);
    }
    Ok(caregivers)
}

fn read_shifts(connection: &Connection) -> StoreResult<Vec<ShiftRecord>> {
    let mut stmt = connection
        .prepare("SELECT id, date, shift_type, caregiver_id FROM shift ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i32>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i32>(3)?,
        ))
    })?;
    let mut shifts = Vec::new();
    for row in rows {
        let (id, raw_date, shift_type, caregiver_id) = row?;
        shifts.push(ShiftRecord {
            id,
            date: normalize_date(id, &raw_date)?,
            shift_type,
            caregiver_id,
        });
    }
    Ok(shifts)
}

// Date columns may carry a time suffix ("2024-01-10 00:00:00.000000").
fn normalize_date(id: i32, raw: &str) -> StoreResult<String> {
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, super::DATE_FORMAT)
        .map(format_date)
        .map_err(|e| StoreError::InvalidData(format!("shift {id} has invalid date '{raw}': {e}")))
}
