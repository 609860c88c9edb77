use super::{
    CaregiverRecord, NewShift, RecordStore, ShiftRecord, StoreError, StoreResult, next_shift_id,
};
use crate::config::{ReadFailurePolicy, StoreConfig};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const CAREGIVERS_FILE: &str = "caregivers.json";
const SHIFTS_FILE: &str = "shifts.json";
const SHIFT_IDS_FILE: &str = "shift_ids.json";

/// High-water mark for shift ids, persisted next to the shift collection.
#[derive(Debug, Serialize, Deserialize)]
struct ShiftIdCounter {
    last_issued: i32,
}

/// Record store backed by two pretty-printed JSON arrays in one directory, plus a
/// small counter file that keeps shift ids from being reissued.
pub struct JsonRecordStore {
    data_dir: PathBuf,
    caregivers_path: PathBuf,
    shifts_path: PathBuf,
    shift_ids_path: PathBuf,
    read_failure: ReadFailurePolicy,
    // Serializes load-modify-save sequences within this process.
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::from_config(&StoreConfig::new(data_dir.as_ref()))
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let data_dir = config.data_dir.clone();
        Self {
            caregivers_path: data_dir.join(CAREGIVERS_FILE),
            shifts_path: data_dir.join(SHIFTS_FILE),
            shift_ids_path: data_dir.join(SHIFT_IDS_FILE),
            data_dir,
            read_failure: config.read_failure,
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn caregivers_path(&self) -> &Path {
        &self.caregivers_path
    }

    pub fn shifts_path(&self) -> &Path {
        &self.shifts_path
    }

    pub fn shift_ids_path(&self) -> &Path {
        &self.shift_ids_path
    }

    pub fn read_failure(&self) -> ReadFailurePolicy {
        self.read_failure
    }

    fn load_collection<T: DeserializeOwned>(&self, path: &Path, what: &str) -> StoreResult<Vec<T>> {
        match read_json::<Vec<T>>(path) {
            Ok(records) => {
                debug!(collection = what, count = records.len(), "loaded collection");
                Ok(records)
            }
            Err(err) => {
                error!(collection = what, path = %path.display(), "error loading {what}: {err}");
                match self.read_failure {
                    ReadFailurePolicy::Lenient => Ok(Vec::new()),
                    ReadFailurePolicy::Strict => Err(err),
                }
            }
        }
    }

    fn save_collection<T: Serialize>(&self, path: &Path, what: &str, records: &[T]) -> StoreResult<()> {
        write_json(path, records).inspect_err(|err| {
            error!(collection = what, path = %path.display(), "error saving {what}: {err}");
        })?;
        debug!(collection = what, count = records.len(), "saved collection");
        Ok(())
    }

    /// Last shift id handed out; 0 before the first add.
    fn load_last_issued(&self) -> StoreResult<i32> {
        if !self.shift_ids_path.exists() {
            return Ok(0);
        }
        match read_json::<ShiftIdCounter>(&self.shift_ids_path) {
            Ok(counter) => Ok(counter.last_issued),
            Err(err) => {
                error!(path = %self.shift_ids_path.display(), "error loading shift id counter: {err}");
                match self.read_failure {
                    ReadFailurePolicy::Lenient => Ok(0),
                    ReadFailurePolicy::Strict => Err(err),
                }
            }
        }
    }

    fn save_last_issued(&self, last_issued: i32) -> StoreResult<()> {
        write_json(&self.shift_ids_path, &ShiftIdCounter { last_issued }).inspect_err(|err| {
            error!(path = %self.shift_ids_path.display(), "error saving shift id counter: {err}");
        })
    }
}

impl RecordStore for JsonRecordStore {
    fn ensure_storage(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        if !self.caregivers_path.exists() {
            info!(path = %self.caregivers_path.display(), "creating empty caregiver collection");
            self.save_caregivers(&[])?;
        }
        if !self.shifts_path.exists() {
            info!(path = %self.shifts_path.display(), "creating empty shift collection");
            self.save_shifts(&[])?;
        }
        Ok(())
    }

    fn load_caregivers(&self) -> StoreResult<Vec<CaregiverRecord>> {
        self.load_collection(&self.caregivers_path, "caregivers")
    }

    fn save_caregivers(&self, caregivers: &[CaregiverRecord]) -> StoreResult<()> {
        self.save_collection(&self.caregivers_path, "caregivers", caregivers)
    }

    fn load_shifts(&self) -> StoreResult<Vec<ShiftRecord>> {
        self.load_collection(&self.shifts_path, "shifts")
    }

    fn save_shifts(&self, shifts: &[ShiftRecord]) -> StoreResult<()> {
        self.save_collection(&self.shifts_path, "shifts", shifts)
    }

    fn add_shift(&self, shift: NewShift) -> StoreResult<ShiftRecord> {
        let _guard = self.write_lock.lock();
        let mut shifts = self.load_shifts()?;
        let id = next_shift_id(&shifts, self.load_last_issued()?)?;
        // The id is spent even if the collection write below fails.
        self.save_last_issued(id)?;
        let record = shift.into_record(id);
        shifts.push(record.clone());
        self.save_shifts(&shifts)?;
        info!(
            shift_id = record.id,
            date = %record.date,
            shift_type = %record.shift_type,
            caregiver_id = record.caregiver_id,
            "added shift"
        );
        Ok(record)
    }

    fn remove_shift(&self, id: i32) -> StoreResult<bool> {
        let _guard = self.write_lock.lock();
        let mut shifts = self.load_shifts()?;
        let before = shifts.len();
        shifts.retain(|s| s.id != id);
        if shifts.len() == before {
            debug!(shift_id = id, "no shift to remove");
            return Ok(false);
        }
        self.save_shifts(&shifts)?;
        info!(shift_id = id, "removed shift");
        Ok(true)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(StoreError::from)
}
