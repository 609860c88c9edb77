use serde::{Deserialize, Serialize};

use super::ModelResult;
use crate::persistence::{CaregiverRecord, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: i32,
    pub name: String,
}

impl Caregiver {
    pub fn all<S: RecordStore + ?Sized>(store: &S) -> ModelResult<Vec<Caregiver>> {
        Ok(store
            .get_caregivers()?
            .into_iter()
            .map(Caregiver::from)
            .collect())
    }

    pub fn by_id<S: RecordStore + ?Sized>(store: &S, id: i32) -> ModelResult<Option<Caregiver>> {
        Ok(store.get_caregiver(id)?.map(Caregiver::from))
    }
}

impl From<CaregiverRecord> for Caregiver {
    fn from(record: CaregiverRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}
