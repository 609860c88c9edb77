pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod seed;
pub mod shift_types;
pub mod summary;

pub use config::{ConfigError, HttpConfig, ReadFailurePolicy, StoreConfig};
pub use model::{Caregiver, ModelError, ModelResult, Shift};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::{ImportSummary, import_from_sqlite};
pub use persistence::{
    CaregiverRecord, DateRange, JsonRecordStore, NewShift, RecordStore, ShiftRecord, StoreError,
    StoreResult,
};
pub use seed::{SeedOutcome, bootstrap, init_data};
pub use shift_types::{CAREGIVER_SEED, ShiftTypeSpec};
pub use summary::{WeeklyHours, weekly_hours};
