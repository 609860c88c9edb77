use chrono::NaiveDate;
use shift_roster::{
    CaregiverRecord, DateRange, JsonRecordStore, NewShift, ReadFailurePolicy, RecordStore,
    ShiftRecord, StoreConfig, StoreError,
};
use std::fs;
use tempfile::TempDir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_store() -> (TempDir, JsonRecordStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::new(dir.path().join("data"));
    store.ensure_storage().expect("ensure storage");
    (dir, store)
}

fn add(store: &JsonRecordStore, date: NaiveDate, code: &str, caregiver_id: i32) -> ShiftRecord {
    store
        .add_shift(NewShift::new(date, code, caregiver_id))
        .expect("add shift")
}

#[test]
fn ensure_storage_creates_empty_collections_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::new(dir.path().join("nested").join("data"));
    store.ensure_storage().unwrap();

    assert!(store.caregivers_path().exists());
    assert!(store.shifts_path().exists());
    assert!(store.get_caregivers().unwrap().is_empty());
    assert!(store.get_shifts(None).unwrap().is_empty());

    store
        .save_caregivers(&[CaregiverRecord::new(1, "CG1")])
        .unwrap();
    store.ensure_storage().unwrap();
    assert_eq!(store.get_caregivers().unwrap().len(), 1);
}

#[test]
fn add_then_remove_matches_documented_scenario() {
    let (_dir, store) = new_store();

    let first = add(&store, d(2024, 1, 10), "A", 1);
    assert_eq!(
        first,
        ShiftRecord {
            id: 1,
            date: "2024-01-10".into(),
            shift_type: "A".into(),
            caregiver_id: 1,
        }
    );
    let second = add(&store, d(2024, 1, 11), "B", 2);
    assert_eq!(second.id, 2);

    assert!(store.remove_shift(1).unwrap());
    let remaining = store.get_shifts(None).unwrap();
    assert_eq!(remaining, vec![second]);
}

#[test]
fn add_assigns_previous_count_plus_one() {
    let (_dir, store) = new_store();
    for (i, day) in (10..15).enumerate() {
        let before = store.get_shifts(None).unwrap().len();
        let record = add(&store, d(2024, 1, day), "C", 3);
        assert_eq!(record.id as usize, before + 1, "iteration {i}");
        assert!(store.get_shifts(None).unwrap().contains(&record));
    }
}

fn ids(store: &JsonRecordStore) -> Vec<i32> {
    store.get_shifts(None).unwrap().iter().map(|s| s.id).collect()
}

#[test]
fn removed_middle_id_is_never_duplicated() {
    let (_dir, store) = new_store();
    add(&store, d(2024, 1, 10), "A", 1);
    add(&store, d(2024, 1, 11), "A", 1);
    add(&store, d(2024, 1, 12), "A", 1);
    assert!(store.remove_shift(1).unwrap());

    let next = add(&store, d(2024, 1, 13), "B", 2);
    assert_eq!(next.id, 4);
    assert_eq!(ids(&store), vec![2, 3, 4]);
}

#[test]
fn removed_last_id_is_not_reissued() {
    let (_dir, store) = new_store();
    add(&store, d(2024, 1, 10), "A", 1);
    add(&store, d(2024, 1, 11), "A", 1);
    add(&store, d(2024, 1, 12), "A", 1);
    assert!(store.remove_shift(3).unwrap());

    let next = add(&store, d(2024, 1, 13), "B", 2);
    assert_eq!(next.id, 4);
    assert_eq!(ids(&store), vec![1, 2, 4]);
}

#[test]
fn id_counter_survives_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::new(dir.path());
    store.ensure_storage().unwrap();
    add(&store, d(2024, 1, 10), "A", 1);
    add(&store, d(2024, 1, 11), "A", 1);
    assert!(store.remove_shift(2).unwrap());
    assert!(store.remove_shift(1).unwrap());
    assert!(store.shift_ids_path().exists());

    let reopened = JsonRecordStore::new(dir.path());
    assert_eq!(add(&reopened, d(2024, 1, 12), "C", 3).id, 3);
}

#[test]
fn collection_without_counter_continues_after_highest_id() {
    let (_dir, store) = new_store();
    let legacy = |id: i32| ShiftRecord {
        id,
        date: "2024-05-01".into(),
        shift_type: "A".into(),
        caregiver_id: 1,
    };
    store.save_shifts(&[legacy(7), legacy(2)]).unwrap();
    assert!(!store.shift_ids_path().exists());

    assert_eq!(add(&store, d(2024, 5, 2), "B", 2).id, 8);
}

#[test]
fn unreadable_counter_falls_back_to_live_ids_when_lenient() {
    let (_dir, store) = new_store();
    add(&store, d(2024, 1, 10), "A", 1);
    add(&store, d(2024, 1, 11), "A", 1);
    fs::write(store.shift_ids_path(), "not json").unwrap();

    assert_eq!(add(&store, d(2024, 1, 12), "A", 1).id, 3);
}

#[test]
fn exhausted_id_space_is_reported_not_wrapped() {
    let (_dir, store) = new_store();
    store
        .save_shifts(&[ShiftRecord {
            id: i32::MAX,
            date: "2024-01-01".into(),
            shift_type: "A".into(),
            caregiver_id: 1,
        }])
        .unwrap();

    let err = store
        .add_shift(NewShift::new(d(2024, 1, 2), "A", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert_eq!(ids(&store), vec![i32::MAX]);
}

#[test]
fn removing_unknown_id_is_a_no_op() {
    let (_dir, store) = new_store();
    add(&store, d(2024, 1, 10), "A", 1);
    let before = fs::read_to_string(store.shifts_path()).unwrap();

    assert!(!store.remove_shift(42).unwrap());
    assert_eq!(fs::read_to_string(store.shifts_path()).unwrap(), before);
    assert_eq!(store.get_shifts(None).unwrap().len(), 1);
}

#[test]
fn date_range_includes_start_and_excludes_end() {
    let (_dir, store) = new_store();
    add(&store, d(2024, 1, 9), "A", 1);
    let start = add(&store, d(2024, 1, 10), "A", 1);
    let middle = add(&store, d(2024, 1, 12), "B", 2);
    add(&store, d(2024, 1, 15), "C", 3);

    let range = DateRange::new(d(2024, 1, 10), d(2024, 1, 15)).unwrap();
    let shifts = store.get_shifts(Some(range)).unwrap();
    assert_eq!(shifts, vec![start, middle]);
}

#[test]
fn caregiver_filter_combines_with_range() {
    let (_dir, store) = new_store();
    let early = add(&store, d(2024, 1, 1), "A", 5);
    add(&store, d(2024, 1, 2), "A", 6);
    let late = add(&store, d(2024, 2, 1), "G2", 5);

    assert_eq!(
        store.get_shifts_by_caregiver(5, None).unwrap(),
        vec![early.clone(), late]
    );
    let january = DateRange::new(d(2024, 1, 1), d(2024, 2, 1)).unwrap();
    assert_eq!(
        store.get_shifts_by_caregiver(5, Some(january)).unwrap(),
        vec![early]
    );
    assert!(store.get_shifts_by_caregiver(99, None).unwrap().is_empty());
}

#[test]
fn by_type_is_the_matching_subset_of_by_date() {
    let (_dir, store) = new_store();
    let day = d(2024, 3, 4);
    add(&store, day, "A", 1);
    add(&store, day, "B", 2);
    add(&store, day, "A", 3);
    add(&store, d(2024, 3, 5), "A", 4);

    let on_day = store.get_shifts_by_date(day).unwrap();
    assert_eq!(on_day.len(), 3);

    let type_a = store.get_shifts_by_type("A", day).unwrap();
    let expected: Vec<ShiftRecord> = on_day.into_iter().filter(|s| s.shift_type == "A").collect();
    assert_eq!(type_a, expected);
    assert_eq!(type_a.len(), 2);
}

#[test]
fn get_caregiver_scans_for_id() {
    let (_dir, store) = new_store();
    store
        .save_caregivers(&[CaregiverRecord::new(1, "Ana"), CaregiverRecord::new(2, "Ben")])
        .unwrap();

    assert_eq!(
        store.get_caregiver(2).unwrap(),
        Some(CaregiverRecord::new(2, "Ben"))
    );
    assert_eq!(store.get_caregiver(3).unwrap(), None);
}

#[test]
fn save_and_load_round_trip_preserves_order_and_fields() {
    let (_dir, store) = new_store();
    let shifts = vec![
        ShiftRecord {
            id: 7,
            date: "2024-05-02".into(),
            shift_type: "G1".into(),
            caregiver_id: 3,
        },
        ShiftRecord {
            id: 2,
            date: "2024-05-01".into(),
            shift_type: "C".into(),
            caregiver_id: 8,
        },
    ];
    store.save_shifts(&shifts).unwrap();
    assert_eq!(store.load_shifts().unwrap(), shifts);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.shifts_path()).unwrap()).unwrap();
    assert_eq!(raw[0]["date"], "2024-05-02");
    assert_eq!(raw[1]["caregiver_id"], 8);
}

#[test]
fn corrupt_collection_reads_as_empty_when_lenient() {
    let (_dir, store) = new_store();
    fs::write(store.shifts_path(), "{ not json").unwrap();

    assert_eq!(store.read_failure(), ReadFailurePolicy::Lenient);
    assert!(store.get_shifts(None).unwrap().is_empty());
}

#[test]
fn corrupt_collection_is_an_error_when_strict() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path()).with_read_failure(ReadFailurePolicy::Strict);
    let store = JsonRecordStore::from_config(&config);
    store.ensure_storage().unwrap();
    fs::write(store.caregivers_path(), "[{\"id\": \"one\"}]").unwrap();

    let err = store.get_caregivers().unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn missing_directory_reads_empty_but_write_fails() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::new(dir.path().join("absent"));

    assert!(store.get_shifts(None).unwrap().is_empty());
    let err = store
        .add_shift(NewShift::new(d(2024, 1, 1), "A", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn malformed_stored_date_fails_date_queries() {
    let (_dir, store) = new_store();
    store
        .save_shifts(&[ShiftRecord {
            id: 1,
            date: "10/01/2024".into(),
            shift_type: "A".into(),
            caregiver_id: 1,
        }])
        .unwrap();

    assert_eq!(store.get_shifts(None).unwrap().len(), 1);
    let err = store.get_shifts_by_date(d(2024, 1, 10)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
