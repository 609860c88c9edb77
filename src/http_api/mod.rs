use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    Caregiver, DateRange, JsonRecordStore, ModelError, Shift, ShiftTypeSpec, StoreError,
    WeeklyHours, persistence::parse_date, shift_types::SHIFT_TYPES, weekly_hours,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<JsonRecordStore>,
}

impl AppState {
    pub fn new(store: JsonRecordStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn with_shared(store: Arc<JsonRecordStore>) -> Self {
        Self { store }
    }

    /// Runs store work on the blocking pool; the JSON files are read and written
    /// synchronously.
    async fn with_store<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&JsonRecordStore) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || work(&store))
            .await
            .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

// Stored data that cannot be interpreted is a server-side fault.
impl From<ModelError> for ApiError {
    fn from(value: ModelError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error: kind, message })).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RangeQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl RangeQuery {
    /// Both bounds must be present for the range to apply.
    fn range(&self) -> Result<Option<DateRange>, ApiError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end)
                .map(Some)
                .map_err(|err| ApiError::invalid(err.to_string())),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeekQuery {
    week_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct CreateShiftPayload {
    date: String,
    shift_type: String,
    caregiver_id: i32,
}

/// Shift as returned to clients, with derived attributes filled in.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShiftView {
    pub id: i32,
    pub date: NaiveDate,
    pub shift_type: String,
    pub caregiver_id: i32,
    pub caregiver: Option<Caregiver>,
    pub display_name: String,
    pub time_range: String,
    pub start_hour: u32,
    pub duration_hours: u32,
    pub color: String,
}

impl ShiftView {
    fn build(shift: &Shift, store: &JsonRecordStore) -> Result<Self, ApiError> {
        let spec = shift.shift_type_spec()?;
        Ok(Self {
            id: shift.id,
            date: shift.date,
            shift_type: shift.shift_type.clone(),
            caregiver_id: shift.caregiver_id,
            caregiver: shift.caregiver(store)?.cloned(),
            display_name: spec.name.to_string(),
            time_range: spec.time.to_string(),
            start_hour: spec.start_hour,
            duration_hours: spec.duration,
            color: spec.color.to_string(),
        })
    }
}

fn views(shifts: &[Shift], store: &JsonRecordStore) -> Result<Vec<ShiftView>, ApiError> {
    shifts.iter().map(|s| ShiftView::build(s, store)).collect()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shift-types", get(list_shift_types))
        .route("/caregivers", get(list_caregivers))
        .route("/caregivers/:id", get(get_caregiver))
        .route("/caregivers/:id/shifts", get(caregiver_shifts))
        .route("/caregivers/:id/hours", get(caregiver_hours))
        .route("/shifts", get(list_shifts).post(create_shift))
        .route("/shifts/:id", axum::routing::delete(delete_shift))
        .route("/shifts/date/:date", get(shifts_on_date))
        .route("/shifts/date/:date/type/:code", get(shifts_of_type))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: JsonRecordStore) -> std::io::Result<()> {
    let state = AppState::new(store);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_shift_types() -> Json<&'static [ShiftTypeSpec]> {
    Json(&SHIFT_TYPES[..])
}

async fn list_caregivers(State(state): State<AppState>) -> Result<Json<Vec<Caregiver>>, ApiError> {
    let caregivers = state
        .with_store(|store| Ok(Caregiver::all(store)?))
        .await?;
    Ok(Json(caregivers))
}

async fn get_caregiver(
    State(state): State<AppState>,
    Path(caregiver_id): Path<i32>,
) -> Result<Json<Caregiver>, ApiError> {
    let found = state
        .with_store(move |store| Ok(Caregiver::by_id(store, caregiver_id)?))
        .await?;
    match found {
        Some(caregiver) => Ok(Json(caregiver)),
        None => Err(ApiError::not_found(format!(
            "caregiver {caregiver_id} not found"
        ))),
    }
}

async fn caregiver_shifts(
    State(state): State<AppState>,
    Path(caregiver_id): Path<i32>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<ShiftView>>, ApiError> {
    let range = query.range()?;
    let shifts = state
        .with_store(move |store| {
            let shifts = Shift::by_caregiver(store, caregiver_id, range)?;
            views(&shifts, store)
        })
        .await?;
    Ok(Json(shifts))
}

async fn caregiver_hours(
    State(state): State<AppState>,
    Path(caregiver_id): Path<i32>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklyHours>, ApiError> {
    let week_start = query.week_start;
    let hours = state
        .with_store(move |store| {
            if Caregiver::by_id(store, caregiver_id)?.is_none() {
                return Err(ApiError::not_found(format!(
                    "caregiver {caregiver_id} not found"
                )));
            }
            Ok(weekly_hours(store, caregiver_id, week_start)?)
        })
        .await?;
    Ok(Json(hours))
}

async fn list_shifts(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<ShiftView>>, ApiError> {
    let range = query.range()?;
    let shifts = state
        .with_store(move |store| views(&Shift::all(store, range)?, store))
        .await?;
    Ok(Json(shifts))
}

async fn shifts_on_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<ShiftView>>, ApiError> {
    let shifts = state
        .with_store(move |store| views(&Shift::by_date(store, date)?, store))
        .await?;
    Ok(Json(shifts))
}

async fn shifts_of_type(
    State(state): State<AppState>,
    Path((date, code)): Path<(NaiveDate, String)>,
) -> Result<Json<Vec<ShiftView>>, ApiError> {
    let shifts = state
        .with_store(move |store| views(&Shift::by_type(store, &code, date)?, store))
        .await?;
    Ok(Json(shifts))
}

async fn create_shift(
    State(state): State<AppState>,
    Json(payload): Json<CreateShiftPayload>,
) -> Result<(StatusCode, Json<ShiftView>), ApiError> {
    let date = parse_date(payload.date.trim())
        .map_err(|err| ApiError::invalid(format!("invalid date '{}': {err}", payload.date)))?;
    if ShiftTypeSpec::lookup(&payload.shift_type).is_none() {
        return Err(ApiError::invalid(format!(
            "unknown shift type '{}'",
            payload.shift_type
        )));
    }
    let view = state
        .with_store(move |store| {
            let shift = Shift::add(store, date, &payload.shift_type, payload.caregiver_id)?;
            ShiftView::build(&shift, store)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn delete_shift(
    State(state): State<AppState>,
    Path(shift_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .with_store(move |store| Ok(Shift::remove(store, shift_id)?))
        .await?;
    if !removed {
        return Err(ApiError::not_found(format!("shift {shift_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
