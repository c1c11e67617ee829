use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::entries::{self, EntryError};
use crate::models::*;
use crate::stats::collect_stats;
use crate::workouts::{summarize, WorkoutsSummary};

// ============================================================
// Response envelope
// ============================================================

/// Every JSON response body: the resource's links and the result itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub links: Links,
    pub result: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryCreated {
    pub message: String,
    pub report: Vec<String>,
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;
type ApiError = (StatusCode, Json<ErrorResponse>);

fn envelope<T>(self_link: impl Into<String>, result: T) -> Json<Envelope<T>> {
    Json(Envelope {
        links: Links {
            self_link: self_link.into(),
            previous: None,
            next: None,
        },
        result,
    })
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            details: None,
        }),
    )
}

fn rejected(message: impl Into<String>, details: Vec<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            details: Some(details),
        }),
    )
}

fn not_found(what: &str) -> ApiError {
    error(StatusCode::NOT_FOUND, format!("{what} not found"))
}

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn parse_date_param(date: &str) -> Result<NaiveDate, ApiError> {
    entries::resolve_date(date, entries::today()).ok_or_else(|| {
        error(
            StatusCode::BAD_REQUEST,
            format!("Invalid date {date}, expected YYYY-MM-DD or today"),
        )
    })
}

// ============================================================
// Service
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: f64,
}

pub async fn health(State(state): State<AppState>) -> Json<Envelope<Health>> {
    envelope(
        "/health",
        Health {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime: state.started.elapsed().as_secs_f64(),
        },
    )
}

pub async fn openapi() -> impl IntoResponse {
    Json(super::openapi_document())
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Stats> {
    let days = state.db.get_running_days().map_err(internal_error)?;
    Ok(envelope("/stats", collect_stats(&days)))
}

// ============================================================
// Workouts
// ============================================================

pub async fn workouts_summary(State(state): State<AppState>) -> ApiResult<WorkoutsSummary> {
    let results = state.db.get_all_workout_results().map_err(internal_error)?;
    Ok(envelope("/summary", summarize(&results)))
}

pub async fn list_exercises(State(state): State<AppState>) -> ApiResult<Vec<ExerciseName>> {
    let exercises = state
        .catalog
        .list_exercises()
        .into_iter()
        .map(|e| ExerciseName {
            name: e.name.clone(),
        })
        .collect();
    Ok(envelope("/exercises", exercises))
}

pub async fn get_workouts(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Vec<WorkoutResult>> {
    let day = parse_date_param(&date)?;
    let results = state
        .db
        .get_workout_results_by_date(day)
        .map_err(internal_error)?;
    Ok(envelope(format!("/workouts/{date}"), results))
}

// ============================================================
// Tracks
// ============================================================

pub async fn list_tracks(State(state): State<AppState>) -> ApiResult<Vec<Track>> {
    let tracks = state.db.get_all_tracks().map_err(internal_error)?;
    Ok(envelope("/tracks", tracks))
}

pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Track> {
    state
        .db
        .get_track(&id)
        .map_err(internal_error)?
        .map(|track| envelope(format!("/tracks/{id}"), track))
        .ok_or_else(|| not_found("Track"))
}

pub async fn create_track(
    State(state): State<AppState>,
    Json(track): Json<Track>,
) -> Result<(StatusCode, Json<Envelope<Message>>), ApiError> {
    state.db.create_track(&track).map_err(internal_error)?;
    tracing::info!("Created running track {}", track.id);
    Ok((
        StatusCode::CREATED,
        envelope(
            "/tracks",
            Message {
                message: "Track created successfully".to_string(),
            },
        ),
    ))
}

// ============================================================
// Daily entries
// ============================================================

pub async fn list_entries(State(state): State<AppState>) -> ApiResult<Vec<DailyEntry>> {
    let entries = state.db.get_all_entries().map_err(internal_error)?;
    Ok(envelope("/entries", entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<DailyEntry> {
    let day = parse_date_param(&date)?;
    let entry = state
        .db
        .get_entry(day)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Entry"))?;

    let mut response = envelope(format!("/entries/{day}"), entry);
    response.links.previous = Some(format!("/entries/{}", day - Duration::days(1)));
    response.links.next = Some(format!("/entries/{}", day + Duration::days(1)));
    Ok(response)
}

fn is_yaml(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.split(';').next().unwrap_or_default().trim();
            matches!(ct, "application/yaml" | "application/x-yaml" | "text/yaml")
        })
        .unwrap_or(false)
}

/// Accepts a JSON [`DailyEntryInput`] or, with a YAML content type, the
/// compact [`DailyYamlInput`] form.
pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<EntryCreated>>), ApiError> {
    let input = if is_yaml(&headers) {
        let data: DailyYamlInput = serde_yaml::from_slice(&body)
            .map_err(|e| rejected("Invalid daily entry input", vec![e.to_string()]))?;
        entries::parse_daily_entry_yaml(data)
            .map_err(|details| rejected("Invalid daily entry input", details))?
    } else {
        serde_json::from_slice::<DailyEntryInput>(&body)
            .map_err(|e| rejected("Invalid daily entry input", vec![e.to_string()]))?
    };

    match entries::record_entry(&state.db, &state.catalog, input, entries::today()) {
        Ok(report) => Ok((
            StatusCode::CREATED,
            envelope(
                "/entries",
                EntryCreated {
                    message: "Daily entry created successfully".to_string(),
                    report,
                },
            ),
        )),
        Err(EntryError::Rejected(details)) => {
            tracing::warn!("Rejected daily entry: {:?}", details);
            Err(rejected("Failed to create daily entry", details))
        }
        Err(EntryError::Storage(e)) => Err(internal_error(e)),
    }
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(update): Json<DailyEntryUpdate>,
) -> ApiResult<Message> {
    let day = parse_date_param(&date)?;
    let updated = state
        .db
        .update_entry(day, &update)
        .map_err(internal_error)?;

    if !updated {
        return Err(if update.is_empty() {
            error(StatusCode::BAD_REQUEST, "No fields to update")
        } else {
            not_found("Entry")
        });
    }

    Ok(envelope(
        format!("/entries/{day}"),
        Message {
            message: "Daily entry updated successfully".to_string(),
        },
    ))
}

pub async fn update_diary(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(input): Json<DiaryInput>,
) -> ApiResult<Message> {
    let day = parse_date_param(&date)?;
    let updated = entries::update_diary(&state.db, day, input.diary).map_err(internal_error)?;
    if !updated {
        return Err(not_found("Entry"));
    }

    Ok(envelope(
        format!("/entries/{day}/diary"),
        Message {
            message: "Diary updated successfully".to_string(),
        },
    ))
}

pub async fn get_diary(State(state): State<AppState>) -> Result<String, ApiError> {
    entries::build_diary(&state.db).map_err(internal_error)
}

pub async fn get_week(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> ApiResult<Vec<DailyEntry>> {
    let entries = state.db.get_week_entries(&week).map_err(internal_error)?;
    if entries.is_empty() {
        return Err(not_found("Week"));
    }
    Ok(envelope(format!("/week/{week}"), entries))
}

// ============================================================
// Food
// ============================================================

pub async fn list_meals() -> ApiResult<Vec<Meal>> {
    let meals = crate::food::get_meals().map_err(internal_error)?;
    Ok(envelope("/meals", meals))
}
