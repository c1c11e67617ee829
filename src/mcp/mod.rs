//! MCP server exposing the fitness log as tools.

mod types;

use std::sync::Arc;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;

use crate::db::Database;
use crate::entries::{self, EntryError};
use crate::models::*;
use crate::stats::collect_stats;
use crate::workouts::{summarize, Catalog, ExecutionKind, WorkoutsSummary};

#[derive(Clone)]
pub struct FitlogMcpServer {
    db: Database,
    catalog: Arc<Catalog>,
    tool_router: ToolRouter<Self>,
}

fn storage_error(e: impl std::fmt::Display) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(storage_error)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

impl FitlogMcpServer {
    pub fn new(db: Database, catalog: Arc<Catalog>) -> Self {
        Self {
            db,
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    fn exercises(&self, req: ListExercisesRequest) -> Result<ExerciseListResponse, McpError> {
        let kind = match req.execution {
            Some(ref execution) => Some(ExecutionKind::from_str(execution).ok_or_else(|| {
                McpError::invalid_params(
                    format!(
                        "Invalid execution '{}'. Must be: set3x, hold3x, maxset, or maxhold",
                        execution
                    ),
                    None,
                )
            })?),
            None => None,
        };

        let exercises = self
            .catalog
            .list_exercises()
            .into_iter()
            .filter(|e| kind.is_none_or(|kind| e.execution == kind))
            .map(|e| ExerciseInfo {
                name: e.name.clone(),
                exercise: e.exercise.clone(),
                execution: e.execution.as_str().to_string(),
            })
            .collect();

        Ok(ExerciseListResponse { exercises })
    }

    fn validation(&self, req: ValidateWorkoutRequest) -> ValidationResponse {
        match self.catalog.validate_workout(&req.results) {
            Ok(()) => ValidationResponse {
                valid: true,
                errors: vec![],
            },
            Err(errors) => ValidationResponse {
                valid: false,
                errors: errors.iter().map(ToString::to_string).collect(),
            },
        }
    }

    fn summary(&self, req: WorkoutsSummaryRequest) -> Result<WorkoutsSummary, McpError> {
        let results = self.db.get_all_workout_results().map_err(storage_error)?;
        let mut summary = summarize(&results);

        if let Some(exercise) = req.exercise {
            summary.retain(|key, _| {
                *key == exercise || key.split_once('/').is_some_and(|(name, _)| name == exercise)
            });
        }

        Ok(summary)
    }

    fn daily_entry(&self, req: GetDailyEntryRequest) -> Result<DailyEntry, McpError> {
        let date = entries::resolve_date(&req.date, entries::today()).ok_or_else(|| {
            McpError::invalid_params(
                format!("Invalid date '{}'. Use YYYY-MM-DD or 'today'", req.date),
                None,
            )
        })?;

        self.db
            .get_entry(date)
            .map_err(storage_error)?
            .ok_or_else(|| McpError::invalid_params(format!("No entry for {date}"), None))
    }

    fn week(&self, req: GetWeekRequest) -> Result<Vec<DailyEntry>, McpError> {
        let entries = self.db.get_week_entries(&req.week).map_err(storage_error)?;
        if entries.is_empty() {
            return Err(McpError::invalid_params(
                format!("No entries for week {}", req.week),
                None,
            ));
        }
        Ok(entries)
    }

    fn record(&self, req: RecordDailyEntryRequest) -> Result<RecordEntryResponse, McpError> {
        let data: DailyYamlInput = serde_yaml::from_str(&req.yaml)
            .map_err(|e| McpError::invalid_params(format!("Invalid YAML entry: {e}"), None))?;
        let input = entries::parse_daily_entry_yaml(data)
            .map_err(|errors| McpError::invalid_params(errors.join("; "), None))?;

        let today = entries::today();
        let date = input.date.unwrap_or(today);

        match entries::record_entry(&self.db, &self.catalog, input, today) {
            Ok(report) => Ok(RecordEntryResponse {
                date: date.to_string(),
                report,
            }),
            Err(EntryError::Rejected(errors)) => {
                Err(McpError::invalid_params(errors.join("; "), None))
            }
            Err(EntryError::Storage(e)) => Err(storage_error(e)),
        }
    }

    fn stats(&self) -> Result<Stats, McpError> {
        let days = self.db.get_running_days().map_err(storage_error)?;
        Ok(collect_stats(&days))
    }

    // ============================================================
    // Test helpers - expose tool logic for testing
    // ============================================================

    pub fn test_list_exercises(
        &self,
        execution: Option<&str>,
    ) -> Result<ExerciseListResponse, McpError> {
        self.exercises(ListExercisesRequest {
            execution: execution.map(str::to_string),
        })
    }

    pub fn test_validate_workout(&self, results: &[&str]) -> ValidationResponse {
        self.validation(ValidateWorkoutRequest {
            results: results.iter().map(|r| r.to_string()).collect(),
        })
    }

    pub fn test_workouts_summary(
        &self,
        exercise: Option<&str>,
    ) -> Result<WorkoutsSummary, McpError> {
        self.summary(WorkoutsSummaryRequest {
            exercise: exercise.map(str::to_string),
        })
    }

    pub fn test_get_daily_entry(&self, date: &str) -> Result<DailyEntry, McpError> {
        self.daily_entry(GetDailyEntryRequest {
            date: date.to_string(),
        })
    }

    pub fn test_get_week(&self, week: &str) -> Result<Vec<DailyEntry>, McpError> {
        self.week(GetWeekRequest {
            week: week.to_string(),
        })
    }

    pub fn test_record_daily_entry(&self, yaml: &str) -> Result<RecordEntryResponse, McpError> {
        self.record(RecordDailyEntryRequest {
            yaml: yaml.to_string(),
        })
    }

    pub fn test_get_stats(&self) -> Result<Stats, McpError> {
        self.stats()
    }
}

#[tool_router]
impl FitlogMcpServer {
    // ============================================================
    // Catalog and validation
    // ============================================================

    #[tool(
        description = "List the exercises workout results may reference, as '<exercise>/<execution>' keys. The execution kind fixes the volume format: set3x '22+22+22', hold3x '30s+30s+30s', maxset '40', maxhold '90s'."
    )]
    async fn list_exercises(
        &self,
        params: Parameters<ListExercisesRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.exercises(params.0)?)
    }

    #[tool(
        description = "Check workout result strings against the exercise catalog without recording anything. Returns valid=true, or every problem found in input order."
    )]
    async fn validate_workout(
        &self,
        params: Parameters<ValidateWorkoutRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.validation(params.0))
    }

    #[tool(
        description = "Progression per exercise over the whole history: one number per recorded result in date order. Multi-set volumes are averaged, max volumes are taken as is; holds are in seconds."
    )]
    async fn workouts_summary(
        &self,
        params: Parameters<WorkoutsSummaryRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.summary(params.0)?)
    }

    // ============================================================
    // Daily entries
    // ============================================================

    #[tool(description = "Get the daily entry for a date, including running, workout results, weight and notes.")]
    async fn get_daily_entry(
        &self,
        params: Parameters<GetDailyEntryRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.daily_entry(params.0)?)
    }

    #[tool(description = "Get all daily entries of one ISO week, oldest first.")]
    async fn get_week(
        &self,
        params: Parameters<GetWeekRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.week(params.0)?)
    }

    #[tool(
        description = "Record a new daily entry from the compact YAML form. Workout results are validated first; nothing is stored if any is invalid. Fails if an entry for the date already exists."
    )]
    async fn record_daily_entry(
        &self,
        params: Parameters<RecordDailyEntryRequest>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&self.record(params.0)?)
    }

    #[tool(description = "Running streaks: best, current and total count of days run and distance covered.")]
    async fn get_stats(&self) -> Result<CallToolResult, McpError> {
        to_json(&self.stats()?)
    }
}

#[tool_handler]
impl ServerHandler for FitlogMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "fitlog".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"fitlog is a personal fitness log: one entry per day with running, a workout, weight and notes.

WORKOUT RESULTS:
Each result is '<exercise>/<execution> <volume>'. Call list_exercises for the valid keys.
- set3x: three sets of reps, '22+22+22'
- hold3x: three holds in seconds, '30s+30s+30s'
- maxset: one max set, '40'
- maxhold: one max hold, '90s'
Use validate_workout before record_daily_entry when unsure.

RECORDING:
record_daily_entry takes compact YAML, for example:
  date: 2026-01-15
  run: regular park-loop full 3
  workout: regular strength-a
  results:
    - squats/set3x 22+22+22
  weight: 75.5
Schedules are regular, adhoc, legacy or void. Run performance is 0 to 4.
Results are not stored when the routine is 'rest'.

READING:
- get_daily_entry: one day ('today' works)
- get_week: one ISO week, e.g. '2026-03'
- workouts_summary: progression per exercise
- get_stats: running streaks"#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(db: Database) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio");

    let catalog = Arc::new(db.load_catalog()?);
    let service = FitlogMcpServer::new(db, catalog);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
