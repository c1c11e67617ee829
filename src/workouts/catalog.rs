use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static SET3X: LazyLock<Regex> = LazyLock::new(|| grammar(r"^(\d+)(\+\d+){2}$"));
static HOLD3X: LazyLock<Regex> = LazyLock::new(|| grammar(r"^(\d+s)(\+\d+s){2}$"));
static MAXSET: LazyLock<Regex> = LazyLock::new(|| grammar(r"^\d+$"));
static MAXHOLD: LazyLock<Regex> = LazyLock::new(|| grammar(r"^\d+s$"));

fn grammar(pattern: &str) -> Regex {
    Regex::new(pattern).expect("volume grammar must compile")
}

/// Errors raised while building the exercise catalog.
///
/// These indicate an inconsistent catalog (bad seed data), not bad user
/// input, and are surfaced once at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown execution type: {0}")]
    UnknownExecutionKind(String),

    #[error("Malformed exercise name (expected <exercise>/<execution>): {0}")]
    MalformedExerciseName(String),
}

/// How a workout volume is measured.
///
/// - `Set3x`: three sets of reps, `22+22+22`
/// - `Hold3x`: three timed holds, `30s+30s+30s`
/// - `MaxSet`: one max-reps set, `40`
/// - `MaxHold`: one max-duration hold, `90s`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionKind {
    Set3x,
    Hold3x,
    MaxSet,
    MaxHold,
}

impl ExecutionKind {
    pub const ALL: [ExecutionKind; 4] = [Self::Set3x, Self::Hold3x, Self::MaxSet, Self::MaxHold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set3x => "set3x",
            Self::Hold3x => "hold3x",
            Self::MaxSet => "maxset",
            Self::MaxHold => "maxhold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "set3x" => Some(Self::Set3x),
            "hold3x" => Some(Self::Hold3x),
            "maxset" => Some(Self::MaxSet),
            "maxhold" => Some(Self::MaxHold),
            _ => None,
        }
    }

    /// The volume grammar for this kind.
    pub fn grammar(&self) -> &'static Regex {
        match self {
            Self::Set3x => &*SET3X,
            Self::Hold3x => &*HOLD3X,
            Self::MaxSet => &*MAXSET,
            Self::MaxHold => &*MAXHOLD,
        }
    }
}

/// Resolve the grammar for an execution kind given by name.
pub fn grammar_for(execution: &str) -> Result<&'static Regex, CatalogError> {
    ExecutionKind::from_str(execution)
        .map(|kind| kind.grammar())
        .ok_or_else(|| CatalogError::UnknownExecutionKind(execution.to_string()))
}

/// One catalog entry, identified by `<exercise>/<execution>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    /// Full key, e.g. `squats/set3x`.
    pub name: String,
    pub exercise: String,
    pub execution: ExecutionKind,
}

impl Exercise {
    /// Parse a raw catalog row such as `frontPlank/maxhold`.
    pub fn parse(name: &str) -> Result<Self, CatalogError> {
        let (exercise, execution) = name
            .split_once('/')
            .filter(|(exercise, execution)| !exercise.is_empty() && !execution.is_empty())
            .ok_or_else(|| CatalogError::MalformedExerciseName(name.to_string()))?;

        let execution = ExecutionKind::from_str(execution)
            .ok_or_else(|| CatalogError::UnknownExecutionKind(execution.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            exercise: exercise.to_string(),
            execution,
        })
    }

    pub fn accepts(&self, volume: &str) -> bool {
        self.execution.grammar().is_match(volume)
    }
}

/// The set of exercises a workout result may reference.
///
/// Built once from storage and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: BTreeMap<String, Exercise>,
}

impl Catalog {
    /// Build a catalog from raw `<exercise>/<execution>` names.
    ///
    /// Any malformed name or unknown execution kind fails the whole catalog.
    pub fn from_names<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exercises = names
            .into_iter()
            .map(|name| Exercise::parse(name.as_ref()).map(|e| (e.name.clone(), e)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self { exercises })
    }

    /// All exercises, ordered by name.
    pub fn list_exercises(&self) -> Vec<&Exercise> {
        self.exercises.values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Exercise> {
        self.exercises.get(name)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
