use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One structural problem, addressed from the document root
/// (e.g. `audit_ledger.entries.2.penalty_points`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// A scoring-relevant claim that carries no usable clause reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MissingTrace {
    pub path: String,
    /// Ordinal of the ledger entry, `None` for the fixed claim-risk slots.
    pub entry_index: Option<usize>,
    pub reason: String,
}

impl fmt::Display for MissingTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry_index {
            Some(idx) => write!(f, "{} (entry {}: {:?})", self.path, idx, self.reason),
            None => write!(f, "{} ({})", self.path, self.reason),
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GateErrorKind {
    SCHEMA_VIOLATION,
    CLAUSE_TRACE_MISSING,
    SCORING_INVARIANT_VIOLATION,
    SCORING_MATH_ERROR,
}

impl GateErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateErrorKind::SCHEMA_VIOLATION => "SCHEMA_VIOLATION",
            GateErrorKind::CLAUSE_TRACE_MISSING => "CLAUSE_TRACE_MISSING",
            GateErrorKind::SCORING_INVARIANT_VIOLATION => "SCORING_INVARIANT_VIOLATION",
            GateErrorKind::SCORING_MATH_ERROR => "SCORING_MATH_ERROR",
        }
    }
}

impl fmt::Display for GateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GateError {
    #[error("schema violation: {}", join(.0))]
    SchemaViolation(Vec<FieldViolation>),

    #[error("clause trace missing: {}", join(.0))]
    ClauseTraceMissing(Vec<MissingTrace>),

    #[error("scoring invariant violation: {}", join(.0))]
    ScoringInvariantViolation(Vec<FieldViolation>),

    #[error(
        "scoring math error: stated final_score {stated} but recomputed {recomputed} (penalty sum {penalty_sum})"
    )]
    ScoringMathError {
        stated: i64,
        recomputed: i64,
        penalty_sum: i64,
    },
}

impl GateError {
    pub fn kind(&self) -> GateErrorKind {
        match self {
            GateError::SchemaViolation(_) => GateErrorKind::SCHEMA_VIOLATION,
            GateError::ClauseTraceMissing(_) => GateErrorKind::CLAUSE_TRACE_MISSING,
            GateError::ScoringInvariantViolation(_) => GateErrorKind::SCORING_INVARIANT_VIOLATION,
            GateError::ScoringMathError { .. } => GateErrorKind::SCORING_MATH_ERROR,
        }
    }

    pub fn field_paths(&self) -> Vec<String> {
        match self {
            GateError::SchemaViolation(v) | GateError::ScoringInvariantViolation(v) => {
                v.iter().map(|x| x.path.clone()).collect()
            }
            GateError::ClauseTraceMissing(v) => v.iter().map(|x| x.path.clone()).collect(),
            GateError::ScoringMathError { .. } => vec!["audit_ledger.final_score".to_string()],
        }
    }

    /// Number of individual problems folded into this rejection.
    pub fn violation_count(&self) -> usize {
        match self {
            GateError::SchemaViolation(v) | GateError::ScoringInvariantViolation(v) => v.len(),
            GateError::ClauseTraceMissing(v) => v.len(),
            GateError::ScoringMathError { .. } => 1,
        }
    }

    pub fn to_rejection(&self) -> GateRejection {
        GateRejection {
            kind: self.kind(),
            message: self.to_string(),
            field_paths: self.field_paths(),
        }
    }
}

/// Transport-neutral projection of a [`GateError`] for API writers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateRejection {
    pub kind: GateErrorKind,
    pub message: String,
    pub field_paths: Vec<String>,
}

impl From<&GateError> for GateRejection {
    fn from(e: &GateError) -> Self {
        e.to_rejection()
    }
}

pub type GateResult<T> = Result<T, GateError>;

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
