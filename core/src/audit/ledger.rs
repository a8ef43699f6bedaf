use crate::error::{FieldViolation, GateError};
use crate::report::model::PenaltyLedger;
use serde_json::Number;

pub const INITIAL_SCORE: i64 = 100;
pub const SCORE_FLOOR: i64 = 0;
pub const SCORE_CEILING: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LedgerTotals {
    pub penalty_sum: i64,
    pub recomputed_final_score: i64,
}

/// `clamp(0, 100, 100 + penalty_sum)`.
pub fn recompute_final_score(penalty_sum: i64) -> i64 {
    INITIAL_SCORE
        .saturating_add(penalty_sum)
        .clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Runs the initial-score, per-entry and final-score checks over the whole
/// ledger. Structural invariant failures win over a plain math mismatch; when
/// both occur the mismatch is folded into the invariant list.
pub(crate) fn audit_ledger(ledger: &PenaltyLedger) -> Result<LedgerTotals, GateError> {
    let mut violations = Vec::new();

    if ledger.initial_score.as_f64() != Some(INITIAL_SCORE as f64) {
        violations.push(FieldViolation::new(
            "audit_ledger.initial_score",
            format!(
                "initial_score must be {}, found {}",
                INITIAL_SCORE, ledger.initial_score
            ),
        ));
    }

    let mut penalty_sum: i64 = 0;
    let mut raw_sum: f64 = 0.0;
    for (idx, entry) in ledger.entries.iter().enumerate() {
        let points = &entry.penalty_points;
        raw_sum += points.as_f64().unwrap_or(0.0);

        let positive = points.as_f64().is_some_and(|x| x > 0.0);
        let integral = integral_points(points);
        let reason = match (integral, positive) {
            (Some(p), false) => {
                penalty_sum = penalty_sum.saturating_add(p);
                continue;
            }
            (Some(_), true) => "is a bonus; penalty_points must be <= 0",
            (None, false) => "is fractional; penalty_points must be an integer",
            (None, true) => "penalty_points must be a non-positive integer",
        };
        violations.push(FieldViolation::new(
            format!("audit_ledger.entries.{}.penalty_points", idx),
            format!("entry {} ({:?}): {} {}", idx, entry.reason, points, reason),
        ));
    }

    let stated = ledger.final_score;

    if !violations.is_empty() {
        let recomputed =
            (INITIAL_SCORE as f64 + raw_sum).clamp(SCORE_FLOOR as f64, SCORE_CEILING as f64);
        if stated as f64 != recomputed {
            violations.push(FieldViolation::new(
                "audit_ledger.final_score",
                format!(
                    "stated {} but recomputed {} (penalty sum {})",
                    stated, recomputed, raw_sum
                ),
            ));
        }
        return Err(GateError::ScoringInvariantViolation(violations));
    }

    let recomputed = recompute_final_score(penalty_sum);
    if stated != recomputed {
        return Err(GateError::ScoringMathError {
            stated,
            recomputed,
            penalty_sum,
        });
    }

    Ok(LedgerTotals {
        penalty_sum,
        recomputed_final_score: recomputed,
    })
}

/// Integer value of a penalty, accepting integral floats such as `-10.0`.
/// Integral values beyond the i64 range saturate; the clamp absorbs them.
fn integral_points(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return Some(i64::MAX);
    }
    let x = n.as_f64()?;
    if x.is_finite() && x.fract() == 0.0 {
        // `as` saturates at the i64 bounds.
        Some(x as i64)
    } else {
        None
    }
}
