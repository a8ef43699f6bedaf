use policy_audit_core::error::{GateError, GateErrorKind};
use policy_audit_core::gate::accept;
use serde_json::{json, Value};

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/valid_report.json")).unwrap()
}

fn cited_entry(points: Value, clause_id: &str) -> Value {
    json!({
        "penalty_points": points,
        "category": "exclusion",
        "reason": format!("Exclusion {}", clause_id),
        "impact_scenario": "Claim for an excluded treatment is rejected outright",
        "clause_ref": {
            "clause_id": clause_id,
            "page": 12,
            "excerpt": "The following are permanently excluded",
            "confidence": 0.9
        }
    })
}

fn with_ledger(entries: Vec<Value>, final_score: Value) -> Value {
    let mut doc = fixture();
    doc["audit_ledger"]["entries"] = Value::Array(entries);
    doc["audit_ledger"]["final_score"] = final_score;
    doc
}

#[test]
fn consistent_ledger_is_accepted() {
    let doc = accept(fixture()).unwrap();
    assert_eq!(doc.audit_ledger.final_score, 75);
}

#[test]
fn overstated_final_score_is_a_math_error() {
    let mut doc = fixture();
    doc["audit_ledger"]["final_score"] = json!(80);
    let err = accept(doc).unwrap_err();
    assert_eq!(
        err,
        GateError::ScoringMathError {
            stated: 80,
            recomputed: 75,
            penalty_sum: -25,
        }
    );
    assert_eq!(err.kind(), GateErrorKind::SCORING_MATH_ERROR);
}

#[test]
fn deductions_beyond_100_clamp_to_zero() {
    let doc = with_ledger(
        vec![cited_entry(json!(-70), "EX-1"), cited_entry(json!(-60), "EX-2")],
        json!(0),
    );
    assert_eq!(accept(doc).unwrap().audit_ledger.final_score, 0);
}

#[test]
fn unclamped_negative_final_score_is_rejected() {
    let doc = with_ledger(
        vec![cited_entry(json!(-70), "EX-1"), cited_entry(json!(-60), "EX-2")],
        json!(-30),
    );
    match accept(doc).unwrap_err() {
        GateError::ScoringMathError {
            stated,
            recomputed,
            penalty_sum,
        } => {
            assert_eq!(stated, -30);
            assert_eq!(recomputed, 0);
            assert_eq!(penalty_sum, -130);
        }
        other => panic!("expected math error, got {}", other),
    }
}

#[test]
fn recomputed_value_tracks_penalty_sum() {
    for (points, expected) in [
        (vec![], 100),
        (vec![-1], 99),
        (vec![-33, -33, -33], 1),
        (vec![-50, -50], 0),
        (vec![-100, -1], 0),
        (vec![0, -5], 95),
    ] {
        let entries: Vec<Value> = points
            .iter()
            .enumerate()
            .map(|(i, p)| cited_entry(json!(p), &format!("EX-{}", i)))
            .collect();

        assert!(accept(with_ledger(entries.clone(), json!(expected))).is_ok());

        let wrong = if expected == 100 { 99 } else { expected + 1 };
        match accept(with_ledger(entries, json!(wrong))).unwrap_err() {
            GateError::ScoringMathError { recomputed, .. } => assert_eq!(recomputed, expected),
            other => panic!("expected math error, got {}", other),
        }
    }
}

#[test]
fn positive_penalty_is_rejected_even_when_total_adds_up() {
    // 100 + 5 - 10 clamps to 95, which the document states.
    let doc = with_ledger(
        vec![cited_entry(json!(5), "EX-1"), cited_entry(json!(-10), "EX-2")],
        json!(95),
    );
    let err = accept(doc).unwrap_err();
    assert_eq!(err.kind(), GateErrorKind::SCORING_INVARIANT_VIOLATION);
    assert_eq!(
        err.field_paths(),
        vec!["audit_ledger.entries.0.penalty_points".to_string()]
    );
}

#[test]
fn fractional_penalty_is_rejected() {
    let doc = with_ledger(vec![cited_entry(json!(-2.5), "EX-1")], json!(97));
    let err = accept(doc).unwrap_err();
    assert_eq!(err.kind(), GateErrorKind::SCORING_INVARIANT_VIOLATION);
    assert!(err.to_string().contains("-2.5"));
}

#[test]
fn initial_score_must_be_exactly_100() {
    let mut doc = fixture();
    // 99 - 10 - 15 = 74: consistent with the wrong starting point.
    doc["audit_ledger"]["initial_score"] = json!(99);
    doc["audit_ledger"]["final_score"] = json!(74);
    let err = accept(doc).unwrap_err();
    assert_eq!(err.kind(), GateErrorKind::SCORING_INVARIANT_VIOLATION);
    assert!(err
        .field_paths()
        .contains(&"audit_ledger.initial_score".to_string()));
}

#[test]
fn non_integer_final_score_is_structural() {
    let mut doc = fixture();
    doc["audit_ledger"]["final_score"] = json!(75.5);
    let err = accept(doc).unwrap_err();
    assert_eq!(err.kind(), GateErrorKind::SCHEMA_VIOLATION);
    assert_eq!(err.field_paths(), vec!["audit_ledger.final_score".to_string()]);
}
