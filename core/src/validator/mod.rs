use crate::error::FieldViolation;
use crate::report::schema::{Shape, StringFormat, HEX_DIGEST_LEN};
use crate::report::AuditReportDocument;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub(crate) const ROOT_PATH: &str = "$";

/// Checks `raw` against `schema`, collecting every violation in one pass,
/// and only then decodes it into the typed document.
pub(crate) fn validate(
    schema: &Shape,
    raw: &Value,
) -> Result<AuditReportDocument, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    check_value(schema, raw, "", &mut violations);
    if !violations.is_empty() {
        return Err(violations);
    }
    AuditReportDocument::deserialize(raw).map_err(|e| {
        vec![FieldViolation::new(
            ROOT_PATH,
            format!("typed decode failed: {}", e),
        )]
    })
}

fn check_value(shape: &Shape, value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    match shape {
        Shape::Any => {}
        Shape::Nullable(inner) => {
            if !value.is_null() {
                check_value(inner, value, path, out);
            }
        }
        Shape::Str {
            min_chars,
            exact_chars,
            format,
        } => match value.as_str() {
            Some(s) => check_string(s, *min_chars, *exact_chars, *format, path, out),
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Literal(expected) => match value.as_str() {
            Some(s) if s == *expected => {}
            Some(s) => out.push(violation(
                path,
                format!("expected \"{}\", found \"{}\"", expected, s),
            )),
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|a| *a == s) => {}
            Some(s) => out.push(violation(
                path,
                format!("expected one of [{}], found \"{}\"", allowed.join(", "), s),
            )),
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Integer { min, max } => match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => {
                    if let Some(lo) = min {
                        if i < *lo {
                            out.push(violation(path, format!("must be >= {}, found {}", lo, i)));
                        }
                    }
                    if let Some(hi) = max {
                        if i > *hi {
                            out.push(violation(path, format!("must be <= {}, found {}", hi, i)));
                        }
                    }
                }
                None if n.is_u64() => {
                    out.push(violation(path, format!("integer out of range: {}", n)))
                }
                None => out.push(violation(path, format!("expected integer, found {}", n))),
            },
            _ => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Number { min, max } => match value.as_f64() {
            Some(x) => {
                if let Some(lo) = min {
                    if x < *lo {
                        out.push(violation(path, format!("must be >= {}, found {}", lo, x)));
                    }
                }
                if let Some(hi) = max {
                    if x > *hi {
                        out.push(violation(path, format!("must be <= {}, found {}", hi, x)));
                    }
                }
            }
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Bool => {
            if !value.is_boolean() {
                out.push(type_mismatch(shape, value, path));
            }
        }
        Shape::Array(item) => match value.as_array() {
            Some(items) => {
                for (idx, v) in items.iter().enumerate() {
                    check_value(item, v, &child(path, &idx.to_string()), out);
                }
            }
            None => out.push(type_mismatch(shape, value, path)),
        },
        Shape::Object(fields) => match value.as_object() {
            Some(map) => {
                for f in fields {
                    match map.get(f.name) {
                        Some(v) => check_value(&f.shape, v, &child(path, f.name), out),
                        None if f.required => out.push(violation(
                            &child(path, f.name),
                            "required field is missing".to_string(),
                        )),
                        None => {}
                    }
                }
                for key in map.keys() {
                    if !fields.iter().any(|f| f.name == key) {
                        out.push(violation(
                            &child(path, key),
                            "unknown field (object is closed)".to_string(),
                        ));
                    }
                }
            }
            None => out.push(type_mismatch(shape, value, path)),
        },
    }
}

fn check_string(
    s: &str,
    min_chars: usize,
    exact_chars: Option<usize>,
    format: Option<StringFormat>,
    path: &str,
    out: &mut Vec<FieldViolation>,
) {
    if let Some(n) = exact_chars {
        let len = s.chars().count();
        if len != n {
            out.push(violation(
                path,
                format!("expected exactly {} characters, found {}", n, len),
            ));
            return;
        }
    }
    let trimmed_len = s.trim().chars().count();
    if trimmed_len < min_chars {
        let reason = if min_chars == 1 {
            "must not be empty".to_string()
        } else {
            format!(
                "expected at least {} characters, found {}",
                min_chars, trimmed_len
            )
        };
        out.push(violation(path, reason));
        return;
    }
    match format {
        Some(StringFormat::Uuid) if !is_uuid(s) => {
            out.push(violation(path, format!("expected UUID, found \"{}\"", s)))
        }
        Some(StringFormat::HexDigest) if !is_hex_digest(s) => out.push(violation(
            path,
            format!("expected {} hex characters", HEX_DIGEST_LEN),
        )),
        Some(StringFormat::Rfc3339) if OffsetDateTime::parse(s, &Rfc3339).is_err() => out.push(
            violation(path, format!("expected RFC 3339 timestamp, found \"{}\"", s)),
        ),
        _ => {}
    }
}

fn is_hex_digest(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("^[0-9a-fA-F]{{{}}}$", HEX_DIGEST_LEN)).expect("hex digest regex")
    })
    .is_match(s)
}

fn is_uuid(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        )
        .expect("uuid regex")
    })
    .is_match(s)
}

/// Plain keys join with `.`; keys that would make the path ambiguous (empty,
/// or containing `.`, `[` or `]`) are written as quoted brackets.
fn child(path: &str, key: &str) -> String {
    let plain = !key.is_empty() && !key.contains(['.', '[', ']']);
    match (path.is_empty(), plain) {
        (true, true) => key.to_string(),
        (false, true) => format!("{}.{}", path, key),
        (true, false) => format!("{}[{:?}]", ROOT_PATH, key),
        (false, false) => format!("{}[{:?}]", path, key),
    }
}

fn violation(path: &str, reason: String) -> FieldViolation {
    let path = if path.is_empty() { ROOT_PATH } else { path };
    FieldViolation::new(path, reason)
}

fn type_mismatch(shape: &Shape, value: &Value, path: &str) -> FieldViolation {
    violation(
        path,
        format!("expected {}, found {}", shape.type_name(), describe(value)),
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::schema::{audit_report_v1, clause_reference};
    use serde_json::json;

    fn fixture() -> Value {
        serde_json::from_str(include_str!("../../tests/fixtures/valid_report.json")).unwrap()
    }

    fn run(shape: &Shape, v: &Value) -> Vec<FieldViolation> {
        let mut out = Vec::new();
        check_value(shape, v, "", &mut out);
        out
    }

    #[test]
    fn fixture_decodes_into_typed_document() {
        let doc = validate(&audit_report_v1(), &fixture()).unwrap();
        assert_eq!(doc.audit_ledger.final_score, 75);
        assert_eq!(doc.audit_ledger.entries.len(), 2);
    }

    #[test]
    fn clause_reference_collects_every_problem() {
        let v = json!({"clause_id": "", "page": 0, "excerpt": "abc", "confidence": 1.5, "note": "x"});
        let out = run(&clause_reference(), &v);
        let paths: Vec<&str> = out.iter().map(|x| x.path.as_str()).collect();
        assert_eq!(paths, vec!["page", "excerpt", "confidence", "note"]);
    }

    #[test]
    fn nested_paths_use_dotted_indices() {
        let mut v = fixture();
        v["audit_ledger"]["entries"][1]["penalty_points"] = json!("-15");
        v["audit_ledger"]["entries"][0]["category"] = json!("bonus");
        let errs = validate(&audit_report_v1(), &v).unwrap_err();
        let paths: Vec<&str> = errs.iter().map(|x| x.path.as_str()).collect();
        assert!(paths.contains(&"audit_ledger.entries.1.penalty_points"));
        assert!(paths.contains(&"audit_ledger.entries.0.category"));
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn missing_and_unknown_fields_are_reported() {
        let mut v = fixture();
        v["final_verdict"].as_object_mut().unwrap().remove("summary");
        v["supplementary_coverage"]["dental"] = json!(true);
        let errs = validate(&audit_report_v1(), &v).unwrap_err();
        assert!(errs.contains(&FieldViolation::new(
            "final_verdict.summary",
            "required field is missing"
        )));
        assert!(errs
            .iter()
            .any(|e| e.path == "supplementary_coverage.dental" && e.reason.contains("closed")));
    }

    #[test]
    fn non_object_root_reports_root_path() {
        let errs = validate(&audit_report_v1(), &json!([1, 2])).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "$");
        assert_eq!(errs[0].reason, "expected object, found array");
    }

    #[test]
    fn integers_reject_fractions() {
        let shape = Shape::Integer {
            min: Some(0),
            max: Some(100),
        };
        assert_eq!(run(&shape, &json!(50)), vec![]);
        assert_eq!(run(&shape, &json!(12.5))[0].reason, "expected integer, found 12.5");
        assert_eq!(run(&shape, &json!(101))[0].reason, "must be <= 100, found 101");
    }

    #[test]
    fn string_formats() {
        assert!(is_uuid("3f2b8c1e-9a4d-4e7b-8c21-5d6f7a8b9c0d"));
        assert!(!is_uuid("3f2b8c1e9a4d4e7b8c215d6f7a8b9c0d"));
        assert!(is_hex_digest(&"ab".repeat(32)));
        assert!(!is_hex_digest(&"zz".repeat(32)));
        assert!(!is_hex_digest(&"ab".repeat(31)));
        assert!(!is_hex_digest(&format!("{}\n", "ab".repeat(32))));
        assert!(!is_uuid("3f2b8c1e-9a4d-4e7b-8c21-5d6f7a8b9c0"));
        assert!(!is_uuid("3f2b8c1e-9a4d-4e7b-8c21-5d6f7a8b9c0d-00"));

        let ts = Shape::Str {
            min_chars: 1,
            exact_chars: None,
            format: Some(StringFormat::Rfc3339),
        };
        assert!(run(&ts, &json!("2026-03-01T10:15:00Z")).is_empty());
        assert_eq!(run(&ts, &json!("yesterday")).len(), 1);
    }

    #[test]
    fn nullable_accepts_null_only_in_place_of_value() {
        let shape = Shape::Nullable(Box::new(Shape::Bool));
        assert!(run(&shape, &Value::Null).is_empty());
        assert!(run(&shape, &json!(true)).is_empty());
        assert_eq!(run(&shape, &json!("yes"))[0].reason, "expected boolean, found string");
    }

    #[test]
    fn opaque_audit_score_passes_through() {
        let mut v = fixture();
        v["audit_score"] = json!({"breakdown": {"claim_rejection_risk": 22}, "anything": [1, "x"]});
        let doc = validate(&audit_report_v1(), &v).unwrap();
        assert_eq!(doc.audit_score, Some(v["audit_score"].clone()));
    }

    #[test]
    fn ambiguous_keys_are_bracketed() {
        let mut v = fixture();
        v["a.b"] = json!(1);
        v[""] = json!(2);
        v["final_verdict"]["x[0]"] = json!(3);
        let errs = validate(&audit_report_v1(), &v).unwrap_err();
        let paths: Vec<&str> = errs.iter().map(|x| x.path.as_str()).collect();
        assert!(paths.contains(&"$[\"a.b\"]"));
        assert!(paths.contains(&"$[\"\"]"));
        assert!(paths.contains(&"final_verdict[\"x[0]\"]"));
        assert_eq!(errs.len(), 3);
    }

    #[test]
    fn null_audit_score_reads_as_absent() {
        let mut v = fixture();
        v["audit_score"] = Value::Null;
        let doc = validate(&audit_report_v1(), &v).unwrap();
        assert_eq!(doc.audit_score, None);
        assert!(serde_json::to_value(&doc).unwrap().get("audit_score").is_none());
    }
}
