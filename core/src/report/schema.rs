use super::model::{
    ConfidenceLevel, PenaltyCategory, PolicyType, Priority, RedFlagSeverity, RestorationType,
    RiskLevel, RoomRentLimitType, VerdictLabel, AUDIT_REPORT_SCHEMA_VERSION,
};

pub const MIN_EXCERPT_CHARS: usize = 5;
pub const HEX_DIGEST_LEN: usize = 64;
pub const CURRENCY_CODE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// 8-4-4-4-12 hex groups.
    Uuid,
    /// Hex-encoded 256-bit digest.
    HexDigest,
    Rfc3339,
}

/// Declarative description of an acceptable JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Str {
        /// Counted on the trimmed text.
        min_chars: usize,
        exact_chars: Option<usize>,
        format: Option<StringFormat>,
    },
    Literal(&'static str),
    OneOf(Vec<&'static str>),
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Bool,
    Array(Box<Shape>),
    /// Closed: keys not listed in `fields` are violations.
    Object(Vec<Field>),
    Nullable(Box<Shape>),
    /// Opaque pass-through, never inspected.
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Shape {
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Shape::Object(fields) => fields.iter().find(|f| f.name == name),
            Shape::Nullable(inner) => inner.field(name),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Str { .. } | Shape::Literal(_) | Shape::OneOf(_) => "string",
            Shape::Integer { .. } => "integer",
            Shape::Number { .. } => "number",
            Shape::Bool => "boolean",
            Shape::Array(_) => "array",
            Shape::Object(_) => "object",
            Shape::Nullable(inner) => inner.type_name(),
            Shape::Any => "any",
        }
    }
}

fn req(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: true,
    }
}

fn opt(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: false,
    }
}

fn object(fields: Vec<Field>) -> Shape {
    Shape::Object(fields)
}

fn nullable(shape: Shape) -> Shape {
    Shape::Nullable(Box::new(shape))
}

fn array_of(shape: Shape) -> Shape {
    Shape::Array(Box::new(shape))
}

fn text() -> Shape {
    Shape::Str {
        min_chars: 0,
        exact_chars: None,
        format: None,
    }
}

fn non_empty() -> Shape {
    Shape::Str {
        min_chars: 1,
        exact_chars: None,
        format: None,
    }
}

fn formatted(format: StringFormat) -> Shape {
    Shape::Str {
        min_chars: 1,
        exact_chars: None,
        format: Some(format),
    }
}

fn int_at_least(min: i64) -> Shape {
    Shape::Integer {
        min: Some(min),
        max: None,
    }
}

fn any_number() -> Shape {
    Shape::Number {
        min: None,
        max: None,
    }
}

fn amount() -> Shape {
    Shape::Number {
        min: Some(0.0),
        max: None,
    }
}

fn percent() -> Shape {
    Shape::Number {
        min: Some(0.0),
        max: Some(100.0),
    }
}

fn one_of(names: Vec<&'static str>) -> Shape {
    Shape::OneOf(names)
}

/// `clause_ref` slot: optional and nullable everywhere. Whether a given
/// slot must be populated is decided by the citation audit, not here.
fn clause_ref_slot() -> Field {
    opt("clause_ref", nullable(clause_reference()))
}

pub fn clause_reference() -> Shape {
    object(vec![
        req("clause_id", text()),
        req("page", int_at_least(1)),
        req(
            "excerpt",
            Shape::Str {
                min_chars: MIN_EXCERPT_CHARS,
                exact_chars: None,
                format: None,
            },
        ),
        req(
            "confidence",
            Shape::Number {
                min: Some(0.0),
                max: Some(1.0),
            },
        ),
    ])
}

fn report_meta() -> Shape {
    object(vec![
        req("report_id", formatted(StringFormat::Uuid)),
        req("prompt_hash", formatted(StringFormat::HexDigest)),
        req("document_checksum", formatted(StringFormat::HexDigest)),
        req("model_id", non_empty()),
        req("generated_at", formatted(StringFormat::Rfc3339)),
    ])
}

fn policy_profile() -> Shape {
    object(vec![
        req("insurer_name", non_empty()),
        req("policy_name", non_empty()),
        req("policy_type", one_of(PolicyType::wire_names())),
        opt("policy_number", nullable(text())),
        opt("plan_variant", nullable(text())),
        req("members_covered", int_at_least(1)),
    ])
}

fn policy_timeline() -> Shape {
    object(vec![
        req("policy_start_date", nullable(text())),
        req("policy_end_date", nullable(text())),
        req("policy_term_years", nullable(int_at_least(1))),
        req("free_look_days", nullable(int_at_least(0))),
        req("grace_period_days", nullable(int_at_least(0))),
    ])
}

fn coverage_structure() -> Shape {
    object(vec![
        req(
            "sum_insured",
            object(vec![
                req("amount", amount()),
                req(
                    "currency",
                    Shape::Str {
                        min_chars: CURRENCY_CODE_LEN,
                        exact_chars: Some(CURRENCY_CODE_LEN),
                        format: None,
                    },
                ),
                clause_ref_slot(),
            ]),
        ),
        req(
            "riders",
            array_of(object(vec![
                req("name", non_empty()),
                req("description", text()),
                clause_ref_slot(),
            ])),
        ),
        opt(
            "top_up",
            nullable(object(vec![
                req("deductible_amount", amount()),
                req("sum_insured", amount()),
                clause_ref_slot(),
            ])),
        ),
        req(
            "restoration",
            object(vec![
                req("available", Shape::Bool),
                req("restoration_type", one_of(RestorationType::wire_names())),
                clause_ref_slot(),
            ]),
        ),
        req(
            "no_claim_bonus",
            object(vec![
                req("available", Shape::Bool),
                req("accrual_percent_per_year", nullable(percent())),
                req("max_percent", nullable(amount())),
                clause_ref_slot(),
            ]),
        ),
    ])
}

fn waiting_periods() -> Shape {
    object(vec![
        req("initial_waiting_days", int_at_least(0)),
        req("pre_existing_disease_months", int_at_least(0)),
        req("specific_disease_months", int_at_least(0)),
        req("maternity_months", nullable(int_at_least(0))),
        req("notes", array_of(text())),
        clause_ref_slot(),
    ])
}

fn claim_risk_analysis() -> Shape {
    object(vec![
        req(
            "room_rent",
            object(vec![
                req("limit_type", one_of(RoomRentLimitType::wire_names())),
                req("limit_value", nullable(amount())),
                req("proportionate_deduction", Shape::Bool),
                req("risk_level", one_of(RiskLevel::wire_names())),
                clause_ref_slot(),
            ]),
        ),
        req(
            "co_payment",
            object(vec![
                req("applicable", Shape::Bool),
                req("percentage", percent()),
                req("conditions", text()),
                req("risk_level", one_of(RiskLevel::wire_names())),
                clause_ref_slot(),
            ]),
        ),
        req(
            "sub_limits",
            array_of(object(vec![
                req("treatment", non_empty()),
                req("limit_amount", nullable(amount())),
                req("limit_percent", nullable(percent())),
                clause_ref_slot(),
            ])),
        ),
        req(
            "deductibles",
            array_of(object(vec![
                req("description", non_empty()),
                req("amount", amount()),
                clause_ref_slot(),
            ])),
        ),
    ])
}

fn supplementary_coverage() -> Shape {
    object(
        [
            "ambulance",
            "day_care",
            "domiciliary",
            "ayush",
            "organ_donor",
            "health_checkup",
            "mental_health",
            "modern_treatments",
        ]
        .into_iter()
        .map(|name| req(name, Shape::Bool))
        .collect(),
    )
}

fn network_limitations() -> Shape {
    object(vec![
        req("network_hospital_count", nullable(int_at_least(0))),
        req("cashless_available", Shape::Bool),
        req("non_network_copay_percent", nullable(percent())),
        req("zone_based_pricing", Shape::Bool),
        req("notes", text()),
    ])
}

fn benefit_evaluation() -> Shape {
    object(vec![
        req("pros", array_of(text())),
        req("cons", array_of(text())),
        req(
            "red_flags",
            array_of(object(vec![
                req("title", non_empty()),
                req("detail", text()),
                req("severity", one_of(RedFlagSeverity::wire_names())),
                clause_ref_slot(),
            ])),
        ),
    ])
}

// initial_score and penalty_points are typed as plain numbers here: their
// values (literal 100, integral, non-positive) and the final_score
// arithmetic are owned by the ledger audit so they surface as scoring errors.
fn audit_ledger() -> Shape {
    object(vec![
        req("initial_score", any_number()),
        req(
            "entries",
            array_of(object(vec![
                req("penalty_points", any_number()),
                req("category", one_of(PenaltyCategory::wire_names())),
                req("reason", non_empty()),
                req("impact_scenario", non_empty()),
                clause_ref_slot(),
            ])),
        ),
        req(
            "final_score",
            Shape::Integer {
                min: None,
                max: None,
            },
        ),
    ])
}

fn final_verdict() -> Shape {
    object(vec![
        req("label", one_of(VerdictLabel::wire_names())),
        req("summary", non_empty()),
        req("confidence", one_of(ConfidenceLevel::wire_names())),
    ])
}

fn recommendations() -> Shape {
    array_of(object(vec![
        req("action", non_empty()),
        req("priority", one_of(Priority::wire_names())),
        req("rationale", text()),
    ]))
}

fn confidence_notes() -> Shape {
    object(vec![
        req("overall_confidence", one_of(ConfidenceLevel::wire_names())),
        req("limitations", array_of(text())),
        req("unreadable_sections", array_of(text())),
    ])
}

/// Full shape of an `AUDIT_REPORT_V1` document.
pub fn audit_report_v1() -> Shape {
    object(vec![
        req("schema_version", Shape::Literal(AUDIT_REPORT_SCHEMA_VERSION)),
        opt("report_meta", report_meta()),
        req("policy_profile", policy_profile()),
        req("policy_timeline", policy_timeline()),
        req("coverage_structure", coverage_structure()),
        req("waiting_periods", waiting_periods()),
        req("claim_risk_analysis", claim_risk_analysis()),
        req("supplementary_coverage", supplementary_coverage()),
        req("network_limitations", network_limitations()),
        req("benefit_evaluation", benefit_evaluation()),
        req("audit_ledger", audit_ledger()),
        req("final_verdict", final_verdict()),
        req("recommendations", recommendations()),
        req("confidence_notes", confidence_notes()),
        opt("audit_score", Shape::Any),
    ])
}
