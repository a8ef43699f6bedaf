use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const AUDIT_REPORT_SCHEMA_VERSION: &str = "AUDIT_REPORT_V1";

// Closed string sets. `ALL` feeds the declarative schema so the allowed
// values there always match what the typed model will deserialize.
macro_rules! closed_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn wire_names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }
    };
}

closed_set!(PolicyType {
    Individual => "individual",
    FamilyFloater => "family_floater",
    Group => "group",
    SeniorCitizen => "senior_citizen",
    TopUp => "top_up",
    Other => "other",
});

closed_set!(RestorationType {
    NotOffered => "none",
    Partial => "partial",
    Full => "full",
    Unlimited => "unlimited",
});

closed_set!(RoomRentLimitType {
    NoLimit => "no_limit",
    FixedAmount => "fixed_amount",
    PercentageOfSumInsured => "percentage_of_sum_insured",
    RoomCategory => "room_category",
});

closed_set!(RiskLevel {
    High => "high",
    Medium => "medium",
    Low => "low",
});

closed_set!(ConfidenceLevel {
    High => "high",
    Medium => "medium",
    Low => "low",
});

closed_set!(Priority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

closed_set!(RedFlagSeverity {
    Critical => "critical",
    Major => "major",
    Minor => "minor",
});

closed_set!(
    /// What a ledger deduction is charged against.
    PenaltyCategory {
        CoverageGap => "coverage_gap",
        SubLimit => "sub_limit",
        WaitingPeriod => "waiting_period",
        CopayDeductible => "copay_deductible",
        RoomRent => "room_rent",
        Exclusion => "exclusion",
        Ambiguity => "ambiguity",
    }
);

closed_set!(VerdictLabel {
    Safe => "SAFE",
    Borderline => "BORDERLINE",
    Risky => "RISKY",
});

/// Pointer from an analytical claim to the supporting place in the policy text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClauseReference {
    pub clause_id: String,
    pub page: u64,
    pub excerpt: String,
    pub confidence: f64,
}

impl ClauseReference {
    /// An empty identifier counts as no reference at all.
    pub fn is_traceable(&self) -> bool {
        !self.clause_id.trim().is_empty()
    }
}

pub fn has_trace(clause_ref: &Option<ClauseReference>) -> bool {
    clause_ref.as_ref().is_some_and(ClauseReference::is_traceable)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuditReportDocument {
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_meta: Option<ReportMeta>,
    pub policy_profile: PolicyProfile,
    pub policy_timeline: PolicyTimeline,
    pub coverage_structure: CoverageStructure,
    pub waiting_periods: WaitingPeriods,
    pub claim_risk_analysis: ClaimRiskAnalysis,
    pub supplementary_coverage: SupplementaryCoverage,
    pub network_limitations: NetworkLimitations,
    pub benefit_evaluation: BenefitEvaluation,
    pub audit_ledger: PenaltyLedger,
    pub final_verdict: FinalVerdict,
    pub recommendations: Vec<Recommendation>,
    pub confidence_notes: ConfidenceNotes,
    /// Legacy fixed-point rubric. Presentation only and never validated; an
    /// explicit `null` reads as absent and is dropped on re-serialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_score: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportMeta {
    pub report_id: String,
    pub prompt_hash: String,
    pub document_checksum: String,
    pub model_id: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyProfile {
    pub insurer_name: String,
    pub policy_name: String,
    pub policy_type: PolicyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_variant: Option<String>,
    pub members_covered: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyTimeline {
    pub policy_start_date: Option<String>,
    pub policy_end_date: Option<String>,
    pub policy_term_years: Option<u64>,
    pub free_look_days: Option<u64>,
    pub grace_period_days: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CoverageStructure {
    pub sum_insured: SumInsured,
    pub riders: Vec<Rider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_up: Option<TopUp>,
    pub restoration: Restoration,
    pub no_claim_bonus: NoClaimBonus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SumInsured {
    pub amount: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Rider {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopUp {
    pub deductible_amount: f64,
    pub sum_insured: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Restoration {
    pub available: bool,
    pub restoration_type: RestorationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NoClaimBonus {
    pub available: bool,
    pub accrual_percent_per_year: Option<f64>,
    pub max_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WaitingPeriods {
    pub initial_waiting_days: u64,
    pub pre_existing_disease_months: u64,
    pub specific_disease_months: u64,
    pub maternity_months: Option<u64>,
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClaimRiskAnalysis {
    pub room_rent: RoomRentAnalysis,
    pub co_payment: CoPaymentAnalysis,
    pub sub_limits: Vec<SubLimit>,
    pub deductibles: Vec<Deductible>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoomRentAnalysis {
    pub limit_type: RoomRentLimitType,
    pub limit_value: Option<f64>,
    pub proportionate_deduction: bool,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CoPaymentAnalysis {
    pub applicable: bool,
    pub percentage: f64,
    pub conditions: String,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubLimit {
    pub treatment: String,
    pub limit_amount: Option<f64>,
    pub limit_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Deductible {
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SupplementaryCoverage {
    pub ambulance: bool,
    pub day_care: bool,
    pub domiciliary: bool,
    pub ayush: bool,
    pub organ_donor: bool,
    pub health_checkup: bool,
    pub mental_health: bool,
    pub modern_treatments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetworkLimitations {
    pub network_hospital_count: Option<u64>,
    pub cashless_available: bool,
    pub non_network_copay_percent: Option<f64>,
    pub zone_based_pricing: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenefitEvaluation {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub red_flags: Vec<RedFlag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RedFlag {
    pub title: String,
    pub detail: String,
    pub severity: RedFlagSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

/// Numeric scoring record. `initial_score` and `penalty_points` keep the
/// generator's raw JSON numbers so fractional or oversized values survive
/// until the ledger audit can name them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PenaltyLedger {
    pub initial_score: Number,
    pub entries: Vec<LedgerEntry>,
    pub final_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LedgerEntry {
    pub penalty_points: Number,
    pub category: PenaltyCategory,
    pub reason: String,
    pub impact_scenario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_ref: Option<ClauseReference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FinalVerdict {
    pub label: VerdictLabel,
    pub summary: String,
    pub confidence: ConfidenceLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Recommendation {
    pub action: String,
    pub priority: Priority,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceNotes {
    pub overall_confidence: ConfidenceLevel,
    pub limitations: Vec<String>,
    pub unreadable_sections: Vec<String>,
}
