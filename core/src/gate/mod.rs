//! The only entry point for generator output. A document comes back from
//! here structurally valid, fully cited and arithmetically consistent, or
//! not at all.

use crate::audit::citations::audit_citations;
use crate::audit::ledger::{audit_ledger, LedgerTotals};
use crate::determinism::fingerprint::{document_fingerprint, evaluation_id_ulid};
use crate::error::{FieldViolation, GateError, GateResult};
use crate::report::model::AUDIT_REPORT_SCHEMA_VERSION;
use crate::report::schema::{audit_report_v1, Shape};
use crate::report::AuditReportDocument;
use crate::validator::{validate, ROOT_PATH};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateReceipt {
    pub evaluation_id: String,
    pub schema_version: String,
    /// SHA-256 of the validated document's compact JSON, so inputs that
    /// decode to the same document share a fingerprint.
    pub fingerprint: String,
    pub entries_checked: usize,
    pub penalty_sum: i64,
    pub recomputed_final_score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub document: AuditReportDocument,
    pub receipt: GateReceipt,
}

pub struct ReportGate {
    schema: Shape,
}

impl Default for ReportGate {
    fn default() -> Self {
        Self::new_v1()
    }
}

impl ReportGate {
    pub fn new_v1() -> Self {
        Self {
            schema: audit_report_v1(),
        }
    }

    pub fn schema(&self) -> &Shape {
        &self.schema
    }

    pub fn accept(&self, raw: Value) -> GateResult<AuditReportDocument> {
        self.accept_with_receipt(raw).map(|outcome| outcome.document)
    }

    /// Parses `text` as JSON before gating it. Unparseable text is a schema
    /// violation at the document root.
    pub fn accept_str(&self, text: &str) -> GateResult<GateOutcome> {
        let raw: Value = serde_json::from_str(text).map_err(|e| {
            let err = GateError::SchemaViolation(vec![FieldViolation::new(
                ROOT_PATH,
                format!("malformed JSON: {}", e),
            )]);
            warn!(kind = %err.kind(), "report rejected before validation");
            err
        })?;
        self.accept_with_receipt(raw)
    }

    pub fn accept_with_receipt(&self, raw: Value) -> GateResult<GateOutcome> {
        let evaluation_id = evaluation_id_ulid();
        let span = tracing::debug_span!("report_gate", evaluation_id = %evaluation_id);
        let _enter = span.enter();

        let result = self.run_stages(&raw);
        match result {
            Ok((document, totals, fingerprint)) => {
                let receipt = GateReceipt {
                    evaluation_id,
                    schema_version: AUDIT_REPORT_SCHEMA_VERSION.to_string(),
                    fingerprint,
                    entries_checked: document.audit_ledger.entries.len(),
                    penalty_sum: totals.penalty_sum,
                    recomputed_final_score: totals.recomputed_final_score,
                };
                info!(
                    final_score = totals.recomputed_final_score,
                    entries = receipt.entries_checked,
                    fingerprint = %receipt.fingerprint,
                    "report accepted"
                );
                Ok(GateOutcome { document, receipt })
            }
            Err(err) => {
                warn!(
                    kind = %err.kind(),
                    violations = err.violation_count(),
                    "report rejected"
                );
                Err(err)
            }
        }
    }

    fn run_stages(&self, raw: &Value) -> GateResult<(AuditReportDocument, LedgerTotals, String)> {
        debug!(stage = "structure", "validating");
        let document = validate(&self.schema, raw).map_err(GateError::SchemaViolation)?;

        debug!(stage = "citations", "auditing");
        audit_citations(&document).map_err(GateError::ClauseTraceMissing)?;

        debug!(stage = "ledger", entries = document.audit_ledger.entries.len(), "auditing");
        let totals = audit_ledger(&document.audit_ledger)?;

        let fingerprint = document_fingerprint(&document).map_err(|e| {
            GateError::SchemaViolation(vec![FieldViolation::new(
                ROOT_PATH,
                format!("validated document could not be re-serialized: {}", e),
            )])
        })?;

        Ok((document, totals, fingerprint))
    }
}

fn shared_gate() -> &'static ReportGate {
    static GATE: OnceLock<ReportGate> = OnceLock::new();
    GATE.get_or_init(ReportGate::new_v1)
}

/// Gates `raw` with a process-wide [`ReportGate`].
pub fn accept(raw: Value) -> GateResult<AuditReportDocument> {
    shared_gate().accept(raw)
}

pub fn accept_with_receipt(raw: Value) -> GateResult<GateOutcome> {
    shared_gate().accept_with_receipt(raw)
}

pub fn accept_str(text: &str) -> GateResult<GateOutcome> {
    shared_gate().accept_str(text)
}
