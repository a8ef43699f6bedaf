use crate::error::MissingTrace;
use crate::report::model::{has_trace, AuditReportDocument};

/// Every ledger deduction must cite the policy text, and so must the room
/// rent and co-payment findings. All misses are returned together.
pub(crate) fn audit_citations(doc: &AuditReportDocument) -> Result<(), Vec<MissingTrace>> {
    let mut missing = Vec::new();

    for (idx, entry) in doc.audit_ledger.entries.iter().enumerate() {
        if !has_trace(&entry.clause_ref) {
            missing.push(MissingTrace {
                path: format!("audit_ledger.entries.{}.clause_ref", idx),
                entry_index: Some(idx),
                reason: entry.reason.clone(),
            });
        }
    }

    let risk = &doc.claim_risk_analysis;
    if !has_trace(&risk.room_rent.clause_ref) {
        missing.push(MissingTrace {
            path: "claim_risk_analysis.room_rent.clause_ref".to_string(),
            entry_index: None,
            reason: "room rent finding has no clause reference".to_string(),
        });
    }
    if !has_trace(&risk.co_payment.clause_ref) {
        missing.push(MissingTrace {
            path: "claim_risk_analysis.co_payment.clause_ref".to_string(),
            entry_index: None,
            reason: "co-payment finding has no clause reference".to_string(),
        });
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}
