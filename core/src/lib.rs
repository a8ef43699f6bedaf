pub mod determinism;
pub mod error;
pub mod gate;
pub mod report;

pub(crate) mod audit;
pub(crate) mod validator;

pub use error::{GateError, GateErrorKind, GateRejection, GateResult};
pub use gate::{accept, accept_str, accept_with_receipt, GateOutcome, GateReceipt, ReportGate};
pub use report::AuditReportDocument;
