pub mod model;
pub mod schema;

pub use model::AuditReportDocument;
