pub mod batch;
pub mod logging;
pub mod report;

pub use batch::BatchProcessor;
pub use report::{ReportWriter, REPORT_HEADER};
