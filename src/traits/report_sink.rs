use async_trait::async_trait;

use crate::error::WriteError;
use crate::models::Report;

/// Destination of a finished report
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Emit the report. Any error aborts the run.
    async fn write_report(&self, report: &Report) -> Result<(), WriteError>;
}
