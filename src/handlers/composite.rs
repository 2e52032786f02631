use std::sync::Arc;
use async_trait::async_trait;

use crate::error::WriteError;
use crate::models::Report;
use crate::traits::report_sink::ReportSink;

/// Composite sink that runs several sinks in order
pub struct CompositeReportSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl CompositeReportSink {
    /// Create a new composite sink
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink to the composite
    pub fn add_sink(&mut self, sink: Arc<dyn ReportSink>) {
        self.sinks.push(sink);
    }
}

impl Default for CompositeReportSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSink for CompositeReportSink {
    async fn write_report(&self, report: &Report) -> Result<(), WriteError> {
        for sink in &self.sinks {
            sink.write_report(report).await?;
        }
        Ok(())
    }
}
