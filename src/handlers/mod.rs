//! Report sinks

pub mod console;
pub mod csv_writer;
pub mod composite;

// Re-export for convenience
pub use console::ConsoleReportSink;
pub use csv_writer::CsvReportWriter;
pub use composite::CompositeReportSink;
