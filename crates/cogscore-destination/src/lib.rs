pub mod csv_export;
pub mod exporter;
pub mod json_export;
pub mod registry;
pub mod report;

pub use csv_export::CsvExporter;
pub use exporter::{export_file_name, Exporter};
pub use json_export::JsonExporter;
pub use registry::ExporterRegistry;
pub use report::ExportReport;
