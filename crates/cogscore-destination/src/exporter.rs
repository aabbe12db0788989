use crate::report::ExportReport;
use async_trait::async_trait;
use cogscore_core::ExportError;
use std::path::Path;

/// A file format that assessment results can be written to.
///
/// Implementations are registered via [`ExporterRegistry`](crate::ExporterRegistry)
/// and only need to turn an [`ExportReport`] into bytes; [`export`](Self::export)
/// handles the write.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Returns the exporter's registry name (e.g. `"json"`, `"csv"`).
    fn name(&self) -> &str;
    /// File extension, without the dot.
    fn extension(&self) -> &str;
    /// Serialize the report in this exporter's format.
    fn render(&self, report: &ExportReport) -> Result<Vec<u8>, ExportError>;

    /// Render the report and write it to `path`, replacing any existing file.
    async fn export(&self, report: &ExportReport, path: &Path) -> Result<(), ExportError> {
        let bytes = self.render(report)?;
        tokio::fs::write(path, &bytes).await?;
        tracing::info!(
            exporter = self.name(),
            path = %path.display(),
            bytes = bytes.len(),
            "exported results"
        );
        Ok(())
    }
}

/// `memory_test_results_<unix-millis>.<ext>`
pub fn export_file_name(extension: &str, timestamp_millis: i64) -> String {
    format!("memory_test_results_{timestamp_millis}.{extension}")
}
