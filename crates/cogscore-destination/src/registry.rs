use crate::exporter::{export_file_name, Exporter};
use crate::report::ExportReport;
use cogscore_core::ExportError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct ExporterRegistry {
    factories: HashMap<String, fn() -> Box<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("json", || Box::new(crate::json_export::JsonExporter::new()));
        registry.register("csv", || Box::new(crate::csv_export::CsvExporter::new()));
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn Exporter>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Exporter>, ExportError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| ExportError::NotFound(name.to_string()))
    }

    pub fn list_exporters(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Write the report once per named format into `out_dir`, all sharing one
    /// timestamp. Every name is resolved before anything is written.
    pub async fn export_all(
        &self,
        formats: &[String],
        report: &ExportReport,
        out_dir: &Path,
        timestamp_millis: i64,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let exporters = formats
            .iter()
            .map(|name| self.create(name))
            .collect::<Result<Vec<_>, _>>()?;

        tokio::fs::create_dir_all(out_dir).await?;

        let mut written = Vec::with_capacity(exporters.len());
        for exporter in exporters {
            let path = out_dir.join(export_file_name(exporter.extension(), timestamp_millis));
            exporter.export(report, &path).await?;
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
