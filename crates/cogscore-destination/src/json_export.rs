use crate::exporter::Exporter;
use crate::report::ExportReport;
use async_trait::async_trait;
use cogscore_core::ExportError;

/// Pretty-printed JSON with results, composite score and per-question breakdown.
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Exporter for JsonExporter {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, report: &ExportReport) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogscore_core::{AcousticFeatures, QuestionResult, ResultSet, ScoringConfig};

    fn report() -> ExportReport {
        let mut results = ResultSet::new();
        results.upsert(QuestionResult {
            transcript: "seventy words a minute".to_string(),
            acoustic: Some(AcousticFeatures {
                speech_rate: Some(70.0),
                ..AcousticFeatures::default()
            }),
            ..QuestionResult::new(4)
        });
        ExportReport::build(&results, &ScoringConfig::default())
    }

    #[test]
    fn test_json_exporter_name() {
        let exporter = JsonExporter::new();
        assert_eq!(exporter.name(), "json");
        assert_eq!(exporter.extension(), "json");
    }

    #[test]
    fn test_json_render_contains_all_sections() {
        let bytes = JsonExporter::new().render(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["results"][0]["questionId"], 4);
        assert_eq!(value["results"][0]["transcription"], "seventy words a minute");
        assert_eq!(value["results"][0]["audio_features"]["speech_rate"], 70.0);
        assert_eq!(value["composite"]["final100"], 90.0);
        assert_eq!(value["composite"]["risk"], "low");
        assert_eq!(value["composite"]["risk_label"], "Low/Normal");
        assert_eq!(value["breakdown"][0]["acoustic10"], 9.0);
    }

    #[tokio::test]
    async fn test_json_export_writes_file() {
        let dir = std::env::temp_dir().join("cogscore_json_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("results.json");
        let _ = std::fs::remove_file(&path);

        JsonExporter::new().export(&report(), &path).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["results"].as_array().unwrap().len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_exporter_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonExporter>();
    }
}
