use crate::exporter::Exporter;
use crate::report::ExportReport;
use async_trait::async_trait;
use cogscore_core::{ExportError, QuestionResult};
use cogscore_engine::aggregate::normalize_repetition_rate;

const HEADER: [&str; 8] = [
    "index",
    "question",
    "transcript",
    "repetition_pct",
    "vocabulary_score",
    "context_relevance",
    "speech_rate",
    "analysis",
];

const LINE_END: &str = "\r\n";

/// One row per answer. Missing values are left empty.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row(index: usize, result: &QuestionResult) -> Vec<String> {
    let language = result.language.as_ref();
    let repetition_pct = language
        .and_then(|l| l.repetition_rate)
        .map(|rate| format!("{:.1}", normalize_repetition_rate(rate) * 100.0))
        .unwrap_or_default();

    vec![
        (index + 1).to_string(),
        result.question.clone(),
        result.transcript.clone(),
        repetition_pct,
        number(language.and_then(|l| l.vocabulary_score)),
        number(language.and_then(|l| l.context_relevance)),
        number(result.speech_rate()),
        language
            .and_then(|l| l.commentary.clone())
            .unwrap_or_default(),
    ]
}

#[async_trait]
impl Exporter for CsvExporter {
    fn name(&self) -> &str {
        "csv"
    }

    fn extension(&self) -> &str {
        "csv"
    }

    fn render(&self, report: &ExportReport) -> Result<Vec<u8>, ExportError> {
        let mut out = HEADER.join(",");
        out.push_str(LINE_END);
        for (index, result) in report.results.iter().enumerate() {
            let fields: Vec<String> = row(index, result)
                .iter()
                .map(|f| escape_field(f))
                .collect();
            out.push_str(&fields.join(","));
            out.push_str(LINE_END);
        }
        Ok(out.into_bytes())
    }
}
