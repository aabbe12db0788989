use cogscore_core::{CompositeScore, QuestionResult, ResultSet, ScoringConfig};
use cogscore_engine::{aggregate, breakdown, QuestionScore};
use serde::{Serialize, Serializer};

/// Everything an exporter writes: the raw answers plus derived scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub results: Vec<QuestionResult>,
    #[serde(serialize_with = "composite_with_label")]
    pub composite: CompositeScore,
    pub breakdown: Vec<QuestionScore>,
}

impl ExportReport {
    pub fn build(results: &ResultSet, config: &ScoringConfig) -> Self {
        Self {
            results: results.to_vec(),
            composite: aggregate(results, config),
            breakdown: breakdown(results, config),
        }
    }
}

/// The composite plus its human-readable risk label (e.g. "Low/Normal").
fn composite_with_label<S: Serializer>(
    score: &CompositeScore,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Labeled<'a> {
        #[serde(flatten)]
        score: &'a CompositeScore,
        risk_label: &'static str,
    }

    Labeled {
        score,
        risk_label: score.risk.label(),
    }
    .serialize(serializer)
}
