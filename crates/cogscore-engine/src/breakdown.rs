use crate::aggregate::{acoustic_score10, repetition_score10};
use cogscore_core::{QuestionResult, ScoringConfig};
use serde::Serialize;

/// Scores for a single answer, as plotted per question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionScore {
    pub question_id: u32,
    pub context10: f64,
    pub vocabulary10: f64,
    pub repetition10: f64,
    pub language10: f64,
    pub acoustic10: f64,
    pub final100: f64,
}

/// Score one answer on its own. Unlike [`aggregate`](crate::aggregate), the
/// weighted blend is always applied, so a missing half pulls the total down.
pub fn score_question(result: &QuestionResult, config: &ScoringConfig) -> QuestionScore {
    let language = result.language.as_ref();
    let context10 = language.and_then(|l| l.context_relevance).unwrap_or(0.0);
    let vocabulary10 = language.and_then(|l| l.vocabulary_score).unwrap_or(0.0);
    let repetition10 = repetition_score10(language.and_then(|l| l.repetition_rate));
    let acoustic10 = result
        .speech_rate()
        .map_or(0.0, |rate| acoustic_score10(rate, config));

    let language10 = (context10 + vocabulary10 + repetition10) / 3.0;
    let final10 = language10 * config.language_weight + acoustic10 * config.acoustic_weight;

    QuestionScore {
        question_id: result.question_id,
        context10,
        vocabulary10,
        repetition10,
        language10,
        acoustic10,
        final100: (final10 * 10.0).clamp(0.0, 100.0),
    }
}

pub fn breakdown<'a, I>(results: I, config: &ScoringConfig) -> Vec<QuestionScore>
where
    I: IntoIterator<Item = &'a QuestionResult>,
{
    results
        .into_iter()
        .map(|r| score_question(r, config))
        .collect()
}
