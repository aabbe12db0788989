use cogscore_core::{CompositeScore, QuestionResult, RiskCategory, ScoringConfig};

/// Each word/min outside the normal band costs this fraction of a point.
const SPEECH_RATE_PENALTY_DIVISOR: f64 = 10.0;
const MAX_SUB_SCORE: f64 = 10.0;

/// Re-express a repetition rate on [0,1]. Values above 1 are percentages.
pub fn normalize_repetition_rate(raw: f64) -> f64 {
    if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}

/// Repetition sub-score: 10 for no repetition, falling linearly to 0.
/// A missing or non-numeric rate contributes 0, like the other sub-scores.
pub fn repetition_score10(rate: Option<f64>) -> f64 {
    rate.map_or(0.0, |r| {
        MAX_SUB_SCORE - normalize_repetition_rate(r) * MAX_SUB_SCORE
    })
}

/// Acoustic sub-score for a speech rate in words/min: full marks inside the
/// configured band, minus a tenth of a point per word/min outside it, floored at 0.
pub fn acoustic_score10(speech_rate: f64, config: &ScoringConfig) -> f64 {
    let mut score = MAX_SUB_SCORE;
    if speech_rate < config.speech_rate_min {
        score -= (config.speech_rate_min - speech_rate) / SPEECH_RATE_PENALTY_DIVISOR;
    }
    if speech_rate > config.speech_rate_max {
        score -= (speech_rate - config.speech_rate_max) / SPEECH_RATE_PENALTY_DIVISOR;
    }
    score.max(0.0)
}

/// Map a 0-100 composite onto a risk band. Each band includes its lower bound.
pub fn classify_risk(final100: f64, config: &ScoringConfig) -> RiskCategory {
    if final100 >= config.low_risk_threshold {
        RiskCategory::Low
    } else if final100 >= config.medium_risk_threshold {
        RiskCategory::Medium
    } else if final100 >= config.high_risk_threshold {
        RiskCategory::High
    } else {
        RiskCategory::VeryHigh
    }
}

#[derive(Debug, Default)]
struct Totals {
    context: f64,
    vocabulary: f64,
    repetition: f64,
    language_count: usize,
    acoustic: f64,
    acoustic_count: usize,
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Combine per-question analyses into one composite score.
///
/// Language sub-scores are averaged across the results that carry a language
/// analysis (missing fields count as 0), acoustic scores across the results
/// with a numeric speech rate. The final score blends the two with the
/// configured weights when both are present, otherwise uses whichever exists,
/// and is 0 when neither does.
pub fn aggregate<'a, I>(results: I, config: &ScoringConfig) -> CompositeScore
where
    I: IntoIterator<Item = &'a QuestionResult>,
{
    let mut totals = Totals::default();

    for result in results {
        if let Some(language) = &result.language {
            totals.context += language.context_relevance.unwrap_or(0.0);
            totals.vocabulary += language.vocabulary_score.unwrap_or(0.0);
            totals.repetition += repetition_score10(language.repetition_rate);
            totals.language_count += 1;
        }
        if let Some(rate) = result.speech_rate() {
            totals.acoustic += acoustic_score10(rate, config);
            totals.acoustic_count += 1;
        }
        if result.language.is_none() && result.speech_rate().is_none() {
            tracing::warn!(
                question_id = result.question_id,
                "result has no language analysis or speech rate"
            );
        }
    }

    let context_avg10 = average(totals.context, totals.language_count);
    let vocabulary_avg10 = average(totals.vocabulary, totals.language_count);
    let repetition_avg10 = average(totals.repetition, totals.language_count);
    let language_avg10 = (context_avg10 + vocabulary_avg10 + repetition_avg10) / 3.0;
    let acoustic_avg10 = average(totals.acoustic, totals.acoustic_count);

    let final10 = match (totals.language_count > 0, totals.acoustic_count > 0) {
        (true, true) => {
            language_avg10 * config.language_weight + acoustic_avg10 * config.acoustic_weight
        }
        (true, false) => language_avg10,
        (false, true) => acoustic_avg10,
        (false, false) => 0.0,
    };
    let final100 = (final10 * 10.0).clamp(0.0, 100.0);
    let risk = classify_risk(final100, config);

    tracing::debug!(
        language_count = totals.language_count,
        acoustic_count = totals.acoustic_count,
        final100,
        %risk,
        "aggregated score"
    );

    CompositeScore {
        context_avg10,
        vocabulary_avg10,
        repetition_avg10,
        language_avg10,
        acoustic_avg10: (totals.acoustic_count > 0).then_some(acoustic_avg10),
        final10,
        final100,
        risk,
        language_count: totals.language_count,
        acoustic_count: totals.acoustic_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogscore_core::{AcousticFeatures, LanguageAnalysis};

    fn language(context: f64, vocabulary: f64, repetition_rate: f64) -> QuestionResult {
        QuestionResult {
            language: Some(LanguageAnalysis {
                repetition_rate: Some(repetition_rate),
                vocabulary_score: Some(vocabulary),
                context_relevance: Some(context),
                commentary: None,
            }),
            ..QuestionResult::new(1)
        }
    }

    fn acoustic(speech_rate: f64) -> QuestionResult {
        QuestionResult {
            acoustic: Some(AcousticFeatures {
                speech_rate: Some(speech_rate),
                ..AcousticFeatures::default()
            }),
            ..QuestionResult::new(2)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let empty: Vec<QuestionResult> = Vec::new();
        let score = aggregate(&empty, &ScoringConfig::default());
        assert_eq!(score.final100, 0.0);
        assert_eq!(score.final10, 0.0);
        assert_eq!(score.risk, RiskCategory::VeryHigh);
        assert!(score.acoustic_avg10.is_none());
        assert!(!score.has_language());
        assert!(!score.has_acoustic());
    }

    #[test]
    fn test_perfect_language_only() {
        let score = aggregate(&[language(10.0, 10.0, 0.0)], &ScoringConfig::default());
        assert!(close(score.language_avg10, 10.0));
        assert!(close(score.final100, 100.0));
        assert_eq!(score.risk, RiskCategory::Low);
        assert_eq!(score.risk.label(), "Low/Normal");
    }

    #[test]
    fn test_normal_speech_rate_acoustic_only() {
        let score = aggregate(&[acoustic(110.0)], &ScoringConfig::default());
        assert_eq!(score.acoustic_avg10, Some(10.0));
        assert!(close(score.final100, 100.0));
    }

    #[test]
    fn test_slow_speech_lands_on_low_risk_boundary() {
        let score = aggregate(&[acoustic(60.0)], &ScoringConfig::default());
        assert!(close(score.acoustic_avg10.unwrap(), 8.0));
        assert!(close(score.final100, 80.0));
        assert_eq!(score.risk, RiskCategory::Low);
    }

    #[test]
    fn test_repetition_fraction_and_percentage_agree() {
        assert!(close(repetition_score10(Some(0.5)), 5.0));
        assert!(close(repetition_score10(Some(50.0)), 5.0));
        assert!(close(repetition_score10(Some(1.0)), 0.0));
        assert!(close(repetition_score10(None), 0.0));
    }

    #[test]
    fn test_acoustic_score_band() {
        let config = ScoringConfig::default();
        assert!(close(acoustic_score10(80.0, &config), 10.0));
        assert!(close(acoustic_score10(140.0, &config), 10.0));
        assert!(close(acoustic_score10(150.0, &config), 9.0));
        assert!(close(acoustic_score10(0.0, &config), 2.0));
        assert!(close(acoustic_score10(300.0, &config), 0.0));
    }

    #[test]
    fn test_weighted_blend_when_both_present() {
        // Language average (6 + 8 + 5) / 3 = 19/3, acoustic 9.
        let results = [language(6.0, 8.0, 0.5), acoustic(150.0)];
        let score = aggregate(&results, &ScoringConfig::default());
        let expected10 = 19.0 / 3.0 * 0.6 + 9.0 * 0.4;
        assert!(close(score.final10, expected10));
        assert!(close(score.final100, expected10 * 10.0));
        assert_eq!(score.risk, RiskCategory::Medium);
        assert_eq!(score.language_count, 1);
        assert_eq!(score.acoustic_count, 1);
    }

    #[test]
    fn test_language_averages_across_questions() {
        let results = [language(10.0, 4.0, 0.0), language(6.0, 8.0, 20.0)];
        let score = aggregate(&results, &ScoringConfig::default());
        assert!(close(score.context_avg10, 8.0));
        assert!(close(score.vocabulary_avg10, 6.0));
        assert!(close(score.repetition_avg10, 9.0));
        assert!(close(score.language_avg10, 23.0 / 3.0));
    }

    #[test]
    fn test_missing_language_fields_count_as_zero() {
        let result = QuestionResult {
            language: Some(LanguageAnalysis {
                repetition_rate: Some(0.0),
                ..LanguageAnalysis::default()
            }),
            ..QuestionResult::new(1)
        };
        let score = aggregate(&[result], &ScoringConfig::default());
        assert!(close(score.context_avg10, 0.0));
        assert!(close(score.vocabulary_avg10, 0.0));
        assert!(close(score.repetition_avg10, 10.0));
        assert!(close(score.final100, 100.0 / 3.0));
        assert_eq!(score.risk, RiskCategory::VeryHigh);
    }

    #[test]
    fn test_missing_repetition_rate_contributes_zero() {
        let result = QuestionResult {
            language: Some(LanguageAnalysis {
                vocabulary_score: Some(10.0),
                context_relevance: Some(10.0),
                ..LanguageAnalysis::default()
            }),
            ..QuestionResult::new(1)
        };
        let score = aggregate(&[result], &ScoringConfig::default());
        assert!(close(score.repetition_avg10, 0.0));
        assert!(close(score.language_avg10, 20.0 / 3.0));
        assert!(close(score.final100, 200.0 / 3.0));
        assert_eq!(score.risk, RiskCategory::Medium);
    }

    #[test]
    fn test_acoustic_block_without_speech_rate_is_ignored() {
        let result = QuestionResult {
            acoustic: Some(AcousticFeatures {
                number_utt: Some(4.0),
                ..AcousticFeatures::default()
            }),
            ..QuestionResult::new(3)
        };
        let score = aggregate(&[result], &ScoringConfig::default());
        assert_eq!(score.acoustic_count, 0);
        assert_eq!(score.final100, 0.0);
    }

    #[test]
    fn test_final_score_is_clamped() {
        let score = aggregate(&[language(50.0, 50.0, 0.0)], &ScoringConfig::default());
        assert_eq!(score.final100, 100.0);
        let score = aggregate(&[language(-30.0, -30.0, 1.0)], &ScoringConfig::default());
        assert_eq!(score.final100, 0.0);
    }

    #[test]
    fn test_risk_band_boundaries() {
        let config = ScoringConfig::default();
        assert_eq!(classify_risk(100.0, &config), RiskCategory::Low);
        assert_eq!(classify_risk(80.0, &config), RiskCategory::Low);
        assert_eq!(classify_risk(79.99, &config), RiskCategory::Medium);
        assert_eq!(classify_risk(60.0, &config), RiskCategory::Medium);
        assert_eq!(classify_risk(59.99, &config), RiskCategory::High);
        assert_eq!(classify_risk(40.0, &config), RiskCategory::High);
        assert_eq!(classify_risk(39.99, &config), RiskCategory::VeryHigh);
        assert_eq!(classify_risk(0.0, &config), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_custom_weights_and_thresholds() {
        let config = ScoringConfig {
            language_weight: 0.5,
            acoustic_weight: 0.5,
            low_risk_threshold: 90.0,
            ..ScoringConfig::default()
        };
        let results = [language(10.0, 10.0, 0.0), acoustic(60.0)];
        let score = aggregate(&results, &config);
        assert!(close(score.final100, 90.0));
        assert_eq!(score.risk, RiskCategory::Low);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let results = vec![language(7.0, 6.0, 0.25), acoustic(95.0), acoustic(170.0)];
        let config = ScoringConfig::default();
        assert_eq!(aggregate(&results, &config), aggregate(&results, &config));
    }
}
