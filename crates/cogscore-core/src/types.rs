use crate::error::AudioError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Decoded, planar audio: one sample vector per channel, all the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self::new(sample_rate, vec![samples])
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames, taken from the first channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Check the shape invariants: at least one channel, a non-zero rate, equal lengths.
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.channels.is_empty() {
            return Err(AudioError::InvalidArgument(
                "audio buffer has no channels".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(AudioError::InvalidArgument(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        let frames = self.frame_count();
        if let Some((index, ch)) = self
            .channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frames)
        {
            return Err(AudioError::InvalidArgument(format!(
                "channel {index} has {} samples, expected {frames}",
                ch.len()
            )));
        }
        Ok(())
    }

    /// Average all channels into one.
    pub fn to_mono(&self) -> Vec<f32> {
        let count = self.channel_count();
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return self.channels[0].clone();
        }
        (0..self.frame_count())
            .map(|i| {
                let sum: f32 = self
                    .channels
                    .iter()
                    .map(|ch| ch.get(i).copied().unwrap_or(0.0))
                    .sum();
                sum / count as f32
            })
            .collect()
    }
}

/// Output of the external text-analysis service for one answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageAnalysis {
    /// Fraction in [0,1], or a percentage when above 1.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub repetition_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub vocabulary_score: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub context_relevance: Option<f64>,

    #[serde(default, rename = "analysis", skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// Speech-timing features for one answer. Only `speech_rate` is scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Words per minute. Must be a JSON number to count.
    #[serde(default, deserialize_with = "strict_f64", skip_serializing_if = "Option::is_none")]
    pub speech_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub number_utt: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub sildur_mean: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub pitch_mean: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub energy_mean: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(rename = "questionId", alias = "question_id")]
    pub question_id: u32,

    #[serde(default)]
    pub question: String,

    #[serde(default, rename = "transcription", alias = "transcript")]
    pub transcript: String,

    /// Recording length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, rename = "gpt_analysis", alias = "language", skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageAnalysis>,

    #[serde(default, rename = "audio_features", alias = "acoustic", skip_serializing_if = "Option::is_none")]
    pub acoustic: Option<AcousticFeatures>,
}

impl QuestionResult {
    pub fn new(question_id: u32) -> Self {
        Self {
            question_id,
            ..Self::default()
        }
    }

    /// Usable speech rate, if the acoustic block carries one.
    pub fn speech_rate(&self) -> Option<f64> {
        self.acoustic.as_ref().and_then(|a| a.speech_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low/Normal",
            RiskCategory::Medium => "Medium/Monitor",
            RiskCategory::High => "High/Needs intervention",
            RiskCategory::VeryHigh => "Very high/Needs specialist evaluation",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate over a full result set. All sub-scores are on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub context_avg10: f64,
    pub vocabulary_avg10: f64,
    pub repetition_avg10: f64,
    pub language_avg10: f64,
    /// `None` when no result carried a usable speech rate.
    pub acoustic_avg10: Option<f64>,
    pub final10: f64,
    pub final100: f64,
    pub risk: RiskCategory,
    pub language_count: usize,
    pub acoustic_count: usize,
}

impl CompositeScore {
    pub fn has_language(&self) -> bool {
        self.language_count > 0
    }

    pub fn has_acoustic(&self) -> bool {
        self.acoustic_count > 0
    }
}

/// Accept a JSON number or a numeric string; anything else reads as absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite()))
}

/// Accept only a JSON number.
fn strict_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_buffer_counts() {
        let buffer = AudioBuffer::new(16000, vec![vec![0.0; 160], vec![0.5; 160]]);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 160);
        assert!((buffer.duration_secs() - 0.01).abs() < 1e-9);
        assert!(buffer.validate().is_ok());
    }

    #[test]
    fn test_audio_buffer_validate_rejects_no_channels() {
        let buffer = AudioBuffer::new(44100, Vec::new());
        match buffer.validate() {
            Err(AudioError::InvalidArgument(msg)) => assert!(msg.contains("no channels")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_audio_buffer_validate_rejects_zero_rate() {
        let buffer = AudioBuffer::mono(0, vec![0.0; 4]);
        assert!(matches!(
            buffer.validate(),
            Err(AudioError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_audio_buffer_validate_rejects_ragged_channels() {
        let buffer = AudioBuffer::new(8000, vec![vec![0.0; 4], vec![0.0; 3]]);
        match buffer.validate() {
            Err(AudioError::InvalidArgument(msg)) => assert!(msg.contains("channel 1")),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_audio_buffer_to_mono_averages() {
        let buffer = AudioBuffer::new(8000, vec![vec![1.0, 0.0], vec![0.0, -0.5]]);
        assert_eq!(buffer.to_mono(), vec![0.5, -0.25]);
    }

    #[test]
    fn test_question_result_parses_client_record() {
        let json = r#"{
            "questionId": 4,
            "question": "Tell me about a recent happy memory",
            "transcription": "we went to the beach",
            "duration": 12.5,
            "gpt_analysis": {
                "repetition_rate": 0.1,
                "vocabulary_score": "7",
                "context_relevance": 8,
                "analysis": "coherent"
            },
            "audio_features": { "speech_rate": 95.0, "number_utt": 6 }
        }"#;
        let result: QuestionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.question_id, 4);
        assert_eq!(result.transcript, "we went to the beach");
        let language = result.language.as_ref().unwrap();
        assert_eq!(language.repetition_rate, Some(0.1));
        assert_eq!(language.vocabulary_score, Some(7.0));
        assert_eq!(language.context_relevance, Some(8.0));
        assert_eq!(language.commentary.as_deref(), Some("coherent"));
        assert_eq!(result.speech_rate(), Some(95.0));
    }

    #[test]
    fn test_non_numeric_fields_read_as_absent() {
        let json = r#"{
            "questionId": 1,
            "gpt_analysis": { "repetition_rate": "n/a", "vocabulary_score": null },
            "audio_features": { "speech_rate": "110" }
        }"#;
        let result: QuestionResult = serde_json::from_str(json).unwrap();
        let language = result.language.unwrap();
        assert_eq!(language.repetition_rate, None);
        assert_eq!(language.vocabulary_score, None);
        assert_eq!(language.context_relevance, None);
        // A speech rate must be an actual number to be scored.
        assert!(result.acoustic.is_some());
        assert_eq!(result.acoustic.unwrap().speech_rate, None);
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(RiskCategory::Low.to_string(), "Low/Normal");
        assert_eq!(RiskCategory::Medium.label(), "Medium/Monitor");
        assert_eq!(RiskCategory::High.label(), "High/Needs intervention");
        assert_eq!(
            RiskCategory::VeryHigh.label(),
            "Very high/Needs specialist evaluation"
        );
    }
}
