//! Energy-based speech/pause segmentation.
//!
//! Frames the clip, marks frames louder than the 30th-percentile energy as
//! speech, and derives utterance count, pause lengths and a segments-per-minute
//! speech rate from the resulting runs.

use cogscore_core::{AcousticFeatures, AudioBuffer};

pub const FRAME_LENGTH: usize = 2048;
pub const HOP_LENGTH: usize = 512;
/// Frames at or below this energy percentile count as silence.
const SILENCE_PERCENTILE: f64 = 0.3;
/// Shorter runs are not counted as speech or pause segments.
const MIN_SEGMENT_SECS: f64 = 0.1;
/// Shorter pauses are ignored when averaging silence duration.
const MIN_PAUSE_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Speech and pause runs found in a clip, in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub speech: Vec<Segment>,
    pub pauses: Vec<Segment>,
}

/// RMS energy per frame. Frames start at every multiple of the hop below the
/// clip length; samples past the end count as zero.
pub fn frame_energies(samples: &[f32]) -> Vec<f32> {
    (0..samples.len())
        .step_by(HOP_LENGTH)
        .map(|start| {
            let end = (start + FRAME_LENGTH).min(samples.len());
            let sum_sq: f64 = samples[start..end]
                .iter()
                .map(|&s| f64::from(s) * f64::from(s))
                .sum();
            (sum_sq / FRAME_LENGTH as f64).sqrt() as f32
        })
        .collect()
}

fn silence_threshold(energies: &[f32]) -> f32 {
    let mut sorted = energies.to_vec();
    sorted.sort_by(f32::total_cmp);
    let index = ((sorted.len() as f64 * SILENCE_PERCENTILE) as usize)
        .max(1)
        .min(sorted.len() - 1);
    sorted[index]
}

/// Split a mono clip into speech and pause runs.
pub fn segment(samples: &[f32], sample_rate: u32) -> Segmentation {
    let mut result = Segmentation::default();
    if samples.is_empty() || sample_rate == 0 {
        return result;
    }

    let rate = f64::from(sample_rate);
    let energies = frame_energies(samples);
    let threshold = silence_threshold(&energies);

    let mut in_speech = false;
    let mut current_start = 0.0;
    for (i, &energy) in energies.iter().enumerate() {
        let is_speech = energy > threshold;
        let t = (i * HOP_LENGTH) as f64 / rate;
        if is_speech && !in_speech {
            if i > 0 && t - current_start >= MIN_SEGMENT_SECS {
                result.pauses.push(Segment {
                    start: current_start,
                    end: t,
                });
            }
            current_start = t;
            in_speech = true;
        } else if !is_speech && in_speech {
            if t - current_start >= MIN_SEGMENT_SECS {
                result.speech.push(Segment {
                    start: current_start,
                    end: t,
                });
            }
            current_start = t;
            in_speech = false;
        }
    }

    let end = samples.len() as f64 / rate;
    if end - current_start >= MIN_SEGMENT_SECS {
        let tail = Segment {
            start: current_start,
            end,
        };
        if in_speech {
            result.speech.push(tail);
        } else {
            result.pauses.push(tail);
        }
    }

    result
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Estimate the acoustic features the scorer uses from a recorded answer.
/// Pitch is not estimated.
pub fn extract_features(buffer: &AudioBuffer) -> AcousticFeatures {
    let samples = buffer.to_mono();
    let duration = buffer.duration_secs();
    let segmentation = segment(&samples, buffer.sample_rate);
    let energies = frame_energies(&samples);

    let speech_rate = if duration > 0.0 {
        segmentation.speech.len() as f64 / (duration / 60.0)
    } else {
        0.0
    };
    let sildur_mean = mean(
        segmentation
            .pauses
            .iter()
            .map(Segment::duration)
            .filter(|d| *d > MIN_PAUSE_SECS),
    );
    let energy_mean = mean(energies.iter().map(|&e| f64::from(e)));

    tracing::debug!(
        duration,
        utterances = segmentation.speech.len(),
        pauses = segmentation.pauses.len(),
        speech_rate,
        "extracted acoustic features"
    );

    AcousticFeatures {
        speech_rate: Some(speech_rate),
        number_utt: Some(segmentation.speech.len() as f64),
        sildur_mean: Some(sildur_mean),
        pitch_mean: None,
        energy_mean: Some(energy_mean),
    }
}
