use cogscore_core::{AudioBuffer, AudioError};
use std::io::Cursor;

/// Size of the canonical RIFF/WAVE header written by [`encode_wav`].
pub const HEADER_LEN: usize = 44;
pub const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;
const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
/// Full-scale value a sample of 1.0 maps to.
const SAMPLE_SCALE: f64 = 32767.0;

/// Format fields of a WAV file, as reported by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub sample_format: hound::SampleFormat,
    /// Samples per channel.
    pub frames: u32,
}

impl WavHeader {
    pub fn frame_count(&self) -> usize {
        self.frames as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        f64::from(self.frames) / f64::from(self.sample_rate)
    }
}

/// Quantize one sample to 16-bit PCM: clamp to [-1, 1], scale by 32767, round
/// half away from zero. NaN becomes silence.
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let clamped = f64::from(sample.clamp(-1.0, 1.0));
    (clamped * SAMPLE_SCALE).round() as i16
}

/// Encode a planar float buffer as a 16-bit little-endian PCM WAV file.
///
/// Output is exactly `44 + frames * channels * 2` bytes, samples interleaved
/// frame by frame.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    buffer.validate()?;

    let channel_count = buffer.channel_count();
    let frames = buffer.frame_count();
    let num_channels = u16::try_from(channel_count)
        .ok()
        .filter(|c| c.checked_mul(BYTES_PER_SAMPLE).is_some())
        .ok_or_else(|| {
            AudioError::InvalidArgument(format!("too many channels: {channel_count}"))
        })?;
    let block_align = num_channels * BYTES_PER_SAMPLE;

    let data_len = (frames as u64) * u64::from(block_align);
    let data_size = u32::try_from(data_len)
        .ok()
        .filter(|size| size.checked_add(36).is_some())
        .ok_or_else(|| {
            AudioError::InvalidArgument(format!(
                "{data_len} bytes of sample data exceeds the WAV size limit"
            ))
        })?;
    let byte_rate = buffer
        .sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| {
            AudioError::InvalidArgument(format!(
                "byte rate overflows for {} Hz x {num_channels} channels",
                buffer.sample_rate
            ))
        })?;

    let mut buf = Vec::with_capacity(HEADER_LEN + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    buf.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for frame in 0..frames {
        for channel in &buffer.channels {
            buf.extend_from_slice(&sample_to_i16(channel[frame]).to_le_bytes());
        }
    }

    tracing::debug!(
        channels = num_channels,
        sample_rate = buffer.sample_rate,
        frames,
        bytes = buf.len(),
        "encoded WAV"
    );
    Ok(buf)
}

fn malformed(err: hound::Error) -> AudioError {
    AudioError::Malformed(err.to_string())
}

fn open(bytes: &[u8]) -> Result<hound::WavReader<Cursor<&[u8]>>, AudioError> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(malformed)?;
    if reader.spec().channels == 0 {
        return Err(AudioError::Malformed("zero channels".to_string()));
    }
    Ok(reader)
}

fn header_of<R: std::io::Read>(reader: &hound::WavReader<R>) -> WavHeader {
    let spec = reader.spec();
    WavHeader {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_format: spec.sample_format,
        frames: reader.duration(),
    }
}

/// Read the format of a WAV file without decoding its samples.
pub fn parse_header(bytes: &[u8]) -> Result<WavHeader, AudioError> {
    let reader = open(bytes)?;
    Ok(header_of(&reader))
}

/// Integer PCM of the given depth to a float in [-1, 1]. 16-bit input uses the
/// same 32767 scale as [`sample_to_i16`].
fn int_to_sample(value: i32, bits_per_sample: u16) -> f32 {
    let scale = ((1i64 << (bits_per_sample.clamp(2, 32) - 1)) - 1) as f64;
    (f64::from(value) / scale).clamp(-1.0, 1.0) as f32
}

/// Decode a PCM (integer or float) WAV file into a planar float buffer.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
    let mut reader = open(bytes)?;
    let header = header_of(&reader);
    let channel_count = usize::from(header.channels);

    let interleaved: Vec<f32> = match header.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| int_to_sample(v, header.bits_per_sample)))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(malformed)?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(malformed)?,
    };

    let mut channels = vec![Vec::with_capacity(header.frame_count()); channel_count];
    for (i, sample) in interleaved.into_iter().enumerate() {
        channels[i % channel_count].push(sample);
    }

    tracing::debug!(
        channels = header.channels,
        sample_rate = header.sample_rate,
        bits = header.bits_per_sample,
        frames = header.frames,
        "decoded WAV"
    );
    Ok(AudioBuffer::new(header.sample_rate, channels))
}
