use crate::error::DecodeError;
use std::path::Path;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Decoded audio: interleaved samples in [-1, 1] plus the stream layout.
#[derive(Debug, Clone)]
pub struct WavData {
    pub samples: Vec<f64>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl WavData {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }
}

/// Read and decode a WAV file from disk.
pub fn decode_wav(path: &Path) -> Result<WavData, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode_wav_bytes(&bytes)
}

/// Decode a WAV file already loaded into memory.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<WavData, DecodeError> {
    if bytes.len() < 12 {
        return Err(DecodeError::Truncated("RIFF header"));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(DecodeError::NotWave);
    }

    let mut format: Option<FmtChunk> = None;
    let mut data: Option<&[u8]> = None;

    let mut offset = 12usize;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let body_start = offset + 8;
        let body_end = body_start + size;
        if body_end > bytes.len() {
            return Err(DecodeError::Truncated("chunk body"));
        }
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => format = Some(FmtChunk::parse(body)?),
            b"data" => data = Some(body),
            other => {
                tracing::debug!(
                    id = %String::from_utf8_lossy(other),
                    size,
                    "skipping wav chunk"
                );
            }
        }

        // Chunk bodies are word-aligned; odd sizes carry a pad byte.
        offset = body_end + (size & 1);
    }

    let format = format.ok_or(DecodeError::MissingChunk("fmt "))?;
    let data = data.ok_or(DecodeError::MissingChunk("data"))?;

    let samples = match (format.format_tag, format.bits_per_sample) {
        (FORMAT_PCM, 16) => decode_pcm16(data),
        (FORMAT_IEEE_FLOAT, 32) => decode_float32(data),
        (format_tag, bits_per_sample) => {
            return Err(DecodeError::UnsupportedFormat {
                format_tag,
                bits_per_sample,
            })
        }
    };

    Ok(WavData {
        samples,
        channels: format.channels,
        sample_rate: format.sample_rate,
    })
}

struct FmtChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl FmtChunk {
    fn parse(body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < 16 {
            return Err(DecodeError::Truncated("fmt chunk"));
        }
        let channels = u16::from_le_bytes([body[2], body[3]]);
        if channels == 0 {
            return Err(DecodeError::ZeroChannels);
        }
        Ok(Self {
            format_tag: u16::from_le_bytes([body[0], body[1]]),
            channels,
            sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
            bits_per_sample: u16::from_le_bytes([body[14], body[15]]),
        })
    }
}

fn decode_pcm16(data: &[u8]) -> Vec<f64> {
    data.chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f64 / 32768.0)
        .collect()
}

fn decode_float32(data: &[u8]) -> Vec<f64> {
    data.chunks_exact(4)
        .map(|quad| f32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn riff_header(body_len: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&((4 + body_len) as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes
    }

    fn fmt_chunk(format_tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * bits / 8;
        let byte_rate = sample_rate * block_align as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&format_tag.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&bits.to_le_bytes());
        bytes
    }

    fn data_chunk(payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            bytes.push(0);
        }
        bytes
    }

    fn pcm16_file(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let fmt = fmt_chunk(FORMAT_PCM, channels, sample_rate, 16);
        let data = data_chunk(&payload);
        let mut file = riff_header(fmt.len() + data.len());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(&data);
        file
    }

    #[test]
    fn test_decode_pcm16() {
        let file = pcm16_file(3, 44100, &[0, 16384, -16384, 32767, -32768, 0]);
        let wav = decode_wav_bytes(&file).unwrap();
        assert_eq!(wav.channels, 3);
        assert_eq!(wav.sample_rate, 44100);
        assert_eq!(wav.frames(), 2);
        assert_eq!(wav.samples[0], 0.0);
        assert_eq!(wav.samples[1], 0.5);
        assert_eq!(wav.samples[2], -0.5);
        assert!((wav.samples[3] - 32767.0 / 32768.0).abs() < 1e-12);
        assert_eq!(wav.samples[4], -1.0);
    }

    #[test]
    fn test_decode_float32() {
        let samples = [0.25f32, -0.75, 1.0];
        let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let fmt = fmt_chunk(FORMAT_IEEE_FLOAT, 1, 8000, 32);
        let data = data_chunk(&payload);
        let mut file = riff_header(fmt.len() + data.len());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(&data);

        let wav = decode_wav_bytes(&file).unwrap();
        assert_eq!(wav.channels, 1);
        assert_eq!(wav.sample_rate, 8000);
        assert_eq!(wav.samples, vec![0.25, -0.75, 1.0]);
    }

    #[test]
    fn test_unknown_chunks_skipped() {
        let fmt = fmt_chunk(FORMAT_PCM, 1, 8000, 16);
        let mut junk = Vec::new();
        junk.extend_from_slice(b"LIST");
        junk.extend_from_slice(&5u32.to_le_bytes());
        junk.extend_from_slice(b"INFOx");
        junk.push(0); // pad byte for the odd-sized chunk
        let data = data_chunk(&1234i16.to_le_bytes());

        let mut file = riff_header(fmt.len() + junk.len() + data.len());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(&junk);
        file.extend_from_slice(&data);

        let wav = decode_wav_bytes(&file).unwrap();
        assert_eq!(wav.samples.len(), 1);
        assert!((wav.samples[0] - 1234.0 / 32768.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_wave_file() {
        assert!(matches!(
            decode_wav_bytes(b"not a wav file at all"),
            Err(DecodeError::NotWave)
        ));
        assert!(matches!(
            decode_wav_bytes(b"RIFF"),
            Err(DecodeError::Truncated(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_chunk_body() {
        let fmt = fmt_chunk(FORMAT_PCM, 1, 8000, 16);
        let mut data = Vec::new();
        data.extend_from_slice(b"data");
        data.extend_from_slice(&100u32.to_le_bytes()); // declares more than present
        data.extend_from_slice(&[0, 0]);

        let mut file = riff_header(fmt.len() + data.len());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(&data);
        assert!(matches!(
            decode_wav_bytes(&file),
            Err(DecodeError::Truncated(_))
        ));
    }

    #[test]
    fn test_missing_chunks_reported() {
        let data = data_chunk(&[0, 0]);
        let mut file = riff_header(data.len());
        file.extend_from_slice(&data);
        assert!(matches!(
            decode_wav_bytes(&file),
            Err(DecodeError::MissingChunk("fmt "))
        ));

        let fmt = fmt_chunk(FORMAT_PCM, 1, 8000, 16);
        let mut file = riff_header(fmt.len());
        file.extend_from_slice(&fmt);
        assert!(matches!(
            decode_wav_bytes(&file),
            Err(DecodeError::MissingChunk("data"))
        ));
    }

    #[test]
    fn test_unsupported_format_reported() {
        let fmt = fmt_chunk(FORMAT_PCM, 1, 8000, 24);
        let data = data_chunk(&[0, 0, 0]);
        let mut file = riff_header(fmt.len() + data.len());
        file.extend_from_slice(&fmt);
        file.extend_from_slice(&data);
        assert!(matches!(
            decode_wav_bytes(&file),
            Err(DecodeError::UnsupportedFormat {
                format_tag: 1,
                bits_per_sample: 24
            })
        ));
    }

    #[test]
    fn test_decode_from_disk() {
        let dir = std::env::temp_dir().join("trimic_wav_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tone.wav");
        std::fs::write(&path, pcm16_file(3, 44100, &[100, 200, 300])).unwrap();

        let wav = decode_wav(&path).unwrap();
        assert_eq!(wav.channels, 3);
        assert_eq!(wav.frames(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            decode_wav(Path::new("/nonexistent/file.wav")),
            Err(DecodeError::FileRead(_))
        ));
    }
}
