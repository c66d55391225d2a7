//! Minimal RIFF/WAVE reader for the formats the recording rig produces:
//! little-endian 16-bit PCM and 32-bit IEEE float. Samples come back
//! interleaved and normalized to [-1, 1]; unknown chunks are skipped.

pub mod error;
pub mod reader;

pub use error::DecodeError;
pub use reader::{decode_wav, decode_wav_bytes, WavData};
