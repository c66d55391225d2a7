use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read wav file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("not a RIFF/WAVE file")]
    NotWave,

    #[error("truncated file: {0}")]
    Truncated(&'static str),

    #[error("missing required chunk: {0}")]
    MissingChunk(&'static str),

    #[error("unsupported sample format: format tag {format_tag}, {bits_per_sample} bits")]
    UnsupportedFormat { format_tag: u16, bits_per_sample: u16 },

    #[error("file declares zero channels")]
    ZeroChannels,
}
