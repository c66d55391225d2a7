use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected exactly {expected} channels, got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("channel lengths differ")]
    RaggedChannels,

    #[error("interleaved buffer length {len} is not a multiple of {channels} channels")]
    PartialFrame { len: usize, channels: usize },
}
