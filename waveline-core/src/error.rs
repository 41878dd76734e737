use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Widget errors
    #[error("Widget control channel is not ready")]
    WidgetNotReady,

    #[error("Widget call `{call}` failed: {reason}")]
    WidgetCallFailed { call: &'static str, reason: String },

    #[error("Widget control API did not appear within {attempts} poll attempts")]
    WidgetBindTimeout { attempts: u32 },

    // Waveform errors
    #[error("Waveform resolver {resolver} failed: {reason}")]
    WaveformResolverFailed { resolver: String, reason: String },

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest_middleware::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
