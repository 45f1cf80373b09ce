use thiserror::Error;

/// Library error type for kiosk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// No usable font could be found on the system.
    #[error("no usable system font found (looked for: {0})")]
    NoFont(String),

    /// Contact relay rejected or never received the submission.
    #[error("contact submission failed: {0}")]
    Submit(#[from] reqwest::Error),

    /// Rendering/display error from the page or overlay.
    #[error("render error: {0}")]
    Render(anyhow::Error),
}
