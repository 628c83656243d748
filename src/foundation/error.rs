/// Convenience result type used across Showreel.
pub type ShowreelResult<T> = Result<T, ShowreelError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The variants mirror how failures propagate through a batch run: a bad
/// source image only costs its own segment, an empty product aborts that
/// product's video, an encoder failure discards the whole frame stream, and
/// an upload failure is reported but never fails the product.
#[derive(thiserror::Error, Debug)]
pub enum ShowreelError {
    /// Invalid user-provided settings or storyboard data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image is undecodable or has zero area.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A product directory yielded no usable source images.
    #[error("no source images: {0}")]
    NoSourceImages(String),

    /// The external transcoder rejected the frame stream or exited non-zero.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The upload sink reported a failure (non-fatal for the product).
    #[error("upload error: {0}")]
    Upload(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShowreelError {
    /// Build a [`ShowreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShowreelError::InvalidImage`] value.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Build a [`ShowreelError::NoSourceImages`] value.
    pub fn no_source_images(msg: impl Into<String>) -> Self {
        Self::NoSourceImages(msg.into())
    }

    /// Build a [`ShowreelError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`ShowreelError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
