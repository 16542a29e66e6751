use alloc::boxed::Box;
use alloc::string::String;
use enough::StopReason;

/// Errors from IFF picture decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IffError {
    /// The data does not start with a `FORM` marker.
    ///
    /// [`crate::load_bytes`] hands such data to its fallback loader;
    /// [`crate::NoFallback`] reports it back unchanged.
    #[error("not an IFF file (missing FORM marker)")]
    NotIff,

    #[error("unrecognized IFF form type (expected ILBM or PBM)")]
    UnrecognizedFormat,

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[source] Box<dyn core::error::Error + Send + Sync + 'static>),

    #[error("missing BMHD chunk")]
    MissingHeader,

    #[error("missing BODY chunk")]
    MissingBody,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("BODY data ended at offset {offset} before the last scanline was complete")]
    TruncatedBody { offset: usize },

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for IffError {
    fn from(r: StopReason) -> Self {
        IffError::Cancelled(r)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for IffError {
    fn from(e: std::io::Error) -> Self {
        IffError::Io(Box::new(e))
    }
}
