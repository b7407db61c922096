use thiserror::Error;

use crate::scatter_data::Bounding;

/// Errors produced by the scatter widget.
#[derive(Debug, Error)]
pub enum ScatterError {
    /// The logical bounding box has a zero, negative or non-finite span.
    #[error("degenerate bounding box {0}")]
    DegenerateBounds(Bounding),

    /// Image size or em size is not a positive finite number.
    #[error("invalid image size {width}x{height} px")]
    InvalidImageSize { width: f64, height: f64 },

    /// No class exists at the given index.
    #[error("class index {index} out of range (have {len} classes)")]
    ClassIndexOutOfRange { index: usize, len: usize },

    /// The presenter has no scatter data attached yet.
    #[error("no scatter data")]
    NoData,

    /// GUI options could not be (de)serialized.
    #[error("gui options json: {0}")]
    Json(#[from] serde_json::Error),
}
