use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("a contour needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("base radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("surface dimensions must be positive, got {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },

    #[error("eye dimensions must be positive, got {length}x{height}")]
    InvalidEyeSize { length: f32, height: f32 },

    #[error("`{field}` must be {requirement}, got {value}")]
    InvalidParameter {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("gradient `{gradient}` has a malformed stop at index {index}")]
    InvalidGradient { gradient: String, index: usize },

    #[error("unknown blob state `{0}`")]
    UnknownState(String),

    #[error("unsupported config version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
