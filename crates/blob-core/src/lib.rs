pub mod animation;
pub mod canvas;
pub mod color;
pub mod config;
pub mod contour;
pub mod error;
pub mod noise;
pub mod outline;
pub mod presence;
pub mod renderer;
pub mod shading;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{AnimationClock, TimeAccumulators};
pub use canvas::{Affine, Brush, Canvas, FillOp, Path, PathEl, Point, RecordingCanvas};
pub use color::{BlobState, ColorVariations, Rgba};
pub use config::{
    AnimationConfig, BlobConfig, ContourConfig, EyeConfig, NoiseLayer, Presentation, ShadingConfig,
};
pub use contour::{Contour, ContourGenerator};
pub use error::BlobError;
pub use noise::NoiseField;
pub use outline::{
    BezierAnchor, EyeCurveCache, EyeCurveSpec, EyePainter, EyePairLayout, EyePlacement,
};
pub use presence::{FacePosition, PresenceDetector, PresenceEvent, SharedFacePosition};
pub use renderer::{BlobRenderer, FrameContext, FrameSummary};
pub use shading::{
    derive_gradients, BlobGradients, GradientKind, GradientSpec, GradientStop, ShadingCompositor,
};
