//! Fake 3D lighting for the blob: six radial gradients derived from one base
//! color, composited back to front over the contour.

use serde::{Deserialize, Serialize};

use crate::canvas::{Brush, Canvas, FillOp, Point};
use crate::color::{BlobState, ColorVariations, Rgba};
use crate::config::ShadingConfig;
use crate::contour::{Contour, DEGENERATE_EPSILON};
use crate::error::BlobError;
use crate::presence::FacePosition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    AmbientOcclusion,
    ContactShadow,
    MainLighting,
    RimLight,
    Specular,
    SecondaryHighlight,
}

impl GradientKind {
    /// Back-to-front compositing order.
    pub const PAINT_ORDER: [GradientKind; 6] = [
        GradientKind::AmbientOcclusion,
        GradientKind::ContactShadow,
        GradientKind::MainLighting,
        GradientKind::RimLight,
        GradientKind::Specular,
        GradientKind::SecondaryHighlight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GradientKind::AmbientOcclusion => "ambient_occlusion",
            GradientKind::ContactShadow => "contact_shadow",
            GradientKind::MainLighting => "main_lighting",
            GradientKind::RimLight => "rim_light",
            GradientKind::Specular => "specular",
            GradientKind::SecondaryHighlight => "secondary_highlight",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

const fn stop(offset: f32, color: Rgba) -> GradientStop {
    GradientStop { offset, color }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub kind: GradientKind,
    pub center: Point,
    pub radius: f32,
    pub stops: Vec<GradientStop>,
}

impl GradientSpec {
    /// Stops must be non-empty, finite, within [0, 1] and strictly increasing.
    pub fn validate(&self) -> Result<(), BlobError> {
        let malformed = |index| BlobError::InvalidGradient {
            gradient: self.kind.name().to_string(),
            index,
        };
        if self.stops.is_empty() {
            return Err(malformed(0));
        }
        let mut previous = f32::NEG_INFINITY;
        for (index, s) in self.stops.iter().enumerate() {
            if !(0.0..=1.0).contains(&s.offset) || s.offset <= previous {
                return Err(malformed(index));
            }
            previous = s.offset;
        }
        Ok(())
    }

    /// Color of the ramp at `p`. Positions past the last stop take its color.
    pub fn color_at(&self, p: Point) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT_BLACK;
        };
        if self.radius <= 0.0 {
            return self.stops.last().map_or(first.color, |s| s.color);
        }
        let t = p.distance(self.center) / self.radius;
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        self.stops.last().map_or(first.color, |s| s.color)
    }
}

/// All six lighting layers for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobGradients {
    pub ambient_occlusion: GradientSpec,
    pub contact_shadow: GradientSpec,
    pub main_lighting: GradientSpec,
    pub rim_light: GradientSpec,
    pub specular: GradientSpec,
    pub secondary_highlight: GradientSpec,
}

impl BlobGradients {
    pub fn in_paint_order(&self) -> [&GradientSpec; 6] {
        [
            &self.ambient_occlusion,
            &self.contact_shadow,
            &self.main_lighting,
            &self.rim_light,
            &self.specular,
            &self.secondary_highlight,
        ]
    }
}

/// Build the six gradients from a base color and the blob's geometry.
///
/// `tilt` is the face lean; it drags the key light along with the head
/// tilt. Pure: identical inputs give identical gradients.
pub fn derive_gradients(
    base: Rgba,
    centroid: Point,
    max_distance: f32,
    tilt: [f32; 2],
    shading: &ShadingConfig,
) -> BlobGradients {
    let v = ColorVariations::from_base(base);
    let d = max_distance;
    let [sx, sy] = shading.shadow_offset;
    let light_shift = shading.light_tilt_gain * d;

    BlobGradients {
        ambient_occlusion: GradientSpec {
            kind: GradientKind::AmbientOcclusion,
            center: centroid,
            radius: d * 1.3,
            stops: vec![
                stop(0.0, Rgba::TRANSPARENT_BLACK),
                stop(0.6, Rgba::TRANSPARENT_BLACK),
                stop(0.8, Rgba::black(20)),
                stop(1.0, Rgba::black(40)),
            ],
        },
        contact_shadow: GradientSpec {
            kind: GradientKind::ContactShadow,
            center: centroid.offset(sx, sy),
            radius: d * 0.8,
            stops: vec![
                stop(0.0, Rgba::TRANSPARENT_BLACK),
                stop(0.3, Rgba::black(60)),
                stop(0.7, Rgba::black(80)),
                stop(1.0, Rgba::black(100)),
            ],
        },
        main_lighting: GradientSpec {
            kind: GradientKind::MainLighting,
            center: centroid.offset(
                -d * 0.3 + tilt[0] * light_shift,
                -d * 0.3 + tilt[1] * light_shift,
            ),
            radius: d * 1.2,
            stops: vec![
                stop(0.0, v.highlight),
                stop(0.2, v.mid_light),
                stop(0.5, v.base),
                stop(0.8, v.mid_dark),
                stop(1.0, v.shadow),
            ],
        },
        rim_light: GradientSpec {
            kind: GradientKind::RimLight,
            center: centroid,
            radius: d * 1.5,
            stops: vec![
                stop(0.0, Rgba::TRANSPARENT_WHITE),
                stop(0.7, Rgba::TRANSPARENT_WHITE),
                stop(0.9, Rgba::white(30)),
                stop(1.0, Rgba::white(60)),
            ],
        },
        specular: GradientSpec {
            kind: GradientKind::Specular,
            center: centroid.offset(-d * 0.4, -d * 0.4),
            radius: d * 0.3,
            stops: vec![
                stop(0.0, Rgba::white(120)),
                stop(0.3, Rgba::white(60)),
                stop(1.0, Rgba::TRANSPARENT_WHITE),
            ],
        },
        secondary_highlight: GradientSpec {
            kind: GradientKind::SecondaryHighlight,
            center: centroid.offset(d * 0.2, -d * 0.2),
            radius: d * 0.2,
            stops: vec![
                stop(0.0, Rgba::white(40)),
                stop(0.5, Rgba::white(20)),
                stop(1.0, Rgba::TRANSPARENT_WHITE),
            ],
        },
    }
}

#[derive(Clone, Debug)]
pub struct ShadingCompositor {
    config: ShadingConfig,
    lean_gain: [f32; 2],
}

impl ShadingCompositor {
    pub fn new(config: ShadingConfig, lean_gain: [f32; 2]) -> Result<Self, BlobError> {
        config.validate()?;
        Ok(Self { config, lean_gain })
    }

    pub fn config(&self) -> &ShadingConfig {
        &self.config
    }

    /// Paint the shaded blob body and its drop shadow.
    ///
    /// Layer order is ambient occlusion, contact shadow (on the offset
    /// outline), main lighting, rim, specular, secondary highlight.
    pub fn paint_blob(
        &self,
        canvas: &mut dyn Canvas,
        contour: &Contour,
        state: BlobState,
        face: FacePosition,
    ) {
        let base = state.base_color();
        let path = contour.to_path();
        let centroid = contour.centroid();
        let max_distance = contour.max_distance_from(centroid);

        if !(max_distance > DEGENERATE_EPSILON) {
            log::warn!("blob outline has no extent, painting it flat");
            canvas.fill(FillOp::new(path, Brush::Solid(base)));
            return;
        }

        let gradients = derive_gradients(
            base,
            centroid,
            max_distance,
            face.tilt(self.lean_gain),
            &self.config,
        );
        let [sx, sy] = self.config.shadow_offset;
        let shadow_path = contour.translated(sx, sy).to_path();

        for spec in gradients.in_paint_order() {
            let layer_path = if spec.kind == GradientKind::ContactShadow {
                shadow_path.clone()
            } else {
                path.clone()
            };
            canvas.fill(FillOp::new(layer_path, Brush::Radial(spec.clone())));
        }
    }
}
