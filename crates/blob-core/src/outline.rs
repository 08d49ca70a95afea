//! Hooked eye outline and the placement of the eye pair.
//!
//! The eye is a closed path of 3 cubic Bézier segments connecting 3 anchors
//! (inner corner, outer corner, hook tip). Every coordinate is a fixed
//! fraction of the eye's `(length, height)`, so the outline only needs
//! rebuilding when the surface is resized.

use crate::canvas::{bounds_of, cubic_point, Affine, Brush, Canvas, FillOp, Path, Point};
use crate::config::EyeConfig;
use crate::error::BlobError;
use crate::noise::NoiseField;
use crate::presence::FacePosition;

/// Line segments per cubic when measuring the outline's bounds.
const BOUNDS_STEPS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierAnchor {
    /// Eye-local position, origin at the inner corner.
    pub position: Point,
    /// Offset from `position` to the control point of the arriving segment.
    pub handle_in: Point,
    /// Offset from `position` to the control point of the leaving segment.
    pub handle_out: Point,
}

impl BezierAnchor {
    /// Make `handle_out` the point reflection of `handle_in` through the
    /// anchor: same length, opposite direction. The curve passes through the
    /// anchor without a kink.
    pub fn mirror_handle_from_in(&mut self) {
        self.handle_out = Point::new(-self.handle_in.x, -self.handle_in.y);
    }

    fn out_control(&self) -> Point {
        self.position.offset(self.handle_out.x, self.handle_out.y)
    }

    fn in_control(&self) -> Point {
        self.position.offset(self.handle_in.x, self.handle_in.y)
    }
}

/// One cubic segment as absolute points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicSegment {
    pub fn eval(&self, t: f32) -> Point {
        cubic_point(self.start, self.c1, self.c2, self.end, t)
    }
}

/// The hooked eye outline for one `(length, height)`.
#[derive(Clone, Debug, PartialEq)]
pub struct EyeCurveSpec {
    length: f32,
    height: f32,
    /// [inner corner, outer corner, hook tip]. Segments: inner→outer (upper
    /// lid), outer→tip (hook), tip→inner (lower lid).
    anchors: [BezierAnchor; 3],
    /// Center of the outline's bounding box, used as the rotation pivot.
    pivot: Point,
}

impl EyeCurveSpec {
    pub fn build(length: f32, height: f32) -> Result<Self, BlobError> {
        if !(length > 0.0 && height > 0.0 && length.is_finite() && height.is_finite()) {
            return Err(BlobError::InvalidEyeSize { length, height });
        }
        let (l, h) = (length, height);
        let mut tip = BezierAnchor {
            position: Point::new(0.68 * l, 0.60 * h),
            handle_in: Point::new((0.85 - 0.68) * l, (0.45 - 0.60) * h),
            handle_out: Point::ORIGIN,
        };
        tip.mirror_handle_from_in();

        let anchors = [
            // Inner corner: leaves over the upper lid, comes back under the lower lid.
            BezierAnchor {
                position: Point::ORIGIN,
                handle_in: Point::new(0.25 * l, 0.65 * h),
                handle_out: Point::new(0.25 * l, -0.45 * h),
            },
            // Outer corner: the lid arrives flat, the hook swings out past it.
            BezierAnchor {
                position: Point::new(0.88 * l, 0.0),
                handle_in: Point::new((0.65 - 0.88) * l, -0.20 * h),
                handle_out: Point::new((1.30 - 0.88) * l, 0.15 * h),
            },
            tip,
        ];

        let mut spec = Self {
            length,
            height,
            anchors,
            pivot: Point::ORIGIN,
        };
        let (lo, hi) =
            bounds_of(&spec.flatten(BOUNDS_STEPS)).unwrap_or((Point::ORIGIN, Point::ORIGIN));
        spec.pivot = lo.lerp(hi, 0.5);
        Ok(spec)
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn anchors(&self) -> &[BezierAnchor; 3] {
        &self.anchors
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    pub fn segments(&self) -> [CubicSegment; 3] {
        std::array::from_fn(|seg| {
            let a = &self.anchors[seg];
            let b = &self.anchors[(seg + 1) % 3];
            CubicSegment {
                start: a.position,
                c1: a.out_control(),
                c2: b.in_control(),
                end: b.position,
            }
        })
    }

    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        path.move_to(self.anchors[0].position);
        for seg in self.segments() {
            path.cubic_to(seg.c1, seg.c2, seg.end);
        }
        path.close();
        path
    }

    /// Polyline approximation, `steps` points per segment, closing point
    /// omitted.
    pub fn flatten(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        self.segments()
            .iter()
            .flat_map(|seg| (0..steps).map(move |i| seg.eval(i as f32 / steps as f32)))
            .collect()
    }
}

/// Caches the eye outline between frames; rebuilt only when the requested
/// size changes.
#[derive(Clone, Debug, Default)]
pub struct EyeCurveCache {
    curve: Option<EyeCurveSpec>,
}

impl EyeCurveCache {
    pub fn get(&mut self, length: f32, height: f32) -> Result<&EyeCurveSpec, BlobError> {
        let curve = match self.curve.take() {
            Some(c) if c.length == length && c.height == height => c,
            _ => {
                log::debug!("rebuilding eye outline for {length:.1}x{height:.1}");
                EyeCurveSpec::build(length, height)?
            }
        };
        Ok(&*self.curve.insert(curve))
    }

    pub fn current(&self) -> Option<&EyeCurveSpec> {
        self.curve.as_ref()
    }
}

/// Where and how one eye is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyePlacement {
    /// Surface position the outline's pivot lands on.
    pub center: Point,
    /// Rotation about the pivot in radians (positive is clockwise on a y-down
    /// surface).
    pub rotation: f32,
    pub scale: f32,
    /// Reflect the outline horizontally before rotating.
    pub mirrored: bool,
}

impl EyePlacement {
    pub fn transform(&self, pivot: Point) -> Affine {
        let sx = if self.mirrored { -self.scale } else { self.scale };
        Affine::translate(self.center.x, self.center.y)
            .then(Affine::rotate(self.rotation))
            .then(Affine::scale(sx, self.scale))
            .then(Affine::translate(-pivot.x, -pivot.y))
    }
}

/// Per-frame placement of both eyes plus the outline size they use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyePairLayout {
    pub length: f32,
    pub height: f32,
    pub left: EyePlacement,
    pub right: EyePlacement,
}

impl EyePairLayout {
    /// Lay the eyes out on a `width`×`height` surface.
    ///
    /// Tracking and glue drift move both eyes the same way; breathing pushes
    /// them apart and together. `elapsed` is wall time in seconds.
    pub fn compute(
        config: &EyeConfig,
        noise: &NoiseField,
        face: FacePosition,
        width: f32,
        height: f32,
        elapsed: f32,
    ) -> Self {
        let cx = width / 2.0;
        let cy = height / 2.0 + config.vertical_offset_ratio * height;
        let spacing = config.spacing_ratio * width;

        let [look_x, look_y] = face.look();
        let tracking = [
            look_x * config.tracking_ratio[0] * width,
            look_y * config.tracking_ratio[1] * height,
        ];

        let phase = elapsed * config.breathing_speed;
        let breathe = phase.sin() * config.breathing_amplitude_ratio * width;
        let scale = 1.0 + phase.sin() * config.breathing_scale;

        let glue_t = elapsed * config.glue_speed;
        let glue = [
            noise.sample(glue_t, 17.0) * config.glue_amplitude_ratio * width,
            noise.sample(-23.0, glue_t) * config.glue_amplitude_ratio * height,
        ];

        let shift_x = tracking[0] + glue[0];
        let shift_y = tracking[1] + glue[1];
        let tilt = config.rotation_deg.to_radians();

        Self {
            length: config.length_ratio * width,
            height: config.height_ratio * height,
            left: EyePlacement {
                center: Point::new(cx - spacing - breathe + shift_x, cy + shift_y),
                rotation: tilt,
                scale,
                mirrored: true,
            },
            right: EyePlacement {
                center: Point::new(cx + spacing + breathe + shift_x, cy + shift_y),
                rotation: -tilt,
                scale,
                mirrored: false,
            },
        }
    }

    /// Vertical axis the two eyes mirror about.
    pub fn mirror_axis(&self) -> f32 {
        (self.left.center.x + self.right.center.x) / 2.0
    }
}

/// Draws the eye pair on top of the blob.
#[derive(Clone, Debug)]
pub struct EyePainter {
    config: EyeConfig,
}

impl EyePainter {
    pub fn new(config: EyeConfig) -> Result<Self, BlobError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EyeConfig {
        &self.config
    }

    /// Paint both eyes as borderless solid fills, left first.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_eye_pair(
        &self,
        canvas: &mut dyn Canvas,
        cache: &mut EyeCurveCache,
        noise: &NoiseField,
        face: FacePosition,
        width: f32,
        height: f32,
        elapsed: f32,
    ) -> Result<EyePairLayout, BlobError> {
        let layout = EyePairLayout::compute(&self.config, noise, face, width, height, elapsed);
        let curve = cache.get(layout.length, layout.height)?;
        let outline = curve.to_path();
        let pivot = curve.pivot();

        for placement in [layout.left, layout.right] {
            let path = outline.transformed(&placement.transform(pivot));
            canvas.fill(FillOp::new(path, Brush::Solid(self.config.color)));
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PathEl, RecordingCanvas};

    const EPS: f32 = 1e-3;

    fn near(a: Point, b: Point) -> bool {
        a.distance(b) < EPS
    }

    #[test]
    fn control_points_match_proportions() {
        let spec = EyeCurveSpec::build(100.0, 50.0).unwrap();
        let [upper, hook, lower] = spec.segments();
        assert!(near(upper.start, Point::ORIGIN));
        assert!(near(upper.c1, Point::new(25.0, -22.5)));
        assert!(near(upper.c2, Point::new(65.0, -10.0)));
        assert!(near(upper.end, Point::new(88.0, 0.0)));
        assert!(near(hook.c1, Point::new(130.0, 7.5)));
        assert!(near(hook.c2, Point::new(85.0, 22.5)));
        assert!(near(hook.end, Point::new(68.0, 30.0)));
        // reflection of (85, 22.5) about (68, 30)
        assert!(near(lower.c1, Point::new(51.0, 37.5)));
        assert!(near(lower.c2, Point::new(25.0, 32.5)));
        assert!(near(lower.end, Point::ORIGIN));
    }

    #[test]
    fn outline_is_closed_and_continuous() {
        let spec = EyeCurveSpec::build(80.0, 40.0).unwrap();
        let segs = spec.segments();
        for i in 0..3 {
            assert!(near(segs[i].end, segs[(i + 1) % 3].start));
        }
        let path = spec.to_path();
        assert!(path.is_closed());
        assert_eq!(path.elements().len(), 5);
    }

    #[test]
    fn hook_tip_has_no_kink() {
        let spec = EyeCurveSpec::build(120.0, 70.0).unwrap();
        let [_, hook, lower] = spec.segments();
        let incoming = Point::new(hook.end.x - hook.c2.x, hook.end.y - hook.c2.y);
        let outgoing = Point::new(lower.c1.x - lower.start.x, lower.c1.y - lower.start.y);
        assert!((incoming.x - outgoing.x).abs() < EPS);
        assert!((incoming.y - outgoing.y).abs() < EPS);
    }

    #[test]
    fn pivot_is_inside_the_bounds() {
        let spec = EyeCurveSpec::build(100.0, 60.0).unwrap();
        let (lo, hi) = spec.to_path().bounds(BOUNDS_STEPS).unwrap();
        let p = spec.pivot();
        assert!(lo.x < p.x && p.x < hi.x && lo.y < p.y && p.y < hi.y);
        // Hook swings past the outer corner.
        assert!(hi.x > 88.0);
    }

    #[test]
    fn rejects_non_positive_size() {
        for (l, h) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 5.0), (f32::NAN, 1.0)] {
            assert!(matches!(
                EyeCurveSpec::build(l, h),
                Err(BlobError::InvalidEyeSize { .. })
            ));
        }
    }

    #[test]
    fn cache_rebuilds_only_on_resize() {
        let mut cache = EyeCurveCache::default();
        assert!(cache.current().is_none());
        let first = cache.get(80.0, 36.0).unwrap().clone();
        assert_eq!(cache.get(80.0, 36.0).unwrap(), &first);
        let resized = cache.get(30.0, 18.0).unwrap();
        assert_eq!(resized.length(), 30.0);
    }

    #[test]
    fn cache_reports_bad_sizes_and_recovers() {
        let mut cache = EyeCurveCache::default();
        cache.get(80.0, 36.0).unwrap();
        assert!(matches!(cache.get(0.0, 36.0), Err(BlobError::InvalidEyeSize { .. })));
        assert!(cache.current().is_none());
        assert_eq!(cache.get(80.0, 36.0).unwrap().height(), 36.0);
    }

    #[test]
    fn layout_at_rest() {
        let cfg = EyeConfig {
            glue_amplitude_ratio: 0.0,
            ..EyeConfig::default()
        };
        let noise = NoiseField::default();
        let layout = EyePairLayout::compute(&cfg, &noise, FacePosition::CENTER, 400.0, 300.0, 0.0);
        assert!((layout.length - 80.0).abs() < EPS);
        assert!((layout.height - 36.0).abs() < EPS);
        assert!(near(layout.left.center, Point::new(120.0, 135.0)));
        assert!(near(layout.right.center, Point::new(280.0, 135.0)));
        assert_eq!(layout.left.scale, 1.0);
        assert!((layout.right.rotation + 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn tracking_moves_both_eyes_the_same_way() {
        let cfg = EyeConfig::default();
        let noise = NoiseField::default();
        let rest = EyePairLayout::compute(&cfg, &noise, FacePosition::CENTER, 400.0, 300.0, 1.3);
        let face = FacePosition::new(1.0, 0.0);
        let look = EyePairLayout::compute(&cfg, &noise, face, 400.0, 300.0, 1.3);
        for (a, b) in [(rest.left, look.left), (rest.right, look.right)] {
            assert!((b.center.x - a.center.x - 12.0).abs() < EPS);
            assert!((b.center.y - a.center.y + 9.0).abs() < EPS);
        }
    }

    #[test]
    fn breathing_moves_eyes_oppositely() {
        let cfg = EyeConfig {
            glue_amplitude_ratio: 0.0,
            ..EyeConfig::default()
        };
        let noise = NoiseField::default();
        let t = std::f32::consts::FRAC_PI_4; // sin(2t) = 1
        let layout = EyePairLayout::compute(&cfg, &noise, FacePosition::CENTER, 400.0, 300.0, t);
        assert!((layout.left.center.x - (120.0 - 2.4)).abs() < EPS);
        assert!((layout.right.center.x - (280.0 + 2.4)).abs() < EPS);
        assert!((layout.left.scale - 1.005).abs() < 1e-5);
        assert_eq!(layout.left.scale, layout.right.scale);
    }

    #[test]
    fn left_eye_mirrors_right_eye() {
        let painter = EyePainter::new(EyeConfig::default()).unwrap();
        let noise = NoiseField::default();
        let mut cache = EyeCurveCache::default();
        let mut canvas = RecordingCanvas::new();
        let face = FacePosition::new(0.8, 0.3);
        let layout = painter
            .draw_eye_pair(&mut canvas, &mut cache, &noise, face, 640.0, 480.0, 2.7)
            .unwrap();
        assert_eq!(canvas.ops().len(), 2);

        let axis = layout.mirror_axis();
        let left = canvas.ops()[0].path.flatten(16);
        let right = canvas.ops()[1].path.flatten(16);
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            let reflected = Point::new(2.0 * axis - l.x, l.y);
            assert!(reflected.distance(*r) < 1e-2, "{reflected:?} vs {r:?}");
        }
    }

    #[test]
    fn eyes_rotate_about_their_own_pivot() {
        let spec = EyeCurveSpec::build(80.0, 36.0).unwrap();
        let placement = EyePlacement {
            center: Point::new(300.0, 120.0),
            rotation: 0.9,
            scale: 1.0,
            mirrored: false,
        };
        let landed = placement.transform(spec.pivot()).apply(spec.pivot());
        assert!(near(landed, placement.center));
    }

    #[test]
    fn eyes_are_opaque_white() {
        let painter = EyePainter::new(EyeConfig::default()).unwrap();
        let mut canvas = RecordingCanvas::new();
        painter
            .draw_eye_pair(
                &mut canvas,
                &mut EyeCurveCache::default(),
                &NoiseField::default(),
                FacePosition::CENTER,
                400.0,
                300.0,
                0.0,
            )
            .unwrap();
        for op in canvas.ops() {
            assert_eq!(op.brush, Brush::Solid(crate::color::Rgba::WHITE));
            assert!(matches!(op.path.elements()[0], PathEl::MoveTo(_)));
        }
    }
}
