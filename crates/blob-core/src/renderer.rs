use std::time::{Duration, Instant};

use crate::animation::AnimationClock;
use crate::canvas::{Canvas, Point};
use crate::color::BlobState;
use crate::config::{BlobConfig, Presentation};
use crate::contour::{Contour, ContourGenerator};
use crate::error::BlobError;
use crate::noise::NoiseField;
use crate::outline::{EyeCurveCache, EyePainter, EyePairLayout};
use crate::presence::{FacePosition, PresenceEvent, SharedFacePosition};
use crate::shading::ShadingCompositor;

/// Mutable per-surface animation state, owned by the caller and handed to
/// every `tick`/`paint` call. Two contexts never interfere, even when they
/// share one renderer.
#[derive(Debug)]
pub struct FrameContext {
    clock: AnimationClock,
    face: SharedFacePosition,
    eye_cache: EyeCurveCache,
    started: Instant,
}

impl FrameContext {
    pub fn state(&self) -> BlobState {
        self.clock.state()
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Host request; the latest request before a tick wins.
    pub fn request_state(&mut self, state: BlobState) {
        self.clock.request_state(state);
    }

    /// Like [`request_state`](Self::request_state) for a state name; unknown
    /// names become `Idle`.
    pub fn request_state_named(&mut self, name: &str) {
        self.request_state(BlobState::from_name_or_idle(name));
    }

    /// A face appearing wakes the blob up, a face leaving puts it to sleep.
    /// Already being in the target state leaves the timer alone.
    pub fn handle_presence(&mut self, event: PresenceEvent) {
        let target = match event {
            PresenceEvent::Gained => BlobState::Listening,
            PresenceEvent::Lost => BlobState::Idle,
        };
        if self.state() != target {
            log::debug!("presence {event:?}");
            self.request_state(target);
        }
    }

    /// Handle for the face-tracking producer; may be moved to another thread.
    pub fn face_handle(&self) -> SharedFacePosition {
        self.face.clone()
    }

    pub fn set_face_position(&self, x: f32, y: f32) {
        self.face.update(x, y);
    }

    pub fn face_position(&self) -> FacePosition {
        self.face.load()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What one `paint` call produced.
#[derive(Clone, Debug)]
pub struct FrameSummary {
    pub state: BlobState,
    pub face: FacePosition,
    pub contour: Contour,
    pub eyes: EyePairLayout,
}

/// Immutable engine: configuration, noise field and the three painters.
#[derive(Clone, Debug)]
pub struct BlobRenderer {
    config: BlobConfig,
    noise: NoiseField,
    contour: ContourGenerator,
    shading: ShadingCompositor,
    eyes: EyePainter,
}

impl BlobRenderer {
    pub fn new(config: BlobConfig) -> Result<Self, BlobError> {
        config.validate()?;
        let noise = NoiseField::new(config.noise_seed);
        let contour = ContourGenerator::new(config.contour.clone())?;
        let shading = ShadingCompositor::new(config.shading.clone(), config.contour.lean_gain)?;
        let eyes = EyePainter::new(config.eyes.clone())?;
        Ok(Self {
            config,
            noise,
            contour,
            shading,
            eyes,
        })
    }

    pub fn for_presentation(presentation: Presentation) -> Result<Self, BlobError> {
        Self::new(BlobConfig::for_presentation(presentation))
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.animation.tick_interval()
    }

    pub fn new_context(&self) -> FrameContext {
        self.context_with_face(SharedFacePosition::default())
    }

    /// Context reading the face position from an existing slot.
    pub fn context_with_face(&self, face: SharedFacePosition) -> FrameContext {
        let speeds = self.config.contour.layer_speeds();
        FrameContext {
            clock: AnimationClock::new(self.config.animation.clone(), speeds),
            face,
            eye_cache: EyeCurveCache::default(),
            started: Instant::now(),
        }
    }

    /// Advance one fixed step. Call before each `paint`.
    pub fn tick(&self, ctx: &mut FrameContext) {
        ctx.clock.tick();
    }

    /// Outline for the current context state on a `width`×`height` surface.
    pub fn contour(&self, ctx: &FrameContext, width: f32, height: f32) -> Contour {
        self.contour.generate(
            &self.noise,
            Point::new(width / 2.0, height / 2.0),
            &ctx.clock.phases(),
            ctx.face.load(),
            ctx.clock.center_offset(),
        )
    }

    /// Composite one full frame into `canvas`, using wall time since the
    /// context was created for the eye motion.
    pub fn paint(
        &self,
        ctx: &mut FrameContext,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
    ) -> Result<FrameSummary, BlobError> {
        let elapsed = ctx.elapsed();
        self.paint_at(ctx, canvas, width, height, elapsed)
    }

    /// [`paint`](Self::paint) with an explicit eye-motion time.
    pub fn paint_at(
        &self,
        ctx: &mut FrameContext,
        canvas: &mut dyn Canvas,
        width: f32,
        height: f32,
        elapsed: Duration,
    ) -> Result<FrameSummary, BlobError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(BlobError::InvalidSurface { width, height });
        }

        // One read per frame so body and eyes agree on where the face is.
        let face = ctx.face.load();
        let state = ctx.clock.state();

        let contour = self.contour.generate(
            &self.noise,
            Point::new(width / 2.0, height / 2.0),
            &ctx.clock.phases(),
            face,
            ctx.clock.center_offset(),
        );
        self.shading.paint_blob(canvas, &contour, state, face);

        let eyes = self.eyes.draw_eye_pair(
            canvas,
            &mut ctx.eye_cache,
            &self.noise,
            face,
            width,
            height,
            elapsed.as_secs_f32(),
        )?;

        Ok(FrameSummary {
            state,
            face,
            contour,
            eyes,
        })
    }
}
