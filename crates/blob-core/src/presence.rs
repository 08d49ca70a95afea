//! Inputs from the face-tracking side: where the face is, and whether there
//! is one at all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Normalized face coordinate, `(0, 0)` top-left to `(1, 1)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacePosition {
    pub x: f32,
    pub y: f32,
}

impl FacePosition {
    /// Also the "no face tracked" position.
    pub const CENTER: FacePosition = FacePosition { x: 0.5, y: 0.5 };

    /// Clamps into [0, 1]; non-finite coordinates snap to the center.
    pub fn new(x: f32, y: f32) -> Self {
        let norm = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        Self {
            x: norm(x),
            y: norm(y),
        }
    }

    /// Offset from center in [-1, 1] on both axes.
    pub fn look(self) -> [f32; 2] {
        [(self.x - 0.5) * 2.0, (self.y - 0.5) * 2.0]
    }

    /// Offset from center scaled per axis by `gain`.
    pub fn tilt(self, gain: [f32; 2]) -> [f32; 2] {
        [(self.x - 0.5) * gain[0], (self.y - 0.5) * gain[1]]
    }

    fn pack(self) -> u64 {
        ((self.x.to_bits() as u64) << 32) | self.y.to_bits() as u64
    }

    fn unpack(bits: u64) -> Self {
        Self {
            x: f32::from_bits((bits >> 32) as u32),
            y: f32::from_bits(bits as u32),
        }
    }
}

impl Default for FacePosition {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Latest-value-wins slot for the face position.
///
/// Both coordinates live in one 64-bit word, so a reader sees either the old
/// pair or the new pair, never a mix. Clones share the same slot.
#[derive(Clone, Debug)]
pub struct SharedFacePosition {
    bits: Arc<AtomicU64>,
}

impl SharedFacePosition {
    pub fn new(initial: FacePosition) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(initial.pack())),
        }
    }

    /// Fields may have been set directly, so the value is clamped again.
    pub fn store(&self, position: FacePosition) {
        let position = FacePosition::new(position.x, position.y);
        self.bits.store(position.pack(), Ordering::Release);
    }

    /// Producer entry point for `facePositionUpdated(x, y)`.
    pub fn update(&self, x: f32, y: f32) {
        self.store(FacePosition::new(x, y));
    }

    pub fn load(&self) -> FacePosition {
        FacePosition::unpack(self.bits.load(Ordering::Acquire))
    }

    pub fn reset(&self) {
        self.store(FacePosition::CENTER);
    }
}

impl Default for SharedFacePosition {
    fn default() -> Self {
        Self::new(FacePosition::CENTER)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceEvent {
    Gained,
    Lost,
}

/// Turns a per-frame "is a face visible" signal into edge events.
#[derive(Clone, Debug, Default)]
pub struct PresenceDetector {
    present: bool,
}

impl PresenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Feed one detection result; returns an event only when presence flips.
    pub fn observe(&mut self, face_visible: bool) -> Option<PresenceEvent> {
        let event = match (self.present, face_visible) {
            (false, true) => Some(PresenceEvent::Gained),
            (true, false) => Some(PresenceEvent::Lost),
            _ => None,
        };
        self.present = face_visible;
        event
    }
}
