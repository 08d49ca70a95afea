use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BlobError;

/// Presentation state of the blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Success,
    Error,
}

impl BlobState {
    pub const ALL: [BlobState; 5] = [
        BlobState::Idle,
        BlobState::Listening,
        BlobState::Thinking,
        BlobState::Success,
        BlobState::Error,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlobState::Idle => "idle",
            BlobState::Listening => "listening",
            BlobState::Thinking => "thinking",
            BlobState::Success => "success",
            BlobState::Error => "error",
        }
    }

    /// Parse a state name coming from a caller boundary. Unknown names map to
    /// `Idle` so a bad request never takes the render loop down.
    pub fn from_name_or_idle(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown blob state `{name}`, falling back to idle");
            BlobState::Idle
        })
    }

    /// Base fill color for this state.
    pub fn base_color(self) -> Rgba {
        match self {
            BlobState::Idle => Rgba::rgb(10, 10, 15),
            BlobState::Listening => Rgba::rgb(0, 200, 255),
            BlobState::Thinking => Rgba::rgb(255, 150, 0),
            BlobState::Success => Rgba::rgb(0, 255, 100),
            BlobState::Error => Rgba::rgb(255, 50, 50),
        }
    }
}

impl fmt::Display for BlobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlobState {
    type Err = BlobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        BlobState::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BlobError::UnknownState(s.to_string()))
    }
}

/// 8-bit straight-alpha color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT_BLACK: Rgba = Rgba::new(0, 0, 0, 0);
    pub const TRANSPARENT_WHITE: Rgba = Rgba::new(255, 255, 255, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black(alpha: u8) -> Self {
        Self::new(0, 0, 0, alpha)
    }

    pub const fn white(alpha: u8) -> Self {
        Self::new(255, 255, 255, alpha)
    }

    /// Add `delta` to every color channel, clamping to [0, 255]. Alpha is kept.
    pub fn offset(self, delta: i16) -> Self {
        let shift = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    /// Per-channel linear interpolation, `t` in [0, 1].
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// The five-tone ramp derived from a base color for the main lighting pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorVariations {
    pub highlight: Rgba,
    pub mid_light: Rgba,
    pub base: Rgba,
    pub mid_dark: Rgba,
    pub shadow: Rgba,
}

impl ColorVariations {
    pub const HIGHLIGHT: i16 = 80;
    pub const MID_LIGHT: i16 = 40;
    pub const MID_DARK: i16 = -40;
    pub const SHADOW: i16 = -60;

    pub fn from_base(base: Rgba) -> Self {
        Self {
            highlight: base.offset(Self::HIGHLIGHT),
            mid_light: base.offset(Self::MID_LIGHT),
            base,
            mid_dark: base.offset(Self::MID_DARK),
            shadow: base.offset(Self::SHADOW),
        }
    }

    pub fn for_state(state: BlobState) -> Self {
        Self::from_base(state.base_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listening_palette() {
        let v = ColorVariations::for_state(BlobState::Listening);
        assert_eq!(v.base, Rgba::rgb(0, 200, 255));
        assert_eq!(v.highlight, Rgba::rgb(80, 255, 255));
        assert_eq!(v.shadow, Rgba::rgb(0, 140, 195));
    }

    #[test]
    fn idle_is_near_black() {
        assert_eq!(BlobState::Idle.base_color(), Rgba::rgb(10, 10, 15));
        assert_eq!(BlobState::default(), BlobState::Idle);
    }

    #[test]
    fn offsets_clamp_at_channel_limits() {
        for (channel, highlight, shadow) in [(0u8, 80u8, 0u8), (128, 208, 68), (255, 255, 195)] {
            let v = ColorVariations::from_base(Rgba::rgb(channel, channel, channel));
            assert_eq!(v.highlight, Rgba::rgb(highlight, highlight, highlight));
            assert_eq!(v.shadow, Rgba::rgb(shadow, shadow, shadow));
        }
    }

    #[test]
    fn offset_keeps_alpha() {
        assert_eq!(Rgba::new(10, 20, 30, 77).offset(-60).a, 77);
    }

    #[test]
    fn state_names_parse_case_insensitively() {
        assert_eq!(
            "Thinking".parse::<BlobState>().unwrap(),
            BlobState::Thinking
        );
        assert_eq!(" error ".parse::<BlobState>().unwrap(), BlobState::Error);
        for state in BlobState::ALL {
            assert_eq!(state.to_string().parse::<BlobState>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_name_falls_back_to_idle() {
        assert!(matches!(
            "sleeping".parse::<BlobState>(),
            Err(BlobError::UnknownState(_))
        ));
        assert_eq!(BlobState::from_name_or_idle("sleeping"), BlobState::Idle);
        assert_eq!(
            BlobState::from_name_or_idle("sleeping").base_color(),
            Rgba::rgb(10, 10, 15)
        );
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba::black(0);
        let b = Rgba::white(200);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::new(128, 128, 128, 100));
    }
}
