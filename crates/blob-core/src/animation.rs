use std::time::Duration;

use crate::color::BlobState;
use crate::config::AnimationConfig;

/// Noise time phases for the three contour layers. They only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeAccumulators {
    pub primary: f32,
    pub secondary: f32,
    pub tertiary: f32,
}

impl TimeAccumulators {
    pub fn advance(&mut self, speeds: [f32; 3]) {
        self.primary += speeds[0];
        self.secondary += speeds[1];
        self.tertiary += speeds[2];
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.primary, self.secondary, self.tertiary]
    }
}

impl AnimationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Blob center displacement `[dx, dy]` for `state` at `state_timer`.
    ///
    /// Success jumps upward (negative y in a y-down surface), Error wobbles
    /// sideways, everything else stays put.
    pub fn transient_offset(&self, state: BlobState, state_timer: u32) -> [f32; 2] {
        let t = state_timer as f32;
        match state {
            BlobState::Success => [0.0, -(t * self.jump_rate).sin() * self.jump_amplitude],
            BlobState::Error => [(t * self.wobble_rate).sin() * self.wobble_amplitude, 0.0],
            _ => [0.0, 0.0],
        }
    }

    /// Ticks a transient state lasts before reverting to idle.
    fn transient_ticks(&self, state: BlobState) -> Option<u32> {
        match state {
            BlobState::Success => Some(self.success_ticks),
            BlobState::Error => Some(self.error_ticks),
            _ => None,
        }
    }
}

/// Fixed-step clock driving the noise phases and the state machine.
///
/// The host calls [`tick`](Self::tick) at [`AnimationConfig::tick_interval`];
/// the clock never looks at wall time itself.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    config: AnimationConfig,
    speeds: [f32; 3],
    phases: TimeAccumulators,
    state: BlobState,
    state_timer: u32,
    /// Center displacement computed on the most recent tick.
    offset: [f32; 2],
    ticks: u64,
}

impl AnimationClock {
    pub fn new(config: AnimationConfig, speeds: [f32; 3]) -> Self {
        Self {
            config,
            speeds,
            phases: TimeAccumulators::default(),
            state: BlobState::Idle,
            state_timer: 0,
            offset: [0.0, 0.0],
            ticks: 0,
        }
    }

    pub fn state(&self) -> BlobState {
        self.state
    }

    pub fn state_timer(&self) -> u32 {
        self.state_timer
    }

    pub fn phases(&self) -> TimeAccumulators {
        self.phases
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Switch state immediately. The state timer restarts even when the
    /// requested state equals the current one, cutting any running jump or
    /// wobble short.
    pub fn request_state(&mut self, state: BlobState) {
        if state != self.state {
            log::debug!("blob state {} -> {}", self.state, state);
        }
        self.state = state;
        self.state_timer = 0;
        self.offset = [0.0, 0.0];
    }

    pub fn tick(&mut self) {
        self.phases.advance(self.speeds);
        self.ticks += 1;

        let Some(limit) = self.config.transient_ticks(self.state) else {
            return;
        };

        self.offset = self.config.transient_offset(self.state, self.state_timer);
        self.state_timer += 1;
        log::trace!("{} tick {}/{}", self.state, self.state_timer, limit);

        if self.state_timer >= limit {
            log::debug!("{} animation finished, back to idle", self.state);
            self.state = BlobState::Idle;
            self.state_timer = 0;
            self.offset = [0.0, 0.0];
        }
    }

    /// Displacement of the blob center for the current frame.
    pub fn center_offset(&self) -> [f32; 2] {
        match self.state {
            BlobState::Success | BlobState::Error => self.offset,
            _ => [0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> AnimationClock {
        AnimationClock::new(AnimationConfig::default(), [0.05, 0.03, 0.08])
    }

    fn run(clock: &mut AnimationClock, ticks: u32) {
        for _ in 0..ticks {
            clock.tick();
        }
    }

    #[test]
    fn phases_advance_by_their_speeds() {
        let mut c = clock();
        run(&mut c, 10);
        let p = c.phases();
        assert!((p.primary - 0.5).abs() < 1e-5);
        assert!((p.secondary - 0.3).abs() < 1e-5);
        assert!((p.tertiary - 0.8).abs() < 1e-5);
        assert_eq!(c.ticks(), 10);
    }

    #[test]
    fn success_reverts_exactly_at_fifty_ticks() {
        let mut c = clock();
        c.request_state(BlobState::Success);
        run(&mut c, 49);
        assert_eq!(c.state(), BlobState::Success);
        assert_eq!(c.state_timer(), 49);
        c.tick();
        assert_eq!(c.state(), BlobState::Idle);
        assert_eq!(c.state_timer(), 0);
    }

    #[test]
    fn error_reverts_exactly_at_forty_ticks() {
        let mut c = clock();
        c.request_state(BlobState::Error);
        run(&mut c, 39);
        assert_eq!(c.state(), BlobState::Error);
        c.tick();
        assert_eq!(c.state(), BlobState::Idle);
        assert_eq!(c.state_timer(), 0);
    }

    #[test]
    fn success_then_fifty_one_ticks_leaves_no_jump() {
        let mut c = clock();
        c.request_state(BlobState::Success);
        run(&mut c, 51);
        assert_eq!(c.state(), BlobState::Idle);
        assert_eq!(c.state_timer(), 0);
        assert_eq!(c.center_offset(), [0.0, 0.0]);
    }

    #[test]
    fn success_moves_the_center_upward_first() {
        let mut c = clock();
        c.request_state(BlobState::Success);
        run(&mut c, 3);
        // offset from timer value 2: sin(0.6) * 10
        let [dx, dy] = c.center_offset();
        assert_eq!(dx, 0.0);
        assert!((dy + (0.6f32).sin() * 10.0).abs() < 1e-4);
    }

    #[test]
    fn error_wobbles_horizontally() {
        let mut c = clock();
        c.request_state(BlobState::Error);
        run(&mut c, 4);
        let [dx, dy] = c.center_offset();
        assert!((dx - (1.5f32).sin() * 5.0).abs() < 1e-4);
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn request_preempts_running_animation() {
        let mut c = clock();
        c.request_state(BlobState::Success);
        run(&mut c, 30);
        c.request_state(BlobState::Error);
        assert_eq!(c.state_timer(), 0);
        assert_eq!(c.center_offset(), [0.0, 0.0]);
        run(&mut c, 39);
        assert_eq!(c.state(), BlobState::Error);
    }

    #[test]
    fn last_request_before_a_tick_wins() {
        let mut c = clock();
        c.request_state(BlobState::Thinking);
        c.request_state(BlobState::Listening);
        c.tick();
        assert_eq!(c.state(), BlobState::Listening);
    }

    #[test]
    fn steady_states_do_not_time_out() {
        let mut c = clock();
        c.request_state(BlobState::Thinking);
        run(&mut c, 500);
        assert_eq!(c.state(), BlobState::Thinking);
        assert_eq!(c.state_timer(), 0);
    }

    #[test]
    fn transient_offset_is_zero_for_steady_states() {
        let cfg = AnimationConfig::default();
        assert_eq!(cfg.transient_offset(BlobState::Idle, 12), [0.0, 0.0]);
        assert_eq!(cfg.transient_offset(BlobState::Listening, 12), [0.0, 0.0]);
        assert_eq!(cfg.tick_interval(), Duration::from_millis(20));
    }
}
