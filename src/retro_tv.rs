//! The retro-TV confirmation sequence: a one-shot CRT power-off effect that
//! plays after a successful contact submission.
//!
//! Idle → FlashCollapse → MessageVisible → Idle, on fixed marks: vertical
//! collapse over 0.5 s, horizontal collapse 0.3 s starting at 0.5 s, black
//! fade at 0.8 s, message at 1.0 s, completion at 6.0 s. Triggering while a
//! run is active is a no-op; every trigger yields exactly one completion.

use std::time::{Duration, Instant};

use crate::anim::{cubic_bezier, mix, smoothstep};

pub const TOTAL: Duration = Duration::from_secs(6);
const VERTICAL_COLLAPSE: f32 = 0.5;
const HORIZONTAL_COLLAPSE_START: f32 = 0.5;
const HORIZONTAL_COLLAPSE: f32 = 0.3;
const BLACK_FADE_START: f32 = 0.8;
const BLACK_FADE: f32 = 0.1;
const MESSAGE_AT: f32 = 1.0;
const MESSAGE_FADE: f32 = 0.3;

/// What to draw for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TvPhase {
    Idle,
    /// White screen collapsing to a scanline, then to a point.
    FlashCollapse {
        scale_y: f32,
        scale_x: f32,
        /// 0 = white flash, 1 = fully black.
        darkness: f32,
    },
    /// "THANK YOU" card over black.
    MessageVisible { text_alpha: f32 },
}

#[derive(Debug, Default)]
pub struct RetroTv {
    started_at: Option<Instant>,
}

impl RetroTv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the sequence. No-op while a run is already active, so a double
    /// trigger can never produce a second completion.
    pub fn trigger(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Advance the sequence. Returns `true` on the single tick where the run
    /// completes; the effect then returns to Idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(started) = self.started_at else {
            return false;
        };
        if now.duration_since(started) >= TOTAL {
            self.started_at = None;
            return true;
        }
        false
    }

    /// Drop an in-flight run without completing it (early teardown). The
    /// completion edge must not fire after this.
    pub fn cancel(&mut self) {
        self.started_at = None;
    }

    pub fn phase(&self, now: Instant) -> TvPhase {
        let Some(started) = self.started_at else {
            return TvPhase::Idle;
        };
        let t = now.duration_since(started).as_secs_f32();

        if t < MESSAGE_AT {
            let vy = cubic_bezier(0.4, 0.0, 0.2, 1.0, (t / VERTICAL_COLLAPSE).min(1.0));
            let hx = cubic_bezier(
                0.4,
                0.0,
                0.2,
                1.0,
                ((t - HORIZONTAL_COLLAPSE_START) / HORIZONTAL_COLLAPSE).clamp(0.0, 1.0),
            );
            TvPhase::FlashCollapse {
                scale_y: mix(1.0, 0.01, vy),
                scale_x: mix(1.0, 0.0, hx),
                darkness: smoothstep(BLACK_FADE_START, BLACK_FADE_START + BLACK_FADE, t),
            }
        } else {
            TvPhase::MessageVisible {
                text_alpha: smoothstep(MESSAGE_AT, MESSAGE_AT + MESSAGE_FADE, t),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn idle_until_triggered() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        assert!(!tv.is_active());
        assert_eq!(tv.phase(base), TvPhase::Idle);
        assert!(!tv.tick(t(base, 10_000)));
    }

    #[test]
    fn completes_exactly_once_after_total_duration() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        tv.trigger(base);
        assert!(tv.is_active());
        assert!(!tv.tick(t(base, 5_999)));
        assert!(tv.tick(t(base, 6_000)));
        assert!(!tv.is_active());
        assert!(!tv.tick(t(base, 7_000)));
    }

    #[test]
    fn retrigger_while_running_is_a_no_op() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        tv.trigger(base);
        // A second trigger mid-run must not restart the clock.
        tv.trigger(t(base, 3_000));
        assert!(tv.tick(t(base, 6_000)));
        // And must not queue a second completion.
        assert!(!tv.tick(t(base, 9_001)));
    }

    #[test]
    fn cancel_suppresses_completion() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        tv.trigger(base);
        tv.cancel();
        assert!(!tv.is_active());
        assert!(!tv.tick(t(base, 6_000)));
    }

    #[test]
    fn collapse_precedes_message() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        tv.trigger(base);

        let TvPhase::FlashCollapse {
            scale_y,
            scale_x,
            darkness,
        } = tv.phase(t(base, 100))
        else {
            panic!("expected collapse phase")
        };
        assert!(scale_y < 1.0 && scale_y > 0.01);
        assert_eq!(scale_x, 1.0);
        assert_eq!(darkness, 0.0);

        let TvPhase::FlashCollapse {
            scale_y, scale_x, ..
        } = tv.phase(t(base, 700))
        else {
            panic!("expected collapse phase")
        };
        assert!((scale_y - 0.01).abs() < 1e-3);
        assert!(scale_x < 1.0);

        let TvPhase::MessageVisible { text_alpha } = tv.phase(t(base, 2_000)) else {
            panic!("expected message phase")
        };
        assert_eq!(text_alpha, 1.0);
    }

    #[test]
    fn restartable_after_completion() {
        let base = Instant::now();
        let mut tv = RetroTv::new();
        tv.trigger(base);
        assert!(tv.tick(t(base, 6_000)));
        tv.trigger(t(base, 10_000));
        assert!(tv.is_active());
        assert!(tv.tick(t(base, 16_000)));
    }
}
