//! Page lifecycle: the one-shot Loading → Loaded transition, the
//! once-per-section reveal tracker, and the scroll model.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::anim::ease_standard;
use crate::content::{page_height_vh, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Loading,
    Loaded,
}

/// Owns the `Loading → Loaded` flag for the page root. The transition fires
/// exactly once per mount and never reverses.
#[derive(Debug)]
pub struct Lifecycle {
    phase: PagePhase,
    mounted_at: Instant,
    delay: Duration,
}

impl Lifecycle {
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self {
            phase: PagePhase::Loading,
            mounted_at: now,
            delay,
        }
    }

    /// Advance the clock. Returns `true` only on the tick that performs the
    /// Loading → Loaded transition.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase == PagePhase::Loading && now.duration_since(self.mounted_at) >= self.delay {
            self.phase = PagePhase::Loaded;
            return true;
        }
        false
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == PagePhase::Loaded
    }
}

/// Entrance-animation bookkeeping: each section fades in the first time it
/// enters the viewport and never replays, even if scrolled away and back.
#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed_at: HashMap<Section, Instant>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record visibility for one frame. A section that is in view arms its
    /// reveal timestamp once; later calls are no-ops.
    pub fn observe(&mut self, section: Section, in_view: bool, now: Instant) {
        if in_view {
            self.revealed_at.entry(section).or_insert(now);
        }
    }

    pub fn has_revealed(&self, section: Section) -> bool {
        self.revealed_at.contains_key(&section)
    }

    /// Eased entrance progress in [0, 1]; 0 until the section first enters
    /// the viewport, then ramps over `fade`.
    pub fn progress(&self, section: Section, now: Instant, fade: Duration) -> f32 {
        let Some(start) = self.revealed_at.get(&section) else {
            return 0.0;
        };
        if fade.is_zero() {
            return 1.0;
        }
        let t = now.duration_since(*start).as_secs_f32() / fade.as_secs_f32();
        ease_standard(t)
    }
}

/// Vertical scroll position over the virtual page, in viewport-height units.
#[derive(Debug)]
pub struct Scroll {
    offset_vh: f32,
    locked: bool,
}

impl Scroll {
    pub fn new() -> Self {
        Self {
            offset_vh: 0.0,
            locked: false,
        }
    }

    pub fn offset_vh(&self) -> f32 {
        self.offset_vh
    }

    /// Scroll by a delta in viewport-height units; ignored while locked.
    pub fn scroll_by(&mut self, delta_vh: f32) {
        if self.locked {
            return;
        }
        let max = (page_height_vh() - 1.0).max(0.0);
        self.offset_vh = (self.offset_vh + delta_vh).clamp(0.0, max);
    }

    /// The retro-TV sequence holds this for its whole duration.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether any part of `section` overlaps the current viewport window.
    pub fn section_in_view(&self, section: Section) -> bool {
        let top = section.top_vh();
        let bottom = top + section.height_vh();
        bottom > self.offset_vh && top < self.offset_vh + 1.0
    }
}

impl Default for Scroll {
    fn default() -> Self {
        Self::new()
    }
}
