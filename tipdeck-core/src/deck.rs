//! Top-level slide navigation.

use std::time::Duration;

use tipdeck_model::SlideId;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::settings::DeckSettings;

/// Direction the incoming slide enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckOutcome {
    Moved {
        from: SlideId,
        to: SlideId,
        direction: SlideDirection,
    },
    Ignored,
}

impl DeckOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, DeckOutcome::Moved { .. })
    }
}

/// Tracks the current slide and refuses to start a new slide animation
/// while one is still running.
#[derive(Debug, Clone)]
pub struct DeckNavigator {
    current: SlideId,
    settings: DeckSettings,
    animating_until: Option<Instant>,
}

impl DeckNavigator {
    pub fn new(settings: DeckSettings) -> Self {
        Self::starting_at(SlideId::Cover, settings)
    }

    pub fn starting_at(slide: SlideId, settings: DeckSettings) -> Self {
        Self {
            current: slide,
            settings,
            animating_until: None,
        }
    }

    pub fn current(&self) -> SlideId {
        self.current
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.animating_until.is_some_and(|until| now < until)
    }

    pub fn slide_transition(&self) -> Duration {
        self.settings.slide_transition
    }

    /// Jump to the slide at `index`.
    ///
    /// Ignored while an animation is running, when `index` is already
    /// current, or when it is out of range.
    pub fn go_to(&mut self, index: usize, now: Instant) -> DeckOutcome {
        if self.is_animating(now) {
            trace!(index, "slide change dropped during animation");
            return DeckOutcome::Ignored;
        }
        let from = self.current;
        let Some(&to) = SlideId::ALL.get(index) else {
            return DeckOutcome::Ignored;
        };
        if to == from {
            return DeckOutcome::Ignored;
        }

        let direction = if to.position() > from.position() {
            SlideDirection::Right
        } else {
            SlideDirection::Left
        };
        self.current = to;
        self.animating_until = Some(now + self.settings.slide_transition);
        debug!(%from, %to, ?direction, "slide changed");
        DeckOutcome::Moved {
            from,
            to,
            direction,
        }
    }

    pub fn go_to_slide(&mut self, slide: SlideId, now: Instant) -> DeckOutcome {
        self.go_to(slide.position(), now)
    }

    pub fn next(&mut self, now: Instant) -> DeckOutcome {
        self.go_to(self.current.position() + 1, now)
    }

    pub fn prev(&mut self, now: Instant) -> DeckOutcome {
        match self.current.position().checked_sub(1) {
            Some(index) => self.go_to(index, now),
            None => DeckOutcome::Ignored,
        }
    }

    /// Escape leaves the tips slide for the one before it. Elsewhere it does
    /// nothing.
    pub fn escape(&mut self, now: Instant) -> DeckOutcome {
        if self.current == SlideId::Tips {
            self.prev(now)
        } else {
            DeckOutcome::Ignored
        }
    }
}

impl Default for DeckNavigator {
    fn default() -> Self {
        Self::new(DeckSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStep {
    Moved { from: usize, to: usize },
    /// Stepped past the first or last bullet; the deck takes the key.
    HandOff(SlideDirection),
}

/// Highlighted bullet on the features slide.
///
/// Directional keys walk the list and only move the deck once they run
/// off either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCursor {
    active: usize,
    count: usize,
}

impl FeatureCursor {
    pub fn new(count: usize) -> Self {
        Self { active: 0, count }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Back to the first bullet, as when the slide is shown again.
    pub fn reset(&mut self) {
        self.active = 0;
    }

    pub fn forward(&mut self) -> FeatureStep {
        let from = self.active;
        if from + 1 < self.count {
            self.active = from + 1;
            FeatureStep::Moved {
                from,
                to: self.active,
            }
        } else {
            FeatureStep::HandOff(SlideDirection::Right)
        }
    }

    pub fn backward(&mut self) -> FeatureStep {
        let from = self.active;
        match from.checked_sub(1) {
            Some(to) if self.count > 0 => {
                self.active = to;
                FeatureStep::Moved { from, to }
            }
            _ => FeatureStep::HandOff(SlideDirection::Left),
        }
    }
}
