//! Carousel playback state machine.
//!
//! The controller is a plain struct driven by explicit timestamps: every
//! operation takes `now`, and the caller owns the actual timers (see
//! [`crate::runtime`]). That keeps the state transitions synchronous and
//! lets tests walk through hours of playback without sleeping.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tipdeck_model::{Catalog, CategoryKey};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::round::{Round, RoundBuilder};
use crate::settings::CarouselSettings;

/// Identifies one activation of one item. The same index shown again later
/// gets a new epoch, so late reports for the earlier showing are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationTicket {
    pub index: usize,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced {
        from: usize,
        to: usize,
        position: usize,
        new_round: bool,
    },
    /// Dropped because a transition was still running, or because a timer
    /// fired for a deadline that has since moved.
    Ignored,
}

impl StepOutcome {
    pub fn advanced(&self) -> bool {
        matches!(self, StepOutcome::Advanced { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationReport {
    Extended { deadline: Instant },
    Unchanged,
    /// The reporting activation is no longer on screen.
    Stale,
}

/// What the rendering layer observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub active_index: usize,
    pub exiting_index: Option<usize>,
    pub transitioning: bool,
    pub position: usize,
    pub round_len: usize,
    pub rounds_built: u64,
    pub ticket: ActivationTicket,
    pub deadline: Instant,
}

pub struct CarouselController<R = StdRng> {
    catalog: Arc<Catalog>,
    builder: RoundBuilder,
    settings: CarouselSettings,
    rng: R,

    round: Round,
    position: usize,
    active_index: usize,
    exiting_index: Option<usize>,
    transition_until: Option<Instant>,

    activated_at: Instant,
    epoch: u64,
    rounds_built: u64,
    media_extension: Option<Duration>,
    deadline: Instant,
}

impl<R> std::fmt::Debug for CarouselController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselController")
            .field("catalog_len", &self.catalog.len())
            .field("settings", &self.settings)
            .field("round", &self.round)
            .field("position", &self.position)
            .field("active_index", &self.active_index)
            .field("exiting_index", &self.exiting_index)
            .field("transition_until", &self.transition_until)
            .field("epoch", &self.epoch)
            .field("rounds_built", &self.rounds_built)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl CarouselController<StdRng> {
    /// Controller with a fixed seed, for reproducible playback.
    pub fn seeded(
        catalog: Arc<Catalog>,
        settings: CarouselSettings,
        seed: u64,
        now: Instant,
    ) -> Self {
        Self::new(catalog, settings, StdRng::seed_from_u64(seed), now)
    }

    /// Controller seeded from the operating system.
    pub fn from_entropy(
        catalog: Arc<Catalog>,
        settings: CarouselSettings,
        now: Instant,
    ) -> Self {
        Self::new(catalog, settings, StdRng::from_os_rng(), now)
    }
}

impl<R: Rng> CarouselController<R> {
    /// Mount the carousel: build the first round with no seed category and
    /// arm the first auto-advance.
    pub fn new(
        catalog: Arc<Catalog>,
        settings: CarouselSettings,
        mut rng: R,
        now: Instant,
    ) -> Self {
        let builder = RoundBuilder::from_catalog(&catalog);
        let round = builder.build(None, &mut rng);
        // Catalog guarantees at least one item.
        let active_index = round.first().unwrap_or_default();

        let mut controller = Self {
            catalog,
            builder,
            settings,
            rng,
            round,
            position: 0,
            active_index,
            exiting_index: None,
            transition_until: None,
            activated_at: now,
            epoch: 0,
            rounds_built: 1,
            media_extension: None,
            deadline: now,
        };
        let duration = controller.configured_duration(active_index);
        controller.deadline = now + duration;
        debug!(
            active_index,
            round_len = controller.round.len(),
            "carousel mounted"
        );
        controller
    }

    pub fn step_forward(&mut self, now: Instant) -> StepOutcome {
        self.step(StepDirection::Forward, now)
    }

    pub fn step_backward(&mut self, now: Instant) -> StepOutcome {
        self.step(StepDirection::Backward, now)
    }

    pub fn step(&mut self, direction: StepDirection, now: Instant) -> StepOutcome {
        if self.transition_until.is_some() {
            trace!(?direction, "step dropped during transition");
            return StepOutcome::Ignored;
        }

        let from = self.active_index;
        let mut new_round = false;
        match direction {
            StepDirection::Forward => {
                let next = self.position + 1;
                if next < self.round.len() {
                    self.position = next;
                } else {
                    let seed = self.category_of(from);
                    let rng = &mut self.rng;
                    self.round = self.builder.build(seed.as_ref(), rng);
                    self.rounds_built += 1;
                    self.position = 0;
                    new_round = true;
                    debug!(
                        rounds_built = self.rounds_built,
                        seed = ?seed,
                        "started new carousel round"
                    );
                }
            }
            StepDirection::Backward => {
                // Backward never builds a round; it wraps inside this one.
                self.position = match self.position {
                    0 => self.round.len() - 1,
                    p => p - 1,
                };
            }
        }

        let to = self.round.get(self.position).unwrap_or(from);
        self.activate(to, now);
        self.exiting_index = Some(from);
        self.transition_until = Some(now + self.settings.transition_window);

        debug!(
            ?direction,
            from,
            to,
            position = self.position,
            epoch = self.epoch,
            "carousel advanced"
        );
        StepOutcome::Advanced {
            from,
            to,
            position: self.position,
            new_round,
        }
    }

    /// Auto-advance timer callback.
    ///
    /// A fire earlier than the current deadline is stale and ignored. A fire
    /// during a transition is pushed to the end of the transition window
    /// rather than dropped, so playback cannot stall.
    pub fn on_deadline(&mut self, now: Instant) -> StepOutcome {
        if now < self.deadline {
            trace!("stale auto-advance fire ignored");
            return StepOutcome::Ignored;
        }
        if let Some(until) = self.transition_until {
            self.deadline = until;
            trace!("auto-advance deferred until transition ends");
            return StepOutcome::Ignored;
        }
        self.step_forward(now)
    }

    /// Close the exit transition once its window has elapsed. Returns true
    /// when the state changed.
    pub fn finish_transition(&mut self, now: Instant) -> bool {
        match self.transition_until {
            Some(until) if now >= until => {
                self.transition_until = None;
                self.exiting_index = None;
                true
            }
            _ => false,
        }
    }

    /// The media of an activation turned out to be `media_length` long.
    ///
    /// The deadline moves to `activation + media_length - lead_out` when that
    /// is longer than the item's configured duration and later than the
    /// deadline already armed. It never moves earlier.
    pub fn report_media_duration(
        &mut self,
        ticket: ActivationTicket,
        media_length: Duration,
    ) -> DurationReport {
        if ticket != self.ticket() {
            debug!(
                index = ticket.index,
                epoch = ticket.epoch,
                "ignoring stale media duration report"
            );
            return DurationReport::Stale;
        }

        let lead_out = self.settings.media_lead_out;
        let playable = media_length.saturating_sub(lead_out);
        if playable <= self.configured_duration(self.active_index) {
            return DurationReport::Unchanged;
        }

        let candidate = self.activated_at + playable;
        if candidate <= self.deadline {
            return DurationReport::Unchanged;
        }

        self.deadline = candidate;
        self.media_extension = Some(
            self.media_extension
                .map_or(playable, |current| current.max(playable)),
        );
        debug!(
            index = self.active_index,
            playable_ms = playable.as_millis() as u64,
            "auto-advance extended for media"
        );
        DurationReport::Extended { deadline: candidate }
    }

    /// Drop the armed auto-advance and rearm it from `now` for the current
    /// item.
    pub fn reset_timer(&mut self, now: Instant) {
        self.deadline = now + self.effective_duration();
        trace!(index = self.active_index, "auto-advance timer reset");
    }

    fn activate(&mut self, index: usize, now: Instant) {
        self.active_index = index;
        self.activated_at = now;
        self.epoch += 1;
        self.media_extension = None;
        self.deadline = now + self.configured_duration(index);
    }

    fn category_of(&self, index: usize) -> Option<CategoryKey> {
        self.builder.category(index).cloned()
    }
}

impl<R> CarouselController<R> {
    /// Configured display time for `index`, or the carousel default.
    pub fn configured_duration(&self, index: usize) -> Duration {
        self.catalog
            .get(index)
            .and_then(|item| item.display_duration())
            .unwrap_or(self.settings.default_duration)
    }

    /// Display time of the current activation, including any media
    /// extension reported for it.
    pub fn effective_duration(&self) -> Duration {
        let configured = self.configured_duration(self.active_index);
        self.media_extension
            .map_or(configured, |extension| configured.max(extension))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn exiting_index(&self) -> Option<usize> {
        self.exiting_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_until.is_some()
    }

    pub fn rounds_built(&self) -> u64 {
        self.rounds_built
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn transition_deadline(&self) -> Option<Instant> {
        self.transition_until
    }

    pub fn activated_at(&self) -> Instant {
        self.activated_at
    }

    pub fn ticket(&self) -> ActivationTicket {
        ActivationTicket {
            index: self.active_index,
            epoch: self.epoch,
        }
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            active_index: self.active_index,
            exiting_index: self.exiting_index,
            transitioning: self.is_transitioning(),
            position: self.position,
            round_len: self.round.len(),
            rounds_built: self.rounds_built,
            ticket: self.ticket(),
            deadline: self.deadline,
        }
    }
}
